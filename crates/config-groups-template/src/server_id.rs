// crates/config-groups-template/src/server_id.rs
// ============================================================================
// Module: Server Identifier
// Description: Deterministic replication server id derived from an instance id.
// Purpose: Give every instance a stable positive id for engine replication.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! The id is the SHA-256 digest of the instance id read as a big-endian
//! 64-bit word from its first eight bytes, reduced modulo `2^31`. The result
//! is stable across processes and platforms.

use config_groups_core::InstanceId;
use sha2::Digest;
use sha2::Sha256;

/// Exclusive upper bound of server ids.
pub const SERVER_ID_MODULUS: u64 = 1 << 31;

/// Returns the deterministic server id for an instance.
#[must_use]
pub fn unique_server_id(instance_id: &InstanceId) -> u32 {
    let digest = Sha256::digest(instance_id.as_str().as_bytes());
    let mut word = [0_u8; 8];
    word.copy_from_slice(&digest[..8]);
    let reduced = u64::from_be_bytes(word) % SERVER_ID_MODULUS;
    // reduced < 2^31 always fits
    u32::try_from(reduced).unwrap_or(0)
}
