// crates/config-groups-core/tests/properties.rs
// ============================================================================
// Module: Validation and Lifecycle Property Tests
// Description: Property-based checks for validation and item-set laws.
// Purpose: Exercise bounds, unknown keys, merge, and replace over random inputs.
// Dependencies: config-groups-core, proptest, serde_json
// ============================================================================
//! ## Overview
//! Generates integer values around rule bounds and random edit batches, then
//! checks the acceptance and item-set laws hold for every case.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;

use config_groups_core::GroupChanges;
use config_groups_core::NewGroup;
use config_groups_core::ProposedValues;
use config_groups_core::RestartRequirement;
use config_groups_core::ValidationError;
use config_groups_core::classify_restart;
use config_groups_core::validate;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

use crate::common::rules;
use crate::common::service;
use crate::common::tenant;

/// Dynamic integer keys with bounds 1..=65535.
const BOUNDED_KEYS: [&str; 2] = ["connect_timeout", "max_connections"];

fn bounded_batch() -> impl Strategy<Value = ProposedValues> {
    prop::collection::btree_map(
        prop::sample::select(BOUNDED_KEYS.to_vec()).prop_map(str::to_string),
        (1i64..=65535).prop_map(Value::from),
        0..=2,
    )
}

proptest! {
    #[test]
    fn in_range_batches_are_accepted(batch in bounded_batch()) {
        prop_assert_eq!(validate(&batch, &rules()), Ok(()));
    }

    #[test]
    fn out_of_range_values_are_rejected(value in prop_oneof![i64::MIN..1i64, 65536i64..i64::MAX]) {
        let batch: ProposedValues =
            BTreeMap::from([("connect_timeout".to_string(), Value::from(value))]);
        let result = validate(&batch, &rules());
        if value < 1 {
            prop_assert_eq!(
                result,
                Err(ValidationError::BelowMinimum { key: "connect_timeout".to_string(), min: 1 })
            );
        } else {
            prop_assert_eq!(
                result,
                Err(ValidationError::AboveMaximum { key: "connect_timeout".to_string(), max: 65535 })
            );
        }
    }

    #[test]
    fn unknown_key_always_rejects(batch in bounded_batch(), suffix in "[a-z]{1,8}") {
        let mut batch = batch;
        let unknown = format!("unknown_{suffix}");
        batch.insert(unknown.clone(), json!(1));
        prop_assert_eq!(validate(&batch, &rules()), Err(ValidationError::UnknownParameter(unknown)));
    }

    #[test]
    fn numeric_strings_never_satisfy_integer_rules(value in 1i64..=65535) {
        let batch: ProposedValues =
            BTreeMap::from([("connect_timeout".to_string(), Value::from(value.to_string()))]);
        let result = validate(&batch, &rules());
        prop_assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })), "{:?}", result);
    }

    #[test]
    fn edit_merges_and_update_replaces(initial in bounded_batch(), edit in bounded_batch()) {
        let service = service();
        let group_id = service
            .create(&tenant(), NewGroup { name: "p".to_string(), description: None, values: initial.clone() })
            .expect("create")
            .id;

        let edited = service.edit(&tenant(), &group_id, &edit).expect("edit").group.values;
        let mut expected = initial;
        expected.extend(edit.clone());
        prop_assert_eq!(&edited, &expected);

        let edited_twice = service.edit(&tenant(), &group_id, &edit).expect("edit").group.values;
        prop_assert_eq!(&edited_twice, &expected);

        let replaced = service
            .update(&tenant(), &group_id, GroupChanges { values: Some(edit.clone()), ..GroupChanges::default() })
            .expect("update")
            .group
            .values;
        prop_assert_eq!(replaced, edit);
    }

    #[test]
    fn any_non_dynamic_key_requires_restart(batch in bounded_batch(), include_static in any::<bool>()) {
        let mut keys: Vec<&str> = batch.keys().map(String::as_str).collect();
        if include_static {
            keys.push("innodb_buffer_pool_size");
        }
        let expected =
            if include_static { RestartRequirement::Required } else { RestartRequirement::NotRequired };
        prop_assert_eq!(classify_restart(keys, &rules()), expected);
    }
}
