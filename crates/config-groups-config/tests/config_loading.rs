//! File loading tests for config-groups-config.
// crates/config-groups-config/tests/config_loading.rs
// =============================================================================
// Module: Config Loading Tests
// Description: Load configuration files with size, encoding, and path limits.
// Purpose: Ensure loading fails closed on oversized or malformed files.
// =============================================================================

use std::fs;

use config_groups_config::ConfigGroupsConfig;
use config_groups_config::MAX_CONFIG_FILE_SIZE;
use tempfile::TempDir;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn loads_explicit_path() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("config-groups.toml");
    fs::write(
        &path,
        "[rules]\npath = \"rules.json\"\n\n[templates]\nsearch_paths = [\"/etc/templates\"]\n\n\
         [audit]\nenabled = false\n",
    )
    .map_err(|err| err.to_string())?;
    let config = ConfigGroupsConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.templates.search_paths.len() != 1 || config.audit.enabled {
        return Err("config sections not applied".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    assert_invalid(ConfigGroupsConfig::load(Some(&dir.path().join("absent.toml"))), "config io error")
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("big.toml");
    let mut content = "# padding\n".repeat(MAX_CONFIG_FILE_SIZE / 10);
    content.push_str("# overflow\n");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    assert_invalid(ConfigGroupsConfig::load(Some(&path)), "config file exceeds size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("binary.toml");
    fs::write(&path, [0xff, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(ConfigGroupsConfig::load(Some(&path)), "config file must be utf-8")
}

#[test]
fn invalid_section_fails_load() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("config-groups.toml");
    fs::write(&path, "[store]\ntype = \"sqlite\"\n").map_err(|err| err.to_string())?;
    assert_invalid(ConfigGroupsConfig::load(Some(&path)), "sqlite store requires path")
}
