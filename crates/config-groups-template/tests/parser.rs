// crates/config-groups-template/tests/parser.rs
// ============================================================================
// Module: Rendered Configuration Parser Tests
// Description: Comment stripping and section parsing checks.
// Purpose: Ensure rendered engine files parse into ordered pairs.
// Dependencies: config-groups-template
// ============================================================================

//! ## Overview
//! Covers prefix stripping, value-less keys, duplicate handling, defaults,
//! continuation lines, and malformed documents.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use config_groups_template::IniDocument;
use config_groups_template::TemplateError;
use config_groups_template::section_pairs;
use config_groups_template::strip_comments;

fn pair(key: &str, value: Option<&str>) -> (String, Option<String>) {
    (key.to_string(), value.map(str::to_string))
}

#[test]
fn strip_comments_drops_marker_lines() {
    let document = "# heading\n[mysqld]\n!includedir /etc/mysql\n:label\nport = 3306\n  # kept";
    assert_eq!(strip_comments(document), "[mysqld]\nport = 3306\n  # kept");
}

#[test]
fn section_pairs_keep_order_and_bare_keys() {
    let document = "[client]\nport = 3306\n\n[mysqld]\nuser = mysql\nskip-external-locking\n\
                    key_buffer_size = 100M\n";
    let pairs = section_pairs(document, "mysqld").expect("parse");
    assert_eq!(
        pairs,
        vec![
            pair("user", Some("mysql")),
            pair("skip-external-locking", None),
            pair("key_buffer_size", Some("100M")),
        ]
    );
}

#[test]
fn colon_separator_and_case_folding() {
    let pairs = section_pairs("[mysqld]\nMax_Connections: 200\n", "mysqld").expect("parse");
    assert_eq!(pairs, vec![pair("max_connections", Some("200"))]);
}

/// Verifies a repeated key keeps its first position with the last value.
#[test]
fn duplicate_key_replaces_value_in_place() {
    let document = "[mysqld]\nport = 3306\nuser = mysql\nport = 3307\n";
    let pairs = section_pairs(document, "mysqld").expect("parse");
    assert_eq!(pairs, vec![pair("port", Some("3307")), pair("user", Some("mysql"))]);
}

#[test]
fn defaults_apply_before_section_entries() {
    let document = "[DEFAULT]\nport = 3306\nbind = 0.0.0.0\n[mysqld]\nport = 3310\nuser = mysql\n";
    let pairs = section_pairs(document, "mysqld").expect("parse");
    assert_eq!(
        pairs,
        vec![pair("port", Some("3310")), pair("bind", Some("0.0.0.0")), pair("user", Some("mysql"))]
    );
}

#[test]
fn inline_comment_and_continuation_lines() {
    let document = "[mysqld]\nsql_mode = STRICT ; legacy\ninit_connect = SET a=1\n  SET b=2\n";
    let pairs = section_pairs(document, "mysqld").expect("parse");
    assert_eq!(
        pairs,
        vec![pair("sql_mode", Some("STRICT")), pair("init_connect", Some("SET a=1\nSET b=2"))]
    );
}

#[test]
fn entry_before_header_is_rejected() {
    let err = IniDocument::parse("port = 3306\n[mysqld]\n").expect_err("no header");
    assert_eq!(
        err,
        TemplateError::Parse {
            line: 1,
            reason: "entry appears before any section header".to_string(),
        }
    );
}

#[test]
fn malformed_header_is_rejected() {
    let err = IniDocument::parse("[mysqld\nport = 1\n").expect_err("bad header");
    assert_eq!(err.kind(), "template_parse");
}

#[test]
fn missing_section_is_reported() {
    let err = section_pairs("[client]\nport = 3306\n", "mysqld").expect_err("no section");
    assert_eq!(err, TemplateError::MissingSection("mysqld".to_string()));
}
