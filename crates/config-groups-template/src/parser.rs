// crates/config-groups-template/src/parser.rs
// ============================================================================
// Module: Rendered Configuration Parser
// Description: Comment stripping and INI-style section parsing.
// Purpose: Turn rendered engine configuration into ordered key/value pairs.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//! Rendered engine files are INI-like: `[section]` headers followed by
//! `key = value`, `key: value`, or bare `key` lines. Keys are case-folded to
//! lowercase, later duplicates replace earlier values in place, and indented
//! lines continue the previous value. Entries in a `[DEFAULT]` section apply
//! to every section that does not set the same key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::TemplateError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefixes that mark a whole line as a directive or comment in engine files.
const STRIPPED_PREFIXES: [char; 3] = ['#', '!', ':'];
/// Section whose entries apply to every other section.
const DEFAULT_SECTION: &str = "DEFAULT";

/// Ordered key/value pair; bare keys carry no value.
pub type ConfigPair = (String, Option<String>);

// ============================================================================
// SECTION: Comment Stripping
// ============================================================================

/// Removes lines starting with `#`, `!`, or `:`.
///
/// Only the first column is inspected; indented markers are kept.
#[must_use]
pub fn strip_comments(document: &str) -> String {
    document
        .lines()
        .filter(|line| !line.starts_with(STRIPPED_PREFIXES))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// One named section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    /// Section name as written.
    pub name: String,
    /// Entries in first-seen order.
    pub entries: Vec<ConfigPair>,
}

/// Parsed INI-like document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    /// Entries of the `[DEFAULT]` section.
    pub defaults: Vec<ConfigPair>,
    /// Named sections in first-seen order.
    pub sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] when an entry appears before any
    /// section header, a header is malformed, or a key is empty.
    pub fn parse(document: &str) -> Result<Self, TemplateError> {
        let mut parsed = Self::default();
        let mut current: Option<usize> = None;
        let mut in_defaults = false;
        let mut last_key: Option<String> = None;

        for (index, raw) in document.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
                continue;
            }
            if raw.starts_with([' ', '\t']) && last_key.is_some() {
                let entries = parsed.entries_mut(current, in_defaults);
                if let (Some(entries), Some(key)) = (entries, last_key.as_ref())
                    && let Some((_, Some(value))) =
                        entries.iter_mut().find(|(existing, _)| existing == key)
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
            if let Some(rest) = trimmed.strip_prefix('[') {
                let header = rest.strip_suffix(']').map(str::trim);
                let Some(name) = header.filter(|name| !name.is_empty()) else {
                    return Err(parse_error(line_number, "malformed section header"));
                };
                last_key = None;
                if name == DEFAULT_SECTION {
                    in_defaults = true;
                    current = None;
                } else {
                    in_defaults = false;
                    current = Some(parsed.section_index(name));
                }
                continue;
            }
            let (key, value) = split_entry(trimmed);
            if key.is_empty() {
                return Err(parse_error(line_number, "entry has an empty key"));
            }
            if in_defaults {
                set_entry(&mut parsed.defaults, key.clone(), value);
            } else if let Some(section) = current.and_then(|slot| parsed.sections.get_mut(slot)) {
                set_entry(&mut section.entries, key.clone(), value);
            } else {
                return Err(parse_error(line_number, "entry appears before any section header"));
            }
            last_key = Some(key);
        }
        Ok(parsed)
    }

    /// Returns the entries visible in a section, defaults first.
    #[must_use]
    pub fn section_items(&self, name: &str) -> Option<Vec<ConfigPair>> {
        let section = self.sections.iter().find(|section| section.name == name)?;
        let mut items = self.defaults.clone();
        for (key, value) in &section.entries {
            set_entry(&mut items, key.clone(), value.clone());
        }
        Some(items)
    }

    /// Returns the slot of a section, creating it when absent.
    fn section_index(&mut self, name: &str) -> usize {
        if let Some(slot) = self.sections.iter().position(|section| section.name == name) {
            return slot;
        }
        self.sections.push(IniSection {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.sections.len() - 1
    }

    /// Returns the entry list the parser is currently filling.
    fn entries_mut(
        &mut self,
        current: Option<usize>,
        in_defaults: bool,
    ) -> Option<&mut Vec<ConfigPair>> {
        if in_defaults {
            return Some(&mut self.defaults);
        }
        current.and_then(|slot| self.sections.get_mut(slot)).map(|section| &mut section.entries)
    }
}

// ============================================================================
// SECTION: Section Pairs
// ============================================================================

/// Parses a document and returns the ordered pairs of one section.
///
/// # Errors
///
/// Returns [`TemplateError::Parse`] for malformed input and
/// [`TemplateError::MissingSection`] when the section does not exist.
pub fn section_pairs(document: &str, section: &str) -> Result<Vec<ConfigPair>, TemplateError> {
    IniDocument::parse(document)?
        .section_items(section)
        .ok_or_else(|| TemplateError::MissingSection(section.to_string()))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits an entry line at the first `=` or `:`.
fn split_entry(line: &str) -> (String, Option<String>) {
    match line.find(['=', ':']) {
        Some(at) => {
            let key = line[..at].trim().to_lowercase();
            let value = strip_inline_comment(line[at + 1..].trim());
            (key, Some(value.to_string()))
        }
        None => (line.to_lowercase(), None),
    }
}

/// Drops a trailing ` ;` comment from a value.
fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (at, byte) in bytes.iter().enumerate() {
        if *byte == b';' && at > 0 && bytes[at - 1].is_ascii_whitespace() {
            return value[..at].trim_end();
        }
    }
    value
}

/// Inserts or replaces an entry in a pair list, keeping its first position.
fn set_entry(entries: &mut Vec<ConfigPair>, key: String, value: Option<String>) {
    if let Some(entry) = entries.iter_mut().find(|(existing, _)| *existing == key) {
        entry.1 = value;
    } else {
        entries.push((key, value));
    }
}

/// Builds a parse error for a line.
fn parse_error(line: usize, reason: &str) -> TemplateError {
    TemplateError::Parse {
        line,
        reason: reason.to_string(),
    }
}
