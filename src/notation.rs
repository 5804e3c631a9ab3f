//! Compact nested-map notation used by single-text configuration properties.
//!
//! The notation is a comma-separated list of `key=value` entries. A value is
//! either a bare token or a nested map in braces, parsed recursively:
//!
//! ```text
//! formatters={USER={quotes=},PROFILE={quotes='}},normalizers={ALL={upper=false}}
//! ```
//!
//! There are no escape sequences, so `,`, `=`, `{` and `}` cannot appear in
//! a bare token. A value may be empty (`key=`), which yields an empty string.
//! The whole input may additionally be wrapped in one pair of braces.
//!
//! # Example
//!
//! ```
//! use sql_user_provisioner::notation::{ConfigValue, parse};
//!
//! let map = parse("a=b,c={d=e}").unwrap();
//! assert_eq!(map.get("a"), Some(&ConfigValue::Text("b".into())));
//! assert_eq!(
//!     map.get("c").and_then(ConfigValue::as_map).and_then(|m| m.get("d")),
//!     Some(&ConfigValue::Text("e".into()))
//! );
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ProvisionError, ProvisionResult};

/// Ordered key to value map produced by [`parse`].
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A parsed value: bare text or a nested map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Map(ConfigMap)
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(_) => None
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Text(_) => None
        }
    }
}

/// Parse notation text into an ordered map.
///
/// # Errors
///
/// Returns [`ProvisionError::MalformedConfig`] with the offending fragment for
/// unbalanced braces, entries without `=`, empty keys, empty entries and
/// stray characters around nested maps.
pub fn parse(text: &str) -> ProvisionResult<ConfigMap> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(ConfigMap::new());
    }
    let body = match matching_close(trimmed) {
        Some(end) if end == trimmed.len() - 1 => &trimmed[1..end],
        _ => trimmed
    };
    parse_map(body)
}

/// Parse optional notation text; absent input yields an empty map.
pub fn parse_optional(text: Option<&str>) -> ProvisionResult<ConfigMap> {
    text.map_or_else(|| Ok(ConfigMap::new()), parse)
}

fn parse_map(text: &str) -> ProvisionResult<ConfigMap> {
    let mut map = ConfigMap::new();
    if text.trim().is_empty() {
        return Ok(map);
    }
    for entry in split_entries(text)? {
        let (key, value) = parse_entry(entry)?;
        map.insert(key, value);
    }
    Ok(map)
}

fn parse_entry(entry: &str) -> ProvisionResult<(String, ConfigValue)> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return Err(ProvisionError::malformed(entry, "empty entry"));
    }
    let eq = top_level_eq(trimmed)
        .ok_or_else(|| ProvisionError::malformed(trimmed, "entry has no '='"))?;
    let key = trimmed[..eq].trim();
    if key.is_empty() {
        return Err(ProvisionError::malformed(trimmed, "entry has an empty key"));
    }
    if key.contains(['{', '}']) {
        return Err(ProvisionError::malformed(trimmed, "key contains a brace"));
    }
    let raw_value = trimmed[eq + 1..].trim();
    let value = if raw_value.starts_with('{') {
        match matching_close(raw_value) {
            Some(end) if end == raw_value.len() - 1 => {
                ConfigValue::Map(parse_map(&raw_value[1..end])?)
            }
            Some(end) => {
                return Err(ProvisionError::malformed(
                    &raw_value[end + 1..],
                    "unexpected text after '}'"
                ));
            }
            None => {
                return Err(ProvisionError::malformed(
                    raw_value,
                    "opening brace without closing brace"
                ));
            }
        }
    } else if raw_value.contains(['{', '}', '=']) {
        return Err(ProvisionError::malformed(
            raw_value,
            "bare value contains a reserved character"
        ));
    } else {
        ConfigValue::Text(raw_value.to_string())
    };
    Ok((key.to_string(), value))
}

/// Split on commas outside braces, checking brace balance.
fn split_entries(text: &str) -> ProvisionResult<Vec<&str>> {
    let mut entries = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => open.push(idx),
            '}' => {
                if open.pop().is_none() {
                    return Err(ProvisionError::malformed(
                        &text[idx..],
                        "closing brace without opening brace"
                    ));
                }
            }
            ',' if open.is_empty() => {
                entries.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if let Some(&first) = open.first() {
        return Err(ProvisionError::malformed(
            &text[first..],
            "opening brace without closing brace"
        ));
    }
    entries.push(&text[start..]);
    Ok(entries)
}

/// Position of the first `=` at brace depth zero.
fn top_level_eq(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// For text starting with `{`, the byte index of its balancing `}`.
fn matching_close(text: &str) -> Option<usize> {
    if !text.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entries_respects_nesting() {
        let entries = split_entries("a=b,c={d=e,f=g},h=").unwrap();
        assert_eq!(entries, vec!["a=b", "c={d=e,f=g}", "h="]);
    }

    #[test]
    fn test_split_entries_reports_first_unclosed_brace() {
        let err = split_entries("a={b={c=d}").unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::MalformedConfig { ref fragment, .. } if fragment == "{b={c=d}"
        ));
    }

    #[test]
    fn test_matching_close() {
        assert_eq!(matching_close("{a={b}}x"), Some(6));
        assert_eq!(matching_close("{a"), None);
        assert_eq!(matching_close("a}"), None);
    }

    #[test]
    fn test_top_level_eq_skips_nested() {
        assert_eq!(top_level_eq("key={a=b}"), Some(3));
        assert_eq!(top_level_eq("{a=b}"), None);
    }
}
