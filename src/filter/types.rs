//! Filter tree and bound parameter types.

use std::fmt;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Leaf comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Greater,
    GreaterEqual,
    Less,
    LessEqual
}

impl CompareOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Greater => "greater",
            Self::GreaterEqual => "greaterEqual",
            Self::Less => "less",
            Self::LessEqual => "lessEqual"
        }
    }

    /// Whether the operator is a `LIKE` pattern match.
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    pub(crate) const fn sql_operator(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Contains | Self::StartsWith | Self::EndsWith => "LIKE",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<="
        }
    }

    /// Wrap a text value in the `LIKE` wildcards for this operator.
    ///
    /// Wildcards inside the value are escaped with [`LIKE_ESCAPE`].
    pub(crate) fn pattern(self, value: &str) -> String {
        match self {
            Self::Contains => format!("%{}%", escape_like_pattern(value)),
            Self::StartsWith => format!("{}%", escape_like_pattern(value)),
            Self::EndsWith => format!("%{}", escape_like_pattern(value)),
            _ => value.to_string()
        }
    }
}

/// Escape character declared by every generated `LIKE` comparison.
pub const LIKE_ESCAPE: char = '\\';

/// Escape `%`, `_` and the escape character itself.
fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Boolean(bool),
    Integer(i64),
    Text(String)
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One `(attribute, operator, value)` leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub op:        CompareOp,
    pub attribute: CompactString,
    pub value:     FilterValue
}

/// Boolean filter tree over named attributes.
///
/// JSON form, as decoded by the CLI:
///
/// ```json
/// {"type": "and",
///  "left":  {"type": "compare", "op": "startsWith", "attribute": "name", "value": "APP_"},
///  "right": {"type": "not", "inner": {"type": "compare", "op": "equals", "attribute": "enabled", "value": false}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterNode {
    And {
        left:  Box<FilterNode>,
        right: Box<FilterNode>
    },
    Or {
        left:  Box<FilterNode>,
        right: Box<FilterNode>
    },
    Not {
        inner: Box<FilterNode>
    },
    Compare(Comparison)
}

impl FilterNode {
    pub fn compare(op: CompareOp, attribute: &str, value: impl Into<FilterValue>) -> Self {
        Self::Compare(Comparison {
            op,
            attribute: attribute.into(),
            value: value.into()
        })
    }

    pub fn equals(attribute: &str, value: impl Into<FilterValue>) -> Self {
        Self::compare(CompareOp::Equals, attribute, value)
    }

    pub fn contains(attribute: &str, value: impl Into<FilterValue>) -> Self {
        Self::compare(CompareOp::Contains, attribute, value)
    }

    pub fn starts_with(attribute: &str, value: impl Into<FilterValue>) -> Self {
        Self::compare(CompareOp::StartsWith, attribute, value)
    }

    pub fn ends_with(attribute: &str, value: impl Into<FilterValue>) -> Self {
        Self::compare(CompareOp::EndsWith, attribute, value)
    }

    pub fn and(left: FilterNode, right: FilterNode) -> Self {
        Self::And {
            left:  Box::new(left),
            right: Box::new(right)
        }
    }

    pub fn or(left: FilterNode, right: FilterNode) -> Self {
        Self::Or {
            left:  Box::new(left),
            right: Box::new(right)
        }
    }

    pub fn negate(inner: FilterNode) -> Self {
        Self::Not {
            inner: Box::new(inner)
        }
    }
}

/// Parameter bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>)
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{}'", text),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Timestamp(ts) => write!(f, "TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.3f"))
        }
    }
}
