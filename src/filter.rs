//! Translation of attribute filters into SQL search queries.
//!
//! A [`FilterNode`] tree over named account attributes is translated into a
//! [`SearchQuery`]: a select base (select list plus joins), a predicate with
//! `?` placeholders and the parameters bound to them, left to right.
//! Pattern operators bind an escaped `LIKE` pattern and declare
//! `ESCAPE '\'`, so `%` and `_` in the value match literally.
//!
//! # Join upgrades
//!
//! The select base starts at [`JoinLevel::Users`]. Quota attributes need
//! [`JoinLevel::Quotas`]; role and privilege attributes need
//! [`JoinLevel::Grants`]. Requirements from the predicate and from the
//! requested projection are unioned over the whole call, so the level only
//! ever goes up regardless of tree shape.
//!
//! # Allow-lists
//!
//! | List | Excludes |
//! |------|----------|
//! | searchable | `password`, `roles`, `privileges` |
//! | projectable | nothing |
//!
//! # Example
//!
//! ```
//! use sql_user_provisioner::{
//!     case_sensitivity::CaseSensitivitySetup,
//!     filter::{FilterNode, FilterTranslator, JoinLevel}
//! };
//!
//! let setup = CaseSensitivitySetup::default();
//! let translator = FilterTranslator::new(&setup);
//! let filter = FilterNode::and(
//!     FilterNode::starts_with("name", "app_"),
//!     FilterNode::equals("enabled", true)
//! );
//!
//! let query = translator.translate(Some(&filter), &["name"]).unwrap();
//! assert_eq!(query.join_level, JoinLevel::Users);
//! assert_eq!(query.params.len(), 2);
//! assert!(query.to_sql().starts_with("SELECT DBA_USERS.* FROM DBA_USERS WHERE ("));
//! ```

mod attributes;
mod types;

pub use attributes::{ENABLED_EXPR, JoinLevel, PASSWORD_EXPIRED_EXPR, UserAttribute, ValueKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
pub use types::{CompareOp, Comparison, FilterNode, FilterValue, LIKE_ESCAPE, SqlParam};

use crate::{
    case_sensitivity::CaseSensitivitySetup,
    error::{ProvisionError, ProvisionResult},
    user::AuthMode
};

/// Translated search: select base, optional predicate and bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub select_base: String,
    pub predicate:   Option<String>,
    pub params:      Vec<SqlParam>,
    pub join_level:  JoinLevel
}

impl SearchQuery {
    /// Full query text.
    pub fn to_sql(&self) -> String {
        match &self.predicate {
            Some(predicate) => format!("{} WHERE {}", self.select_base, predicate),
            None => self.select_base.clone()
        }
    }
}

/// Translates filter trees into [`SearchQuery`] values.
#[derive(Debug, Clone, Copy)]
pub struct FilterTranslator<'a> {
    setup: &'a CaseSensitivitySetup
}

impl<'a> FilterTranslator<'a> {
    pub fn new(setup: &'a CaseSensitivitySetup) -> Self {
        Self {
            setup
        }
    }

    /// Whether `name` may appear in a filter predicate.
    pub fn validate_search_attribute(name: &str) -> bool {
        UserAttribute::from_name(name).is_some_and(UserAttribute::is_searchable)
    }

    /// Whether `name` may be requested as output.
    pub fn validate_projection_attribute(name: &str) -> bool {
        UserAttribute::from_name(name).is_some_and(UserAttribute::is_projectable)
    }

    /// Translate `filter` and the requested projection into a query.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::UnsupportedFilterAttribute`] for attributes outside
    ///   the allow-lists, including role/privilege filters
    /// - [`ProvisionError::UnsupportedFilterOperator`] for pattern matches on
    ///   non-text attributes and ordering on boolean ones
    /// - [`ProvisionError::InvalidFilterValue`] for values of the wrong shape
    pub fn translate<S: AsRef<str>>(
        &self,
        filter: Option<&FilterNode>,
        requested: &[S]
    ) -> ProvisionResult<SearchQuery> {
        let mut state = Translation {
            setup:      self.setup,
            params:     Vec::new(),
            join_level: JoinLevel::Users
        };
        for name in requested {
            let name = name.as_ref();
            let attr = UserAttribute::from_name(name)
                .filter(|attr| attr.is_projectable())
                .ok_or_else(|| ProvisionError::UnsupportedFilterAttribute(name.to_string()))?;
            state.join_level.upgrade(attr.join_level());
        }
        let predicate = filter.map(|node| state.node(node)).transpose()?;
        Ok(SearchQuery {
            select_base: state.join_level.select_base(),
            predicate,
            params: state.params,
            join_level: state.join_level
        })
    }
}

/// Per-call translator state.
struct Translation<'a> {
    setup:      &'a CaseSensitivitySetup,
    params:     Vec<SqlParam>,
    join_level: JoinLevel
}

impl Translation<'_> {
    fn node(&mut self, node: &FilterNode) -> ProvisionResult<String> {
        match node {
            FilterNode::And {
                left,
                right
            } => {
                let left = self.node(left)?;
                let right = self.node(right)?;
                Ok(format!("({} AND {})", left, right))
            }
            FilterNode::Or {
                left,
                right
            } => {
                let left = self.node(left)?;
                let right = self.node(right)?;
                Ok(format!("({} OR {})", left, right))
            }
            FilterNode::Not {
                inner
            } => Ok(format!("NOT ({})", self.node(inner)?)),
            FilterNode::Compare(cmp) => self.comparison(cmp)
        }
    }

    fn comparison(&mut self, cmp: &Comparison) -> ProvisionResult<String> {
        let unsupported = || ProvisionError::UnsupportedFilterAttribute(cmp.attribute.to_string());
        let attr = UserAttribute::from_name(&cmp.attribute)
            .filter(|attr| attr.is_searchable())
            .ok_or_else(unsupported)?;
        let column = attr.column().ok_or_else(unsupported)?;
        let column = match attr.category() {
            Some(category) => self.setup.format_column(category, column),
            None => column
        };
        self.join_level.upgrade(attr.join_level());
        let param = self.coerce(attr, cmp)?;
        self.params.push(param);
        if cmp.op.is_pattern() {
            Ok(format!("{} LIKE ? ESCAPE '{}'", column, LIKE_ESCAPE))
        } else {
            Ok(format!("{} {} ?", column, cmp.op.sql_operator()))
        }
    }

    fn coerce(&self, attr: UserAttribute, cmp: &Comparison) -> ProvisionResult<SqlParam> {
        let kind = attr.value_kind();
        let op_allowed = match kind {
            ValueKind::Token(_) => true,
            ValueKind::Boolean | ValueKind::AuthMode => cmp.op == CompareOp::Equals,
            ValueKind::Timestamp | ValueKind::Integer => !cmp.op.is_pattern()
        };
        if !op_allowed {
            return Err(ProvisionError::UnsupportedFilterOperator {
                attribute: cmp.attribute.to_string(),
                operator:  cmp.op.as_str()
            });
        }
        let invalid = |expected: &'static str| ProvisionError::InvalidFilterValue {
            attribute: cmp.attribute.to_string(),
            expected
        };
        let param = match kind {
            ValueKind::Token(category) => {
                let text = match &cmp.value {
                    FilterValue::Text(text) => text.clone(),
                    FilterValue::Integer(value) => value.to_string(),
                    FilterValue::Boolean(_) => return Err(invalid("text"))
                };
                let text = match category {
                    Some(category) => self.setup.normalize(category, &text),
                    None => text
                };
                SqlParam::Text(cmp.op.pattern(&text))
            }
            ValueKind::Boolean => {
                let flag = match &cmp.value {
                    FilterValue::Boolean(flag) => *flag,
                    FilterValue::Text(text) if text.eq_ignore_ascii_case("true") => true,
                    FilterValue::Text(text) if text.eq_ignore_ascii_case("false") => false,
                    _ => return Err(invalid("a boolean"))
                };
                SqlParam::Text(flag.to_string())
            }
            ValueKind::AuthMode => {
                let FilterValue::Text(text) = &cmp.value else {
                    return Err(invalid("LOCAL, EXTERNAL or GLOBAL"));
                };
                let mode: AuthMode = text
                    .parse()
                    .map_err(|_| invalid("LOCAL, EXTERNAL or GLOBAL"))?;
                SqlParam::Text(mode.directory_type().to_string())
            }
            ValueKind::Timestamp => {
                let ts = match &cmp.value {
                    FilterValue::Integer(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
                    FilterValue::Text(text) => DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|ts| ts.with_timezone(&Utc)),
                    FilterValue::Boolean(_) => None
                };
                SqlParam::Timestamp(ts.ok_or_else(|| invalid("epoch milliseconds or RFC 3339"))?)
            }
            ValueKind::Integer => match &cmp.value {
                FilterValue::Integer(value) => SqlParam::Integer(*value),
                FilterValue::Text(text) => SqlParam::Integer(
                    text.trim()
                        .parse()
                        .map_err(|_| invalid("an integer"))?
                ),
                FilterValue::Boolean(_) => return Err(invalid("an integer"))
            }
        };
        Ok(param)
    }
}
