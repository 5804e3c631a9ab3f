//! Token categories and their normalization/formatting rules.
//!
//! Every attribute value that ends up in generated statement text belongs to
//! one [`TokenCategory`]. A category owns one [`TokenRule`]: a [`Normalizer`]
//! (case folding) and a [`Formatter`] (quoting). Defaults live in a static
//! table and are never mutated; a
//! [`CaseSensitivitySetup`](crate::case_sensitivity::CaseSensitivitySetup)
//! overrides them per deployment.
//!
//! # Defaults
//!
//! | Category | Case fold | Quote |
//! |----------|-----------|-------|
//! | `USER_NAME` | yes | `"` |
//! | `PASSWORD` | no | `"` |
//! | `SCHEMA` | yes | `"` |
//! | `ROLE` | yes | `"` |
//! | `PRIVILEGE` | yes | none |
//! | `PROFILE` | yes | `"` |
//! | `DEFAULT_TABLESPACE` | yes | `"` |
//! | `TEMP_TABLESPACE` | yes | `"` |
//! | `GLOBAL_NAME` | no | `'` |

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Class of identity attribute sharing one normalization/formatting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenCategory {
    UserName,
    Password,
    Schema,
    Role,
    Privilege,
    Profile,
    DefaultTablespace,
    TempTablespace,
    GlobalName
}

/// Static default for one category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDefault {
    pub case_fold: bool,
    pub quote:     &'static str
}

/// One row per category, in declaration order.
const DEFAULTS: [CategoryDefault; TokenCategory::COUNT] = [
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: false,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: true,
        quote:     ""
    },
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: true,
        quote:     "\""
    },
    CategoryDefault {
        case_fold: false,
        quote:     "'"
    }
];

impl TokenCategory {
    pub const COUNT: usize = 9;

    /// All categories in declaration order.
    pub const ALL: [TokenCategory; Self::COUNT] = [
        Self::UserName,
        Self::Password,
        Self::Schema,
        Self::Role,
        Self::Privilege,
        Self::Profile,
        Self::DefaultTablespace,
        Self::TempTablespace,
        Self::GlobalName
    ];

    /// Position in [`TokenCategory::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Hard-coded default rule.
    pub const fn default_rule(self) -> CategoryDefault {
        DEFAULTS[self.index()]
    }

    /// Canonical configuration name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserName => "USER_NAME",
            Self::Password => "PASSWORD",
            Self::Schema => "SCHEMA",
            Self::Role => "ROLE",
            Self::Privilege => "PRIVILEGE",
            Self::Profile => "PROFILE",
            Self::DefaultTablespace => "DEFAULT_TABLESPACE",
            Self::TempTablespace => "TEMP_TABLESPACE",
            Self::GlobalName => "GLOBAL_NAME"
        }
    }

    /// Resolve a configuration name, case-insensitively.
    ///
    /// Besides the canonical names, the short forms `USER`, `DEF_TABLESPACE`
    /// and `GLOBAL` are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let category = match upper.as_str() {
            "USER_NAME" | "USER" => Self::UserName,
            "PASSWORD" => Self::Password,
            "SCHEMA" => Self::Schema,
            "ROLE" => Self::Role,
            "PRIVILEGE" => Self::Privilege,
            "PROFILE" => Self::Profile,
            "DEFAULT_TABLESPACE" | "DEF_TABLESPACE" => Self::DefaultTablespace,
            "TEMP_TABLESPACE" => Self::TempTablespace,
            "GLOBAL_NAME" | "GLOBAL" => Self::GlobalName,
            _ => return None
        };
        Some(category)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case folding half of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    case_fold: bool
}

impl Normalizer {
    pub const fn new(case_fold: bool) -> Self {
        Self {
            case_fold
        }
    }

    pub const fn case_fold(&self) -> bool {
        self.case_fold
    }

    /// Upper-case the token when folding is enabled.
    pub fn apply(&self, token: &str) -> String {
        if self.case_fold {
            token.to_uppercase()
        } else {
            token.to_string()
        }
    }

    /// Byte form; UTF-8 input folds like [`apply`](Self::apply), other input
    /// folds ASCII letters only.
    pub fn apply_bytes(&self, token: &[u8]) -> Vec<u8> {
        if !self.case_fold {
            return token.to_vec();
        }
        match std::str::from_utf8(token) {
            Ok(text) => text.to_uppercase().into_bytes(),
            Err(_) => token.to_ascii_uppercase()
        }
    }
}

/// Quoting half of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    quote: CompactString
}

impl Formatter {
    pub fn new(quote: impl Into<CompactString>) -> Self {
        Self {
            quote: quote.into()
        }
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Wrap the token in the quote string; no case change.
    ///
    /// Occurrences of the quote string inside the token are doubled, so the
    /// result is always one literal or identifier. An empty quote leaves the
    /// token as-is.
    pub fn apply(&self, token: &str) -> String {
        if self.quote.is_empty() {
            return token.to_string();
        }
        let quote = self.quote.as_str();
        let mut out = String::with_capacity(token.len() + quote.len() * 2);
        out.push_str(quote);
        for (idx, part) in token.split(quote).enumerate() {
            if idx > 0 {
                out.push_str(quote);
                out.push_str(quote);
            }
            out.push_str(part);
        }
        out.push_str(quote);
        out
    }

    pub fn apply_bytes(&self, token: &[u8]) -> Vec<u8> {
        let quote = self.quote.as_bytes();
        if quote.is_empty() {
            return token.to_vec();
        }
        let mut out = Vec::with_capacity(token.len() + quote.len() * 2);
        out.extend_from_slice(quote);
        let mut rest = token;
        while let Some(&first) = rest.first() {
            if rest.starts_with(quote) {
                out.extend_from_slice(quote);
                out.extend_from_slice(quote);
                rest = &rest[quote.len()..];
            } else {
                out.push(first);
                rest = &rest[1..];
            }
        }
        out.extend_from_slice(quote);
        out
    }
}

/// Resolved rule for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub category:   TokenCategory,
    pub normalizer: Normalizer,
    pub formatter:  Formatter
}

impl TokenRule {
    pub fn new(category: TokenCategory, case_fold: bool, quote: impl Into<CompactString>) -> Self {
        Self {
            category,
            normalizer: Normalizer::new(case_fold),
            formatter: Formatter::new(quote)
        }
    }

    /// Rule built from the category's hard-coded default.
    pub fn default_for(category: TokenCategory) -> Self {
        let default = category.default_rule();
        Self::new(category, default.case_fold, default.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_index_order() {
        for (idx, category) in TokenCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), idx);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for category in TokenCategory::ALL {
            assert_eq!(TokenCategory::from_name(category.as_str()), Some(category));
        }
    }
}
