//! Per-deployment case-sensitivity setup.
//!
//! A [`CaseSensitivityBuilder`] collects explicit overrides and/or one
//! notation string (see [`notation`](crate::notation)) and produces an
//! immutable [`CaseSensitivitySetup`] holding a rule for every
//! [`TokenCategory`]. The setup is plain data and can be shared freely
//! between threads.
//!
//! # Notation
//!
//! ```text
//! formatters={USER={quotes=},PROFILE={quotes='}},normalizers={ALL={upper=false}}
//! ```
//!
//! `ALL` applies to every category not configured more specifically.
//! Precedence, highest first: explicit override, category entry, `ALL`
//! entry, category default. Normalizer and formatter parts resolve
//! independently.
//!
//! # Example
//!
//! ```
//! use sql_user_provisioner::{case_sensitivity::CaseSensitivitySetup, token::TokenCategory};
//!
//! let setup = CaseSensitivitySetup::builder()
//!     .notation("formatters={PROFILE={quotes='}}")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(setup.format(TokenCategory::Profile, "DEFAULT"), "'DEFAULT'");
//! assert_eq!(
//!     setup.normalize_and_format(TokenCategory::Schema, "mySchema"),
//!     "\"MYSCHEMA\""
//! );
//! ```

use compact_str::CompactString;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::{ProvisionError, ProvisionResult},
    notation::{self, ConfigMap, ConfigValue},
    token::{Formatter, Normalizer, TokenCategory, TokenRule}
};

const FORMATTERS_KEY: &str = "formatters";
const NORMALIZERS_KEY: &str = "normalizers";
const QUOTES_KEY: &str = "quotes";
const UPPER_KEY: &str = "upper";
const ALL_KEY: &str = "ALL";

/// Immutable category to rule mapping; every category is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSensitivitySetup {
    rules: [TokenRule; TokenCategory::COUNT]
}

impl Default for CaseSensitivitySetup {
    fn default() -> Self {
        Self {
            rules: TokenCategory::ALL.map(TokenRule::default_for)
        }
    }
}

impl CaseSensitivitySetup {
    pub fn builder() -> CaseSensitivityBuilder {
        CaseSensitivityBuilder::default()
    }

    /// Build from a notation string alone.
    pub fn from_notation(text: &str) -> ProvisionResult<Self> {
        Self::builder().notation(text).build()
    }

    pub fn rule(&self, category: TokenCategory) -> &TokenRule {
        &self.rules[category.index()]
    }

    pub fn normalizer(&self, category: TokenCategory) -> &Normalizer {
        &self.rule(category).normalizer
    }

    pub fn formatter(&self, category: TokenCategory) -> &Formatter {
        &self.rule(category).formatter
    }

    /// Upper-case the token iff the category folds case.
    pub fn normalize(&self, category: TokenCategory, token: &str) -> String {
        self.normalizer(category).apply(token)
    }

    /// Wrap the token in the category's quote string.
    pub fn format(&self, category: TokenCategory, token: &str) -> String {
        self.formatter(category).apply(token)
    }

    pub fn normalize_and_format(&self, category: TokenCategory, token: &str) -> String {
        self.format(category, &self.normalize(category, token))
    }

    /// Column expression used when comparing against stored values.
    ///
    /// Columns are compared as stored, so this is the identity.
    pub fn format_column<'a>(&self, _category: TokenCategory, column: &'a str) -> &'a str {
        column
    }

    pub fn normalize_bytes(&self, category: TokenCategory, token: &[u8]) -> Vec<u8> {
        self.normalizer(category).apply_bytes(token)
    }

    pub fn format_bytes(&self, category: TokenCategory, token: &[u8]) -> Vec<u8> {
        self.formatter(category).apply_bytes(token)
    }

    pub fn normalize_and_format_bytes(&self, category: TokenCategory, token: &[u8]) -> Vec<u8> {
        self.format_bytes(category, &self.normalize_bytes(category, token))
    }

    pub fn format_column_bytes<'a>(&self, _category: TokenCategory, column: &'a [u8]) -> &'a [u8] {
        column
    }

    /// Secret form; the cleartext only exists inside the returned secret.
    pub fn normalize_secret(&self, category: TokenCategory, token: &SecretString) -> SecretString {
        SecretString::from(self.normalize(category, token.expose_secret()))
    }

    pub fn format_secret(&self, category: TokenCategory, token: &SecretString) -> SecretString {
        SecretString::from(self.format(category, token.expose_secret()))
    }

    pub fn normalize_and_format_secret(
        &self,
        category: TokenCategory,
        token: &SecretString
    ) -> SecretString {
        let normalized = self.normalize_secret(category, token);
        self.format_secret(category, &normalized)
    }

    pub fn format_column_secret(&self, _category: TokenCategory, column: &SecretString) -> SecretString {
        SecretString::from(column.expose_secret().to_string())
    }
}

/// Partial rule collected while building.
#[derive(Debug, Clone, Default)]
struct PartialRule {
    case_fold: Option<bool>,
    quote:     Option<CompactString>
}

impl PartialRule {
    fn fill_from(&mut self, lower: &PartialRule) {
        if self.case_fold.is_none() {
            self.case_fold = lower.case_fold;
        }
        if self.quote.is_none() {
            self.quote = lower.quote.clone();
        }
    }
}

/// Mutable builder for [`CaseSensitivitySetup`].
#[derive(Debug, Clone, Default)]
pub struct CaseSensitivityBuilder {
    explicit: [PartialRule; TokenCategory::COUNT],
    notation: Option<String>
}

impl CaseSensitivityBuilder {
    /// Explicit override for one category; `None` parts fall through.
    pub fn rule(
        mut self,
        category: TokenCategory,
        case_fold: Option<bool>,
        quote: Option<&str>
    ) -> Self {
        let slot = &mut self.explicit[category.index()];
        if let Some(fold) = case_fold {
            slot.case_fold = Some(fold);
        }
        if let Some(quote) = quote {
            slot.quote = Some(quote.into());
        }
        self
    }

    pub fn case_fold(self, category: TokenCategory, case_fold: bool) -> Self {
        self.rule(category, Some(case_fold), None)
    }

    pub fn quote(self, category: TokenCategory, quote: &str) -> Self {
        self.rule(category, None, Some(quote))
    }

    /// Notation string; a later call replaces an earlier one.
    pub fn notation(mut self, text: impl Into<String>) -> Self {
        self.notation = Some(text.into());
        self
    }

    /// Resolve every category into an immutable setup.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::MalformedConfig`] for unparsable notation, unknown
    ///   sections or attributes, and non-boolean `upper` values
    /// - [`ProvisionError::UnknownCategory`] for a key that is neither `ALL`
    ///   nor a category name
    pub fn build(self) -> ProvisionResult<CaseSensitivitySetup> {
        let mut configured: [PartialRule; TokenCategory::COUNT] = Default::default();
        let mut all = PartialRule::default();
        if let Some(text) = self.notation.as_deref() {
            let parsed = notation::parse(text)?;
            apply_notation(&parsed, &mut configured, &mut all)?;
        }
        let rules = TokenCategory::ALL.map(|category| {
            let mut resolved = self.explicit[category.index()].clone();
            resolved.fill_from(&configured[category.index()]);
            resolved.fill_from(&all);
            let default = category.default_rule();
            TokenRule {
                category,
                normalizer: Normalizer::new(resolved.case_fold.unwrap_or(default.case_fold)),
                formatter: Formatter::new(resolved.quote.unwrap_or_else(|| default.quote.into()))
            }
        });
        Ok(CaseSensitivitySetup {
            rules
        })
    }
}

fn apply_notation(
    parsed: &ConfigMap,
    configured: &mut [PartialRule; TokenCategory::COUNT],
    all: &mut PartialRule
) -> ProvisionResult<()> {
    for (section, value) in parsed {
        let entries = value
            .as_map()
            .ok_or_else(|| ProvisionError::malformed(section.as_str(), "section must be a map"))?;
        let is_formatter = if section.eq_ignore_ascii_case(FORMATTERS_KEY) {
            true
        } else if section.eq_ignore_ascii_case(NORMALIZERS_KEY) {
            false
        } else {
            return Err(ProvisionError::malformed(section.as_str(), "unknown section"));
        };
        for (key, attrs) in entries {
            let target = if key.eq_ignore_ascii_case(ALL_KEY) {
                &mut *all
            } else {
                let category = TokenCategory::from_name(key)
                    .ok_or_else(|| ProvisionError::UnknownCategory(key.clone()))?;
                &mut configured[category.index()]
            };
            let attrs = attrs
                .as_map()
                .ok_or_else(|| ProvisionError::malformed(key.as_str(), "category must be a map"))?;
            if is_formatter {
                apply_formatter(attrs, target)?;
            } else {
                apply_normalizer(attrs, target)?;
            }
        }
    }
    Ok(())
}

fn apply_formatter(attrs: &ConfigMap, target: &mut PartialRule) -> ProvisionResult<()> {
    for (name, value) in attrs {
        if !name.eq_ignore_ascii_case(QUOTES_KEY) {
            return Err(ProvisionError::malformed(name.as_str(), "unknown formatter attribute"));
        }
        let quote = text_value(name, value)?;
        target.quote = Some(quote.into());
    }
    Ok(())
}

fn apply_normalizer(attrs: &ConfigMap, target: &mut PartialRule) -> ProvisionResult<()> {
    for (name, value) in attrs {
        if !name.eq_ignore_ascii_case(UPPER_KEY) {
            return Err(ProvisionError::malformed(name.as_str(), "unknown normalizer attribute"));
        }
        let text = text_value(name, value)?;
        let fold = if text.eq_ignore_ascii_case("true") {
            true
        } else if text.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(ProvisionError::malformed(text, "expected true or false"));
        };
        target.case_fold = Some(fold);
    }
    Ok(())
}

fn text_value<'a>(name: &str, value: &'a ConfigValue) -> ProvisionResult<&'a str> {
    value
        .as_text()
        .ok_or_else(|| ProvisionError::malformed(name, "expected a plain value"))
}
