use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;
use smallvec::SmallVec;

use crate::{
    case_sensitivity::CaseSensitivitySetup,
    error::{ProvisionError, ProvisionResult},
    token::TokenCategory,
    user::{AuthMode, DesiredUserAttributes, ExistingUserRecord}
};

/// Quota sizes: `-1` or an integer with an optional unit suffix.
static QUOTA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(-1|\d+[kmgtpe]?)$").expect("valid regex"));

const UNLIMITED_QUOTA: &str = "-1";

type Clauses = SmallVec<[String; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Create,
    Alter
}

impl Verb {
    fn keyword(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Alter => "alter"
        }
    }
}

/// Synthesizes `create user`, `alter user` and `drop user` statements.
///
/// Clauses are emitted in a fixed order: identity, authentication,
/// tablespaces, quotas, password expiry, account lock, profile.
#[derive(Debug, Clone, Copy)]
pub struct UserStatementBuilder<'a> {
    setup: &'a CaseSensitivitySetup
}

impl<'a> UserStatementBuilder<'a> {
    pub fn new(setup: &'a CaseSensitivitySetup) -> Self {
        Self {
            setup
        }
    }

    /// Build a `create user` statement.
    ///
    /// Without an authentication mode the account is created with local
    /// authentication, and without a password the user name becomes the
    /// password.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::ConflictingAttributes`] for a password with non-local
    ///   authentication or a global name with non-global authentication
    /// - [`ProvisionError::MissingField`] for global authentication without a
    ///   global name
    /// - [`ProvisionError::InvalidQuota`] / [`ProvisionError::MissingTablespace`]
    ///   for unusable quotas
    /// - [`ProvisionError::PasswordRequiredForUnexpire`] when unexpiring without
    ///   a password
    pub fn build_create(&self, desired: &DesiredUserAttributes) -> ProvisionResult<String> {
        let clauses = self.clauses(Verb::Create, desired, None)?;
        Ok(clauses.join(" "))
    }

    /// Build an `alter user` statement, or `None` when nothing changes.
    ///
    /// Tablespaces missing from `desired` are taken from `existing` when a
    /// quota needs one. Local authentication without a password resets the
    /// password to the user name and expires it.
    ///
    /// # Errors
    ///
    /// Same as [`build_create`](Self::build_create).
    pub fn build_alter(
        &self,
        desired: &DesiredUserAttributes,
        existing: &ExistingUserRecord
    ) -> ProvisionResult<Option<String>> {
        let clauses = self.clauses(Verb::Alter, desired, Some(existing))?;
        if clauses.len() == 1 {
            return Ok(None);
        }
        Ok(Some(clauses.join(" ")))
    }

    /// Build a `drop user` statement.
    pub fn build_drop(&self, user_name: &str, cascade: bool) -> String {
        let user = self.setup.format(TokenCategory::UserName, user_name);
        if cascade {
            format!("drop user {} cascade", user)
        } else {
            format!("drop user {}", user)
        }
    }

    fn clauses(
        &self,
        verb: Verb,
        desired: &DesiredUserAttributes,
        existing: Option<&ExistingUserRecord>
    ) -> ProvisionResult<Clauses> {
        let mut clauses = Clauses::new();
        clauses.push(format!(
            "{} user {}",
            verb.keyword(),
            self.setup
                .format(TokenCategory::UserName, desired.user_name())
        ));
        let forced_expire = self.push_authentication(verb, desired, &mut clauses)?;
        if let Some(ts) = desired.default_tablespace() {
            clauses.push(format!(
                "default tablespace {}",
                self.setup.format(TokenCategory::DefaultTablespace, ts)
            ));
        }
        if let Some(ts) = desired.temp_tablespace() {
            clauses.push(format!(
                "temporary tablespace {}",
                self.setup.format(TokenCategory::TempTablespace, ts)
            ));
        }
        self.push_quota(
            &mut clauses,
            QuotaTarget {
                field:      "defaultQuota",
                category:   TokenCategory::DefaultTablespace,
                quota:      desired.default_quota(),
                tablespace: desired
                    .default_tablespace()
                    .or_else(|| existing.and_then(|e| e.default_tablespace.as_deref()))
            }
        )?;
        self.push_quota(
            &mut clauses,
            QuotaTarget {
                field:      "tempQuota",
                category:   TokenCategory::TempTablespace,
                quota:      desired.temp_quota(),
                tablespace: desired
                    .temp_tablespace()
                    .or_else(|| existing.and_then(|e| e.temp_tablespace.as_deref()))
            }
        )?;
        if desired.expire_password() == Some(false) && !desired.has_password() {
            return Err(ProvisionError::PasswordRequiredForUnexpire {
                user: desired.user_name().to_string()
            });
        }
        if desired.expire_password() == Some(true) || forced_expire {
            clauses.push("password expire".to_string());
        }
        match desired.enabled() {
            Some(true) => clauses.push("account unlock".to_string()),
            Some(false) => clauses.push("account lock".to_string()),
            None => {}
        }
        if let Some(profile) = desired.profile() {
            clauses.push(format!(
                "profile {}",
                self.setup.format(TokenCategory::Profile, profile)
            ));
        }
        Ok(clauses)
    }

    /// Push the authentication clause; returns whether the password must be
    /// expired because it was defaulted during an alter.
    fn push_authentication(
        &self,
        verb: Verb,
        desired: &DesiredUserAttributes,
        clauses: &mut Clauses
    ) -> ProvisionResult<bool> {
        let mode = desired.auth_mode().or(match verb {
            Verb::Create => Some(AuthMode::Local),
            Verb::Alter => desired.has_password().then_some(AuthMode::Local)
        });
        if desired.global_name().is_some() && mode != Some(AuthMode::Global) {
            return Err(ProvisionError::ConflictingAttributes {
                attribute: "globalName",
                conflict:  conflict_label(mode)
            });
        }
        if desired.has_password() && mode != Some(AuthMode::Local) {
            return Err(ProvisionError::ConflictingAttributes {
                attribute: "password",
                conflict:  conflict_label(mode)
            });
        }
        let mut forced_expire = false;
        match mode {
            None => {}
            Some(AuthMode::Local) => {
                let password = match desired.password() {
                    Some(password) => self
                        .setup
                        .format(TokenCategory::Password, password.expose_secret()),
                    None => {
                        forced_expire = verb == Verb::Alter;
                        self.setup
                            .format(TokenCategory::Password, desired.user_name())
                    }
                };
                clauses.push(format!("identified by {}", password));
            }
            Some(AuthMode::External) => clauses.push("identified externally".to_string()),
            Some(AuthMode::Global) => {
                let global = desired
                    .global_name()
                    .ok_or(ProvisionError::MissingField {
                        attribute: "globalName",
                        context:   "for global authentication"
                    })?;
                clauses.push(format!(
                    "identified globally as {}",
                    self.setup.format(TokenCategory::GlobalName, global)
                ));
            }
        }
        Ok(forced_expire)
    }

    fn push_quota(&self, clauses: &mut Clauses, target: QuotaTarget<'_>) -> ProvisionResult<()> {
        let Some(quota) = target.quota.map(str::trim) else {
            return Ok(());
        };
        if !QUOTA_REGEX.is_match(quota) {
            return Err(ProvisionError::InvalidQuota {
                attribute: target.field,
                value:     quota.to_string()
            });
        }
        let tablespace = target.tablespace.ok_or(ProvisionError::MissingTablespace {
            quota: target.field
        })?;
        let tablespace = self.setup.format(target.category, tablespace);
        if quota == UNLIMITED_QUOTA {
            clauses.push(format!("quota unlimited on {}", tablespace));
        } else {
            clauses.push(format!("quota {} on {}", quota, tablespace));
        }
        Ok(())
    }
}

struct QuotaTarget<'a> {
    field:      &'static str,
    category:   TokenCategory,
    quota:      Option<&'a str>,
    tablespace: Option<&'a str>
}

fn conflict_label(mode: Option<AuthMode>) -> String {
    match mode {
        Some(mode) => format!("{} authentication", mode),
        None => "unchanged authentication".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_regex() {
        for ok in ["-1", "0", "10", "10M", "5g", "1T"] {
            assert!(QUOTA_REGEX.is_match(ok), "{ok}");
        }
        for bad in ["", "-2", "10MB", "unlimited", "1 M", "1;drop"] {
            assert!(!QUOTA_REGEX.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn test_conflict_label() {
        assert_eq!(conflict_label(Some(AuthMode::External)), "EXTERNAL authentication");
        assert_eq!(conflict_label(None), "unchanged authentication");
    }
}
