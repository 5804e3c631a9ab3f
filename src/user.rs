//! Desired and stored user account attributes.
//!
//! [`DesiredUserAttributes`] is what a caller wants an account to look like;
//! it is produced by [`DesiredUserAttributesBuilder`] (or decoded from a JSON
//! request) and is immutable afterwards. [`ExistingUserRecord`] is a
//! read-only snapshot of an account as stored in the directory, used to
//! supply defaults when altering.
//!
//! # Example
//!
//! ```
//! use sql_user_provisioner::user::{AuthMode, DesiredUserAttributes};
//!
//! let desired = DesiredUserAttributes::builder("scott")
//!     .auth_mode(AuthMode::Local)
//!     .password("tiger")
//!     .default_tablespace("USERS")
//!     .default_quota("10M")
//!     .build();
//!
//! assert_eq!(desired.user_name(), "scott");
//! assert!(desired.has_password());
//! ```

use std::{fmt, str::FromStr};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{case_sensitivity::CaseSensitivitySetup, token::TokenCategory};

/// How the directory authenticates the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthMode {
    /// Password stored in the directory
    #[serde(alias = "local")]
    Local,
    /// Operating system or network authentication
    #[serde(alias = "external")]
    External,
    /// Enterprise directory authentication by global name
    #[serde(alias = "global")]
    Global
}

impl AuthMode {
    /// Value stored in the directory's authentication type column.
    pub const fn directory_type(self) -> &'static str {
        match self {
            Self::Local => "PASSWORD",
            Self::External => "EXTERNAL",
            Self::Global => "GLOBAL"
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "LOCAL"),
            Self::External => write!(f, "EXTERNAL"),
            Self::Global => write!(f, "GLOBAL")
        }
    }
}

/// Text that names no [`AuthMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown authentication mode '{0}'")]
pub struct UnknownAuthMode(pub String);

impl FromStr for AuthMode {
    type Err = UnknownAuthMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCAL" | "PASSWORD" => Ok(Self::Local),
            "EXTERNAL" => Ok(Self::External),
            "GLOBAL" => Ok(Self::Global),
            _ => Err(UnknownAuthMode(s.trim().to_string()))
        }
    }
}

/// Attributes a caller wants an account to have.
///
/// Every field except the user name is optional; absent fields leave the
/// corresponding clause out of the generated statement. Quotas are size
/// strings, `"-1"` for unlimited or `"0"` to drop the quota.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DesiredUserAttributes {
    user_name:          String,
    auth_mode:          Option<AuthMode>,
    password:           Option<SecretString>,
    global_name:        Option<String>,
    expire_password:    Option<bool>,
    enabled:            Option<bool>,
    default_tablespace: Option<String>,
    temp_tablespace:    Option<String>,
    profile:            Option<String>,
    default_quota:      Option<String>,
    temp_quota:         Option<String>
}

impl DesiredUserAttributes {
    pub fn builder(user_name: impl Into<String>) -> DesiredUserAttributesBuilder {
        DesiredUserAttributesBuilder::new(user_name)
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn auth_mode(&self) -> Option<AuthMode> {
        self.auth_mode
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn global_name(&self) -> Option<&str> {
        self.global_name.as_deref()
    }

    pub fn expire_password(&self) -> Option<bool> {
        self.expire_password
    }

    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    pub fn default_tablespace(&self) -> Option<&str> {
        self.default_tablespace.as_deref()
    }

    pub fn temp_tablespace(&self) -> Option<&str> {
        self.temp_tablespace.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn default_quota(&self) -> Option<&str> {
        self.default_quota.as_deref()
    }

    pub fn temp_quota(&self) -> Option<&str> {
        self.temp_quota.as_deref()
    }

    /// Copy with every token run through its category normalizer.
    ///
    /// Quotas and flags are not tokens and are copied as-is.
    pub fn normalized(&self, setup: &CaseSensitivitySetup) -> Self {
        let norm = |category: TokenCategory, value: &Option<String>| {
            value.as_deref().map(|v| setup.normalize(category, v))
        };
        Self {
            user_name:          setup.normalize(TokenCategory::UserName, &self.user_name),
            auth_mode:          self.auth_mode,
            password:           self
                .password
                .as_ref()
                .map(|p| setup.normalize_secret(TokenCategory::Password, p)),
            global_name:        norm(TokenCategory::GlobalName, &self.global_name),
            expire_password:    self.expire_password,
            enabled:            self.enabled,
            default_tablespace: norm(TokenCategory::DefaultTablespace, &self.default_tablespace),
            temp_tablespace:    norm(TokenCategory::TempTablespace, &self.temp_tablespace),
            profile:            norm(TokenCategory::Profile, &self.profile),
            default_quota:      self.default_quota.clone(),
            temp_quota:         self.temp_quota.clone()
        }
    }
}

/// Mutable builder for [`DesiredUserAttributes`].
#[derive(Debug)]
pub struct DesiredUserAttributesBuilder {
    inner: DesiredUserAttributes
}

impl DesiredUserAttributesBuilder {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            inner: DesiredUserAttributes {
                user_name:          user_name.into(),
                auth_mode:          None,
                password:           None,
                global_name:        None,
                expire_password:    None,
                enabled:            None,
                default_tablespace: None,
                temp_tablespace:    None,
                profile:            None,
                default_quota:      None,
                temp_quota:         None
            }
        }
    }

    pub fn auth_mode(mut self, mode: AuthMode) -> Self {
        self.inner.auth_mode = Some(mode);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.inner.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn secret_password(mut self, password: SecretString) -> Self {
        self.inner.password = Some(password);
        self
    }

    pub fn global_name(mut self, name: impl Into<String>) -> Self {
        self.inner.global_name = Some(name.into());
        self
    }

    pub fn expire_password(mut self, expire: bool) -> Self {
        self.inner.expire_password = Some(expire);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.inner.enabled = Some(enabled);
        self
    }

    pub fn default_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.inner.default_tablespace = Some(tablespace.into());
        self
    }

    pub fn temp_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.inner.temp_tablespace = Some(tablespace.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.inner.profile = Some(profile.into());
        self
    }

    pub fn default_quota(mut self, quota: impl Into<String>) -> Self {
        self.inner.default_quota = Some(quota.into());
        self
    }

    pub fn temp_quota(mut self, quota: impl Into<String>) -> Self {
        self.inner.temp_quota = Some(quota.into());
        self
    }

    pub fn build(self) -> DesiredUserAttributes {
        self.inner
    }
}

/// Snapshot of an account as currently stored in the directory.
///
/// Only the tablespaces are consulted, as quota targets during alter. Other
/// stored columns are ignored when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingUserRecord {
    pub user_name:          String,
    pub default_tablespace: Option<String>,
    pub temp_tablespace:    Option<String>
}

impl ExistingUserRecord {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Default::default()
        }
    }

    pub fn with_default_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.default_tablespace = Some(tablespace.into());
        self
    }

    pub fn with_temp_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.temp_tablespace = Some(tablespace.into());
        self
    }
}
