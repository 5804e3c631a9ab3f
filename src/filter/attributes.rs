//! Attribute catalogue for search: names, columns and join requirements.

use std::fmt;

use serde::Serialize;

use crate::token::TokenCategory;

/// Derived `enabled` status: an account is disabled while locked.
pub const ENABLED_EXPR: &str =
    "CASE WHEN DBA_USERS.ACCOUNT_STATUS LIKE '%LOCKED%' THEN 'false' ELSE 'true' END";

/// Derived `passwordExpired` status.
pub const PASSWORD_EXPIRED_EXPR: &str =
    "CASE WHEN DBA_USERS.ACCOUNT_STATUS LIKE '%EXPIRED%' THEN 'true' ELSE 'false' END";

/// Joined views a query needs, from least to most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinLevel {
    /// `DBA_USERS` only
    #[default]
    Users,
    /// Plus default and temporary tablespace quotas
    Quotas,
    /// Plus granted roles and system privileges
    Grants
}

impl JoinLevel {
    /// Raise to `other` if it needs more; never lowers.
    pub fn upgrade(&mut self, other: JoinLevel) {
        if other > *self {
            *self = other;
        }
    }

    /// Select list and `FROM` clause for this level.
    pub fn select_base(self) -> String {
        let mut sql = String::from("SELECT DBA_USERS.*");
        if self >= Self::Quotas {
            sql.push_str(
                ", DEF_QUOTA.MAX_BYTES AS DEFAULT_TS_QUOTA, TEMP_QUOTA.MAX_BYTES AS TEMP_TS_QUOTA"
            );
        }
        if self >= Self::Grants {
            sql.push_str(", ROLE_PRIVS.GRANTED_ROLE, SYS_PRIVS.PRIVILEGE");
        }
        sql.push_str(" FROM DBA_USERS");
        if self >= Self::Quotas {
            sql.push_str(
                " LEFT OUTER JOIN DBA_TS_QUOTAS DEF_QUOTA ON DBA_USERS.USERNAME = DEF_QUOTA.USERNAME \
                 AND DBA_USERS.DEFAULT_TABLESPACE = DEF_QUOTA.TABLESPACE_NAME \
                 LEFT OUTER JOIN DBA_TS_QUOTAS TEMP_QUOTA ON DBA_USERS.USERNAME = TEMP_QUOTA.USERNAME \
                 AND DBA_USERS.TEMPORARY_TABLESPACE = TEMP_QUOTA.TABLESPACE_NAME"
            );
        }
        if self >= Self::Grants {
            sql.push_str(
                " LEFT OUTER JOIN DBA_ROLE_PRIVS ROLE_PRIVS ON DBA_USERS.USERNAME = ROLE_PRIVS.GRANTEE \
                 LEFT OUTER JOIN DBA_SYS_PRIVS SYS_PRIVS ON DBA_USERS.USERNAME = SYS_PRIVS.GRANTEE"
            );
        }
        sql
    }
}

/// How a filter value is coerced into a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Text token, normalized with the given category when present
    Token(Option<TokenCategory>),
    /// `true`/`false` compared against a derived status expression
    Boolean,
    /// Authentication mode, bound as the stored authentication type
    AuthMode,
    /// Epoch milliseconds bound as a timestamp
    Timestamp,
    /// Byte count
    Integer
}

/// Every account attribute known to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UserAttribute {
    Name,
    Uid,
    Password,
    Enabled,
    PasswordExpired,
    Authentication,
    GlobalName,
    Profile,
    DefaultTablespace,
    TempTablespace,
    DefaultTablespaceQuota,
    TempTablespaceQuota,
    Roles,
    Privileges,
    CreatedDate,
    ExpireDate,
    LockDate
}

impl UserAttribute {
    pub const ALL: [UserAttribute; 17] = [
        Self::Name,
        Self::Uid,
        Self::Password,
        Self::Enabled,
        Self::PasswordExpired,
        Self::Authentication,
        Self::GlobalName,
        Self::Profile,
        Self::DefaultTablespace,
        Self::TempTablespace,
        Self::DefaultTablespaceQuota,
        Self::TempTablespaceQuota,
        Self::Roles,
        Self::Privileges,
        Self::CreatedDate,
        Self::ExpireDate,
        Self::LockDate
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Uid => "uid",
            Self::Password => "password",
            Self::Enabled => "enabled",
            Self::PasswordExpired => "passwordExpired",
            Self::Authentication => "authentication",
            Self::GlobalName => "globalName",
            Self::Profile => "profile",
            Self::DefaultTablespace => "defaultTablespace",
            Self::TempTablespace => "tempTablespace",
            Self::DefaultTablespaceQuota => "defaultTablespaceQuota",
            Self::TempTablespaceQuota => "tempTablespaceQuota",
            Self::Roles => "roles",
            Self::Privileges => "privileges",
            Self::CreatedDate => "createdDate",
            Self::ExpireDate => "expireDate",
            Self::LockDate => "lockDate"
        }
    }

    /// Look up an attribute by its exact external name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }

    /// Allow-list for filter predicates.
    ///
    /// Role and privilege membership needs multi-row semantics a single
    /// comparison cannot express; password is write-only.
    pub const fn is_searchable(self) -> bool {
        !matches!(self, Self::Password | Self::Roles | Self::Privileges)
    }

    /// Allow-list for projections; a superset of the searchable attributes.
    pub const fn is_projectable(self) -> bool {
        true
    }

    /// Category whose formatter owns the column, if any.
    pub const fn category(self) -> Option<TokenCategory> {
        match self {
            Self::Name | Self::Uid => Some(TokenCategory::UserName),
            Self::Password => Some(TokenCategory::Password),
            Self::GlobalName => Some(TokenCategory::GlobalName),
            Self::Profile => Some(TokenCategory::Profile),
            Self::DefaultTablespace | Self::DefaultTablespaceQuota => {
                Some(TokenCategory::DefaultTablespace)
            }
            Self::TempTablespace | Self::TempTablespaceQuota => Some(TokenCategory::TempTablespace),
            Self::Roles => Some(TokenCategory::Role),
            Self::Privileges => Some(TokenCategory::Privilege),
            _ => None
        }
    }

    /// SQL expression compared in predicates.
    pub const fn column(self) -> Option<&'static str> {
        let column = match self {
            Self::Name | Self::Uid => "DBA_USERS.USERNAME",
            Self::Enabled => ENABLED_EXPR,
            Self::PasswordExpired => PASSWORD_EXPIRED_EXPR,
            Self::Authentication => "DBA_USERS.AUTHENTICATION_TYPE",
            Self::GlobalName => "DBA_USERS.EXTERNAL_NAME",
            Self::Profile => "DBA_USERS.PROFILE",
            Self::DefaultTablespace => "DBA_USERS.DEFAULT_TABLESPACE",
            Self::TempTablespace => "DBA_USERS.TEMPORARY_TABLESPACE",
            Self::DefaultTablespaceQuota => "DEF_QUOTA.MAX_BYTES",
            Self::TempTablespaceQuota => "TEMP_QUOTA.MAX_BYTES",
            Self::CreatedDate => "DBA_USERS.CREATED",
            Self::ExpireDate => "DBA_USERS.EXPIRY_DATE",
            Self::LockDate => "DBA_USERS.LOCK_DATE",
            Self::Password | Self::Roles | Self::Privileges => return None
        };
        Some(column)
    }

    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Enabled | Self::PasswordExpired => ValueKind::Boolean,
            Self::Authentication => ValueKind::AuthMode,
            Self::CreatedDate | Self::ExpireDate | Self::LockDate => ValueKind::Timestamp,
            Self::DefaultTablespaceQuota | Self::TempTablespaceQuota => ValueKind::Integer,
            other => ValueKind::Token(other.category())
        }
    }

    /// Joins needed to read or compare this attribute.
    pub const fn join_level(self) -> JoinLevel {
        match self {
            Self::DefaultTablespaceQuota | Self::TempTablespaceQuota => JoinLevel::Quotas,
            Self::Roles | Self::Privileges => JoinLevel::Grants,
            _ => JoinLevel::Users
        }
    }
}

impl fmt::Display for UserAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
