//! Error types and constructors.
//!
//! Two layers of errors exist:
//!
//! - [`ProvisionError`] is returned by the synthesis core (config notation,
//!   case-sensitivity setup, statement builders, filter translator). Every
//!   variant names the offending field or token.
//! - [`AppError`] (from `masterror`) is used by the application layer for
//!   I/O, request decoding and configuration file problems. Core errors
//!   convert into it via [`From`].

pub use masterror::{AppError, AppResult};
use thiserror::Error;

/// Result alias for the synthesis core.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Validation and translation failures of the synthesis core.
///
/// None of these represent a partially applied mutation: the core never
/// executes anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// Config notation could not be parsed.
    #[error("malformed config near '{fragment}': {reason}")]
    MalformedConfig {
        fragment: String,
        reason:   &'static str
    },

    /// A config key does not name a token category.
    #[error("unknown token category '{0}'")]
    UnknownCategory(String),

    /// Mutually exclusive attributes were set together.
    #[error("attribute '{attribute}' conflicts with {conflict}")]
    ConflictingAttributes {
        attribute: &'static str,
        conflict:  String
    },

    /// A required companion attribute is absent.
    #[error("attribute '{attribute}' is required {context}")]
    MissingField {
        attribute: &'static str,
        context:   &'static str
    },

    /// A quota was given but no tablespace can be resolved for it.
    #[error("cannot resolve tablespace for '{quota}'")]
    MissingTablespace { quota: &'static str },

    /// Unexpiring a password requires a new password in the same call.
    #[error("unexpiring the password of '{user}' requires a new password")]
    PasswordRequiredForUnexpire { user: String },

    /// A quota value is not a valid size.
    #[error("invalid value '{value}' for '{attribute}'")]
    InvalidQuota {
        attribute: &'static str,
        value:     String
    },

    /// A statement was requested for a category that has no such statement.
    #[error("category {0} cannot be granted or revoked")]
    UnsupportedCategory(&'static str),

    /// A filter or projection references an attribute outside its allow-list.
    #[error("attribute '{0}' is not supported here")]
    UnsupportedFilterAttribute(String),

    /// The filter operator cannot be applied to the attribute.
    #[error("operator '{operator}' is not supported for attribute '{attribute}'")]
    UnsupportedFilterOperator {
        attribute: String,
        operator:  &'static str
    },

    /// The filter value has the wrong shape for the attribute.
    #[error("value for attribute '{attribute}' must be {expected}")]
    InvalidFilterValue {
        attribute: String,
        expected:  &'static str
    }
}

impl ProvisionError {
    pub(crate) fn malformed(fragment: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedConfig {
            fragment: fragment.into(),
            reason
        }
    }
}

impl From<ProvisionError> for AppError {
    fn from(err: ProvisionError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create request decode error with optional position info
pub fn request_decode_error(source: &str, err: &serde_json::Error) -> AppError {
    if err.line() > 0 {
        AppError::bad_request(format!(
            "Invalid request in '{}' at line {}, column {}:\n  {}",
            source,
            err.line(),
            err.column(),
            err
        ))
    } else {
        AppError::bad_request(format!("Invalid request in '{}':\n  {}", source, err))
    }
}

/// Create output serialization error
pub fn output_error(message: impl Into<String>) -> AppError {
    AppError::internal(message.into())
}
