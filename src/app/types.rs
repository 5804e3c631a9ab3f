//! Application types for CLI commands.

use serde::Deserialize;

use crate::user::{DesiredUserAttributes, ExistingUserRecord};

/// One element of a batch request file.
///
/// ```json
/// [{"action": "create", "desired": {"userName": "app1", "password": "pw"}},
///  {"action": "alter", "desired": {"userName": "app2", "profile": "batch"},
///   "existing": {"userName": "APP2"}}]
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ProvisionRequest {
    Create {
        desired: DesiredUserAttributes
    },
    Alter {
        desired:  DesiredUserAttributes,
        existing: ExistingUserRecord
    }
}

impl ProvisionRequest {
    pub fn desired(&self) -> &DesiredUserAttributes {
        match self {
            Self::Create {
                desired
            }
            | Self::Alter {
                desired, ..
            } => desired
        }
    }
}

/// Rendered command output and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `0` on success, `1` when any request failed.
    pub exit_code: i32,
    pub output:    String
}

impl CommandOutcome {
    pub fn success(output: String) -> Self {
        Self {
            exit_code: 0,
            output
        }
    }
}
