//! # SQL User Provisioner
//!
//! Statement synthesis and search-query translation for accounts in a
//! relational database's user directory.
//!
//! `sql-user-provisioner` turns a desired account state into the DDL that
//! establishes it, the grants and revokes that bring role and privilege
//! membership in line, and the parameterized query that searches the user
//! directory by attribute. It never connects to a database: every output is
//! text plus bound parameters, for a caller to execute.
//!
//! # Architecture
//!
//! ```text
//! notation text ──► notation::parse ──► CaseSensitivitySetup ──┐
//!                                                               │ shared, read-only
//!        DesiredUserAttributes ──► UserStatementBuilder ◄───────┤
//!        current/desired sets  ──► GrantStatementBuilder ◄──────┤
//!        FilterNode tree       ──► FilterTranslator ◄───────────┘
//! ```
//!
//! Identity tokens (user names, roles, tablespaces, ...) are grouped into
//! [`token::TokenCategory`] values. Each category has a normalizer that
//! decides case folding and a formatter that decides the quote wrapped around
//! the token in generated SQL. The setup is built once from configuration and
//! then shared by every builder.
//!
//! # Quick Start
//!
//! ```bash
//! # Create statement from desired attributes
//! sql-user-provisioner create -i app_user.json
//!
//! # Alter against the stored account record
//! sql-user-provisioner alter -i app_user.json -e stored.json
//!
//! # Grants and revokes for a role set
//! sql-user-provisioner reconcile -u app_user -c role --current connect,audit --desired connect,resource
//!
//! # Search query from a filter tree
//! echo '{"type":"compare","op":"startsWith","attribute":"name","value":"app_"}' \
//!     | sql-user-provisioner search -q - -a name,roles
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments (`--case-sensitivity`)
//! 2. Environment variables (`PROVISIONER_CASE_SENSITIVITY`, ...)
//! 3. `.sql-user-provisioner.toml` in current directory
//! 4. `~/.config/sql-user-provisioner/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! case_sensitivity = "formatters={PROFILE={quotes='}},normalizers={ROLE={upper=false}}"
//! drop_cascade = true
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Token Categories
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
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Any input, configuration or validation error; in batch mode, any
//!   failed request
//!
//! # Modules
//!
//! - [`notation`] - Nested `key=value` config notation parser
//! - [`token`] - Token categories, normalizers and formatters
//! - [`case_sensitivity`] - Per-category rule resolution
//! - [`user`] - Desired account attributes and stored records
//! - [`ddl`] - Create, alter, drop, grant and revoke statement builders
//! - [`filter`] - Search filter translation
//! - [`config`] - Configuration loading
//! - [`output`] - Result formatting for various output formats
//! - [`error`] - Error types and constructors

pub mod app;
pub mod case_sensitivity;
pub mod cli;
pub mod config;
pub mod ddl;
pub mod error;
pub mod filter;
pub mod logging;
pub mod notation;
pub mod output;
pub mod token;
pub mod user;
