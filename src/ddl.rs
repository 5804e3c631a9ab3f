//! Statement synthesis for user accounts and their grants.
//!
//! This module turns desired account state into directory DDL text. It never
//! executes anything; statements are handed to an external executor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌─────────────────────────┐
//! │ DesiredUserAttributes│────▶│ UserStatementBuilder    │──▶ create / alter / drop
//! └──────────────────────┘     └─────────────────────────┘
//! ┌──────────────────────┐     ┌─────────────────────────┐
//! │ current + desired    │────▶│ GrantStatementBuilder   │──▶ grant / revoke lists
//! │ TokenSet             │     └─────────────────────────┘
//! └──────────────────────┘                 │
//!                             ┌────────────┴────────────┐
//!                             │  CaseSensitivitySetup   │
//!                             │  (formatting only)      │
//!                             └─────────────────────────┘
//! ```
//!
//! Both builders borrow one [`CaseSensitivitySetup`] and only format tokens;
//! normalizing is the caller's step (see
//! [`DesiredUserAttributes::normalized`](crate::user::DesiredUserAttributes::normalized)).
//!
//! # Example
//!
//! ```
//! use sql_user_provisioner::{
//!     case_sensitivity::CaseSensitivitySetup,
//!     ddl::UserStatementBuilder,
//!     user::DesiredUserAttributes
//! };
//!
//! let setup = CaseSensitivitySetup::default();
//! let builder = UserStatementBuilder::new(&setup);
//! let desired = DesiredUserAttributes::builder("user1").build();
//!
//! assert_eq!(
//!     builder.build_create(&desired).unwrap(),
//!     "create user \"user1\" identified by \"user1\""
//! );
//! ```
//!
//! [`CaseSensitivitySetup`]: crate::case_sensitivity::CaseSensitivitySetup

mod account;
mod grant;

pub use account::UserStatementBuilder;
pub use grant::{GrantStatementBuilder, Reconciliation, TokenSet, diff, normalized_set};
