//! Command execution.
//!
//! Each command reads its request, normalizes its tokens, runs the core
//! builders against one shared [`CaseSensitivitySetup`] and renders the
//! result.

use rayon::prelude::*;
use tracing::{debug, trace};

use super::{
    helpers::load_request,
    types::{CommandOutcome, ProvisionRequest}
};
use crate::{
    case_sensitivity::CaseSensitivitySetup,
    ddl::{GrantStatementBuilder, UserStatementBuilder, normalized_set},
    error::AppResult,
    filter::{FilterNode, FilterTranslator},
    output::{
        BatchEntry, BatchReport, OutputOptions, ReconcileReport, StatementReport, format_batch,
        format_reconciliation, format_search, format_statements
    },
    token::TokenCategory,
    user::{DesiredUserAttributes, ExistingUserRecord}
};

/// `create`: one create statement from desired attributes.
///
/// # Errors
///
/// Input, decoding and validation errors.
pub fn run_create(
    input: &str,
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let desired = load_request::<DesiredUserAttributes>(input)?.normalized(setup);
    debug!(user = desired.user_name(), "building create statement");
    let statement = UserStatementBuilder::new(setup).build_create(&desired)?;
    let report = StatementReport {
        user:       desired.user_name().to_string(),
        statements: vec![statement]
    };
    Ok(CommandOutcome::success(format_statements(&report, opts)?))
}

/// `alter`: an alter statement, or none when nothing changes.
pub fn run_alter(
    input: &str,
    existing: &str,
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let desired = load_request::<DesiredUserAttributes>(input)?.normalized(setup);
    let existing: ExistingUserRecord = load_request(existing)?;
    debug!(
        user = desired.user_name(),
        stored = existing.user_name.as_str(),
        "building alter statement"
    );
    let statement = UserStatementBuilder::new(setup).build_alter(&desired, &existing)?;
    if statement.is_none() {
        debug!(user = desired.user_name(), "nothing to alter");
    }
    let report = StatementReport {
        user:       desired.user_name().to_string(),
        statements: statement.into_iter().collect()
    };
    Ok(CommandOutcome::success(format_statements(&report, opts)?))
}

/// `drop`
pub fn run_drop(
    user: &str,
    cascade: bool,
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let user = setup.normalize(TokenCategory::UserName, user);
    let statement = UserStatementBuilder::new(setup).build_drop(&user, cascade);
    trace!(statement = statement.as_str(), "generated drop statement");
    let report = StatementReport {
        user,
        statements: vec![statement]
    };
    Ok(CommandOutcome::success(format_statements(&report, opts)?))
}

/// `reconcile`: grants and revokes moving `current` to `desired`.
pub fn run_reconcile(
    user: &str,
    category: TokenCategory,
    current: &[String],
    desired: &[String],
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let user = setup.normalize(TokenCategory::UserName, user);
    let current = normalized_set(setup, category, current);
    let desired = normalized_set(setup, category, desired);
    let reconciliation =
        GrantStatementBuilder::new(setup).reconcile(&user, &current, &desired, category)?;
    debug!(
        user = user.as_str(),
        category = category.as_str(),
        grants = reconciliation.to_grant.len(),
        revokes = reconciliation.to_revoke.len(),
        "reconciled"
    );
    for statement in reconciliation
        .to_grant
        .iter()
        .chain(&reconciliation.to_revoke)
    {
        trace!(statement = statement.as_str(), "generated grant statement");
    }
    let report = ReconcileReport {
        user,
        category,
        to_grant: reconciliation.to_grant,
        to_revoke: reconciliation.to_revoke
    };
    Ok(CommandOutcome::success(format_reconciliation(&report, opts)?))
}

/// `search`: filter translation; no filter selects every account.
pub fn run_search(
    query: Option<&str>,
    attributes: &[String],
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let filter: Option<FilterNode> = query.map(load_request).transpose()?;
    let search = FilterTranslator::new(setup).translate(filter.as_ref(), attributes)?;
    debug!(
        params = search.params.len(),
        join_level = ?search.join_level,
        "translated filter"
    );
    Ok(CommandOutcome::success(format_search(&search, opts)?))
}

/// Statements for one batch request; failures become entry errors.
pub fn process_request(
    index: usize,
    request: &ProvisionRequest,
    setup: &CaseSensitivitySetup
) -> BatchEntry {
    let builder = UserStatementBuilder::new(setup);
    let desired = request.desired().normalized(setup);
    let result = match request {
        ProvisionRequest::Create { .. } => builder.build_create(&desired).map(|s| vec![s]),
        ProvisionRequest::Alter {
            existing, ..
        } => builder
            .build_alter(&desired, existing)
            .map(|s| s.into_iter().collect())
    };
    let user = desired.user_name().to_string();
    match result {
        Ok(statements) => BatchEntry {
            index,
            user,
            statements,
            error: None
        },
        Err(err) => BatchEntry {
            index,
            user,
            statements: Vec::new(),
            error: Some(err.to_string())
        }
    }
}

/// `batch`: every request in parallel against one shared setup.
///
/// Entries keep request order. The exit code is `1` when any request
/// failed validation.
pub fn run_batch(
    input: &str,
    setup: &CaseSensitivitySetup,
    opts: &OutputOptions
) -> AppResult<CommandOutcome> {
    let requests: Vec<ProvisionRequest> = load_request(input)?;
    debug!(requests = requests.len(), "processing batch");
    let entries: Vec<BatchEntry> = requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| process_request(index, request, setup))
        .collect();
    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    if failed > 0 {
        debug!(failed, "batch finished with failures");
    }
    let report = BatchReport {
        entries,
        failed
    };
    Ok(CommandOutcome {
        exit_code: i32::from(failed > 0),
        output:    format_batch(&report, opts)?
    })
}
