use colored::Colorize;
use serde::Serialize;

use crate::{
    error::{AppResult, output_error},
    filter::SearchQuery,
    token::TokenCategory
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Statements generated for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementReport {
    pub user:       String,
    pub statements: Vec<String>
}

/// Result of reconciling one token category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub user:      String,
    pub category:  TokenCategory,
    pub to_grant:  Vec<String>,
    pub to_revoke: Vec<String>
}

/// One entry of a batch run, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub index:      usize,
    pub user:       String,
    pub statements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:      Option<String>
}

/// Batch results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub failed:  usize
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> AppResult<Option<String>> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .map_err(|e| output_error(format!("Failed to encode JSON: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(Some)
            .map_err(|e| output_error(format!("Failed to encode YAML: {}", e))),
        OutputFormat::Text => Ok(None)
    }
}

fn heading(text: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        text.cyan().bold().to_string()
    } else {
        text.to_string()
    }
}

fn push_statements(output: &mut String, statements: &[String]) {
    for statement in statements {
        output.push_str(statement);
        output.push_str(";\n");
    }
}

/// Format generated statements for one account
pub fn format_statements(report: &StatementReport, opts: &OutputOptions) -> AppResult<String> {
    if let Some(encoded) = serialize(report, opts.format)? {
        return Ok(encoded);
    }
    let mut output = String::new();
    if report.statements.is_empty() {
        let note = format!("-- nothing to alter for {}", report.user);
        if opts.colored {
            output.push_str(&note.dimmed().to_string());
        } else {
            output.push_str(&note);
        }
        output.push('\n');
        return Ok(output);
    }
    if opts.verbose {
        output.push_str(&heading(&format!("-- {}", report.user), opts));
        output.push('\n');
    }
    push_statements(&mut output, &report.statements);
    Ok(output)
}

/// Format a reconciliation
pub fn format_reconciliation(report: &ReconcileReport, opts: &OutputOptions) -> AppResult<String> {
    if let Some(encoded) = serialize(report, opts.format)? {
        return Ok(encoded);
    }
    let mut output = String::new();
    if opts.verbose {
        let summary = format!(
            "-- {} for {}: {} to grant, {} to revoke",
            report.category,
            report.user,
            report.to_grant.len(),
            report.to_revoke.len()
        );
        output.push_str(&heading(&summary, opts));
        output.push('\n');
    }
    if report.to_grant.is_empty() && report.to_revoke.is_empty() {
        output.push_str("-- already reconciled\n");
    }
    push_statements(&mut output, &report.to_grant);
    push_statements(&mut output, &report.to_revoke);
    Ok(output)
}

/// Format a translated search query
pub fn format_search(query: &SearchQuery, opts: &OutputOptions) -> AppResult<String> {
    if let Some(encoded) = serialize(query, opts.format)? {
        return Ok(encoded);
    }
    let mut output = query.to_sql();
    output.push('\n');
    if !query.params.is_empty() {
        output.push_str(&heading("-- parameters", opts));
        output.push('\n');
        for (i, param) in query.params.iter().enumerate() {
            output.push_str(&format!("--   ?{} = {}\n", i + 1, param));
        }
    }
    if opts.verbose {
        output.push_str(&format!("-- join level: {:?}\n", query.join_level));
    }
    Ok(output)
}

/// Format batch results
pub fn format_batch(report: &BatchReport, opts: &OutputOptions) -> AppResult<String> {
    if let Some(encoded) = serialize(report, opts.format)? {
        return Ok(encoded);
    }
    let mut output = String::new();
    for entry in &report.entries {
        output.push_str(&heading(&format!("-- [{}] {}", entry.index, entry.user), opts));
        output.push('\n');
        match &entry.error {
            Some(error) => {
                let line = format!("-- error: {}", error);
                if opts.colored {
                    output.push_str(&line.red().to_string());
                } else {
                    output.push_str(&line);
                }
                output.push('\n');
            }
            None if entry.statements.is_empty() => output.push_str("-- nothing to alter\n"),
            None => push_statements(&mut output, &entry.statements)
        }
    }
    if report.failed > 0 {
        let summary = format!("-- {} of {} requests failed", report.failed, report.entries.len());
        if opts.colored {
            output.push_str(&summary.red().bold().to_string());
        } else {
            output.push_str(&summary);
        }
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> OutputOptions {
        OutputOptions {
            format:  OutputFormat::Text,
            colored: false,
            verbose: false
        }
    }

    #[test]
    fn test_statements_are_terminated() {
        let report = StatementReport {
            user:       "u".to_string(),
            statements: vec!["drop user \"u\"".to_string()]
        };
        assert_eq!(format_statements(&report, &plain()).unwrap(), "drop user \"u\";\n");
    }

    #[test]
    fn test_empty_alter_note() {
        let report = StatementReport {
            user:       "u".to_string(),
            statements: Vec::new()
        };
        let text = format_statements(&report, &plain()).unwrap();
        assert!(text.contains("nothing to alter for u"));
    }
}
