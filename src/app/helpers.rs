//! Helper functions for CLI operations.
//!
//! Reading input, decoding request JSON, resolving the effective
//! case-sensitivity setup and building output options.

use std::{
    fs::read_to_string,
    io::{self, Read}
};

use serde::de::DeserializeOwned;

use crate::{
    case_sensitivity::CaseSensitivitySetup,
    cli::{Format, GrantKind},
    config::Config,
    error::{AppResult, file_read_error, request_decode_error},
    output::{OutputFormat, OutputOptions},
    token::TokenCategory
};

/// Reads input from a file or stdin.
///
/// Supports reading from a file path or from standard input when the
/// path is "-".
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdin fails.
pub fn read_input(path: &str) -> AppResult<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))
    }
}

/// Decodes a JSON request, naming `source` and the error position on failure.
///
/// # Example
///
/// ```
/// use sql_user_provisioner::{app::decode_request, user::ExistingUserRecord};
///
/// let record: ExistingUserRecord = decode_request("inline", r#"{"userName": "APP"}"#).unwrap();
/// assert_eq!(record.user_name, "APP");
/// assert!(decode_request::<ExistingUserRecord>("inline", "{").is_err());
/// ```
pub fn decode_request<T: DeserializeOwned>(source: &str, text: &str) -> AppResult<T> {
    serde_json::from_str(text).map_err(|e| request_decode_error(source, &e))
}

/// Reads and decodes a JSON request from a file or stdin.
pub fn load_request<T: DeserializeOwned>(path: &str) -> AppResult<T> {
    let text = read_input(path)?;
    decode_request(path, &text)
}

/// Builds the setup from the command-line notation, falling back to config.
///
/// # Errors
///
/// Returns a bad-request error for malformed notation.
pub fn resolve_setup(
    cli_notation: Option<&str>,
    config: &Config
) -> AppResult<CaseSensitivitySetup> {
    match cli_notation {
        Some(notation) => Ok(CaseSensitivitySetup::from_notation(notation)?),
        None => Ok(config.case_sensitivity_setup()?)
    }
}

/// Converts a CLI format enum to the internal output format type.
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Converts a CLI grant kind to its token category.
pub fn convert_grant_kind(kind: GrantKind) -> TokenCategory {
    match kind {
        GrantKind::Role => TokenCategory::Role,
        GrantKind::Privilege => TokenCategory::Privilege
    }
}

/// Creates output options from CLI flags.
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}
