// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_user_provisioner::error::{
    AppError, ProvisionError, config_error, file_read_error, output_error, request_decode_error
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/request.json", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_config_error() {
    let error = config_error("Invalid configuration value");
    let _msg = error.to_string();
}

#[test]
fn test_output_error() {
    let error = output_error("Failed to encode JSON");
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_request_decode_error_with_position() {
    let err = serde_json::from_str::<serde_json::Value>("{\n  \"userName\": }").unwrap_err();
    assert!(err.line() > 0);
    let error = request_decode_error("desired.json", &err);
    let _msg = error.to_string();
}

#[test]
fn test_core_errors_name_the_field() {
    let cases = [
        (
            ProvisionError::MalformedConfig {
                fragment: "{a=b".to_string(),
                reason:   "opening brace without closing brace"
            },
            "{a=b"
        ),
        (ProvisionError::UnknownCategory("COLOUR".to_string()), "COLOUR"),
        (
            ProvisionError::ConflictingAttributes {
                attribute: "password",
                conflict:  "EXTERNAL authentication".to_string()
            },
            "password"
        ),
        (
            ProvisionError::MissingField {
                attribute: "globalName",
                context:   "for global authentication"
            },
            "globalName"
        ),
        (
            ProvisionError::MissingTablespace {
                quota: "tempQuota"
            },
            "tempQuota"
        ),
        (
            ProvisionError::PasswordRequiredForUnexpire {
                user: "scott".to_string()
            },
            "scott"
        ),
        (
            ProvisionError::InvalidQuota {
                attribute: "defaultQuota",
                value:     "lots".to_string()
            },
            "lots"
        ),
        (ProvisionError::UnsupportedCategory("PROFILE"), "PROFILE"),
        (ProvisionError::UnsupportedFilterAttribute("roles".to_string()), "roles"),
        (
            ProvisionError::UnsupportedFilterOperator {
                attribute: "enabled".to_string(),
                operator:  "contains"
            },
            "contains"
        ),
        (
            ProvisionError::InvalidFilterValue {
                attribute: "createdDate".to_string(),
                expected:  "epoch milliseconds or RFC 3339"
            },
            "createdDate"
        )
    ];
    for (error, needle) in cases {
        let msg = error.to_string();
        assert!(msg.contains(needle), "{msg:?} should mention {needle:?}");
    }
}

#[test]
fn test_core_error_converts_to_app_error() {
    let error: AppError = ProvisionError::UnknownCategory("COLOUR".to_string()).into();
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_core_errors_are_cloneable() {
    let error = ProvisionError::UnsupportedFilterAttribute("roles".to_string());
    assert_eq!(error.clone(), error);
}
