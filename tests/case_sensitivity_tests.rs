use std::{sync::Arc, thread};

use secrecy::{ExposeSecret, SecretString};
use sql_user_provisioner::{
    case_sensitivity::CaseSensitivitySetup, error::ProvisionError, token::TokenCategory
};

#[test]
fn test_defaults_fold_and_quote_schema() {
    let setup = CaseSensitivitySetup::default();
    assert_eq!(
        setup.format(TokenCategory::Schema, &setup.normalize(TokenCategory::Schema, "mySchema")),
        "\"MYSCHEMA\""
    );
    for category in [
        TokenCategory::UserName,
        TokenCategory::Role,
        TokenCategory::Profile,
        TokenCategory::DefaultTablespace,
        TokenCategory::TempTablespace
    ] {
        assert_eq!(setup.normalize_and_format(category, "mySchema"), "\"MYSCHEMA\"");
    }
}

#[test]
fn test_defaults_leave_password_and_global_name_case() {
    let setup = CaseSensitivitySetup::default();
    assert_eq!(setup.normalize_and_format(TokenCategory::Password, "Tiger"), "\"Tiger\"");
    assert_eq!(
        setup.normalize_and_format(TokenCategory::GlobalName, "cn=Scott"),
        "'cn=Scott'"
    );
    assert_eq!(setup.normalize_and_format(TokenCategory::Privilege, "create session"), "CREATE SESSION");
}

#[test]
fn test_format_does_not_change_case() {
    let setup = CaseSensitivitySetup::default();
    assert_eq!(setup.format(TokenCategory::UserName, "user1"), "\"user1\"");
}

#[test]
fn test_notation_overrides_defaults() {
    let setup = CaseSensitivitySetup::from_notation(
        "formatters={USER={quotes=},PROFILE={quotes='}},normalizers={ALL={upper=false}}"
    )
    .unwrap();
    assert_eq!(setup.normalize_and_format(TokenCategory::UserName, "app"), "app");
    assert_eq!(setup.normalize_and_format(TokenCategory::Profile, "Batch"), "'Batch'");
    assert_eq!(setup.normalize_and_format(TokenCategory::Role, "Dba"), "\"Dba\"");
}

#[test]
fn test_category_entry_beats_all() {
    let setup = CaseSensitivitySetup::from_notation(
        "normalizers={ALL={upper=false},ROLE={upper=true}},formatters={ALL={quotes=`}}"
    )
    .unwrap();
    assert_eq!(setup.normalize(TokenCategory::Role, "dba"), "DBA");
    assert_eq!(setup.normalize(TokenCategory::UserName, "app"), "app");
    assert_eq!(setup.format(TokenCategory::Privilege, "x"), "`x`");
}

#[test]
fn test_normalizer_and_formatter_resolve_independently() {
    let setup = CaseSensitivitySetup::from_notation("formatters={ROLE={quotes='}}").unwrap();
    assert!(setup.normalizer(TokenCategory::Role).case_fold());
    assert_eq!(setup.formatter(TokenCategory::Role).quote(), "'");
}

#[test]
fn test_explicit_override_beats_notation() {
    let setup = CaseSensitivitySetup::builder()
        .notation("normalizers={USER={upper=true}},formatters={USER={quotes='}}")
        .case_fold(TokenCategory::UserName, false)
        .build()
        .unwrap();
    assert_eq!(setup.normalize_and_format(TokenCategory::UserName, "app"), "'app'");

    let setup = CaseSensitivitySetup::builder()
        .rule(TokenCategory::Profile, None, Some("["))
        .build()
        .unwrap();
    assert_eq!(setup.normalize_and_format(TokenCategory::Profile, "p"), "[P[");
}

#[test]
fn test_category_names_are_case_insensitive() {
    let setup = CaseSensitivitySetup::from_notation("normalizers={role={upper=false}}").unwrap();
    assert_eq!(setup.normalize(TokenCategory::Role, "dba"), "dba");
}

#[test]
fn test_unknown_category() {
    let err = CaseSensitivitySetup::from_notation("normalizers={COLOUR={upper=true}}").unwrap_err();
    assert_eq!(err, ProvisionError::UnknownCategory("COLOUR".to_string()));
}

#[test]
fn test_invalid_notation_shapes() {
    for notation in [
        "upper=true",
        "casing={ROLE={upper=true}}",
        "normalizers={ROLE={upper=maybe}}",
        "normalizers={ROLE={lower=true}}",
        "formatters={ROLE={colour=red}}",
        "formatters={ROLE=plain}",
        "normalizers={ROLE={upper={x=y}}}",
        "normalizers={"
    ] {
        assert!(
            matches!(
                CaseSensitivitySetup::from_notation(notation),
                Err(ProvisionError::MalformedConfig { .. })
            ),
            "{notation}"
        );
    }
}

#[test]
fn test_bytes_variants() {
    let setup = CaseSensitivitySetup::default();
    assert_eq!(setup.normalize_and_format_bytes(TokenCategory::Role, b"dba"), b"\"DBA\"");
    assert_eq!(setup.format_column_bytes(TokenCategory::Role, b"COL"), b"COL");
}

#[test]
fn test_secret_variants() {
    let setup = CaseSensitivitySetup::from_notation("normalizers={PASSWORD={upper=true}}").unwrap();
    let secret = SecretString::from("tiger".to_string());
    let formatted = setup.normalize_and_format_secret(TokenCategory::Password, &secret);
    assert_eq!(formatted.expose_secret(), "\"TIGER\"");
    assert_eq!(
        setup
            .format_column_secret(TokenCategory::Password, &secret)
            .expose_secret(),
        "tiger"
    );
}

#[test]
fn test_secret_pipeline_matches_plain_pipeline() {
    let setup = CaseSensitivitySetup::from_notation("formatters={PASSWORD={quotes='}}").unwrap();
    let secret = SecretString::from("Ti'ger".to_string());
    for category in TokenCategory::ALL {
        let normalized = setup.normalize_secret(category, &secret);
        assert_eq!(normalized.expose_secret(), setup.normalize(category, "Ti'ger"));
        assert_eq!(
            setup
                .normalize_and_format_secret(category, &secret)
                .expose_secret(),
            setup.normalize_and_format(category, "Ti'ger")
        );
    }
}

#[test]
fn test_format_column_is_identity() {
    let setup = CaseSensitivitySetup::default();
    assert_eq!(
        setup.format_column(TokenCategory::UserName, "DBA_USERS.USERNAME"),
        "DBA_USERS.USERNAME"
    );
}

#[test]
fn test_shared_between_threads() {
    let setup = Arc::new(CaseSensitivitySetup::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let setup = Arc::clone(&setup);
            thread::spawn(move || setup.normalize_and_format(TokenCategory::UserName, &format!("u{i}")))
        })
        .collect();
    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, ["\"U0\"", "\"U1\"", "\"U2\"", "\"U3\""]);
}
