use secrecy::ExposeSecret;
use sql_user_provisioner::{
    case_sensitivity::CaseSensitivitySetup,
    user::{AuthMode, DesiredUserAttributes, ExistingUserRecord}
};

#[test]
fn test_builder_sets_fields() {
    let desired = DesiredUserAttributes::builder("scott")
        .auth_mode(AuthMode::Local)
        .password("tiger")
        .expire_password(true)
        .enabled(false)
        .default_tablespace("users")
        .temp_tablespace("temp")
        .profile("default")
        .default_quota("10M")
        .temp_quota("-1")
        .build();

    assert_eq!(desired.user_name(), "scott");
    assert_eq!(desired.auth_mode(), Some(AuthMode::Local));
    assert_eq!(desired.password().map(|p| p.expose_secret()), Some("tiger"));
    assert_eq!(desired.expire_password(), Some(true));
    assert_eq!(desired.enabled(), Some(false));
    assert_eq!(desired.default_tablespace(), Some("users"));
    assert_eq!(desired.temp_tablespace(), Some("temp"));
    assert_eq!(desired.profile(), Some("default"));
    assert_eq!(desired.default_quota(), Some("10M"));
    assert_eq!(desired.temp_quota(), Some("-1"));
    assert!(desired.global_name().is_none());
}

#[test]
fn test_decode_from_json() {
    let desired: DesiredUserAttributes = serde_json::from_str(
        r#"{"userName": "ops", "authMode": "global", "globalName": "cn=ops", "enabled": true}"#
    )
    .unwrap();
    assert_eq!(desired.user_name(), "ops");
    assert_eq!(desired.auth_mode(), Some(AuthMode::Global));
    assert_eq!(desired.global_name(), Some("cn=ops"));
    assert!(!desired.has_password());
}

#[test]
fn test_decode_rejects_unknown_fields() {
    let result: Result<DesiredUserAttributes, _> =
        serde_json::from_str(r#"{"userName": "ops", "colour": "red"}"#);
    assert!(result.is_err());
}

#[test]
fn test_decode_requires_user_name() {
    let result: Result<DesiredUserAttributes, _> = serde_json::from_str(r#"{"profile": "p"}"#);
    assert!(result.is_err());
}

#[test]
fn test_debug_redacts_password() {
    let desired = DesiredUserAttributes::builder("scott")
        .password("tiger")
        .build();
    let debug = format!("{:?}", desired);
    assert!(!debug.contains("tiger"));
}

#[test]
fn test_normalized_folds_tokens_only() {
    let setup = CaseSensitivitySetup::default();
    let desired = DesiredUserAttributes::builder("scott")
        .password("Tiger")
        .global_name("cn=Scott")
        .profile("batch")
        .default_tablespace("users")
        .default_quota("10m")
        .build()
        .normalized(&setup);

    assert_eq!(desired.user_name(), "SCOTT");
    assert_eq!(desired.password().map(|p| p.expose_secret()), Some("Tiger"));
    assert_eq!(desired.global_name(), Some("cn=Scott"));
    assert_eq!(desired.profile(), Some("BATCH"));
    assert_eq!(desired.default_tablespace(), Some("USERS"));
    assert_eq!(desired.default_quota(), Some("10m"));
}

#[test]
fn test_auth_mode_parse_and_directory_type() {
    assert_eq!("local".parse::<AuthMode>().unwrap(), AuthMode::Local);
    assert_eq!("PASSWORD".parse::<AuthMode>().unwrap(), AuthMode::Local);
    assert_eq!("External".parse::<AuthMode>().unwrap(), AuthMode::External);
    assert!("kerberos".parse::<AuthMode>().is_err());
    assert_eq!(AuthMode::Local.directory_type(), "PASSWORD");
    assert_eq!(AuthMode::Global.directory_type(), "GLOBAL");
}

#[test]
fn test_existing_record_defaults_missing_fields() {
    let record: ExistingUserRecord = serde_json::from_str(r#"{"userName": "SCOTT"}"#).unwrap();
    assert_eq!(record, ExistingUserRecord::new("SCOTT"));

    let record = ExistingUserRecord::new("SCOTT")
        .with_default_tablespace("USERS")
        .with_temp_tablespace("TEMP");
    assert_eq!(record.default_tablespace.as_deref(), Some("USERS"));
    assert_eq!(record.temp_tablespace.as_deref(), Some("TEMP"));
}

#[test]
fn test_existing_record_ignores_other_stored_columns() {
    let record: ExistingUserRecord = serde_json::from_str(
        r#"{"userName": "SCOTT", "defaultTablespace": "USERS",
            "profile": "DEFAULT", "accountStatus": "OPEN"}"#
    )
    .unwrap();
    assert_eq!(record, ExistingUserRecord::new("SCOTT").with_default_tablespace("USERS"));
}
