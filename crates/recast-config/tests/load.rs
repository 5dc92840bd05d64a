use std::io::Write;

use pretty_assertions::assert_eq;
use recast_config::{ConfigError, RecastConfig};

#[test]
fn loads_all_sections_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[logging]
level = "debug"
json = true

[refactor]
disabled_rules = ["method-group-to-anonymous-method"]

[refactor.titles]
method-group-to-anonymous-method = "Convert to delegate"
"#
    )
    .unwrap();

    let config = RecastConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(!config
        .refactor
        .is_enabled("method-group-to-anonymous-method"));
    assert_eq!(
        config.refactor.title_for("method-group-to-anonymous-method"),
        Some("Convert to delegate")
    );
}

#[test]
fn partial_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recast.toml");
    std::fs::write(&path, "[refactor.titles]\nx = \"X\"\n").unwrap();

    let config = RecastConfig::load_from_path(&path).unwrap();
    assert_eq!(config.logging, Default::default());
    assert!(config.refactor.disabled_rules.is_empty());
    assert_eq!(config.refactor.title_for("x"), Some("X"));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RecastConfig::load_from_path(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, &path.display().to_string())
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn toml_errors_do_not_echo_input() {
    let err = RecastConfig::load_from_str("[logging]\nlevel = \"secret\nx").unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(!message.contains("secret"), "{message}");
}
