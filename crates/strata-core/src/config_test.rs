use super::*;

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
name: test_project
modules:
  - modules/core/descriptor.json
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.ledger_table, DEFAULT_LEDGER_TABLE);
    assert_eq!(config.link_order, LinkOrder::Declaration);
    assert!(config.dialect.is_none());
    config.validate().unwrap();
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: warehouse
database:
  type: sqlite
  path: ./warehouse.db
dialect: sqlite3
ledger_table: ops.script_execution
link_order: sorted
modules:
  - modules/core/descriptor.json
  - modules/billing/descriptor.yml
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.database.db_type, DbType::Sqlite);
    assert_eq!(config.database.path, "./warehouse.db");
    assert_eq!(config.dialect_or("sqlite"), "sqlite3");
    assert_eq!(config.ledger_table, "ops.script_execution");
    assert_eq!(config.link_order, LinkOrder::Sorted);

    let root = Path::new("/project");
    assert_eq!(
        config.module_paths_absolute(root),
        vec![
            root.join("modules/core/descriptor.json"),
            root.join("modules/billing/descriptor.yml"),
        ]
    );
}

#[test]
fn test_dialect_defaults_to_backend() {
    let config: Config = serde_yaml::from_str("name: t\nmodules: [a.json]").unwrap();
    assert_eq!(config.dialect_or("duckdb"), "duckdb");
}

#[test]
fn test_unknown_field_rejected() {
    let result = serde_yaml::from_str::<Config>("name: t\nmodules: [a.json]\nbogus: 1");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_empty_name() {
    let config: Config = serde_yaml::from_str("name: ''\nmodules: [a.json]").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("name cannot be empty"));
}

#[test]
fn test_validate_rejects_bad_ledger_table() {
    let config: Config =
        serde_yaml::from_str("name: t\nmodules: [a.json]\nledger_table: \"x; drop table y\"")
            .unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_validate_rejects_schema_qualified_ledger_on_sqlite() {
    let config: Config = serde_yaml::from_str(
        "name: t\nmodules: [a.json]\ndatabase:\n  type: sqlite\nledger_table: ops.script_execution",
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("cannot name schema 'ops'"), "{err}");

    let config: Config = serde_yaml::from_str(
        "name: t\nmodules: [a.json]\ndatabase:\n  type: sqlite\nledger_table: main.script_execution",
    )
    .unwrap();
    config.validate().unwrap();

    let config: Config =
        serde_yaml::from_str("name: t\nmodules: [a.json]\nledger_table: ops.script_execution")
            .unwrap();
    config.validate().unwrap();
}

#[test]
fn test_validate_rejects_no_modules() {
    let config: Config = serde_yaml::from_str("name: t").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_blank_dialect() {
    let config: Config =
        serde_yaml::from_str("name: t\nmodules: [a.json]\ndialect: '  '").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("strata.yaml"),
        "name: from_dir\nmodules: [core.json]\n",
    )
    .unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_dir");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    assert!(err.to_string().contains("strata.yml"));
}

#[test]
fn test_load_modules_in_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("b.json"),
        r#"{ "module": "b", "version": "1.0.0" }"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("a.yml"), "module: a\nversion: '2.0'\n").unwrap();

    let config: Config = serde_yaml::from_str("name: t\nmodules: [b.json, a.yml]").unwrap();
    let specs = config.load_modules(dir.path()).unwrap();
    let names: Vec<_> = specs.iter().map(|s| s.module.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}
