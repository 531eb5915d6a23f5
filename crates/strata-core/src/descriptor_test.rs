use super::*;

const DESCRIPTOR_JSON: &str = r#"{
    "module": "sequelize.migration.test",
    "version": "1.0.0",
    "dialects": {
        "duckdb": [
            { "version": "1.0.0", "upgrade": ["upgrade_1_0_0.sql"] },
            { "version": "1.0.1", "upgrade": ["upgrade_1_0_1.sql"] },
            { "version": "1.1.0", "upgrade": ["upgrade_1_1_0.sql"] }
        ]
    }
}"#;

#[test]
fn test_parse_json_descriptor() {
    let spec: ModuleSpec = serde_json::from_str(DESCRIPTOR_JSON).unwrap();
    assert_eq!(spec.module, "sequelize.migration.test");
    assert_eq!(spec.version, "1.0.0");
    let duckdb = &spec.dialects["duckdb"];
    assert_eq!(duckdb.len(), 3);
    assert_eq!(duckdb[1], VersionSpec::new("1.0.1", ["upgrade_1_0_1.sql"]));
}

#[test]
fn test_parse_rejects_unknown_fields() {
    let json = r#"{ "module": "m", "version": "1.0.0", "extra": true }"#;
    assert!(serde_json::from_str::<ModuleSpec>(json).is_err());
}

#[test]
fn test_parse_rejects_non_list_dialect() {
    let json = r#"{ "module": "m", "version": "1.0.0", "dialects": { "duckdb": 42 } }"#;
    assert!(serde_json::from_str::<ModuleSpec>(json).is_err());
}

#[test]
fn test_load_resolves_relative_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descriptor.json");
    std::fs::write(&path, DESCRIPTOR_JSON).unwrap();

    let spec = ModuleSpec::load(&path).unwrap();
    assert_eq!(spec.dir, dir.path().join(""));
}

#[test]
fn test_load_yaml_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("billing.yml");
    std::fs::write(
        &path,
        r#"
module: billing
dir: sql
version: "2.0"
dialects:
  sqlite:
    - version: "1.0"
      upgrade: [a.sql, b.sql]
    - version: "2.0"
      upgrade: [c.sql]
"#,
    )
    .unwrap();

    let spec = ModuleSpec::load(&path).unwrap();
    assert_eq!(spec.module, "billing");
    assert_eq!(spec.dir, dir.path().join("sql"));
    assert_eq!(spec.dialects["sqlite"][0].upgrade, vec!["a.sql", "b.sql"]);
}

#[test]
fn test_load_missing_file() {
    let err = ModuleSpec::load(Path::new("/nonexistent/descriptor.json")).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_load_reports_parse_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ModuleSpec::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::DescriptorParseError { .. }));
    assert!(err.to_string().contains("broken.json"));
}
