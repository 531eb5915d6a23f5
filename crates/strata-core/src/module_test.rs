use super::*;
use crate::descriptor::VersionSpec;

fn spec(version: &str) -> ModuleSpec {
    let mut dialects = BTreeMap::new();
    dialects.insert(
        "duckdb".to_string(),
        vec![
            VersionSpec::new("1.0.0", ["upgrade_1_0_0.sql"]),
            VersionSpec::new("1.0.1", ["upgrade_1_0_1.sql"]),
            VersionSpec::new("1.1.0", ["upgrade_1_1_0.sql"]),
        ],
    );
    dialects.insert("sqlite".to_string(), Vec::new());
    ModuleSpec {
        module: ModuleName::new("sequelize.migration.test"),
        dir: PathBuf::from("/srv/modules/test"),
        version: version.to_string(),
        dialects,
    }
}

fn descriptor(version: &str) -> ModuleDescriptor {
    ModuleDescriptor::from_spec(spec(version), LinkOrder::Declaration).unwrap()
}

#[test]
fn test_get_version_ignores_rc_suffix() {
    let module = descriptor("1.0.0");
    let lookup = module.get_version("duckdb", "1.0.0-RC5").unwrap();
    assert!(lookup.is_exact());
    assert_eq!(lookup.node().unwrap().version(), "1.0.0");
}

#[test]
fn test_get_version_falls_through_to_last() {
    let module = descriptor("1.0.0");
    let lookup = module.get_version("duckdb", "3.0.0").unwrap();
    assert!(matches!(lookup, VersionLookup::FallenThroughToLast(_)));
    assert_eq!(lookup.node().unwrap().version(), "1.1.0");
}

#[test]
fn test_get_version_missing_dialect() {
    let module = descriptor("1.0.0");
    let err = module.get_version("postgres", "1.0.0").unwrap_err();
    assert!(matches!(err, CoreError::DialectNotFound { .. }));
    assert!(err.to_string().contains("postgres"));
    assert!(err.to_string().contains("sequelize.migration.test"));
}

#[test]
fn test_get_first_version() {
    let module = descriptor("1.0.0");
    assert_eq!(module.get_first_version("duckdb").unwrap().version(), "1.0.0");
}

#[test]
fn test_get_first_version_empty_chain_fails() {
    let module = descriptor("1.0.0");
    let err = module.get_first_version("sqlite").unwrap_err();
    assert!(matches!(err, CoreError::DialectNotFound { .. }));
}

#[test]
fn test_get_next_version() {
    let module = descriptor("1.1.0");
    let next = module.get_next_version("duckdb", "1.0.0").unwrap().unwrap();
    assert_eq!(next.version(), "1.0.1");
    assert!(module.get_next_version("duckdb", "1.1.0").unwrap().is_none());
}

#[test]
fn test_get_next_version_empty_chain_is_none() {
    let module = descriptor("1.0.0");
    assert!(module.get_next_version("sqlite", "1.0.0").unwrap().is_none());
}

#[test]
fn test_set_target_version() {
    let mut module = descriptor("1.0.0");
    module.set_target_version("1.1.0-RC1").unwrap();
    assert_eq!(module.version(), "1.1.0-RC1");
    assert_eq!(module.target(), VersionParameters::new(1, 1, 0));
}

#[test]
fn test_script_path() {
    let module = descriptor("1.0.0");
    assert_eq!(
        module.script_path("duckdb", "upgrade_1_0_0.sql"),
        PathBuf::from("/srv/modules/test/duckdb/upgrade_1_0_0.sql")
    );
}

#[test]
fn test_dialects_listed() {
    let module = descriptor("1.0.0");
    assert_eq!(module.dialects().collect::<Vec<_>>(), vec!["duckdb", "sqlite"]);
}
