//! Configuration types and parsing for strata.yml

use crate::chain::LinkOrder;
use crate::descriptor::ModuleSpec;
use crate::error::{CoreError, CoreResult};
use crate::sql_utils::{is_qualified_identifier, split_schema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main project configuration from strata.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Dialect used to pick version chains and script directories.
    ///
    /// Defaults to the backend's own type name (`duckdb`, `sqlite`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,

    /// Table holding the execution ledger.
    ///
    /// May be schema-qualified on DuckDB. SQLite has no schemas, only
    /// attached databases, so there the name must be bare or `main.`-prefixed.
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// How version chain links are derived
    #[serde(default)]
    pub link_order: LinkOrder,

    /// Module descriptor files, relative to the project directory.
    /// Modules are synced in this order.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// SQLite (requires the `sqlite` feature)
    Sqlite,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or sqlite)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Default ledger table name.
pub const DEFAULT_LEDGER_TABLE: &str = "script_execution";

const DEFAULT_DB_PATH: &str = ":memory:";

/// File names searched by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["strata.yml", "strata.yaml"];

fn default_ledger_table() -> String {
    DEFAULT_LEDGER_TABLE.to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    /// Looks for strata.yml or strata.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map_or_else(
                || {
                    Err(CoreError::ConfigNotFound {
                        path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                    })
                },
                |path| Self::load(&path),
            )
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_qualified_identifier(&self.ledger_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger_table '{}' must be an identifier, optionally schema-qualified",
                    self.ledger_table
                ),
            });
        }

        if self.database.db_type == DbType::Sqlite {
            if let (Some(schema), _) = split_schema(&self.ledger_table) {
                if !schema.eq_ignore_ascii_case("main") {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "ledger_table '{}' cannot name schema '{}' on sqlite",
                            self.ledger_table, schema
                        ),
                    });
                }
            }
        }

        if matches!(&self.dialect, Some(d) if d.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "dialect cannot be empty when set".to_string(),
            });
        }

        if self.modules.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "at least one module descriptor must be listed under 'modules'"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Module descriptor paths resolved against the project root.
    pub fn module_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.modules.iter().map(|m| root.join(m)).collect()
    }

    /// Load every module descriptor listed in the config, in order.
    pub fn load_modules(&self, root: &Path) -> CoreResult<Vec<ModuleSpec>> {
        self.module_paths_absolute(root)
            .iter()
            .map(|path| ModuleSpec::load(path))
            .collect()
    }

    /// Dialect to sync, falling back to the backend type name.
    pub fn dialect_or<'a>(&'a self, backend: &'a str) -> &'a str {
        self.dialect.as_deref().unwrap_or(backend)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
