//! Error types for strata-core

use thiserror::Error;

/// Core error type for Strata
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Version string could not be turned into numeric parameters
    #[error("[E003] Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// E004: Two entries of one dialect resolve to the same version
    #[error("[E004] Duplicate version {version} in dialect '{dialect}' of module '{module}'")]
    DuplicateVersion {
        module: String,
        dialect: String,
        version: String,
    },

    /// E005: Module has no (or an empty) version chain for the dialect
    #[error("[E005] Dialect '{dialect}' not found on '{module}'")]
    DialectNotFound { module: String, dialect: String },

    /// E006: No registered module with this name
    #[error("[E006] Module not found: {name}")]
    ModuleNotFound { name: String },

    /// E007: Module descriptor could not be parsed
    #[error("[E007] Failed to parse module descriptor {path}: {message}")]
    DescriptorParseError { path: String, message: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: YAML parse error
    #[error("[E009] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E010: JSON parse error
    #[error("[E010] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
