//! Numeric version parameters and ordering.
//!
//! Version strings in module descriptors are free-form (`"1.2.3"`,
//! `"4.2"`, `"10.1-RC2"`). Only the leading digit run of each of the first
//! three dot-separated components is significant; everything else is
//! ignored.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// `(major, minor, patch)` extracted from a version string.
///
/// The derived ordering compares major, then minor, then patch, numerically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VersionParameters {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionParameters {
    /// Create parameters from explicit numbers.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract parameters from a version string.
    ///
    /// Each of the first three `.`-separated tokens contributes its leading
    /// run of ASCII digits. A missing token, or one that starts with a
    /// non-digit, yields `0`. Fails only when a digit run overflows `u32`.
    ///
    /// ```
    /// use strata_core::VersionParameters;
    /// let v = VersionParameters::parse("1.2.3-RC1").unwrap();
    /// assert_eq!(v, VersionParameters::new(1, 2, 3));
    /// let v = VersionParameters::parse("10.1-RC2").unwrap();
    /// assert_eq!(v, VersionParameters::new(10, 1, 0));
    /// ```
    pub fn parse(version: &str) -> CoreResult<Self> {
        let mut tokens = version.split('.');
        Ok(Self {
            major: leading_number(version, tokens.next())?,
            minor: leading_number(version, tokens.next())?,
            patch: leading_number(version, tokens.next())?,
        })
    }
}

fn leading_number(version: &str, token: Option<&str>) -> CoreResult<u32> {
    let Some(token) = token else {
        return Ok(0);
    };
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let digits = &token[..end];
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse().map_err(|e| CoreError::InvalidVersion {
        version: version.to_string(),
        reason: format!("component '{digits}': {e}"),
    })
}

impl fmt::Display for VersionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionParameters {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

/// Total order on version parameters: major, then minor, then patch.
pub fn compare_versions(a: &VersionParameters, b: &VersionParameters) -> Ordering {
    a.cmp(b)
}

fn version_key_regex() -> &'static Regex {
    static VERSION_KEY_RE: OnceLock<Regex> = OnceLock::new();
    VERSION_KEY_RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid regex literal"))
}

/// Reduce a version string to the key used for chain lookups.
///
/// Returns the first `N.N.N` run found in `version`, dropping any
/// pre-release suffix (`"1.0.0-RC5"` becomes `"1.0.0"`). Strings without a
/// full three-part run are returned unchanged.
pub fn comparison_key(version: &str) -> &str {
    version_key_regex()
        .find(version)
        .map_or(version, |m| m.as_str())
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
