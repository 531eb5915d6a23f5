//! Strongly-typed module name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Name of a logical schema module (e.g. `"billing"`).
///
/// Module names key the execution ledger, so they are kept distinct from
/// script names and dialect names. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a new `ModuleName`, panicking if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(!s.is_empty(), "ModuleName must not be empty");
        Self(s)
    }

    /// Try to create a new `ModuleName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        (!s.is_empty()).then_some(Self(s))
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ModuleName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("module name must not be empty")
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

impl PartialEq<str> for ModuleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModuleName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(ModuleName::try_new("").is_none());
        assert_eq!(ModuleName::try_new("billing").unwrap(), "billing");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let err = serde_json::from_str::<ModuleName>(r#""""#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        let name: ModuleName = serde_json::from_str(r#""core""#).unwrap();
        assert_eq!(name.as_str(), "core");
    }
}
