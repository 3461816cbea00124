//! The process-wide expected API key.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Expected API key, read once at startup.
///
/// An empty string is treated exactly like a missing key. The secret never
/// appears in `Debug` output, so a `GateConfig` can be logged safely.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    /// Build a credential from an optional configured value.
    pub fn new(value: Option<String>) -> Self {
        Self(value.filter(|v| !v.is_empty()))
    }

    /// A credential that denies every authenticated request.
    pub fn unset() -> Self {
        Self(None)
    }

    /// The expected key, if one is configured.
    pub fn expected(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether a non-empty key is configured.
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(Some(value.to_string()))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Credential(***)"),
            None => f.write_str("Credential(unset)"),
        }
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Config dumps never contain the key itself.
        match self.0 {
            Some(_) => serializer.serialize_some("***"),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_unset() {
        assert!(!Credential::new(Some(String::new())).is_configured());
        assert!(!Credential::new(None).is_configured());
        assert_eq!(Credential::from("abc123").expected(), Some("abc123"));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", Credential::from("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(format!("{:?}", Credential::unset()), "Credential(unset)");
    }
}
