//! API key authorization.

use std::fmt;

use subtle::ConstantTimeEq;

use super::Credential;

/// Header carrying the caller's API key.
///
/// HTTP header names are case-insensitive; the lowercase form is what
/// the invocation envelope delivers.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No expected key is configured for this process.
    NotConfigured,
    /// The request carried no key.
    Missing,
    /// The request carried a key that does not match.
    Invalid,
}

impl DenyReason {
    /// Message returned to the caller in the `error` field.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::NotConfigured => "API key not configured",
            DenyReason::Missing => "Missing API key",
            DenyReason::Invalid => "Invalid API key",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of checking a request's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Check a caller-supplied key against the configured credential.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. no configured key
/// 2. no (or empty) supplied key
/// 3. supplied key differs from the configured one
///
/// The comparison is exact and case-sensitive. Equal-length keys are
/// compared in constant time.
pub fn authorize(supplied: Option<&str>, expected: &Credential) -> Decision {
    let Some(expected) = expected.expected() else {
        return Decision::Deny(DenyReason::NotConfigured);
    };

    let supplied = match supplied {
        Some(key) if !key.is_empty() => key,
        _ => return Decision::Deny(DenyReason::Missing),
    };

    if bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Invalid)
    }
}
