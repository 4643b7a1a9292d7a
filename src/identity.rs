//! One-way fingerprints.
//!
//! This module is one of exactly two places in the crate that import
//! `ring` directly (the other is `crypto`). It produces the two hashes
//! persisted alongside a submission: the email identity hash used for
//! dedup lookup, and the salted IP fingerprint used for abuse tracing.
//! Neither is reversible.

use ring::digest::{digest, SHA256};

use crate::config::FormConfig;
use crate::crypto::hex_encode;

/// Deterministic fingerprinting of identities.
///
/// Constructed from the configuration (carries the IP salt). Read-only
/// after construction.
pub struct IdentityHasher {
    ip_salt: String,
}

impl IdentityHasher {
    pub fn new(ip_salt: impl Into<String>) -> Self {
        Self {
            ip_salt: ip_salt.into(),
        }
    }

    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(config.ip_salt.clone())
    }

    /// SHA-256 hex digest of the normalized email.
    ///
    /// Normalization (trim, lowercase) is applied here as well as in the
    /// validator, so the fingerprint is invariant to case and surrounding
    /// whitespace no matter which path the input took. Deliberately
    /// unsalted: equal emails must always hash equal, which is what makes
    /// dedup possible without storing plaintext. This is not a security
    /// boundary against targeted guessing of known addresses.
    pub fn email_identity(&self, email: &str) -> String {
        let normalized = email.trim().to_lowercase();
        hex_encode(digest(&SHA256, normalized.as_bytes()).as_ref())
    }

    /// Salted SHA-256 hex digest of a client network address.
    pub fn ip_fingerprint(&self, ip: &str) -> String {
        let salted = format!("{}{}", ip, self.ip_salt);
        hex_encode(digest(&SHA256, salted.as_bytes()).as_ref())
    }
}
