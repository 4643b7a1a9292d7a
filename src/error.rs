//! Error types for formvault.
//!
//! Every error variant is a distinct failure mode in the submission
//! pipeline. Error messages are intentionally minimal — they signal
//! *what* failed without revealing *why* in ways that could leak
//! cryptographic state or PII.
//!
//! Two expected failure classes are deliberately NOT variants here:
//! validation failures and captcha failures. Both are user-facing data
//! (a field → message map carried in [`crate::vault::SubmitOutcome`]),
//! not server faults.

use std::fmt;

/// The single error type for all formvault operations.
#[derive(Debug)]
pub enum FormvaultError {
    /// The configured encryption key was invalid (not base64, or not
    /// exactly 32 bytes after decoding).
    InvalidKey,

    /// Encryption failed. The underlying `ring` operation returned an error.
    EncryptionFailure,

    /// Decryption failed. This includes: wrong key, tampered ciphertext
    /// or nonce, corrupted GCM authentication tag, or plaintext that does
    /// not decode as a PII bundle. Handled per row, never fatal.
    DecryptionFailure,

    /// The system's random number generator failed to produce bytes.
    RandomnessFailure,

    /// A submission with the same email identity hash already exists.
    /// Surfaced to the caller as a field error keyed `email`.
    DuplicateIdentity,

    /// The persistence collaborator failed. The detail string is for
    /// server-side logs only; callers must map this to a generic message.
    Storage(String),
}

impl fmt::Display for FormvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "invalid encryption key"),
            Self::EncryptionFailure => write!(f, "encryption failed"),
            Self::DecryptionFailure => write!(f, "decryption failed"),
            Self::RandomnessFailure => write!(f, "randomness source failed"),
            Self::DuplicateIdentity => write!(f, "duplicate email identity"),
            Self::Storage(detail) => write!(f, "storage failure: {}", detail),
        }
    }
}

impl std::error::Error for FormvaultError {}
