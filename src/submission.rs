//! The persisted data model.
//!
//! A [`Submission`] row never contains plaintext PII. The four personal
//! fields travel together as a [`PiiBundle`], which exists only in
//! memory: on the write path between validation and encryption, and on
//! the read path between decryption and projection.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One encrypted PII bundle: a per-record random nonce and the
/// ciphertext it is bound to, both base64. The two are only meaningful
/// together — losing either makes the row permanently unrecoverable —
/// so they are stored as a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64-encoded 96-bit GCM nonce.
    pub nonce: String,
    /// Base64-encoded ciphertext including the GCM tag.
    pub ciphertext: String,
}

/// The plaintext PII tuple, encrypted as a single unit.
///
/// Never persisted, never logged, zeroised on drop. Deliberately does
/// not implement `Debug` — there is no legitimate place to print one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PiiBundle {
    pub name: String,
    pub org: String,
    pub email: String,
    pub comment: String,
}

/// A persisted form submission.
///
/// Invariants:
/// - `pii` holds either a complete envelope or nothing; a row can never
///   carry half of one.
/// - `email_identity_hash` is unique across rows (enforced by the
///   pre-insert dedup check in the pipeline, not by this type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Opaque unique identifier, generated at creation. Primary lookup key.
    pub id: String,

    /// Epoch milliseconds at creation. Listings order by this, descending.
    pub created_at: i64,

    /// The encrypted PII envelope.
    pub pii: Option<Envelope>,

    /// Identifier of the key version that produced the envelope.
    pub key_id: String,

    /// One-way fingerprint of the normalized email. Used purely for
    /// dedup lookup; never reversible.
    pub email_identity_hash: String,

    /// Gates inclusion in the public listing.
    pub consent_public: bool,

    /// One-way fingerprint of the submitting client's address, for
    /// abuse tracing. Never the raw address.
    pub ip_fingerprint: String,

    /// Raw user agent string, stored for diagnostics only.
    pub user_agent: String,
}

/// Network metadata about the submitting client, captured by the shell.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: String,
    pub user_agent: String,
}
