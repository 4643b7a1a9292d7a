//! Explicit configuration for the pipeline.
//!
//! The pipeline never reads ambient state (no environment access, no
//! globals). The hosting shell builds a [`FormConfig`] however it likes
//! — environment variables, a secrets manager, a config file — and
//! passes it in at construction time.

use serde::Deserialize;

/// Configuration consumed by [`crate::vault::Vault`] at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Base64-encoded 256-bit AES key. Must decode to exactly 32 bytes.
    pub enc_key_b64: String,

    /// Identifier of the key version, stored per row. Enables future
    /// key rotation without re-encrypting existing rows.
    pub enc_key_id: String,

    /// Salt mixed into the IP fingerprint. Deployment-specific secret,
    /// never hardcoded.
    pub ip_salt: String,
}
