//! Key material ownership.
//!
//! This module owns the single symmetric key used to seal PII bundles.
//! The key arrives base64-encoded in the configuration and lives here
//! in a type that is opaque, non-cloneable, and zeroised on drop.
//!
//! Raw key bytes never leave the crate: other modules access them only
//! through `as_bytes()`, which is `pub(crate)`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use crate::crypto::KEY_LEN;
use crate::error::FormvaultError;

/// The sealing key. This is the single secret that must be managed by
/// the deployment (typically via a KMS or secrets manager).
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop. Memory is overwritten before deallocation.
pub struct SealingKey {
    bytes: [u8; KEY_LEN],
}

impl SealingKey {
    /// Decode a `SealingKey` from a base64-encoded configuration secret.
    ///
    /// Rejects input that is not valid base64 or does not decode to
    /// exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, FormvaultError> {
        let mut decoded = BASE64
            .decode(encoded.trim())
            .map_err(|_| FormvaultError::InvalidKey)?;

        if decoded.len() != KEY_LEN {
            decoded.zeroize();
            return Err(FormvaultError::InvalidKey);
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();

        Ok(Self { bytes })
    }

    /// Construct a `SealingKey` from raw bytes. Used by tests and by
    /// callers that source key material from a KMS directly.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Borrow the raw key bytes for use in seal/open operations.
    ///
    /// `pub(crate)` — raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for SealingKey {
    fn drop(&mut self) {
        // Overwrite key material before the memory is deallocated.
        self.bytes.zeroize();
    }
}
