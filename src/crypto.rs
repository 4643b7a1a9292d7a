//! Low-level cryptographic operations.
//!
//! This module is one of exactly two places in the crate that import
//! `ring` directly (the other is `identity`). All encryption and
//! decryption of PII goes through [`PiiCipher`].
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption)
//! - **Nonce**: 96-bit (12 bytes), generated fresh per operation via `SystemRandom`
//! - **Key size**: 256 bits (32 bytes)
//! - **Plaintext encoding**: canonical serde_json bytes of the bundle

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroize;

use crate::config::FormConfig;
use crate::error::FormvaultError;
use crate::keys::SealingKey;
use crate::submission::{Envelope, PiiBundle};

/// The AEAD algorithm used throughout formvault.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of the sealing key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of a generated submission identifier in bytes (rendered as hex).
const ID_LEN: usize = 16;

/// Authenticated-encryption wrapper around the single sealing key.
///
/// Holds the key and its version identifier for the lifetime of the
/// pipeline. Read-only after construction; safe to share across
/// requests.
pub struct PiiCipher {
    key: SealingKey,
    key_id: String,
}

impl PiiCipher {
    /// Wrap an already-decoded key.
    pub fn new(key: SealingKey, key_id: impl Into<String>) -> Self {
        Self {
            key,
            key_id: key_id.into(),
        }
    }

    /// Decode the key from the configuration secret.
    pub fn from_config(config: &FormConfig) -> Result<Self, FormvaultError> {
        let key = SealingKey::from_base64(&config.enc_key_b64)?;
        Ok(Self::new(key, config.enc_key_id.clone()))
    }

    /// The identifier of the key version this cipher seals with.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Encrypt a PII bundle to an envelope.
    ///
    /// A fresh random nonce is generated for every call — never reused,
    /// never counter-based. The nonce and ciphertext are returned as
    /// independent base64 strings; both must be persisted together.
    pub fn encrypt(&self, bundle: &PiiBundle) -> Result<Envelope, FormvaultError> {
        let plaintext =
            serde_json::to_vec(bundle).map_err(|_| FormvaultError::EncryptionFailure)?;

        let nonce_bytes = generate_nonce_bytes()?;
        let key = self.sealing_key()?;

        // `seal_in_place_append_tag` overwrites the plaintext buffer with
        // ciphertext, so the serialized bundle never outlives this call.
        let mut in_out = plaintext;
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| FormvaultError::EncryptionFailure)?;

        Ok(Envelope {
            nonce: BASE64.encode(nonce_bytes),
            ciphertext: BASE64.encode(&in_out),
        })
    }

    /// Decrypt an (nonce, ciphertext) pair back to a PII bundle.
    ///
    /// Fails with `DecryptionFailure` when either string is not valid
    /// base64, the nonce has the wrong length, the GCM tag does not
    /// verify (tampering, wrong key, corruption), or the decrypted bytes
    /// are not a valid bundle. Failure here is a normal per-row outcome,
    /// not a fault — callers decide whether to drop or sentinel the row.
    pub fn decrypt(
        &self,
        ciphertext_b64: &str,
        nonce_b64: &str,
    ) -> Result<PiiBundle, FormvaultError> {
        let nonce_bytes: [u8; NONCE_LEN] = BASE64
            .decode(nonce_b64)
            .map_err(|_| FormvaultError::DecryptionFailure)?
            .try_into()
            .map_err(|_| FormvaultError::DecryptionFailure)?;

        let mut payload = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| FormvaultError::DecryptionFailure)?;

        let key = self.sealing_key()?;
        let result = key
            .open_in_place(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut payload,
            )
            .map_err(|_| FormvaultError::DecryptionFailure)
            .and_then(|plaintext| {
                serde_json::from_slice::<PiiBundle>(plaintext)
                    .map_err(|_| FormvaultError::DecryptionFailure)
            });

        // The buffer holds decrypted plaintext on success; wipe it either way.
        payload.zeroize();
        result
    }

    /// Convenience for callers holding a whole [`Envelope`].
    pub fn decrypt_envelope(&self, envelope: &Envelope) -> Result<PiiBundle, FormvaultError> {
        self.decrypt(&envelope.ciphertext, &envelope.nonce)
    }

    fn sealing_key(&self) -> Result<LessSafeKey, FormvaultError> {
        let unbound = UnboundKey::new(ALGORITHM, self.key.as_bytes())
            .map_err(|_| FormvaultError::InvalidKey)?;
        Ok(LessSafeKey::new(unbound))
    }
}

/// Generate a cryptographically secure random nonce.
///
/// Uses `ring::rand::SystemRandom` — the only source of randomness in
/// the crate. There is no nonce caching or counter-based generation.
fn generate_nonce_bytes() -> Result<[u8; NONCE_LEN], FormvaultError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; NONCE_LEN];
    rng.fill(&mut buf)
        .map_err(|_| FormvaultError::RandomnessFailure)?;
    Ok(buf)
}

/// Generate an opaque submission identifier: 16 random bytes as hex.
pub(crate) fn generate_id() -> Result<String, FormvaultError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; ID_LEN];
    rng.fill(&mut buf)
        .map_err(|_| FormvaultError::RandomnessFailure)?;
    Ok(hex_encode(&buf))
}

/// Lowercase hex rendering of a byte slice.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        },
    )
}
