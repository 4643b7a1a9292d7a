//! # formvault
//!
//! Encrypted-PII form submission pipeline.
//!
//! Public form submissions (name, organization, email, comment,
//! consent flag) are validated, deduplicated by a one-way email
//! fingerprint, envelope-encrypted with AES-256-GCM, and persisted
//! through a pluggable store. Reads project rows back into a
//! public-safe or admin-safe shape, degrading gracefully when a row
//! can no longer be decrypted.
//!
//! The crate is the core of a larger system: HTTP routing, CORS, the
//! embeddable widget, and the concrete database live in the hosting
//! shell. The shell's obligations are small — build a [`FormConfig`],
//! implement [`store::SubmissionStore`] (one prepared statement per
//! method), and map [`vault::SubmitOutcome`] and [`FormvaultError`]
//! onto its wire format.
//!
//! ```
//! use std::collections::BTreeMap;
//! use formvault::{FormConfig, MemoryStore, SubmitOutcome, Vault};
//!
//! let config = FormConfig {
//!     // 32 zero bytes; use a real secret in deployment.
//!     enc_key_b64: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".into(),
//!     enc_key_id: "k-2024-01".into(),
//!     ip_salt: "deployment-salt".into(),
//! };
//! let mut vault = Vault::new(&config, MemoryStore::new()).unwrap();
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("name".to_string(), "Ada Lovelace".to_string());
//! fields.insert("email".to_string(), "ada@example.com".to_string());
//! fields.insert("consent_public".to_string(), "on".to_string());
//!
//! let outcome = vault.submit(&fields, &Default::default()).unwrap();
//! assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
//! assert_eq!(vault.list_public().unwrap().len(), 1);
//! ```

pub(crate) mod keys;

pub mod captcha;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod store;
pub mod submission;
pub mod validate;
pub mod vault;
pub mod view;

pub use config::FormConfig;
pub use error::FormvaultError;
pub use keys::SealingKey;
pub use store::MemoryStore;
pub use vault::{SubmitOutcome, Vault};
