//! The submission pipeline.
//!
//! Write path: validate → (optional captcha) → identity hash → dedup
//! check → encrypt → insert. Read paths: store query → per-row decrypt
//! → projection. The plaintext bundle exists only inside `submit` and
//! inside the projectors; nothing here logs or caches it.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::captcha::{CaptchaVerifier, CAPTCHA_TOKEN_FIELD};
use crate::config::FormConfig;
use crate::crypto::{self, PiiCipher};
use crate::error::FormvaultError;
use crate::identity::IdentityHasher;
use crate::store::SubmissionStore;
use crate::submission::{ClientMeta, PiiBundle, Submission};
use crate::validate::{self, Validation};
use crate::view::{self, AdminEntry, PublicEntry};

/// Row cap for the public listing.
pub const PUBLIC_LIST_LIMIT: usize = 500;

/// Row cap for the admin listing.
pub const ADMIN_LIST_LIMIT: usize = 1000;

/// The user-visible result of a submit call.
///
/// Both variants are *successful* request handling; server faults
/// travel separately as `Err(FormvaultError)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored. Carries the generated row identifier.
    Accepted { id: String },
    /// Refused with field-level errors: validation messages, a failed
    /// captcha keyed `captcha`, or a duplicate email keyed `email`.
    Rejected { errors: BTreeMap<String, String> },
}

/// Aggregate counts for the stats endpoint.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total_submissions: u64,
    pub public_signatures: u64,
}

/// The pipeline: cipher, hasher, and store, wired from one config.
///
/// The key is decoded once at construction and is read-only afterwards.
/// Each submit call is independent; the only shared state is the store.
pub struct Vault<S: SubmissionStore> {
    cipher: PiiCipher,
    hasher: IdentityHasher,
    store: S,
    captcha: Option<Box<dyn CaptchaVerifier>>,
}

impl<S: SubmissionStore> Vault<S> {
    /// Wire a pipeline from explicit configuration and a store.
    ///
    /// Fails only if the configured key does not decode to 32 bytes.
    pub fn new(config: &FormConfig, store: S) -> Result<Self, FormvaultError> {
        Ok(Self {
            cipher: PiiCipher::from_config(config)?,
            hasher: IdentityHasher::from_config(config),
            store,
            captcha: None,
        })
    }

    /// Attach a captcha verifier. When attached, submissions carrying a
    /// `captcha_token` field are verified; submissions without one pass
    /// through (token enforcement is the shell's decision).
    pub fn with_captcha_verifier(mut self, verifier: Box<dyn CaptchaVerifier>) -> Self {
        self.captcha = Some(verifier);
        self
    }

    /// Access the underlying store (read paths of the shell, tests).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one form submission end to end.
    ///
    /// Expected refusals (bad input, failed captcha, duplicate email)
    /// come back as [`SubmitOutcome::Rejected`]; only unexpected faults
    /// (storage, key misconfiguration) surface as `Err`.
    ///
    /// The dedup check and the insert are two store calls with a window
    /// between them: under concurrent submissions of the same email a
    /// duplicate can race past the check. Callers needing a hard
    /// guarantee must enforce uniqueness of `email_identity_hash` at
    /// the storage layer.
    pub fn submit(
        &mut self,
        fields: &BTreeMap<String, String>,
        client: &ClientMeta,
    ) -> Result<SubmitOutcome, FormvaultError> {
        let Validation { ok, errors, data } = validate::validate(fields);
        if !ok {
            return Ok(SubmitOutcome::Rejected { errors });
        }

        if let (Some(verifier), Some(token)) = (&self.captcha, fields.get(CAPTCHA_TOKEN_FIELD)) {
            if !verifier.verify(token, &client.ip) {
                return Ok(SubmitOutcome::Rejected {
                    errors: field_error("captcha", "captcha verification failed"),
                });
            }
        }

        let identity = self.hasher.email_identity(&data.email);
        match self.dedup_check(&identity) {
            Ok(()) => {}
            Err(FormvaultError::DuplicateIdentity) => {
                return Ok(SubmitOutcome::Rejected {
                    errors: field_error("email", "this email address has already been submitted"),
                });
            }
            Err(other) => return Err(other),
        }

        let bundle = PiiBundle {
            name: data.name,
            org: data.org,
            email: data.email,
            comment: data.comment,
        };
        let envelope = self.cipher.encrypt(&bundle)?;

        let id = crypto::generate_id()?;
        let submission = Submission {
            id: id.clone(),
            created_at: Utc::now().timestamp_millis(),
            pii: Some(envelope),
            key_id: self.cipher.key_id().to_string(),
            email_identity_hash: identity,
            consent_public: data.consent_public,
            ip_fingerprint: self.hasher.ip_fingerprint(&client.ip),
            user_agent: client.user_agent.clone(),
        };

        self.store.insert(submission).map_err(|err| {
            // Full detail stays server-side; callers map this to a
            // generic response.
            error!(error = %err, "failed to persist submission");
            err
        })?;

        Ok(SubmitOutcome::Accepted { id })
    }

    /// The consent-filtered public listing, newest first, capped at
    /// [`PUBLIC_LIST_LIMIT`]. Unreadable rows are omitted.
    pub fn list_public(&self) -> Result<Vec<PublicEntry>, FormvaultError> {
        let rows = self.store.list_public(PUBLIC_LIST_LIMIT)?;
        Ok(view::project_public(&rows, &self.cipher))
    }

    /// Every stored row, newest first, capped at [`ADMIN_LIST_LIMIT`].
    /// Unreadable rows carry the sentinel.
    pub fn list_admin(&self) -> Result<Vec<AdminEntry>, FormvaultError> {
        let rows = self.store.list_all(ADMIN_LIST_LIMIT)?;
        Ok(view::project_admin(&rows, &self.cipher))
    }

    pub fn stats(&self) -> Result<Stats, FormvaultError> {
        Ok(Stats {
            total_submissions: self.store.count_all()?,
            public_signatures: self.store.count_public()?,
        })
    }

    fn dedup_check(&self, identity: &str) -> Result<(), FormvaultError> {
        match self.store.find_by_identity_hash(identity)? {
            Some(_) => Err(FormvaultError::DuplicateIdentity),
            None => Ok(()),
        }
    }
}

fn field_error(field: &str, message: &str) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    errors.insert(field.to_string(), message.to_string());
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    fn config() -> FormConfig {
        FormConfig {
            enc_key_b64: BASE64.encode([5u8; 32]),
            enc_key_id: "k-2024".to_string(),
            ip_salt: "pepper".to_string(),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    struct RejectAll;
    impl CaptchaVerifier for RejectAll {
        fn verify(&self, _token: &str, _remote_ip: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_rejects_invalid_fields_without_touching_store() {
        let mut vault = Vault::new(&config(), MemoryStore::new()).unwrap();
        let outcome = vault
            .submit(&fields(&[("name", "A")]), &ClientMeta::default())
            .unwrap();
        match outcome {
            SubmitOutcome::Rejected { errors } => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("email"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(vault.store().is_empty());
    }

    #[test]
    fn test_captcha_failure_is_a_field_error() {
        let mut vault = Vault::new(&config(), MemoryStore::new())
            .unwrap()
            .with_captcha_verifier(Box::new(RejectAll));
        let outcome = vault
            .submit(
                &fields(&[
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    (CAPTCHA_TOKEN_FIELD, "tok"),
                ]),
                &ClientMeta::default(),
            )
            .unwrap();
        match outcome {
            SubmitOutcome::Rejected { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("captcha"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenless_submission_passes_attached_verifier() {
        let mut vault = Vault::new(&config(), MemoryStore::new())
            .unwrap()
            .with_captcha_verifier(Box::new(RejectAll));
        let outcome = vault
            .submit(
                &fields(&[("name", "Ada"), ("email", "ada@example.com")]),
                &ClientMeta::default(),
            )
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    }

    /// Delegates to a `MemoryStore` while recording the row cap each
    /// listing call was made with.
    #[derive(Default)]
    struct LimitRecordingStore {
        inner: MemoryStore,
        last_limit: std::cell::Cell<Option<usize>>,
    }

    impl SubmissionStore for LimitRecordingStore {
        fn find_by_identity_hash(
            &self,
            hash: &str,
        ) -> Result<Option<Submission>, FormvaultError> {
            self.inner.find_by_identity_hash(hash)
        }

        fn insert(&mut self, submission: Submission) -> Result<(), FormvaultError> {
            self.inner.insert(submission)
        }

        fn list_public(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError> {
            self.last_limit.set(Some(limit));
            self.inner.list_public(limit)
        }

        fn list_all(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError> {
            self.last_limit.set(Some(limit));
            self.inner.list_all(limit)
        }

        fn count_all(&self) -> Result<u64, FormvaultError> {
            self.inner.count_all()
        }

        fn count_public(&self) -> Result<u64, FormvaultError> {
            self.inner.count_public()
        }
    }

    #[test]
    fn test_listings_pass_their_caps_to_the_store() {
        let vault = Vault::new(&config(), LimitRecordingStore::default()).unwrap();

        vault.list_public().unwrap();
        assert_eq!(vault.store().last_limit.get(), Some(PUBLIC_LIST_LIMIT));

        vault.list_admin().unwrap();
        assert_eq!(vault.store().last_limit.get(), Some(ADMIN_LIST_LIMIT));
    }

    #[test]
    fn test_bad_key_fails_construction() {
        let mut cfg = config();
        cfg.enc_key_b64 = "c2hvcnQ=".to_string(); // "short"
        assert!(Vault::new(&cfg, MemoryStore::new()).is_err());
    }
}
