//! Projection of stored rows into safe output shapes.
//!
//! Two modes with deliberately asymmetric failure policy:
//!
//! - **Public**: a row that fails to decrypt is dropped. The public
//!   surface must never leak "something exists here but we can't show
//!   it" — no placeholders, no gaps flagged.
//! - **Admin**: a row that fails to decrypt is kept, its PII fields
//!   replaced by the [`SENTINEL`]. The admin surface must never
//!   silently hide a row that exists.
//!
//! Neither projection ever includes the email in the public shape,
//! regardless of consent or decryption outcome.

use serde::Serialize;
use tracing::warn;

use crate::crypto::PiiCipher;
use crate::submission::Submission;

/// Placeholder shown to admins in place of PII that could not be read.
pub const SENTINEL: &str = "[ENCRYPTED]";

/// One row of the public listing. No email, no identifiers, no
/// fingerprints — only what the submitter consented to show.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicEntry {
    pub name: String,
    pub org: String,
    pub comment: String,
    pub created_at: i64,
}

/// One row of the admin listing: decrypted-or-sentinel PII plus the
/// non-reversible metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AdminEntry {
    pub id: String,
    pub created_at: i64,
    pub name: String,
    pub org: String,
    pub email: String,
    pub comment: String,
    pub consent_public: bool,
    pub ip_fingerprint: String,
    pub key_id: String,
    pub email_identity_hash: String,
}

/// Project rows into the public shape.
///
/// Each row is decrypted independently; one unreadable row never
/// affects its neighbours. Input ordering is preserved.
pub fn project_public(rows: &[Submission], cipher: &PiiCipher) -> Vec<PublicEntry> {
    rows.iter()
        .filter_map(|row| {
            let envelope = row.pii.as_ref()?;
            match cipher.decrypt_envelope(envelope) {
                Ok(bundle) => Some(PublicEntry {
                    name: bundle.name.clone(),
                    org: bundle.org.clone(),
                    comment: bundle.comment.clone(),
                    created_at: row.created_at,
                }),
                Err(_) => {
                    warn!(id = %row.id, key_id = %row.key_id, "dropping unreadable row from public listing");
                    None
                }
            }
        })
        .collect()
}

/// Project rows into the admin shape.
///
/// Every input row appears in the output. Rows whose envelope is absent
/// or unreadable carry the sentinel in each PII field. Input ordering
/// is preserved.
pub fn project_admin(rows: &[Submission], cipher: &PiiCipher) -> Vec<AdminEntry> {
    rows.iter()
        .map(|row| {
            let decrypted = row
                .pii
                .as_ref()
                .and_then(|envelope| match cipher.decrypt_envelope(envelope) {
                    Ok(bundle) => Some(bundle),
                    Err(_) => {
                        warn!(id = %row.id, key_id = %row.key_id, "unreadable row in admin listing, emitting sentinel");
                        None
                    }
                });

            match decrypted {
                Some(bundle) => AdminEntry {
                    id: row.id.clone(),
                    created_at: row.created_at,
                    name: bundle.name.clone(),
                    org: bundle.org.clone(),
                    email: bundle.email.clone(),
                    comment: bundle.comment.clone(),
                    consent_public: row.consent_public,
                    ip_fingerprint: row.ip_fingerprint.clone(),
                    key_id: row.key_id.clone(),
                    email_identity_hash: row.email_identity_hash.clone(),
                },
                None => AdminEntry {
                    id: row.id.clone(),
                    created_at: row.created_at,
                    name: SENTINEL.to_string(),
                    org: SENTINEL.to_string(),
                    email: SENTINEL.to_string(),
                    comment: SENTINEL.to_string(),
                    consent_public: row.consent_public,
                    ip_fingerprint: row.ip_fingerprint.clone(),
                    key_id: row.key_id.clone(),
                    email_identity_hash: row.email_identity_hash.clone(),
                },
            }
        })
        .collect()
}
