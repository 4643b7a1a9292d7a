//! Submission validation and normalization.
//!
//! Pure and synchronous: takes the untyped field map from the request
//! body, returns a typed clean record or a field-level error map. Never
//! touches storage, never encrypts. Everything downstream of this
//! module works on [`NormalizedSubmission`], not raw fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Conservative address shape: local part, `@`, domain with a top-level
/// label of at least two letters. Intentionally stricter than RFC 5322;
/// unusual-but-valid addresses are rejected rather than risk accepting
/// garbage into the dedup index.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("invalid email pattern")
});

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MIN: usize = 5;
const EMAIL_MAX: usize = 254;
const ORG_MAX: usize = 200;
const COMMENT_MAX: usize = 1000;

/// A submission after trimming, lower-casing, and rule checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSubmission {
    pub name: String,
    /// Trimmed and lower-cased.
    pub email: String,
    pub org: String,
    pub comment: String,
    pub consent_public: bool,
}

/// The outcome of validating one raw field map.
///
/// `ok` is true iff `errors` is empty. `data` is always populated with
/// the normalized values, valid or not, so callers can echo them back.
#[derive(Debug, Clone)]
pub struct Validation {
    pub ok: bool,
    pub errors: BTreeMap<String, String>,
    pub data: NormalizedSubmission,
}

/// Validate and normalize a raw field map.
///
/// All fields are trimmed first; email is additionally lower-cased.
/// Violations accumulate — one entry per offending field, not
/// fail-fast. Missing keys are treated as empty strings.
pub fn validate(fields: &BTreeMap<String, String>) -> Validation {
    let mut errors = BTreeMap::new();

    let name = trimmed(fields, "name");
    let email = trimmed(fields, "email").to_lowercase();
    let org = trimmed(fields, "org");
    let comment = trimmed(fields, "comment");
    let consent = trimmed(fields, "consent_public").to_lowercase();

    if name.is_empty() {
        errors.insert("name".to_string(), "name is required".to_string());
    } else if name.chars().count() < NAME_MIN {
        errors.insert(
            "name".to_string(),
            format!("name must be at least {} characters", NAME_MIN),
        );
    } else if name.chars().count() > NAME_MAX {
        errors.insert(
            "name".to_string(),
            format!("name must be at most {} characters", NAME_MAX),
        );
    }

    if email.is_empty() {
        errors.insert("email".to_string(), "email is required".to_string());
    } else if !email_is_valid(&email) {
        errors.insert("email".to_string(), "invalid email address".to_string());
    }

    if org.chars().count() > ORG_MAX {
        errors.insert(
            "org".to_string(),
            format!("organization must be at most {} characters", ORG_MAX),
        );
    }

    if comment.chars().count() > COMMENT_MAX {
        errors.insert(
            "comment".to_string(),
            format!("comment must be at most {} characters", COMMENT_MAX),
        );
    }

    // Anything other than these three spellings — including an absent
    // field — is no consent.
    let consent_public = consent == "1" || consent == "true" || consent == "on";

    Validation {
        ok: errors.is_empty(),
        errors,
        data: NormalizedSubmission {
            name,
            email,
            org,
            comment,
            consent_public,
        },
    }
}

fn trimmed(fields: &BTreeMap<String, String>, key: &str) -> String {
    fields
        .get(key)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn email_is_valid(email: &str) -> bool {
    let len = email.chars().count();
    len >= EMAIL_MIN
        && len <= EMAIL_MAX
        && !email.starts_with('.')
        && !email.ends_with('.')
        && EMAIL_PATTERN.is_match(email)
}
