//! The persistence seam.
//!
//! The pipeline is storage-agnostic: it needs only the six operations
//! in [`SubmissionStore`], each mapping to a single prepared statement
//! in a real deployment. Implement the trait to back the pipeline with
//! SQLite, D1, Postgres, or anything else that can hold rows.
//!
//! [`MemoryStore`] is the built-in implementation, used by this crate's
//! own tests and benches and adequate for small single-process
//! deployments.

use crate::error::FormvaultError;
use crate::submission::Submission;

/// The minimal contract the pipeline requires from persistence.
///
/// Writes are append-only: the pipeline never updates or deletes rows.
/// No cross-statement transactions are required. Listings are newest
/// first (descending `created_at`).
pub trait SubmissionStore {
    /// Point lookup by email identity hash, used for the dedup check.
    fn find_by_identity_hash(&self, hash: &str)
        -> Result<Option<Submission>, FormvaultError>;

    /// Append one row.
    fn insert(&mut self, submission: Submission) -> Result<(), FormvaultError>;

    /// Rows with `consent_public` set and an envelope present, newest
    /// first, at most `limit`.
    fn list_public(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError>;

    /// All rows, newest first, at most `limit`.
    fn list_all(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError>;

    fn count_all(&self) -> Result<u64, FormvaultError>;

    fn count_public(&self) -> Result<u64, FormvaultError>;
}

/// In-memory, Vec-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<Submission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn newest_first(&self, limit: usize, filter: impl Fn(&Submission) -> bool) -> Vec<Submission> {
        let mut rows: Vec<Submission> = self.rows.iter().filter(|r| filter(r)).cloned().collect();
        // Stable sort: rows sharing a timestamp keep insertion order.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        rows
    }
}

impl SubmissionStore for MemoryStore {
    fn find_by_identity_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Submission>, FormvaultError> {
        Ok(self
            .rows
            .iter()
            .find(|r| r.email_identity_hash == hash)
            .cloned())
    }

    fn insert(&mut self, submission: Submission) -> Result<(), FormvaultError> {
        self.rows.push(submission);
        Ok(())
    }

    fn list_public(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError> {
        Ok(self.newest_first(limit, |r| r.consent_public && r.pii.is_some()))
    }

    fn list_all(&self, limit: usize) -> Result<Vec<Submission>, FormvaultError> {
        Ok(self.newest_first(limit, |_| true))
    }

    fn count_all(&self) -> Result<u64, FormvaultError> {
        Ok(self.rows.len() as u64)
    }

    fn count_public(&self) -> Result<u64, FormvaultError> {
        Ok(self.rows.iter().filter(|r| r.consent_public).count() as u64)
    }
}
