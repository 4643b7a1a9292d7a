//! Captcha verification seam.
//!
//! The actual challenge verification (e.g. a Turnstile or reCAPTCHA
//! round-trip) belongs to the hosting shell; the pipeline only defines
//! the seam and the policy. A failed verification is a user-facing
//! field error keyed `captcha`, exactly like a validation failure —
//! never a server fault.

/// Verifies a captcha token supplied with a submission.
pub trait CaptchaVerifier {
    /// Returns true when the token is genuine. `remote_ip` is the
    /// submitting client's address, which some providers factor in.
    fn verify(&self, token: &str, remote_ip: &str) -> bool;
}

/// The field the pipeline reads the token from.
pub const CAPTCHA_TOKEN_FIELD: &str = "captcha_token";
