// Projection failure policy: the public listing silently drops rows it
// cannot decrypt; the admin listing keeps every row, sentineling the
// unreadable ones. The public shape never carries an email under any
// input.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use formvault::store::SubmissionStore;
use formvault::submission::{ClientMeta, Envelope, Submission};
use formvault::view::SENTINEL;
use formvault::{FormConfig, MemoryStore, SubmitOutcome, Vault};

fn config() -> FormConfig {
    FormConfig {
        enc_key_b64: BASE64.encode([1u8; 32]),
        enc_key_id: "k-2024-01".to_string(),
        ip_salt: "salt".to_string(),
    }
}

fn fields(name: &str, email: &str, consent: bool) -> BTreeMap<String, String> {
    let mut f = BTreeMap::new();
    f.insert("name".to_string(), name.to_string());
    f.insert("email".to_string(), email.to_string());
    if consent {
        f.insert("consent_public".to_string(), "on".to_string());
    }
    f
}

fn submit(vault: &mut Vault<MemoryStore>, name: &str, email: &str, consent: bool) {
    let outcome = vault
        .submit(&fields(name, email, consent), &ClientMeta::default())
        .unwrap();
    assert!(
        matches!(outcome, SubmitOutcome::Accepted { .. }),
        "expected acceptance, got {:?}",
        outcome
    );
}

/// A consented row whose envelope no key can open — a legacy row after
/// key loss, or storage corruption.
fn unreadable_row(id: &str, created_at: i64, consent: bool) -> Submission {
    Submission {
        id: id.to_string(),
        created_at,
        pii: Some(Envelope {
            nonce: BASE64.encode([0u8; 12]),
            ciphertext: BASE64.encode([0u8; 48]),
        }),
        key_id: "k-lost".to_string(),
        email_identity_hash: "0".repeat(64),
        consent_public: consent,
        ip_fingerprint: "fp".to_string(),
        user_agent: "ua".to_string(),
    }
}

#[test]
fn test_public_drops_and_admin_sentinels_unreadable_rows() {
    // Seed the store with the unreadable row before wiring the vault,
    // the way a real deployment inherits legacy rows.
    let mut store = MemoryStore::new();
    store.insert(unreadable_row("bad-row", 1, true)).unwrap();

    let mut vault = Vault::new(&config(), store).unwrap();
    submit(&mut vault, "Readable", "ok@example.com", true);

    // Public: only the readable row, no placeholder for the bad one.
    let public = vault.list_public().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Readable");

    // Admin: both rows, the bad one sentineled with metadata intact.
    let admin = vault.list_admin().unwrap();
    assert_eq!(admin.len(), 2);
    let bad = admin.iter().find(|e| e.id == "bad-row").unwrap();
    assert_eq!(bad.name, SENTINEL);
    assert_eq!(bad.email, SENTINEL);
    assert_eq!(bad.org, SENTINEL);
    assert_eq!(bad.comment, SENTINEL);
    assert_eq!(bad.key_id, "k-lost");
    assert_eq!(bad.ip_fingerprint, "fp");

    let good = admin.iter().find(|e| e.id != "bad-row").unwrap();
    assert_eq!(good.name, "Readable");
    assert_eq!(good.email, "ok@example.com");
}

#[test]
fn test_admin_sentinels_rows_without_envelope() {
    let mut store = MemoryStore::new();
    let mut bare = unreadable_row("bare-row", 1, false);
    bare.pii = None;
    store.insert(bare).unwrap();

    let vault = Vault::new(&config(), store).unwrap();
    assert!(vault.list_public().unwrap().is_empty());

    let admin = vault.list_admin().unwrap();
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].name, SENTINEL);
}

#[test]
fn test_public_listing_is_consent_filtered() {
    let mut vault = Vault::new(&config(), MemoryStore::new()).unwrap();
    submit(&mut vault, "Public Person", "yes@example.com", true);
    submit(&mut vault, "Private Person", "no@example.com", false);

    let public = vault.list_public().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Public Person");

    // Admin sees both.
    assert_eq!(vault.list_admin().unwrap().len(), 2);
}

#[test]
fn test_public_json_never_contains_email() {
    let mut vault = Vault::new(&config(), MemoryStore::new()).unwrap();
    submit(&mut vault, "Ada", "ada@example.com", true);

    let json = serde_json::to_string(&vault.list_public().unwrap()).unwrap();
    assert!(!json.contains("email"));
    assert!(!json.contains("ada@example.com"));
}

#[test]
fn test_stats_count_all_and_public() {
    let mut vault = Vault::new(&config(), MemoryStore::new()).unwrap();
    submit(&mut vault, "One", "one@example.com", true);
    submit(&mut vault, "Two", "two@example.com", false);
    submit(&mut vault, "Three", "three@example.com", true);

    let stats = vault.stats().unwrap();
    assert_eq!(stats.total_submissions, 3);
    assert_eq!(stats.public_signatures, 2);
}
