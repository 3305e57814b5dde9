//! Register a password, log in, receive a token, use it, let it expire.

use chrono::{Duration, Utc};
use serde_json::{json, Map};
use warden_core::{
    Argon2idParams, CryptoError, PasswordHasher, SigningKey, TokenAlgorithm, TokenIssuer,
};

fn hasher() -> PasswordHasher {
    PasswordHasher::new(Argon2idParams {
        m_cost: 64,
        t_cost: 1,
        p_cost: 1,
    })
    .expect("valid params")
}

#[test]
fn register_login_and_call() {
    let hasher = hasher();
    let issuer = TokenIssuer::new(
        SigningKey::new(b"integration-secret", TokenAlgorithm::Hs256).expect("key"),
        30,
    );

    let stored = hasher.hash("qwe321").expect("hash");

    assert!(!hasher.verify("wrong", &stored).expect("verify"));
    assert!(hasher.verify("qwe321", &stored).expect("verify"));

    let mut extra = Map::new();
    extra.insert("sub".into(), json!("user-7"));
    extra.insert("scope".into(), json!("read write"));
    let token = issuer.issue(&extra).expect("issue");

    let claims = issuer.decode(&token).expect("decode");
    assert_eq!(claims.get("sub"), Some(&json!("user-7")));
    assert_eq!(claims.exp - claims.iat, 30 * 60);
}

#[test]
fn expiry_is_terminal() {
    let issuer = TokenIssuer::new(SigningKey::hs256(b"integration-secret").expect("key"), 1);
    let issued = Utc::now();
    let token = issuer.encode_at(&Map::new(), 1, issued).expect("encode");

    assert!(issuer.decode_at(&token, issued).is_ok());
    for later in [Duration::minutes(1), Duration::minutes(2), Duration::days(30)] {
        assert!(matches!(
            issuer.decode_at(&token, issued + later),
            Err(CryptoError::TokenExpired)
        ));
    }
}

#[test]
fn rotating_the_signing_key_invalidates_tokens() {
    let old = TokenIssuer::new(SigningKey::hs256(b"key-v1").expect("key"), 10);
    let new = TokenIssuer::new(SigningKey::hs256(b"key-v2").expect("key"), 10);
    let token = old.issue(&Map::new()).expect("issue");
    assert!(old.decode(&token).is_ok());
    assert!(matches!(new.decode(&token), Err(CryptoError::InvalidSignature)));
}

#[test]
fn stale_password_record_is_flagged_for_rehash() {
    let old = hasher();
    let record = old.hash("pw").expect("hash");
    let upgraded = PasswordHasher::new(Argon2idParams {
        m_cost: 128,
        t_cost: 2,
        p_cost: 1,
    })
    .expect("valid params");

    assert!(upgraded.verify("pw", &record).expect("verify"));
    assert!(upgraded.needs_rehash(&record).expect("needs_rehash"));
    let rehashed = upgraded.hash("pw").expect("hash");
    assert!(!upgraded.needs_rehash(&rehashed).expect("needs_rehash"));
}
