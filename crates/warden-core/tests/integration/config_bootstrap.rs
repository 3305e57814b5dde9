//! Components built from one JSON configuration document.

use serde_json::Map;
use warden_core::{CipherKey, KeySize, WardenConfig};

#[test]
fn bootstrap_from_generated_key() {
    let key = CipherKey::generate(KeySize::Aes128);
    let json = format!(
        r#"{{
            "cipher": {{ "key": "{}" }},
            "token": {{ "secret": "bootstrap", "expire_minutes": 5 }},
            "password": {{ "params": {{ "m_cost": 32, "t_cost": 1, "p_cost": 1 }} }}
        }}"#,
        key.to_base64()
    );
    let config = WardenConfig::from_json(&json).expect("config should parse");

    let cipher = config.keyed_cipher().expect("cipher");
    assert_eq!(cipher.key_size(), KeySize::Aes128);

    let codec = config.searchable_codec().expect("codec");
    let wire = codec.encode_field("18012345678").to_string();
    assert_eq!(codec.decode_str(&wire, false).expect("decode"), "18012345678");

    // Two components built from the same config share the key.
    let again = config.searchable_codec().expect("codec");
    assert_eq!(again.decode_str(&wire, true).expect("decode"), "180****5678");

    let issuer = config.token_issuer().expect("issuer");
    let claims = issuer
        .decode(&issuer.issue(&Map::new()).expect("issue"))
        .expect("decode");
    assert_eq!(claims.exp - claims.iat, 300);

    let hasher = config.password_hasher().expect("hasher");
    let record = hasher.hash("pw").expect("hash");
    assert!(hasher.verify("pw", &record).expect("verify"));
}
