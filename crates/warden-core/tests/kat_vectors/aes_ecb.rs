//! NIST SP 800-38A Appendix F.1 — ECB-AES Known-Answer Test vectors.
//!
//! The keyed cipher always appends PKCS7 padding, so a block-aligned
//! plaintext produces one extra block. Only the leading blocks are compared
//! against the NIST ciphertext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use warden_core::cipher::{KeyedCipher, BLOCK_LEN};

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("hex"))
        .collect()
}

const PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172a\
                         ae2d8a571e03ac9c9eb76fac45af8e51\
                         30c81c46a35ce411e5fbc1191a0a52ef\
                         f69f2445df4f9b17ad2b417be66c3710";

fn check(key_hex: &str, expected_hex: &str) {
    let cipher = KeyedCipher::from_bytes(&unhex(key_hex)).expect("valid key");
    let plaintext = unhex(PLAINTEXT);
    let expected = unhex(expected_hex);

    let sealed = STANDARD
        .decode(cipher.encrypt_bytes(&plaintext))
        .expect("base64");
    assert_eq!(sealed.len(), plaintext.len() + BLOCK_LEN);
    assert_eq!(&sealed[..expected.len()], expected.as_slice());

    let opened = cipher
        .decrypt_bytes(&STANDARD.encode(&sealed))
        .expect("decrypt should succeed");
    assert_eq!(opened, plaintext);
}

/// F.1.1 ECB-AES128.Encrypt
#[test]
fn nist_f_1_1_ecb_aes128() {
    check(
        "2b7e151628aed2a6abf7158809cf4f3c",
        "3ad77bb40d7a3660a89ecaf32466ef97\
         f5d3d58503b9699de785895a96fdbaaf\
         43b1cd7f598ece23881b00e3ed030688\
         7b0c785e27e8ad3f8223207104725dd4",
    );
}

/// F.1.3 ECB-AES192.Encrypt (first block)
#[test]
fn nist_f_1_3_ecb_aes192() {
    check(
        "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        "bd334f1d6e45f25ff712a214571fa5cc",
    );
}

/// F.1.5 ECB-AES256.Encrypt (first block)
#[test]
fn nist_f_1_5_ecb_aes256() {
    check(
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        "f3eed1bdb5d2a03c064b5a7e3db181f8",
    );
}

/// Identical plaintext blocks encrypt to identical ciphertext blocks.
#[test]
fn ecb_repeats_blocks() {
    let cipher = KeyedCipher::from_bytes(&unhex("2b7e151628aed2a6abf7158809cf4f3c")).expect("key");
    let block = unhex("6bc1bee22e409f96e93d7e117393172a");
    let doubled = [block.as_slice(), block.as_slice()].concat();
    let sealed = STANDARD.decode(cipher.encrypt_bytes(&doubled)).expect("base64");
    assert_eq!(sealed[..BLOCK_LEN], sealed[BLOCK_LEN..2 * BLOCK_LEN]);
}
