//! Store phone numbers encrypted, look them up by fragment, display masked.

use warden_core::{CipherKey, KeySize, KeyedCipher, SearchableField, SearchableFieldCodec};

const NUMBERS: [&str; 4] = ["18012345678", "13900001111", "15812349999", "17755556666"];

/// Stands in for an encrypted column: wire-form strings only.
fn store(codec: &SearchableFieldCodec) -> Vec<String> {
    NUMBERS
        .iter()
        .map(|n| codec.encode_field(n).to_string())
        .collect()
}

#[test]
fn fragment_search_over_stored_wire_forms() {
    let codec = SearchableFieldCodec::new(
        KeyedCipher::new(CipherKey::generate(KeySize::Aes256)).expect("cipher"),
    );
    let rows = store(&codec);

    // A substring match on the raw column is enough, no decryption needed.
    let needle = codec.search_segment("234").expect("fragment");
    let hits: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.contains(&needle))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(hits, vec![0, 2]);

    let displayed: Vec<String> = hits
        .iter()
        .map(|&i| codec.decode_str(&rows[i], true).expect("decode"))
        .collect();
    assert_eq!(displayed, vec!["180****5678", "158****9999"]);
}

#[test]
fn exact_match_uses_whole_field_equality() {
    let codec =
        SearchableFieldCodec::new(KeyedCipher::from_bytes(b"0123456789abcdef").expect("cipher"));
    let rows = store(&codec);
    let query = codec.encode_field("13900001111").to_string();
    assert_eq!(rows.iter().position(|r| *r == query), Some(1));
}

#[test]
fn fields_are_bound_to_their_key() {
    let writer =
        SearchableFieldCodec::new(KeyedCipher::from_bytes(&[0x01; 24]).expect("cipher"));
    let reader =
        SearchableFieldCodec::new(KeyedCipher::from_bytes(&[0x02; 24]).expect("cipher"));
    let field: SearchableField = writer.encode_field("18012345678");
    assert!(reader.decode_field(&field, false).is_err());
    assert!(!field.contains_segment(&reader.search_segment("180").expect("fragment")));
}
