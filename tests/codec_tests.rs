//! Codec tests: round-trip, phase continuity across chunk splits, hex key parsing.

use std::io::Cursor;
use xorbatch::codec::{KEY_LEN, Key, apply_keystream, parse_key_hex, transform_stream};

const KEY: Key = [0x13, 0x37, 0x00, 0xff, 0xa5, 0x5a, 0x01, 0x80];

fn encode_whole(key: &Key, data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    apply_keystream(key, 0, &mut buf);
    buf
}

// --- apply_keystream ---

#[test]
fn test_round_trip_identity() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut buf = data.clone();
    apply_keystream(&KEY, 0, &mut buf);
    assert_ne!(buf, data);
    apply_keystream(&KEY, 0, &mut buf);
    assert_eq!(buf, data);
}

#[test]
fn test_zero_key_is_identity() {
    let data = b"hello world".to_vec();
    let mut buf = data.clone();
    apply_keystream(&[0u8; KEY_LEN], 0, &mut buf);
    assert_eq!(buf, data);
}

#[test]
fn test_known_vector() {
    let mut buf = vec![0u8; KEY_LEN];
    apply_keystream(&KEY, 0, &mut buf);
    // XOR with zero input reproduces the keystream itself.
    assert_eq!(buf, KEY.to_vec());
}

#[test]
fn test_phase_advances_and_wraps() {
    let mut buf = [0u8; 3];
    let phase = apply_keystream(&KEY, 6, &mut buf);
    assert_eq!(phase, 1);
    // Bytes 6, 7, then wrap to 0.
    assert_eq!(buf, [KEY[6], KEY[7], KEY[0]]);
}

#[test]
fn test_chunk_boundary_invariance() {
    let data: Vec<u8> = (0..2000).map(|i| (i * 7 % 251) as u8).collect();
    let whole = encode_whole(&KEY, &data);

    // Splits deliberately not multiples of the key length.
    for chunk_size in [1usize, 3, 5, 7, 8, 9, 13, 64, 1999] {
        let mut split = data.clone();
        let mut phase = 0usize;
        for chunk in split.chunks_mut(chunk_size) {
            phase = apply_keystream(&KEY, phase, chunk);
        }
        assert_eq!(split, whole, "chunk size {} diverged", chunk_size);
    }
}

// --- transform_stream ---

#[test]
fn test_transform_stream_matches_one_shot() {
    // Longer than one transform chunk so the loop runs more than once, with a
    // tail that is not key-aligned.
    let data: Vec<u8> = (0..70_003).map(|i| (i % 256) as u8).collect();
    let mut out = Vec::new();
    let written = transform_stream(&KEY, &mut Cursor::new(&data), &mut out).unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(out, encode_whole(&KEY, &data));
}

#[test]
fn test_transform_stream_round_trip() {
    let data = b"the quick brown fox jumps over the lazy dog".to_vec();
    let mut encoded = Vec::new();
    transform_stream(&KEY, &mut Cursor::new(&data), &mut encoded).unwrap();
    let mut decoded = Vec::new();
    transform_stream(&KEY, &mut Cursor::new(&encoded), &mut decoded).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn test_transform_stream_empty_input() {
    let mut out = Vec::new();
    let written = transform_stream(&KEY, &mut Cursor::new(&[] as &[u8]), &mut out).unwrap();
    assert_eq!(written, 0);
    assert!(out.is_empty());
}

// --- parse_key_hex ---

#[test]
fn test_parse_key_hex_with_spaces() {
    let key = parse_key_hex("13 37 00 ff a5 5a 01 80").unwrap();
    assert_eq!(key, KEY);
}

#[test]
fn test_parse_key_hex_compact_and_uppercase() {
    let key = parse_key_hex("133700FFA55A0180").unwrap();
    assert_eq!(key, KEY);
}

#[test]
fn test_parse_key_hex_wrong_length() {
    assert!(parse_key_hex("00 11 22").is_err());
    assert!(parse_key_hex("00 11 22 33 44 55 66 77 88").is_err());
    assert!(parse_key_hex("").is_err());
}

#[test]
fn test_parse_key_hex_invalid_digit() {
    assert!(parse_key_hex("zz 11 22 33 44 55 66 77").is_err());
}

#[test]
fn test_parse_key_hex_multibyte_char_is_error_not_panic() {
    // "€" is three bytes, so this string is 16 bytes like a valid key; it
    // must come back as Err, never as a char-boundary panic.
    assert!(parse_key_hex("€0011223344556").is_err());
    assert!(parse_key_hex("€€ 11 22 33 44 55 66 77").is_err());
}
