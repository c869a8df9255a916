//! Keystream codec: XOR a byte stream against a repeating 8-byte key.
//!
//! The transform is an involution — running the output through the codec with
//! the same key reproduces the input byte for byte.

use std::io::{Read, Write};

use crate::utils::config::TRANSFORM_CHUNK_SIZE;

/// Keystream length in bytes.
pub const KEY_LEN: usize = 8;

/// The repeating keystream. Length is fixed by the type, so no runtime check.
pub type Key = [u8; KEY_LEN];

/// XOR `buf` in place against the keystream starting at `phase`, returning the
/// phase for the bytes that follow. Carrying the returned phase into the next
/// call keeps the keystream continuous across chunk boundaries; a trailing
/// partial chunk must not restart the key at offset 0.
pub fn apply_keystream(key: &Key, phase: usize, buf: &mut [u8]) -> usize {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte ^= key[(phase + i) % KEY_LEN];
    }
    (phase + buf.len()) % KEY_LEN
}

/// Stream `reader` through the keystream into `writer` in fixed-size chunks.
/// Returns the number of bytes written. Working set is one chunk regardless of
/// stream length.
pub fn transform_stream<R: Read, W: Write>(
    key: &Key,
    reader: &mut R,
    writer: &mut W,
) -> std::io::Result<u64> {
    let mut buf = vec![0u8; TRANSFORM_CHUNK_SIZE];
    let mut phase = 0usize;
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        phase = apply_keystream(key, phase, &mut buf[..n]);
        writer.write_all(&buf[..n])?;
        written += n as u64;
    }
    writer.flush()?;
    Ok(written)
}

/// Parse an 8-byte key from hex, ignoring spaces (`"00 ab 12 …"` or `"00ab12…"`).
pub fn parse_key_hex(s: &str) -> anyhow::Result<Key> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    // Byte-indexed slicing below; anything outside ASCII hex is rejected
    // first so a multi-byte character can never land on a slice boundary.
    if !compact.bytes().all(|b| b.is_ascii_hexdigit()) {
        anyhow::bail!("key must contain only hex digits: {s:?}");
    }
    if compact.len() != KEY_LEN * 2 {
        anyhow::bail!(
            "key must be exactly {} hex bytes, got {} hex digits",
            KEY_LEN,
            compact.len()
        );
    }
    let mut key = [0u8; KEY_LEN];
    for (i, out) in key.iter_mut().enumerate() {
        let pair = &compact[i * 2..i * 2 + 2];
        *out = u8::from_str_radix(pair, 16)
            .map_err(|_| anyhow::anyhow!("invalid hex byte in key: {pair:?}"))?;
    }
    Ok(key)
}
