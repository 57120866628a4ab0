//! Crockford base32 codec for the canonical 26-character ULID text form.
//!
//! # Alphabet
//! `0123456789ABCDEFGHJKMNPQRSTVWXYZ`, Crockford's set, which drops `I`,
//! `L`, `O` and `U` to avoid visual ambiguity.  Encoding always produces
//! uppercase.  Decoding is case-sensitive: lowercase input, the dropped
//! letters, and anything outside the table map to the invalid marker and
//! are rejected.  There is no padding character.
//!
//! # Packing
//! The timestamp segment packs 6 bytes into 10 characters and the
//! randomness segment packs 10 bytes into 16 characters, five bits per
//! character with groups spanning byte boundaries.  The shift/mask pattern
//! below is the wire format shared by every ULID implementation; it MUST
//! NOT be altered.  The first timestamp character only carries 3 bits, so
//! values above `7` would overflow 48 bits and decoding rejects them.

use thiserror::Error;

use crate::{
    BYTES_LEN, RANDOMNESS_LEN, RANDOMNESS_REPR_LEN, REPR_LEN, TIMESTAMP_LEN, TIMESTAMP_REPR_LEN,
};

/// The 32 encoding symbols, indexed by 5-bit value.
pub const ENCODE: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Marker for ASCII bytes with no 5-bit value.
const INVALID: u8 = 0xFF;

/// Reverse lookup for every ASCII byte: either a 5-bit value or [`INVALID`].
pub const DECODE: [u8; 128] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x00-0x07
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x08-0x0F
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x10-0x17
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x18-0x1F
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x20-0x27
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x28-0x2F
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, // '0'-'7'
    0x08, 0x09, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // '8', '9'
    0xFF, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, // '@', 'A'-'G'
    0x11, 0xFF, 0x12, 0x13, 0xFF, 0x14, 0x15, 0xFF, // 'H', I, 'J', 'K', L, 'M', 'N', O
    0x16, 0x17, 0x18, 0x19, 0x1A, 0xFF, 0x1B, 0x1C, // 'P'-'T', U, 'V', 'W'
    0x1D, 0x1E, 0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 'X', 'Y', 'Z'
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x60-0x67 (lowercase rejected)
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x68-0x6F
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x70-0x77
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0x78-0x7F
];

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Base32Error {
    /// Encode input with the wrong byte count.
    #[error("Invalid binary length: expected {expected} bytes, got {actual}")]
    InvalidBinaryLength { expected: usize, actual: usize },
    /// Decode input with the wrong character count.
    #[error("Invalid encoded length: expected {expected} characters, got {actual}")]
    InvalidEncodedLength { expected: usize, actual: usize },
    #[error("Character {0:?} is not in the base32 alphabet")]
    InvalidChar(char),
    /// First timestamp character above `7`: the value would exceed 2^48 - 1.
    #[error("Timestamp value is too large and will overflow 128 bits")]
    TimestampOverflow,
}

// ── Encoding ─────────────────────────────────────────────────────────────────

/// Encode a full 16-byte ULID as its 26-character text form.
///
/// ```
/// assert_eq!(ulid::base32::encode(&[0u8; 16]).unwrap(), "0".repeat(26));
/// ```
pub fn encode(binary: &[u8]) -> Result<String, Base32Error> {
    if binary.len() != BYTES_LEN {
        return Err(Base32Error::InvalidBinaryLength {
            expected: BYTES_LEN,
            actual: binary.len(),
        });
    }
    let mut out = encode_timestamp(&binary[..TIMESTAMP_LEN])?;
    out.push_str(&encode_randomness(&binary[TIMESTAMP_LEN..])?);
    Ok(out)
}

/// Encode the 6-byte timestamp segment as 10 characters.
pub fn encode_timestamp(binary: &[u8]) -> Result<String, Base32Error> {
    if binary.len() != TIMESTAMP_LEN {
        return Err(Base32Error::InvalidBinaryLength {
            expected: TIMESTAMP_LEN,
            actual: binary.len(),
        });
    }
    let b = binary;
    let quintets = [
        (b[0] & 0xE0) >> 5,
        b[0] & 0x1F,
        (b[1] & 0xF8) >> 3,
        ((b[1] & 0x07) << 2) | ((b[2] & 0xC0) >> 6),
        (b[2] & 0x3E) >> 1,
        ((b[2] & 0x01) << 4) | ((b[3] & 0xF0) >> 4),
        ((b[3] & 0x0F) << 1) | ((b[4] & 0x80) >> 7),
        (b[4] & 0x7C) >> 2,
        ((b[4] & 0x03) << 3) | ((b[5] & 0xE0) >> 5),
        b[5] & 0x1F,
    ];
    Ok(quintets.iter().map(|&q| ENCODE[q as usize] as char).collect())
}

/// Encode the 10-byte randomness segment as 16 characters.
pub fn encode_randomness(binary: &[u8]) -> Result<String, Base32Error> {
    if binary.len() != RANDOMNESS_LEN {
        return Err(Base32Error::InvalidBinaryLength {
            expected: RANDOMNESS_LEN,
            actual: binary.len(),
        });
    }
    let b = binary;
    let quintets = [
        (b[0] & 0xF8) >> 3,
        ((b[0] & 0x07) << 2) | ((b[1] & 0xC0) >> 6),
        (b[1] & 0x3E) >> 1,
        ((b[1] & 0x01) << 4) | ((b[2] & 0xF0) >> 4),
        ((b[2] & 0x0F) << 1) | ((b[3] & 0x80) >> 7),
        (b[3] & 0x7C) >> 2,
        ((b[3] & 0x03) << 3) | ((b[4] & 0xE0) >> 5),
        b[4] & 0x1F,
        (b[5] & 0xF8) >> 3,
        ((b[5] & 0x07) << 2) | ((b[6] & 0xC0) >> 6),
        (b[6] & 0x3E) >> 1,
        ((b[6] & 0x01) << 4) | ((b[7] & 0xF0) >> 4),
        ((b[7] & 0x0F) << 1) | ((b[8] & 0x80) >> 7),
        (b[8] & 0x7C) >> 2,
        ((b[8] & 0x03) << 3) | ((b[9] & 0xE0) >> 5),
        b[9] & 0x1F,
    ];
    Ok(quintets.iter().map(|&q| ENCODE[q as usize] as char).collect())
}

// ── Decoding ─────────────────────────────────────────────────────────────────

/// Decode a 26-character text form back into the 16 ULID bytes.
///
/// ```
/// let bytes = ulid::base32::decode("7ZZZZZZZZZZZZZZZZZZZZZZZZZ").unwrap();
/// assert_eq!(bytes, [0xFF; 16]);
/// ```
pub fn decode(encoded: &str) -> Result<[u8; BYTES_LEN], Base32Error> {
    check_encoded_len(encoded, REPR_LEN)?;
    // All-ASCII is guaranteed before splitting so the byte offset below is
    // always a character boundary.
    if let Some(c) = encoded.chars().find(|c| !c.is_ascii()) {
        return Err(Base32Error::InvalidChar(c));
    }
    let (head, tail) = encoded.split_at(TIMESTAMP_REPR_LEN);
    let timestamp = decode_timestamp(head)?;
    let randomness = decode_randomness(tail)?;

    let mut bytes = [0u8; BYTES_LEN];
    bytes[..TIMESTAMP_LEN].copy_from_slice(&timestamp);
    bytes[TIMESTAMP_LEN..].copy_from_slice(&randomness);
    Ok(bytes)
}

/// Decode the 10-character timestamp segment into 6 bytes.
pub fn decode_timestamp(encoded: &str) -> Result<[u8; TIMESTAMP_LEN], Base32Error> {
    check_encoded_len(encoded, TIMESTAMP_REPR_LEN)?;
    let mut v = [0u8; TIMESTAMP_REPR_LEN];
    for (slot, c) in v.iter_mut().zip(encoded.chars()) {
        *slot = lookup(c)?;
    }
    if v[0] > 0x07 {
        return Err(Base32Error::TimestampOverflow);
    }
    Ok([
        (v[0] << 5) | v[1],
        (v[2] << 3) | (v[3] >> 2),
        (v[3] << 6) | (v[4] << 1) | (v[5] >> 4),
        (v[5] << 4) | (v[6] >> 1),
        (v[6] << 7) | (v[7] << 2) | (v[8] >> 3),
        (v[8] << 5) | v[9],
    ])
}

/// Decode the 16-character randomness segment into 10 bytes.
pub fn decode_randomness(encoded: &str) -> Result<[u8; RANDOMNESS_LEN], Base32Error> {
    check_encoded_len(encoded, RANDOMNESS_REPR_LEN)?;
    let mut v = [0u8; RANDOMNESS_REPR_LEN];
    for (slot, c) in v.iter_mut().zip(encoded.chars()) {
        *slot = lookup(c)?;
    }
    Ok([
        (v[0] << 3) | (v[1] >> 2),
        (v[1] << 6) | (v[2] << 1) | (v[3] >> 4),
        (v[3] << 4) | (v[4] >> 1),
        (v[4] << 7) | (v[5] << 2) | (v[6] >> 3),
        (v[6] << 5) | v[7],
        (v[8] << 3) | (v[9] >> 2),
        (v[9] << 6) | (v[10] << 1) | (v[11] >> 4),
        (v[11] << 4) | (v[12] >> 1),
        (v[12] << 7) | (v[13] << 2) | (v[14] >> 3),
        (v[14] << 5) | v[15],
    ])
}

// ── helpers ──────────────────────────────────────────────────────────────────

#[inline]
fn lookup(c: char) -> Result<u8, Base32Error> {
    let value = match u32::from(c) {
        cp if cp < 128 => DECODE[cp as usize],
        _ => INVALID,
    };
    if value == INVALID {
        return Err(Base32Error::InvalidChar(c));
    }
    Ok(value)
}

fn check_encoded_len(encoded: &str, expected: usize) -> Result<(), Base32Error> {
    let actual = encoded.chars().count();
    if actual != expected {
        return Err(Base32Error::InvalidEncodedLength { expected, actual });
    }
    Ok(())
}
