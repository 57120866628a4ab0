//! ULID: Universally Unique Lexicographically Sortable Identifiers.
//!
//! A ULID is a 128-bit identifier made of a 48-bit millisecond timestamp
//! and 80 bits of cryptographically sourced randomness.  Its 26-character
//! Crockford base32 text form sorts exactly like the raw bytes and like
//! the `u128` form:
//!
//! ```text
//!    01AN4Z07BY      79KA1307SR9X4MV3
//!   |----------|    |----------------|
//!    Timestamp          Randomness
//!      48bits             80bits
//! ```
//!
//! # Quickstart
//! ```
//! use ulid::Ulid;
//!
//! let ulid = Ulid::new();
//! let text = ulid.to_string();
//! assert_eq!(text.len(), 26);
//! assert_eq!(text.parse::<Ulid>().unwrap(), ulid);
//! ```

pub mod base32;
pub mod ulid;

pub use crate::base32::Base32Error;
pub use crate::ulid::{Ulid, UlidError, UlidSource};

/// Length of a ULID in bytes.
pub const BYTES_LEN: usize = 16;
/// Length of the timestamp segment in bytes.
pub const TIMESTAMP_LEN: usize = 6;
/// Length of the randomness segment in bytes.
pub const RANDOMNESS_LEN: usize = 10;
/// Length of an encoded ULID.
pub const REPR_LEN: usize = 26;
/// Length of an encoded timestamp segment.
pub const TIMESTAMP_REPR_LEN: usize = 10;
/// Length of an encoded randomness segment.
pub const RANDOMNESS_REPR_LEN: usize = 16;
/// Largest timestamp a ULID can carry, in epoch milliseconds (2^48 - 1).
pub const MAX_TIMESTAMP_MS: u64 = (1 << 48) - 1;
