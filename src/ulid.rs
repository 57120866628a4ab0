//! The ULID value type: construction, conversions and ordering.
//!
//! # Layout
//! Bytes 0-5 hold the 48-bit big-endian timestamp in epoch milliseconds,
//! bytes 6-15 hold 80 bits of randomness drawn from a cryptographically
//! secure source.  The type is a plain 16-byte `Copy` value; once built it
//! is never mutated.
//!
//! # Ordering
//! `Ord` is derived from the raw bytes.  Because the base32 alphabet is
//! ordered and the packing is big-endian, byte order, text order and
//! `u128` order always agree.  Comparisons against `u128`, byte slices and
//! strings are provided explicitly; anything else does not compare.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, TimeZone, Utc};
use rand::RngCore;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::{Builder, Uuid, Variant, Version};

use crate::base32::{self, Base32Error};
use crate::{BYTES_LEN, MAX_TIMESTAMP_MS, RANDOMNESS_LEN, REPR_LEN, TIMESTAMP_LEN};

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum UlidError {
    #[error("ULID has to be exactly 16 bytes long, got {0}")]
    InvalidLength(usize),
    #[error("Decode error: {0}")]
    Decode(#[from] Base32Error),
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),
    /// Timestamp outside `0..=2^48-1` milliseconds.
    #[error("Timestamp of {0} ms is out of the 48-bit ULID range")]
    TimestampOutOfRange(f64),
    #[error("Cannot parse a ULID from a string of length {0}")]
    UnparsableString(usize),
}

// ── Value type ───────────────────────────────────────────────────────────────

/// A Universally Unique Lexicographically Sortable Identifier.
///
/// A ULID carries a 48-bit millisecond timestamp followed by 80 random
/// bits.  Sorting ULIDs by raw bytes, by the 26-character text form or by
/// the `u128` form gives the same order, so values generated at increasing
/// timestamps stay sorted in every representation.
///
/// ```
/// use ulid::Ulid;
///
/// let ulid: Ulid = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
/// assert_eq!(ulid.to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
/// assert_eq!(ulid.milliseconds(), 1469922850259);
/// assert_eq!(ulid.hex(), "01563e3ab5d3d6764c61efb99302bd5b");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ulid([u8; BYTES_LEN]);

/// Input shapes accepted by the best-effort [`Ulid::parse`] entry point.
#[derive(Debug, Clone, Copy)]
pub enum UlidSource<'a> {
    Ulid(Ulid),
    Uuid(Uuid),
    Str(&'a str),
    Int(u128),
    Float(f64),
    Datetime(DateTime<Utc>),
    Bytes(&'a [u8]),
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl Ulid {
    /// Generate a ULID from the current system time and fresh randomness.
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self::from_parts(millis, Self::fresh_randomness())
    }

    /// Build from exactly 16 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UlidError> {
        let bytes: [u8; BYTES_LEN] = bytes
            .try_into()
            .map_err(|_| UlidError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Build from a 32-character hex string (case-insensitive, no prefix).
    pub fn from_hex(value: &str) -> Result<Self, UlidError> {
        let mut bytes = [0u8; BYTES_LEN];
        hex::decode_to_slice(value, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Build from epoch milliseconds plus fresh randomness.
    ///
    /// Fails when `millis` exceeds 2^48 - 1 (shortly before the year 10890).
    pub fn from_timestamp_ms(millis: u64) -> Result<Self, UlidError> {
        if millis > MAX_TIMESTAMP_MS {
            return Err(UlidError::TimestampOutOfRange(millis as f64));
        }
        Ok(Self::from_parts(millis, Self::fresh_randomness()))
    }

    /// Build from epoch seconds plus fresh randomness.
    ///
    /// The value is converted to whole milliseconds by truncation, the way
    /// `time.time()`-style float timestamps are usually consumed.
    pub fn from_timestamp(seconds: f64) -> Result<Self, UlidError> {
        let millis = seconds * 1000.0;
        if !(0.0..=MAX_TIMESTAMP_MS as f64).contains(&millis) {
            return Err(UlidError::TimestampOutOfRange(millis));
        }
        Self::from_timestamp_ms(millis as u64)
    }

    /// Build from a datetime in any timezone plus fresh randomness.
    ///
    /// The instant is converted to UTC epoch milliseconds.  Pre-epoch
    /// datetimes are rejected.
    pub fn from_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Result<Self, UlidError> {
        let millis = datetime.timestamp_millis();
        if millis < 0 {
            return Err(UlidError::TimestampOutOfRange(millis as f64));
        }
        Self::from_timestamp_ms(millis as u64)
    }

    /// Reinterpret a UUID's 16 bytes as a ULID.
    ///
    /// The timestamp segment is whatever bits the UUID happened to carry,
    /// so [`milliseconds`](Self::milliseconds) and friends may report
    /// nonsense.  The bytes themselves round-trip exactly.
    pub fn from_uuid(value: Uuid) -> Self {
        Self(*value.as_bytes())
    }

    /// Best-effort construction from a value whose shape is only known at
    /// run time.  Prefer the typed constructors whenever the input shape is
    /// statically known.
    ///
    /// Strings are dispatched on length: 36 or 32 characters take the UUID
    /// route, 26 the base32 route.  Integers with exactly 13 decimal digits
    /// are treated as millisecond timestamps, all others as raw 128-bit
    /// values.
    ///
    /// ```
    /// use ulid::{Ulid, UlidSource};
    ///
    /// let ulid = Ulid::parse(UlidSource::Int(1469922850259)).unwrap();
    /// assert_eq!(ulid.milliseconds(), 1469922850259);
    /// ```
    pub fn parse(value: UlidSource<'_>) -> Result<Self, UlidError> {
        match value {
            UlidSource::Ulid(ulid) => Ok(ulid),
            UlidSource::Uuid(uuid) => Ok(Self::from_uuid(uuid)),
            UlidSource::Str(s) => match s.chars().count() {
                36 | 32 => Ok(Self::from_uuid(Uuid::parse_str(s)?)),
                26 => s.parse(),
                n => Err(UlidError::UnparsableString(n)),
            },
            UlidSource::Int(value) => {
                // 13 decimal digits read as a millisecond timestamp, which
                // covers clock values between 2001 and 2286.
                if (1_000_000_000_000..10_000_000_000_000).contains(&value) {
                    Self::from_timestamp_ms(value as u64)
                } else {
                    Ok(Self::from(value))
                }
            }
            UlidSource::Float(seconds) => Self::from_timestamp(seconds),
            UlidSource::Datetime(datetime) => Self::from_datetime(datetime),
            UlidSource::Bytes(bytes) => Self::from_bytes(bytes),
        }
    }

    fn from_parts(millis: u64, randomness: [u8; RANDOMNESS_LEN]) -> Self {
        let mut bytes = [0u8; BYTES_LEN];
        // write_uint requires the value to fit in 6 bytes.
        BigEndian::write_uint(
            &mut bytes[..TIMESTAMP_LEN],
            millis & MAX_TIMESTAMP_MS,
            TIMESTAMP_LEN,
        );
        bytes[TIMESTAMP_LEN..].copy_from_slice(&randomness);
        Self(bytes)
    }

    fn fresh_randomness() -> [u8; RANDOMNESS_LEN] {
        let mut randomness = [0u8; RANDOMNESS_LEN];
        rand::thread_rng().fill_bytes(&mut randomness);
        randomness
    }
}

// ── Accessors ────────────────────────────────────────────────────────────────

impl Ulid {
    /// The timestamp part as epoch milliseconds.
    pub fn milliseconds(&self) -> u64 {
        BigEndian::read_uint(&self.0[..TIMESTAMP_LEN], TIMESTAMP_LEN)
    }

    /// The timestamp part as epoch seconds.
    pub fn timestamp(&self) -> f64 {
        self.milliseconds() as f64 / 1000.0
    }

    /// The timestamp part as a UTC datetime with millisecond precision.
    pub fn datetime(&self) -> DateTime<Utc> {
        // 48-bit millisecond values are always inside chrono's range.
        DateTime::from_timestamp_millis(self.milliseconds() as i64)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Lowercase hex encoding of all 16 bytes.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw bytes, copied out.
    pub fn to_bytes(&self) -> [u8; BYTES_LEN] {
        self.0
    }

    /// The raw bytes, borrowed.
    pub fn as_bytes(&self) -> &[u8; BYTES_LEN] {
        &self.0
    }

    /// Big-endian 128-bit integer form.
    pub fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Byte-identical UUID view; converting back yields the same ULID.
    ///
    /// ```
    /// use ulid::Ulid;
    ///
    /// let ulid: Ulid = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
    /// assert_eq!(
    ///     ulid.to_uuid().to_string(),
    ///     "01563e3a-b5d3-d676-4c61-efb99302bd5b",
    /// );
    /// assert_eq!(Ulid::from_uuid(ulid.to_uuid()), ulid);
    /// ```
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }

    /// UUID view with the RFC 4122 version-4 and variant bits forced on.
    ///
    /// This conversion is destructive: the marker bits overwrite parts of
    /// the original byte sequence, so the returned UUID cannot be converted
    /// back to this ULID.  Use [`to_uuid`](Self::to_uuid) when the value
    /// must round-trip.
    pub fn to_uuid4(&self) -> Uuid {
        Builder::from_bytes(self.0)
            .with_variant(Variant::RFC4122)
            .with_version(Version::Random)
            .into_uuid()
    }
}

impl Default for Ulid {
    /// Equivalent to [`Ulid::new`].
    fn default() -> Self {
        Self::new()
    }
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl From<[u8; BYTES_LEN]> for Ulid {
    fn from(bytes: [u8; BYTES_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<u128> for Ulid {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<Uuid> for Ulid {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl From<Ulid> for u128 {
    fn from(ulid: Ulid) -> Self {
        ulid.to_u128()
    }
}

impl From<Ulid> for [u8; BYTES_LEN] {
    fn from(ulid: Ulid) -> Self {
        ulid.0
    }
}

impl From<Ulid> for Uuid {
    fn from(ulid: Ulid) -> Self {
        ulid.to_uuid()
    }
}

impl From<Ulid> for String {
    fn from(ulid: Ulid) -> Self {
        ulid.to_string()
    }
}

impl AsRef<[u8]> for Ulid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Ulid {
    type Err = UlidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(base32::decode(s)?))
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Encoding a fixed 16-byte value cannot fail.
        let encoded = base32::encode(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ulid({self})")
    }
}

// ── Heterogeneous comparisons ────────────────────────────────────────────────
//
// A ULID compares with its own integer, byte and string forms.  Each
// direction converts through the matching accessor so that all orderings
// stay consistent with `Ord` on the raw bytes.

impl PartialEq<u128> for Ulid {
    fn eq(&self, other: &u128) -> bool {
        self.to_u128() == *other
    }
}

impl PartialEq<Ulid> for u128 {
    fn eq(&self, other: &Ulid) -> bool {
        *self == other.to_u128()
    }
}

impl PartialOrd<u128> for Ulid {
    fn partial_cmp(&self, other: &u128) -> Option<Ordering> {
        self.to_u128().partial_cmp(other)
    }
}

impl PartialOrd<Ulid> for u128 {
    fn partial_cmp(&self, other: &Ulid) -> Option<Ordering> {
        self.partial_cmp(&other.to_u128())
    }
}

impl PartialEq<[u8; BYTES_LEN]> for Ulid {
    fn eq(&self, other: &[u8; BYTES_LEN]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<Ulid> for [u8; BYTES_LEN] {
    fn eq(&self, other: &Ulid) -> bool {
        self == &other.0
    }
}

impl PartialOrd<[u8; BYTES_LEN]> for Ulid {
    fn partial_cmp(&self, other: &[u8; BYTES_LEN]) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl PartialOrd<Ulid> for [u8; BYTES_LEN] {
    fn partial_cmp(&self, other: &Ulid) -> Option<Ordering> {
        self.partial_cmp(&other.0)
    }
}

impl PartialEq<[u8]> for Ulid {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.as_slice() == other
    }
}

impl PartialEq<Ulid> for [u8] {
    fn eq(&self, other: &Ulid) -> bool {
        self == other.0.as_slice()
    }
}

impl PartialOrd<[u8]> for Ulid {
    fn partial_cmp(&self, other: &[u8]) -> Option<Ordering> {
        self.0.as_slice().partial_cmp(other)
    }
}

impl PartialOrd<Ulid> for [u8] {
    fn partial_cmp(&self, other: &Ulid) -> Option<Ordering> {
        self.partial_cmp(other.0.as_slice())
    }
}

impl PartialEq<str> for Ulid {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<Ulid> for str {
    fn eq(&self, other: &Ulid) -> bool {
        self == other.to_string().as_str()
    }
}

impl PartialEq<&str> for Ulid {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<Ulid> for &str {
    fn eq(&self, other: &Ulid) -> bool {
        other == *self
    }
}

impl PartialOrd<str> for Ulid {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        self.to_string().as_str().partial_cmp(other)
    }
}

impl PartialOrd<Ulid> for str {
    fn partial_cmp(&self, other: &Ulid) -> Option<Ordering> {
        self.partial_cmp(other.to_string().as_str())
    }
}

impl PartialOrd<&str> for Ulid {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.partial_cmp(*other)
    }
}

impl PartialOrd<Ulid> for &str {
    fn partial_cmp(&self, other: &Ulid) -> Option<Ordering> {
        (**self).partial_cmp(other)
    }
}

// ── Serde ────────────────────────────────────────────────────────────────────

impl Serialize for Ulid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(UlidVisitor)
        } else {
            deserializer.deserialize_bytes(UlidVisitor)
        }
    }
}

struct UlidVisitor;

impl<'de> Visitor<'de> for UlidVisitor {
    type Value = Ulid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 26-character base32 string or 16 raw bytes")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
        match value.len() {
            BYTES_LEN => Ulid::from_bytes(value).map_err(E::custom),
            // Some binary formats hand the text form over as bytes.
            REPR_LEN => match std::str::from_utf8(value) {
                Ok(s) => s.parse().map_err(E::custom),
                Err(_) => Err(E::invalid_value(de::Unexpected::Bytes(value), &self)),
            },
            n => Err(E::invalid_length(n, &self)),
        }
    }
}
