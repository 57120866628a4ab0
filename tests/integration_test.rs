use std::cmp::Ordering;

use serde::de::value::{BytesDeserializer, Error as ValueError, StrDeserializer};
use serde::{Deserialize, Serialize};
use ulid::{base32, Ulid, UlidError, UlidSource};

const SAMPLE: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";
const SAMPLE_HEX: &str = "01563e3ab5d3d6764c61efb99302bd5b";
const SAMPLE_INT: u128 = 1777027686520646174104517696511196507;
const SAMPLE_MS: u64 = 1_469_922_850_259;

#[test]
fn test_length_invariants() {
    let ulid = Ulid::new();
    assert_eq!(ulid.to_bytes().len(), 16);
    assert_eq!(ulid.as_bytes().len(), 16);

    let text = ulid.to_string();
    assert_eq!(text.len(), 26);
    assert!(text.bytes().all(|b| base32::ENCODE.contains(&b)));
}

#[test]
fn test_constructor_equivalence() {
    let ulid = Ulid::new();

    assert_eq!(Ulid::from_bytes(&ulid.to_bytes()).unwrap(), ulid);
    assert_eq!(ulid.to_string().parse::<Ulid>().unwrap(), ulid);
    assert_eq!(Ulid::from_hex(&ulid.hex()).unwrap(), ulid);
    assert_eq!(Ulid::from(ulid.to_u128()), ulid);
    assert_eq!(Ulid::from(ulid.to_bytes()), ulid);
    assert_eq!(Ulid::from_uuid(ulid.to_uuid()), ulid);
    assert_eq!(Ulid::from(ulid.to_uuid()), ulid);
}

#[test]
fn test_known_value_projections() {
    let ulid: Ulid = SAMPLE.parse().unwrap();

    assert_eq!(ulid.hex(), SAMPLE_HEX);
    assert_eq!(ulid.to_u128(), SAMPLE_INT);
    assert_eq!(u128::from(ulid), SAMPLE_INT);
    assert_eq!(ulid.milliseconds(), SAMPLE_MS);
    assert_eq!(ulid.timestamp(), 1_469_922_850.259);
    assert_eq!(ulid.to_uuid().to_string(), "01563e3a-b5d3-d676-4c61-efb99302bd5b");
    assert_eq!(ulid.datetime().to_rfc3339(), "2016-07-30T23:54:10.259+00:00");
    assert_eq!(String::from(ulid), SAMPLE);
}

#[test]
fn test_boundary_values() {
    let min = Ulid::from([0u8; 16]);
    assert_eq!(min.to_string(), "0".repeat(26));
    assert_eq!(min.to_u128(), 0);
    assert_eq!(min.milliseconds(), 0);

    let max = Ulid::from([0xFF; 16]);
    assert_eq!(max.to_string(), format!("7{}", "Z".repeat(25)));
    assert_eq!(max.to_u128(), u128::MAX);
    assert_eq!(max.milliseconds(), (1 << 48) - 1);

    assert_eq!("0".repeat(26).parse::<Ulid>().unwrap(), min);
    assert_eq!(format!("7{}", "Z".repeat(25)).parse::<Ulid>().unwrap(), max);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    assert!(Ulid::from_bytes(&[0u8; 15]).is_err());
    assert!(Ulid::from_bytes(&[0u8; 17]).is_err());
    assert!("A".repeat(25).parse::<Ulid>().is_err());
    assert!("A".repeat(27).parse::<Ulid>().is_err());
    assert!("I".repeat(26).parse::<Ulid>().is_err());
    assert!(SAMPLE.to_lowercase().parse::<Ulid>().is_err());
    assert!(format!("8{}", "0".repeat(25)).parse::<Ulid>().is_err());
}

#[test]
fn test_monotonic_generation_order_isomorphism() {
    let base_ms = 1_469_922_850_000u64;
    for step_secs in [1u64, 60, 3_600, 86_400] {
        let ulids: Vec<Ulid> = (0..10)
            .map(|i| Ulid::from_timestamp_ms(base_ms + i * step_secs * 1_000).unwrap())
            .collect();

        for pair in ulids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a < b);
            assert!(a.to_bytes() < b.to_bytes());
            assert!(a.to_string() < b.to_string());
            assert!(a.to_u128() < b.to_u128());
        }
    }
}

#[test]
fn test_order_agrees_across_representations() {
    let mut ulids: Vec<Ulid> = (0..64).map(|_| Ulid::new()).collect();
    ulids.push(Ulid::from([0u8; 16]));
    ulids.push(Ulid::from([0xFF; 16]));

    for a in &ulids {
        for b in &ulids {
            let by_bytes = a.to_bytes().cmp(&b.to_bytes());
            assert_eq!(a.cmp(b), by_bytes);
            assert_eq!(a.to_string().cmp(&b.to_string()), by_bytes);
            assert_eq!(a.to_u128().cmp(&b.to_u128()), by_bytes);
            assert_eq!(a.partial_cmp(&b.to_u128()), Some(by_bytes));
            assert_eq!(a.partial_cmp(b.to_string().as_str()), Some(by_bytes));
        }
    }
}

#[test]
fn test_heterogeneous_equality_via_public_api() {
    let ulid: Ulid = SAMPLE.parse().unwrap();

    assert!(ulid == SAMPLE_INT);
    assert!(SAMPLE_INT == ulid);
    assert!(ulid == ulid.to_bytes());
    assert!(ulid == SAMPLE);
    assert!(ulid != SAMPLE_INT + 1);
    assert!(ulid != [0u8; 16]);
    assert!(ulid != "0ZZZZZZZZZZZZZZZZZZZZZZZZZ");

    // Unequal lengths compare lexicographically, never error.
    let bytes = ulid.to_bytes();
    let prefix: &[u8] = &bytes[..4];
    assert!(ulid != *prefix);
    assert_eq!(ulid.partial_cmp(prefix), Some(Ordering::Greater));
}

#[test]
fn test_uuid4_conversion_is_destructive() {
    let ulid = Ulid::from([0u8; 16]);
    let uuid4 = ulid.to_uuid4();

    assert_eq!(uuid4.get_version_num(), 4);
    assert_ne!(uuid4.as_bytes(), ulid.as_bytes());
    assert_ne!(Ulid::from_uuid(uuid4), ulid);

    // The non-destructive sibling round-trips.
    assert_eq!(Ulid::from_uuid(ulid.to_uuid()), ulid);
}

#[test]
fn test_parse_accepts_every_source_shape() {
    let ulid: Ulid = SAMPLE.parse().unwrap();

    assert_eq!(Ulid::parse(UlidSource::Ulid(ulid)).unwrap(), ulid);
    assert_eq!(Ulid::parse(UlidSource::Uuid(ulid.to_uuid())).unwrap(), ulid);
    assert_eq!(Ulid::parse(UlidSource::Str(SAMPLE)).unwrap(), ulid);
    assert_eq!(Ulid::parse(UlidSource::Str(SAMPLE_HEX)).unwrap(), ulid);
    assert_eq!(Ulid::parse(UlidSource::Bytes(ulid.as_bytes())).unwrap(), ulid);
    assert_eq!(Ulid::parse(UlidSource::Int(SAMPLE_INT)).unwrap(), ulid);

    let from_float = Ulid::parse(UlidSource::Float(1_469_922_850.259)).unwrap();
    assert_eq!(from_float.milliseconds(), SAMPLE_MS);

    let from_datetime = Ulid::parse(UlidSource::Datetime(ulid.datetime())).unwrap();
    assert_eq!(from_datetime.milliseconds(), SAMPLE_MS);

    // Millisecond heuristic: 13-digit integers are clock values.
    let from_ms = Ulid::parse(UlidSource::Int(u128::from(SAMPLE_MS))).unwrap();
    assert_eq!(from_ms.milliseconds(), SAMPLE_MS);
    assert_ne!(from_ms, ulid);

    assert!(matches!(
        Ulid::parse(UlidSource::Str("0123456789")),
        Err(UlidError::UnparsableString(10))
    ));
}

#[test]
fn test_serde_json_roundtrip() {
    let ulid: Ulid = SAMPLE.parse().unwrap();

    let json = serde_json::to_string(&ulid).unwrap();
    assert_eq!(json, format!("\"{SAMPLE}\""));

    let back: Ulid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ulid);

    assert!(serde_json::from_str::<Ulid>("\"not a ulid\"").is_err());
    assert!(serde_json::from_str::<Ulid>("42").is_err());
}

#[test]
fn test_serde_nullable_field() {
    let some: Option<Ulid> = serde_json::from_str(&format!("\"{SAMPLE}\"")).unwrap();
    assert_eq!(some.unwrap().to_string(), SAMPLE);

    let none: Option<Ulid> = serde_json::from_str("null").unwrap();
    assert!(none.is_none());
}

#[test]
fn test_serde_in_struct_fields() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        id: Ulid,
        label: String,
    }

    let record = Record {
        id: SAMPLE.parse().unwrap(),
        label: "first".to_string(),
    };

    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, format!("{{\"id\":\"{SAMPLE}\",\"label\":\"first\"}}"));

    let back: Record = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_serde_accepts_raw_bytes() {
    let ulid: Ulid = SAMPLE.parse().unwrap();

    let de: BytesDeserializer<'_, ValueError> = BytesDeserializer::new(ulid.as_bytes());
    assert_eq!(Ulid::deserialize(de).unwrap(), ulid);

    // The text form handed over as bytes is accepted too.
    let de: BytesDeserializer<'_, ValueError> = BytesDeserializer::new(SAMPLE.as_bytes());
    assert_eq!(Ulid::deserialize(de).unwrap(), ulid);

    let short = [0u8; 15];
    let de: BytesDeserializer<'_, ValueError> = BytesDeserializer::new(&short);
    assert!(Ulid::deserialize(de).is_err());

    let de: StrDeserializer<'_, ValueError> = StrDeserializer::new(SAMPLE);
    assert_eq!(Ulid::deserialize(de).unwrap(), ulid);
}

#[test]
fn test_error_kinds_are_distinguishable() {
    let length = "A".repeat(25).parse::<Ulid>().unwrap_err();
    assert!(matches!(length, UlidError::Decode(base32::Base32Error::InvalidEncodedLength { .. })));

    let alphabet = "u".repeat(26).parse::<Ulid>().unwrap_err();
    assert!(matches!(alphabet, UlidError::Decode(base32::Base32Error::InvalidChar('u'))));

    let overflow = format!("8{}", "Z".repeat(25)).parse::<Ulid>().unwrap_err();
    assert!(matches!(overflow, UlidError::Decode(base32::Base32Error::TimestampOverflow)));

    let range = Ulid::from_timestamp_ms(1 << 48).unwrap_err();
    assert!(matches!(range, UlidError::TimestampOutOfRange(_)));

    let bytes = Ulid::from_bytes(&[0u8; 3]).unwrap_err();
    assert!(matches!(bytes, UlidError::InvalidLength(3)));
}
