//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for round trips through every buffer representation.
//!
//! These tests verify that a derived record survives serialization through
//! owned arrays, shared bytes, mutable memory, array segments, segmented
//! sequences and compressed frames.

use std::sync::Arc;

use bytes::Bytes;
use lzpack::serialization::{DeserializationError, DeserializeOptions, SerializationError};
use lzpack::switcher;
use lzpack::{ArraySegment, ByteSequence, Codec, DateTimeKind, Timestamp};

#[derive(Debug, Clone, PartialEq, Codec)]
struct Reading {
    flag: bool,
    count: i32,
    ratio: f64,
    when: Timestamp,
    label: Option<String>,
}

fn reading(label: Option<&str>) -> Reading {
    Reading {
        flag: true,
        count: 25,
        ratio: 4.5,
        when: Timestamp::from_ymd_hms(2021, 5, 1, 5, 8, 7, DateTimeKind::Local).unwrap(),
        label: label.map(String::from),
    }
}

fn variants() -> [Reading; 3] {
    [reading(Some("test")), reading(Some("")), reading(None)]
}

/// Splits `bytes` into a sequence of `chunk`-sized segments.
fn segmented(bytes: &[u8], chunk: usize) -> ByteSequence {
    bytes.chunks(chunk).map(Bytes::copy_from_slice).collect()
}

#[test]
fn test_owned_array_round_trip() {
    for value in variants() {
        let bytes = switcher::serialize(&value).unwrap();
        let back: Reading = switcher::deserialize(&bytes).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_shared_bytes_round_trip() {
    for value in variants() {
        let bytes = switcher::serialize_to_bytes(&value).unwrap();
        let back = switcher::deserialize_bytes::<Reading>(&bytes).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_memory_round_trip() {
    for value in variants() {
        let memory = switcher::serialize_to_memory(&value).unwrap();
        let back = switcher::deserialize_memory::<Reading>(&memory).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_segment_round_trip() {
    for value in variants() {
        let segment = switcher::serialize_to_segment(&value).unwrap();
        let back = switcher::deserialize_segment::<Reading>(&segment).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_segment_with_offset() {
    let value = reading(Some("test"));
    let encoded = switcher::serialize(&value).unwrap();
    let mut padded = vec![0xEE; 3];
    padded.extend_from_slice(&encoded);
    padded.extend_from_slice(&[0xEE; 5]);

    let segment = ArraySegment::new(Arc::from(padded), 3, encoded.len()).unwrap();
    assert_eq!(switcher::deserialize_segment::<Reading>(&segment).unwrap(), value);
}

#[test]
fn test_sequence_round_trip() {
    for value in variants() {
        let sequence = switcher::serialize_to_sequence(&value).unwrap();
        let back = switcher::deserialize_sequence::<Reading>(&sequence).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_segmented_sequence_is_read_in_place() {
    let value = reading(Some("segmented label that spans several chunks"));
    let encoded = switcher::serialize(&value).unwrap();
    for chunk in [1, 2, 3, 7, 64] {
        let sequence = segmented(&encoded, chunk);
        assert_eq!(switcher::deserialize_sequence::<Reading>(&sequence).unwrap(), value);
    }
}

#[test]
fn test_lz4_round_trip() {
    for value in variants() {
        let (frame, original_len) = switcher::serialize_with_lz4(&value).unwrap();
        let back: Reading = switcher::deserialize_with_lz4(&frame, original_len).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.when.kind(), DateTimeKind::Local);
    }
}

#[test]
fn test_lz4_round_trip_of_large_collection() {
    let values: Vec<Reading> = (0..500).map(|_| reading(Some("repeated"))).collect();
    let (frame, original_len) = switcher::serialize_with_lz4(&values).unwrap();
    assert_eq!(frame[0], lzpack::serialization::FLAG_LZ4);
    assert!(frame.len() < original_len);
    let back: Vec<Reading> = switcher::deserialize_with_lz4(&frame, original_len).unwrap();
    assert_eq!(back, values);
}

#[test]
fn test_utc_normalization() {
    let value = reading(Some("test"));
    let bytes = switcher::serialize(&value).unwrap();

    let plain: Reading = switcher::deserialize(&bytes).unwrap();
    assert_eq!(plain.when.kind(), DateTimeKind::Local);

    let utc: Reading = switcher::deserialize_in_utc(&bytes).unwrap();
    assert_eq!(utc.when.kind(), DateTimeKind::Utc);
    assert_eq!(utc.when.ticks(), value.when.ticks());

    let sequence = segmented(&bytes, 4);
    let utc: Reading = switcher::deserialize_sequence_in_utc(&sequence).unwrap();
    assert_eq!(utc.when.kind(), DateTimeKind::Utc);

    let (frame, original_len) = switcher::serialize_with_lz4(&value).unwrap();
    let utc: Reading = switcher::deserialize_in_utc_with_lz4(&frame, original_len).unwrap();
    assert_eq!(utc.when.kind(), DateTimeKind::Utc);
}

#[test]
fn test_explicit_kind_option() {
    let bytes = switcher::serialize(&reading(None)).unwrap();
    let options = DeserializeOptions::default().with_date_time_kind(DateTimeKind::Unspecified);
    let back: Reading = switcher::deserialize_with(&bytes, &options).unwrap();
    assert_eq!(back.when.kind(), DateTimeKind::Unspecified);
}

#[test]
fn test_range_view() {
    let value = reading(Some("test"));
    let encoded = switcher::serialize(&value).unwrap();
    let mut padded = vec![0u8; 2];
    padded.extend_from_slice(&encoded);

    let back: Reading = switcher::deserialize_range(&padded, 2, encoded.len()).unwrap();
    assert_eq!(back, value);

    let err = switcher::deserialize_range::<Reading>(&padded, 2, padded.len()).unwrap_err();
    assert!(matches!(err, DeserializationError::InvalidRange { .. }));
}

#[test]
fn test_truncated_input_fails() {
    let encoded = switcher::serialize(&reading(Some("test"))).unwrap();
    for len in 0..encoded.len() {
        assert!(switcher::deserialize::<Reading>(&encoded[..len]).is_err());
    }
}

#[test]
fn test_raw_buffers_pass_through() {
    let payload = vec![1u8, 2, 3, 4];
    let shared: Bytes = switcher::serialize_to_bytes(&Bytes::from(payload.clone())).unwrap();
    assert_eq!(&shared[..], &payload[..]);

    let back: Vec<u8> = switcher::deserialize(&payload).unwrap();
    assert_eq!(back, payload);

    let missing: Option<Bytes> = None;
    assert!(matches!(
        switcher::serialize(&missing),
        Err(SerializationError::ValueRequired { .. })
    ));
    assert!(matches!(
        switcher::deserialize_nullable::<Reading>(None),
        Err(DeserializationError::ValueRequired { .. })
    ));
}
