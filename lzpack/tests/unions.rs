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

//! Integration tests for tagged unions.
//!
//! These tests verify that union variants keep their identity through every
//! entry point, including when one union family is nested inside another.

use bytes::Bytes;
use lzpack::resolver::{Resolver, is_union};
use lzpack::serialization::{DeserializationError, Union};
use lzpack::switcher;
use lzpack::{ByteSequence, Codec};

#[derive(Debug, Clone, PartialEq, Codec)]
#[lzpack(union)]
enum Inner {
    #[lzpack(tag = 1)]
    First(u8),
    #[lzpack(tag = 2)]
    Second { a: i64, b: i64 },
    #[lzpack(tag = 3)]
    Third { items: Vec<u16>, note: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Codec)]
#[lzpack(union)]
enum Outer {
    #[lzpack(tag = 1)]
    V1 { value: u32 },
    #[lzpack(tag = 2)]
    V2(String),
    #[lzpack(tag = 3)]
    V3,
    #[lzpack(tag = 4)]
    V4 { value: u32 },
    #[lzpack(tag = 5)]
    V5(String),
    #[lzpack(tag = 6)]
    V6,
    #[lzpack(tag = 7)]
    V7 { value: u32 },
    #[lzpack(tag = 8)]
    V8(String),
    #[lzpack(tag = 9)]
    V9,
    #[lzpack(tag = 10)]
    V10 { value: u32 },
    #[lzpack(tag = 11)]
    V11(String),
    #[lzpack(tag = 12)]
    V12,
    #[lzpack(tag = 13)]
    V13 { value: u32 },
    #[lzpack(tag = 14)]
    V14(String),
    #[lzpack(tag = 15)]
    V15,
    #[lzpack(tag = 16)]
    V16 { value: u32 },
    #[lzpack(tag = 17)]
    V17(String),
    #[lzpack(tag = 18)]
    V18,
    #[lzpack(tag = 19)]
    V19 { value: u32 },
    #[lzpack(tag = 20)]
    V20(String),
    #[lzpack(tag = 21)]
    V21,
    #[lzpack(tag = 22)]
    V22 { value: u32 },
    #[lzpack(tag = 23)]
    V23(String),
    #[lzpack(tag = 24)]
    V24,
    #[lzpack(tag = 25)]
    V25 { name: String, nested: Inner },
}

/// A plain record that reaches a union through a collection.
#[derive(Debug, Clone, PartialEq, Codec)]
struct Envelope {
    id: u64,
    body: Option<Vec<Outer>>,
}

fn nested() -> Outer {
    Outer::V25 {
        name: "outer".into(),
        nested: Inner::Third {
            items: vec![1, 2, 3],
            note: Some("inner".into()),
        },
    }
}

fn segmented(bytes: &[u8], chunk: usize) -> ByteSequence {
    bytes.chunks(chunk).map(Bytes::copy_from_slice).collect()
}

#[test]
fn test_declares_twenty_five_variants() {
    assert_eq!(Outer::VARIANTS.len(), 25);
    assert_eq!(Outer::VARIANTS[24], (25, "V25"));
    assert!(is_union::<Outer>().unwrap());
    assert!(is_union::<Inner>().unwrap());
}

#[test]
fn test_nested_variant_identity_survives() {
    let value = nested();
    let bytes = switcher::serialize(&value).unwrap();
    let back: Outer = switcher::deserialize(&bytes).unwrap();
    assert_eq!(back.discriminator(), 25);
    match &back {
        Outer::V25 { nested, .. } => {
            assert_eq!(nested.discriminator(), 3);
            assert_eq!(nested.variant_name(), "Third");
        }
        other => panic!("unexpected variant {}", other.variant_name()),
    }
    assert_eq!(back, value);
}

#[test]
fn test_every_representation() {
    let value = nested();

    let bytes = switcher::serialize_to_bytes(&value).unwrap();
    assert_eq!(switcher::deserialize_bytes::<Outer>(&bytes).unwrap(), value);

    let memory = switcher::serialize_to_memory(&value).unwrap();
    assert_eq!(switcher::deserialize_memory::<Outer>(&memory).unwrap(), value);

    let segment = switcher::serialize_to_segment(&value).unwrap();
    assert_eq!(switcher::deserialize_segment::<Outer>(&segment).unwrap(), value);

    let sequence = switcher::serialize_to_sequence(&value).unwrap();
    assert_eq!(switcher::deserialize_sequence::<Outer>(&sequence).unwrap(), value);

    let (frame, original_len) = switcher::serialize_with_lz4(&value).unwrap();
    assert_eq!(switcher::deserialize_with_lz4::<Outer>(&frame, original_len).unwrap(), value);
}

#[test]
fn test_segmented_union_source() {
    let value = nested();
    let encoded = switcher::serialize(&value).unwrap();
    for chunk in [1, 5, 16] {
        let sequence = segmented(&encoded, chunk);
        assert_eq!(switcher::deserialize_sequence::<Outer>(&sequence).unwrap(), value);
    }
}

#[test]
fn test_all_variants_round_trip() {
    let mut values = Vec::new();
    for tag in 1..=24u32 {
        let bytes = match tag % 3 {
            1 => {
                let mut encoded = switcher::serialize(&tag).unwrap();
                let mut framed = vec![tag as u8];
                framed.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
                framed.append(&mut encoded);
                framed
            }
            2 => {
                let mut encoded = switcher::serialize(&format!("v{tag}")).unwrap();
                let mut framed = vec![tag as u8];
                framed.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
                framed.append(&mut encoded);
                framed
            }
            _ => vec![tag as u8, 0, 0, 0, 0],
        };
        let value: Outer = switcher::deserialize(&bytes).unwrap();
        assert_eq!(value.discriminator(), tag);
        assert_eq!(switcher::serialize(&value).unwrap(), bytes);
        values.push(value);
    }
    values.push(nested());

    let bytes = switcher::serialize(&values).unwrap();
    assert_eq!(switcher::deserialize::<Vec<Outer>>(&bytes).unwrap(), values);
}

#[test]
fn test_union_inside_plain_record() {
    assert!(is_union::<Envelope>().unwrap());

    let envelope = Envelope {
        id: 9,
        body: Some(vec![Outer::V3, nested(), Outer::V2("two".into())]),
    };
    let bytes = switcher::serialize(&envelope).unwrap();
    assert_eq!(switcher::deserialize::<Envelope>(&bytes).unwrap(), envelope);

    let empty = Envelope { id: 1, body: None };
    let bytes = switcher::serialize(&empty).unwrap();
    assert_eq!(switcher::deserialize::<Envelope>(&bytes).unwrap(), empty);
}

#[test]
fn test_nested_discriminator_out_of_range() {
    let mut bytes = switcher::serialize(&nested()).unwrap();
    // Outer header (5) + name (1 + 5) puts the inner tag at index 11.
    assert_eq!(bytes[11], 3);
    bytes[11] = 9;
    let err = switcher::deserialize::<Outer>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::InvalidDiscriminator { type_name: "Inner", tag: 9 }
    ));
}

#[test]
fn test_payload_longer_than_input() {
    let bytes = [3u8, 0xFF, 0, 0, 0];
    let err = switcher::deserialize::<Outer>(&bytes).unwrap_err();
    assert!(matches!(err, DeserializationError::UnexpectedEof { .. }));
}

#[test]
fn test_classification_is_memoized() {
    let resolver = Resolver::new();
    assert!(resolver.is_empty());
    assert!(resolver.is_union_type::<Envelope>().unwrap());
    assert!(resolver.is_union_type::<Envelope>().unwrap());
    assert_eq!(resolver.len(), 1);
}
