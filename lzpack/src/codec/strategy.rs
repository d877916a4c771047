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

//! Plain and union decode strategies.

use crate::serialization::{Codec, DeserializationError, Reader, VARIANT_HEADER_MAX};

/// How a classified type is driven through its codec.
pub trait Strategy: Send + Sync + 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Whether this strategy serves union-classified types.
    const IS_UNION: bool;

    /// Bytes added to a value's own capacity estimate.
    fn capacity_slack() -> usize;

    /// Decodes one value from `reader`.
    fn decode<T: Codec>(reader: &mut Reader<'_>) -> Result<T, DeserializationError>;
}

/// Strategy for types with no union anywhere in their shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStrategy;

impl Strategy for PlainStrategy {
    const NAME: &'static str = "plain";
    const IS_UNION: bool = false;

    fn capacity_slack() -> usize {
        0
    }

    fn decode<T: Codec>(reader: &mut Reader<'_>) -> Result<T, DeserializationError> {
        T::decode(reader)
    }
}

/// Strategy for union types and types that contain one.
///
/// Variant payloads are length-checked against the bytes they consume. The
/// reader's position spans chunk boundaries, so segmented input is decoded
/// in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionStrategy;

impl Strategy for UnionStrategy {
    const NAME: &'static str = "union";
    const IS_UNION: bool = true;

    fn capacity_slack() -> usize {
        VARIANT_HEADER_MAX
    }

    fn decode<T: Codec>(reader: &mut Reader<'_>) -> Result<T, DeserializationError> {
        T::decode(reader)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn test_union_strategy_reads_segments_in_place() {
        let chunks = [
            Bytes::from_static(&[3, b'a']),
            Bytes::from_static(&[b'b', b'c', 9]),
        ];
        let mut reader = Reader::over_sequence(&chunks);
        let value: String = UnionStrategy::decode(&mut reader).unwrap();
        assert_eq!(value, "abc");
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read_u8().unwrap(), 9);
    }

    #[test]
    fn test_union_strategy_checks_variant_length_across_chunks() {
        use crate::serialization::{Writer, decode_variant, encode_variant};

        let mut writer = Writer::new();
        encode_variant(&mut writer, 5, |w| 0x0102_0304u32.encode(w)).unwrap();
        0xAAu8.encode(&mut writer).unwrap();
        let encoded = writer.to_vec();
        let chunks: Vec<Bytes> = encoded.iter().map(|b| Bytes::copy_from_slice(&[*b])).collect();

        let mut reader = Reader::over_sequence(&chunks);
        let value = decode_variant(&mut reader, "Test", |tag, r| {
            assert_eq!(tag, 5);
            u32::decode(r)
        })
        .unwrap();
        assert_eq!(value, 0x0102_0304);
        assert_eq!(reader.read_u8().unwrap(), 0xAA);

        let mut reader = Reader::over_sequence(&chunks);
        let err = decode_variant(&mut reader, "Test", |_, r| u16::decode(r)).unwrap_err();
        assert!(matches!(err, DeserializationError::LengthMismatch { .. }));
    }

    #[test]
    fn test_union_strategy_keeps_reader_settings() {
        use crate::timestamp::{DateTimeKind, Timestamp};

        let stamp = Timestamp::from_ymd_hms(2020, 1, 2, 3, 4, 5, DateTimeKind::Local).unwrap();
        let raw = stamp.to_binary().to_le_bytes();
        let chunks = [Bytes::copy_from_slice(&raw[..3]), Bytes::copy_from_slice(&raw[3..])];
        let mut reader = Reader::over_sequence(&chunks).in_utc();
        let decoded: Timestamp = UnionStrategy::decode(&mut reader).unwrap();
        assert_eq!(decoded.kind(), DateTimeKind::Utc);
    }

    #[test]
    fn test_plain_strategy_has_no_slack() {
        assert_eq!(PlainStrategy::capacity_slack(), 0);
        assert!(UnionStrategy::capacity_slack() > 0);
        assert_ne!(PlainStrategy::NAME, UnionStrategy::NAME);
    }
}
