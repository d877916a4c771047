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

//! Variant framing for tagged unions.
//!
//! A union value is written as
//!
//! ```text
//! +----------------------+------------------+-------------------+
//! | discriminator varint | payload len (u32)| payload (N bytes) |
//! +----------------------+------------------+-------------------+
//! ```
//!
//! The length lets a decoder verify that the variant consumed exactly its
//! own bytes. Derived union codecs call these helpers; hand-written ones
//! may too.

use super::error::{DeserializationError, SerializationError};
use super::reader::Reader;
use super::writer::Writer;

/// Header bytes written ahead of every variant payload, at most.
pub const VARIANT_HEADER_MAX: usize = 5 + 4;

/// Writes one variant: its discriminator, then the payload produced by
/// `payload`, length-prefixed.
pub fn encode_variant<F>(
    writer: &mut Writer,
    tag: u32,
    payload: F,
) -> Result<(), SerializationError>
where
    F: FnOnce(&mut Writer) -> Result<(), SerializationError>,
{
    writer.write_varint(u64::from(tag));
    let at = writer.reserve_u32();
    let start = writer.len();
    payload(writer)?;
    let len = writer.len() - start;
    let len = u32::try_from(len).map_err(|_| SerializationError::LengthOverflow {
        what: "union payload",
        len,
        max: u32::MAX as usize,
    })?;
    writer.patch_u32(at, len);
    Ok(())
}

/// Reads one variant header and hands the discriminator to `payload`.
///
/// `payload` must decode the variant for the given tag, or return
/// [`DeserializationError::InvalidDiscriminator`] for an unknown one. The
/// bytes it consumes must equal the declared payload length.
pub fn decode_variant<T, F>(
    reader: &mut Reader<'_>,
    type_name: &'static str,
    payload: F,
) -> Result<T, DeserializationError>
where
    F: FnOnce(u32, &mut Reader<'_>) -> Result<T, DeserializationError>,
{
    let raw = reader.read_varint()?;
    let tag = u32::try_from(raw)
        .map_err(|_| DeserializationError::InvalidDiscriminator { type_name, tag: raw })?;
    let declared = reader.read_u32()? as usize;
    if declared > reader.remaining() {
        return Err(DeserializationError::UnexpectedEof {
            needed: declared,
            remaining: reader.remaining(),
        });
    }
    let start = reader.position();
    let value = payload(tag, reader)?;
    let consumed = reader.position() - start;
    if consumed != declared {
        return Err(DeserializationError::LengthMismatch {
            what: type_name,
            expected: declared,
            actual: consumed,
        });
    }
    Ok(value)
}

/// Error for a discriminator the union does not declare.
#[must_use]
pub fn unknown_variant(type_name: &'static str, tag: u32) -> DeserializationError {
    DeserializationError::InvalidDiscriminator {
        type_name,
        tag: u64::from(tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::Codec;

    fn write(tag: u32, value: u32) -> Vec<u8> {
        let mut writer = Writer::new();
        encode_variant(&mut writer, tag, |w| value.encode(w)).unwrap();
        writer.to_vec()
    }

    #[test]
    fn test_layout() {
        assert_eq!(write(3, 9), vec![3, 4, 0, 0, 0, 9, 0, 0, 0]);
        assert_eq!(&write(300, 1)[..2], &[0xAC, 0x02]);
    }

    #[test]
    fn test_round_trip() {
        let bytes = write(7, 42);
        let mut reader = Reader::new(&bytes);
        let value = decode_variant(&mut reader, "Test", |tag, r| {
            assert_eq!(tag, 7);
            u32::decode(r)
        })
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_unknown_tag_is_reported() {
        let bytes = write(99, 1);
        let err = decode_variant::<u32, _>(&mut Reader::new(&bytes), "Test", |tag, _| {
            Err(unknown_variant("Test", tag))
        })
        .unwrap_err();
        assert!(matches!(err, DeserializationError::InvalidDiscriminator { tag: 99, .. }));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_oversized_tag_is_reported() {
        let mut writer = Writer::new();
        writer.write_varint(u64::from(u32::MAX) + 1);
        writer.write_u32(0);
        let bytes = writer.to_vec();
        assert!(matches!(
            decode_variant(&mut Reader::new(&bytes), "Test", |_, _| Ok(())),
            Err(DeserializationError::InvalidDiscriminator { .. })
        ));
    }

    #[test]
    fn test_payload_length_must_match() {
        let bytes = write(1, 5);
        let err =
            decode_variant(&mut Reader::new(&bytes), "Test", |_, r| u16::decode(r)).unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::LengthMismatch { expected: 4, actual: 2, .. }
        ));

        let mut truncated = write(1, 5);
        truncated.truncate(7);
        assert!(matches!(
            decode_variant(&mut Reader::new(&truncated), "Test", |_, r| u32::decode(r)),
            Err(DeserializationError::UnexpectedEof { needed: 4, remaining: 2 })
        ));
    }
}
