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

//! Compressed-frame entry points.
//!
//! A frame is one flag byte followed by either the plain encoding (flag `0`)
//! or one LZ4 block of it (any other flag). The plain length travels beside
//! the frame and sizes the decoder's output.

use super::raw::RawBuffer;
use super::{decode, encode};
use crate::lz4;
use crate::serialization::{
    BufferPool, Codec, CompressionOptions, DeserializationError, DeserializeOptions, FLAG_STORED,
    SerializationError,
};

/// Largest plain length a block of `compressed` bytes can expand to.
fn max_expansion(compressed: usize) -> usize {
    compressed.saturating_mul(255).saturating_add(lz4::MFLIMIT)
}

/// Serializes `value` into a compressed frame with default options.
///
/// Returns the frame and the plain length, which
/// [`deserialize_with_lz4`] needs.
pub fn serialize_with_lz4<T: Codec>(value: &T) -> Result<(Vec<u8>, usize), SerializationError> {
    serialize_with_lz4_options(value, &CompressionOptions::default())
}

/// Serializes `value` into a compressed frame.
///
/// Payloads shorter than `options.min_compress_size`, and payloads that do not
/// shrink, are stored with flag `0`.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::CompressionOptions;
/// use lzpack::switcher;
///
/// let text = "the quick brown fox ".repeat(50);
/// let (frame, original) =
///     switcher::serialize_with_lz4_options(&text, &CompressionOptions::high(12)).unwrap();
/// assert!(frame.len() < original);
/// let decoded: String = switcher::deserialize_with_lz4(&frame, original).unwrap();
/// assert_eq!(decoded, text);
/// ```
pub fn serialize_with_lz4_options<T: Codec>(
    value: &T,
    options: &CompressionOptions,
) -> Result<(Vec<u8>, usize), SerializationError> {
    let mut writer = encode(value, true)?;
    let original = writer.compress_lz4(options)?;
    Ok((writer.into_vec(), original))
}

/// Deserializes a `T` from a compressed frame.
pub fn deserialize_with_lz4<T: Codec>(
    frame: &[u8],
    original_len: usize,
) -> Result<T, DeserializationError> {
    deserialize_with_lz4_options(frame, original_len, None)
}

/// Deserializes a `T` from a compressed frame with every timestamp forced
/// to UTC.
pub fn deserialize_in_utc_with_lz4<T: Codec>(
    frame: &[u8],
    original_len: usize,
) -> Result<T, DeserializationError> {
    deserialize_with_lz4_options(frame, original_len, Some(&DeserializeOptions::utc()))
}

/// Deserializes a `T` from a compressed frame under `options`.
///
/// # Errors
///
/// - [`DeserializationError::UnexpectedEof`] for an empty frame
/// - [`DeserializationError::LengthMismatch`] when a stored body or a
///   decompressed block disagrees with `original_len`
/// - [`DeserializationError::Compression`] for a corrupt block
pub fn deserialize_with_lz4_options<T: Codec>(
    frame: &[u8],
    original_len: usize,
    options: Option<&DeserializeOptions>,
) -> Result<T, DeserializationError> {
    let (&flag, body) = frame
        .split_first()
        .ok_or(DeserializationError::UnexpectedEof {
            needed: 1,
            remaining: 0,
        })?;

    if flag == FLAG_STORED {
        if body.len() != original_len {
            return Err(DeserializationError::LengthMismatch {
                what: "stored frame",
                expected: original_len,
                actual: body.len(),
            });
        }
        return decode(RawBuffer::Slice(body), options);
    }

    if original_len > max_expansion(body.len()) {
        return Err(DeserializationError::LengthMismatch {
            what: "lz4 frame",
            expected: original_len,
            actual: max_expansion(body.len()),
        });
    }
    let mut plain = BufferPool::rent(original_len);
    plain.resize(original_len);
    lz4::decompress_exact(body, &mut plain)?;
    decode(RawBuffer::Slice(&plain), options)
}
