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

//! Serialize and deserialize entry points.
//!
//! Every call picks one of two paths:
//!
//! - **raw**: the value type is itself a buffer representation (`Vec<u8>`,
//!   [`Bytes`], [`BytesMut`], [`ArraySegment`], [`ByteSequence`], or an
//!   `Option` of one). The bytes are handed over unchanged; no codec runs.
//! - **codec**: the [`resolver`](crate::resolver) classifies the type and the
//!   matching cached [`codec`](crate::codec) instance encodes or decodes it
//!   through a [`Writer`] or [`Reader`].
//!
//! Each representation has a `serialize_*`/`deserialize_*` pair; the generic
//! [`serialize_as`] and [`deserialize_from`] accept any [`Representation`].
//! Compressed frames are produced by [`serialize_with_lz4`] and read back by
//! [`deserialize_with_lz4`].
//!
//! # Examples
//!
//! ```rust
//! use lzpack::switcher;
//!
//! # fn example() -> Result<(), lzpack::LzpackError> {
//! let value = vec![(1u8, String::from("one")), (2, String::from("two"))];
//!
//! let bytes = switcher::serialize(&value)?;
//! assert_eq!(switcher::deserialize::<Vec<(u8, String)>>(&bytes)?, value);
//!
//! let (frame, original_len) = switcher::serialize_with_lz4(&value)?;
//! let decoded: Vec<(u8, String)> = switcher::deserialize_with_lz4(&frame, original_len)?;
//! assert_eq!(decoded, value);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod lz4;
mod raw;

pub use lz4::{
    deserialize_in_utc_with_lz4, deserialize_with_lz4, deserialize_with_lz4_options,
    serialize_with_lz4, serialize_with_lz4_options,
};
pub use raw::{RawBuffer, Representation, is_raw};

use std::any::type_name;

use bytes::{Bytes, BytesMut};

use crate::buffers::{ArraySegment, ByteSequence};
use crate::codec::SelectedCodec;
use crate::serialization::{
    Codec, DeserializationError, DeserializeOptions, Reader, SerializationError, Writer,
};

/// Encodes `value` into a fresh writer sized from its capacity estimate.
pub(crate) fn encode<T: Codec>(
    value: &T,
    compressible: bool,
) -> Result<Writer, SerializationError> {
    if let Some(bytes) = raw::as_raw(value)? {
        let mut writer = if compressible {
            Writer::compressible(bytes.len())
        } else {
            Writer::with_capacity(bytes.len())
        };
        bytes.write_to(&mut writer);
        return Ok(writer);
    }

    let codec = SelectedCodec::<T>::for_type()?;
    let capacity = codec.get_capacity(value);
    let mut writer = if compressible {
        Writer::compressible(capacity)
    } else {
        Writer::with_capacity(capacity)
    };
    codec.serialize(&mut writer, value)?;
    Ok(writer)
}

/// Decodes a `T` from `raw`, taking the raw path when `T` is a buffer type.
pub(crate) fn decode<T: Codec>(
    raw: RawBuffer<'_>,
    options: Option<&DeserializeOptions>,
) -> Result<T, DeserializationError> {
    if let Some(value) = raw::from_raw::<T>(raw) {
        return Ok(value);
    }
    let codec = SelectedCodec::<T>::for_type()?;
    let mut reader: Reader<'_> = raw.reader();
    codec.deserialize(&mut reader, options)
}

/// Serializes `value` into the representation `R`.
///
/// # Errors
///
/// [`SerializationError::ValueRequired`] for `None` of a nullable buffer
/// type, and [`SerializationError::Resolve`] for a malformed union
/// declaration.
pub fn serialize_as<T: Codec, R: Representation>(value: &T) -> Result<R, SerializationError> {
    if let Some(bytes) = raw::as_raw(value)? {
        return Ok(R::from_raw(bytes));
    }
    encode(value, false).map(R::materialize)
}

/// Deserializes a `T` from the representation `R`.
pub fn deserialize_from<T: Codec, R: Representation>(
    source: &R,
    options: Option<&DeserializeOptions>,
) -> Result<T, DeserializationError> {
    decode(source.as_raw(), options)
}

/// Deserializes a `T` from `R` with every timestamp forced to UTC.
pub fn deserialize_in_utc_from<T: Codec, R: Representation>(
    source: &R,
) -> Result<T, DeserializationError> {
    decode(source.as_raw(), Some(&DeserializeOptions::utc()))
}

// Owned array.

/// Serializes `value` into a new vector.
pub fn serialize<T: Codec>(value: &T) -> Result<Vec<u8>, SerializationError> {
    serialize_as(value)
}

/// Deserializes a `T` from `bytes`.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::DeserializationError;
/// use lzpack::switcher;
///
/// let err = switcher::deserialize::<String>(&[5, b'h', b'i']).unwrap_err();
/// assert!(matches!(err, DeserializationError::UnexpectedEof { needed: 5, remaining: 2 }));
/// ```
pub fn deserialize<T: Codec>(bytes: &[u8]) -> Result<T, DeserializationError> {
    decode(RawBuffer::Slice(bytes), None)
}

/// Deserializes a `T` from `bytes` under `options`.
pub fn deserialize_with<T: Codec>(
    bytes: &[u8],
    options: &DeserializeOptions,
) -> Result<T, DeserializationError> {
    decode(RawBuffer::Slice(bytes), Some(options))
}

/// Deserializes a `T` from `bytes` with every timestamp forced to UTC.
pub fn deserialize_in_utc<T: Codec>(bytes: &[u8]) -> Result<T, DeserializationError> {
    decode(RawBuffer::Slice(bytes), Some(&DeserializeOptions::utc()))
}

/// Deserializes a `T` from the `len` bytes of `bytes` starting at `offset`.
///
/// # Errors
///
/// [`DeserializationError::InvalidRange`] when the range does not fit.
pub fn deserialize_range<T: Codec>(
    bytes: &[u8],
    offset: usize,
    len: usize,
) -> Result<T, DeserializationError> {
    let view = offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(DeserializationError::InvalidRange {
            offset,
            len,
            available: bytes.len(),
        })?;
    decode(RawBuffer::Slice(view), None)
}

/// Deserializes a `T` from a source that may be absent.
///
/// # Errors
///
/// [`DeserializationError::ValueRequired`] when `bytes` is `None`.
pub fn deserialize_nullable<T: Codec>(bytes: Option<&[u8]>) -> Result<T, DeserializationError> {
    let bytes = bytes.ok_or(DeserializationError::ValueRequired {
        type_name: type_name::<T>(),
    })?;
    deserialize(bytes)
}

// Read-only memory window.

/// Serializes `value` into a read-only window.
pub fn serialize_to_bytes<T: Codec>(value: &T) -> Result<Bytes, SerializationError> {
    serialize_as(value)
}

/// Deserializes a `T` from a read-only window.
pub fn deserialize_bytes<T: Codec>(bytes: &Bytes) -> Result<T, DeserializationError> {
    deserialize_from(bytes, None)
}

/// Deserializes a `T` from a read-only window, forcing timestamps to UTC.
pub fn deserialize_bytes_in_utc<T: Codec>(bytes: &Bytes) -> Result<T, DeserializationError> {
    deserialize_in_utc_from(bytes)
}

// Mutable memory window.

/// Serializes `value` into a mutable window.
pub fn serialize_to_memory<T: Codec>(value: &T) -> Result<BytesMut, SerializationError> {
    serialize_as(value)
}

/// Deserializes a `T` from a mutable window.
pub fn deserialize_memory<T: Codec>(memory: &BytesMut) -> Result<T, DeserializationError> {
    deserialize_from(memory, None)
}

/// Deserializes a `T` from a mutable window, forcing timestamps to UTC.
pub fn deserialize_memory_in_utc<T: Codec>(memory: &BytesMut) -> Result<T, DeserializationError> {
    deserialize_in_utc_from(memory)
}

// Bounded view over a shared array.

/// Serializes `value` into a view over a fresh shared array.
pub fn serialize_to_segment<T: Codec>(value: &T) -> Result<ArraySegment, SerializationError> {
    serialize_as(value)
}

/// Deserializes a `T` from a bounded view. An empty view of a buffer type
/// yields an empty buffer.
pub fn deserialize_segment<T: Codec>(segment: &ArraySegment) -> Result<T, DeserializationError> {
    deserialize_from(segment, None)
}

/// Deserializes a `T` from a bounded view, forcing timestamps to UTC.
pub fn deserialize_segment_in_utc<T: Codec>(
    segment: &ArraySegment,
) -> Result<T, DeserializationError> {
    deserialize_in_utc_from(segment)
}

// Possibly segmented read-only sequence.

/// Serializes `value` into a single-segment sequence.
pub fn serialize_to_sequence<T: Codec>(value: &T) -> Result<ByteSequence, SerializationError> {
    serialize_as(value)
}

/// Deserializes a `T` from a sequence without joining its segments.
pub fn deserialize_sequence<T: Codec>(sequence: &ByteSequence) -> Result<T, DeserializationError> {
    deserialize_from(sequence, None)
}

/// Deserializes a `T` from a sequence, forcing timestamps to UTC.
pub fn deserialize_sequence_in_utc<T: Codec>(
    sequence: &ByteSequence,
) -> Result<T, DeserializationError> {
    deserialize_in_utc_from(sequence)
}
