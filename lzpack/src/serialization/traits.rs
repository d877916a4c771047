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

//! The per-type codec contract.
//!
//! [`Codec`] is implemented by every type that can be written to a
//! [`Writer`] and read back from a [`Reader`]. Built-in types are covered by
//! [`codecs`](super::codecs); user types normally derive it with
//! `#[derive(Codec)]`. Closed tagged unions additionally implement
//! [`Union`].

use super::error::{DeserializationError, SerializationError};
use super::reader::Reader;
use super::writer::Writer;
use crate::resolver::TypeShape;

/// Capacity estimate used when a value has no better one.
pub const DEFAULT_CAPACITY: usize = 16;

/// Encoding and decoding of one concrete type.
///
/// Implementations must decode exactly the bytes they encoded, and must fail
/// rather than return a partially populated value on malformed input.
///
/// # Examples
///
/// A hand-written codec for a two-field point:
///
/// ```rust
/// use lzpack::resolver::{Member, ShapeKind, TypeShape};
/// use lzpack::serialization::{
///     Codec, DeserializationError, Reader, SerializationError, Writer,
/// };
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Codec for Point {
///     const FIXED_SIZE: Option<usize> = Some(8);
///
///     fn shape() -> TypeShape {
///         TypeShape::of::<Self>(ShapeKind::Record(vec![
///             Member { name: "x", serialized: true, shape: <i32 as Codec>::shape },
///             Member { name: "y", serialized: true, shape: <i32 as Codec>::shape },
///         ]))
///     }
///
///     fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
///         self.x.encode(writer)?;
///         self.y.encode(writer)
///     }
///
///     fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
///         Ok(Self { x: i32::decode(reader)?, y: i32::decode(reader)? })
///     }
/// }
///
/// let bytes = lzpack::switcher::serialize(&Point { x: 1, y: -1 }).unwrap();
/// assert_eq!(bytes.len(), 8);
/// assert_eq!(lzpack::switcher::deserialize::<Point>(&bytes).unwrap(), Point { x: 1, y: -1 });
/// ```
pub trait Codec: Sized + Send + Sync + 'static {
    /// Encoded size of every value, when it does not depend on the value.
    const FIXED_SIZE: Option<usize> = None;

    /// Static description of the type, used for classification.
    fn shape() -> TypeShape;

    /// Cheap estimate of the encoded length of `self`.
    fn capacity(&self) -> usize {
        Self::FIXED_SIZE.unwrap_or(DEFAULT_CAPACITY)
    }

    /// Writes `self` at the writer's position.
    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError>;

    /// Reads one value from the reader's position.
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError>;

    /// Writes `items` back to back, with no count prefix.
    #[doc(hidden)]
    fn encode_slice(items: &[Self], writer: &mut Writer) -> Result<(), SerializationError> {
        items.iter().try_for_each(|item| item.encode(writer))
    }

    /// Reads `count` values written by [`encode_slice`](Self::encode_slice).
    #[doc(hidden)]
    fn decode_vec(
        reader: &mut Reader<'_>,
        count: usize,
    ) -> Result<Vec<Self>, DeserializationError> {
        let capacity = reader.preallocation(count, Self::FIXED_SIZE.unwrap_or(1));
        let mut items = Vec::with_capacity(capacity);
        for _ in 0..count {
            items.push(Self::decode(reader)?);
        }
        Ok(items)
    }
}

/// A closed tagged union.
///
/// Each variant has a distinct `u32` discriminator written ahead of its
/// payload, so the concrete variant survives a round trip through the union
/// type.
pub trait Union: Codec {
    /// Declared `(discriminator, variant name)` pairs.
    const VARIANTS: &'static [(u32, &'static str)];

    /// Discriminator of the variant `self` holds.
    fn discriminator(&self) -> u32;

    /// Name of the variant `self` holds.
    fn variant_name(&self) -> &'static str;
}

/// Sum of fixed sizes; `None` if any member is variable-sized.
#[doc(hidden)]
#[must_use]
pub const fn sum_fixed(sizes: &[Option<usize>]) -> Option<usize> {
    let mut total = 0usize;
    let mut i = 0;
    while i < sizes.len() {
        match sizes[i] {
            Some(size) => total += size,
            None => return None,
        }
        i += 1;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_fixed() {
        assert_eq!(sum_fixed(&[]), Some(0));
        assert_eq!(sum_fixed(&[Some(4), Some(8)]), Some(12));
        assert_eq!(sum_fixed(&[Some(4), None]), None);
    }

    #[test]
    fn test_default_capacity_uses_fixed_size() {
        assert_eq!(7u64.capacity(), 8);
        assert_eq!(true.capacity(), 1);
    }

    #[test]
    fn test_decode_vec_caps_preallocation() {
        let bytes = [1u8, 0, 0, 0];
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            u32::decode_vec(&mut reader, usize::MAX),
            Err(DeserializationError::UnexpectedEof { .. })
        ));
    }
}
