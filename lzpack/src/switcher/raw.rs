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

//! Zero-copy handling of the raw buffer representations.
//!
//! When the requested value type is itself one of the five buffer types (or
//! an `Option` of one), no codec runs: serialization hands the bytes over
//! unchanged and deserialization wraps the source bytes. Sharing types
//! (`Bytes`, `ArraySegment`, `ByteSequence`) are cloned by reference when
//! the target representation matches; everything else is copied once.

use std::any::{Any, TypeId, type_name};

use bytes::{Bytes, BytesMut};

use crate::buffers::{ArraySegment, ByteSequence};
use crate::serialization::{Reader, SerializationError, Writer};

/// A borrowed view of bytes held by one of the buffer representations.
#[derive(Debug, Clone, Copy)]
pub enum RawBuffer<'a> {
    /// Plain contiguous bytes.
    Slice(&'a [u8]),
    /// A shared read-only window.
    Shared(&'a Bytes),
    /// A bounded view over a shared array.
    Segment(&'a ArraySegment),
    /// A possibly segmented sequence.
    Sequence(&'a ByteSequence),
}

impl<'a> RawBuffer<'a> {
    /// Total length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Slice(bytes) => bytes.len(),
            Self::Shared(bytes) => bytes.len(),
            Self::Segment(segment) => segment.count(),
            Self::Sequence(sequence) => sequence.len(),
        }
    }

    /// Returns `true` if the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the bytes into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Self::Slice(bytes) => bytes.to_vec(),
            Self::Shared(bytes) => bytes.to_vec(),
            Self::Segment(segment) => segment.as_slice().to_vec(),
            Self::Sequence(sequence) => sequence.to_vec(),
        }
    }

    /// A read-only window; shares the source when it already is one.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Shared(bytes) => Bytes::clone(bytes),
            Self::Sequence(sequence) => sequence.to_bytes(),
            _ => Bytes::from(self.to_vec()),
        }
    }

    /// A mutable window; always a copy.
    #[must_use]
    pub fn to_bytes_mut(&self) -> BytesMut {
        match self {
            Self::Slice(bytes) => BytesMut::from(*bytes),
            Self::Segment(segment) => BytesMut::from(segment.as_slice()),
            _ => BytesMut::from(&self.to_vec()[..]),
        }
    }

    /// A bounded view; shares the source when it already is one.
    #[must_use]
    pub fn to_segment(&self) -> ArraySegment {
        match self {
            Self::Segment(segment) => ArraySegment::clone(segment),
            Self::Slice(bytes) => ArraySegment::from(*bytes),
            _ => ArraySegment::from(self.to_vec()),
        }
    }

    /// A sequence; shares the source segments when possible.
    #[must_use]
    pub fn to_sequence(&self) -> ByteSequence {
        match self {
            Self::Sequence(sequence) => ByteSequence::clone(sequence),
            Self::Shared(bytes) => ByteSequence::from(Bytes::clone(bytes)),
            _ => ByteSequence::from(self.to_vec()),
        }
    }

    /// Appends the bytes to `writer`, segment by segment.
    pub fn write_to(self, writer: &mut Writer) {
        match self {
            Self::Slice(bytes) => writer.write_bytes(bytes),
            Self::Shared(bytes) => writer.write_bytes(bytes),
            Self::Segment(segment) => writer.write_bytes(segment.as_slice()),
            Self::Sequence(sequence) => {
                for segment in sequence.segments() {
                    writer.write_bytes(segment);
                }
            }
        }
    }

    /// A reader over the view, without joining segments.
    #[must_use]
    pub fn reader(self) -> Reader<'a> {
        match self {
            Self::Slice(bytes) => Reader::new(bytes),
            Self::Shared(bytes) => Reader::new(bytes),
            Self::Segment(segment) => Reader::new(segment.as_slice()),
            Self::Sequence(sequence) => match sequence.segments() {
                [single] => Reader::new(single),
                segments => Reader::over_sequence(segments),
            },
        }
    }
}

/// An externally visible buffer representation.
pub trait Representation: Sized + Send + Sync + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Takes exactly the committed bytes of `writer`.
    fn materialize(writer: Writer) -> Self;

    /// Borrows the bytes.
    fn as_raw(&self) -> RawBuffer<'_>;

    /// Builds this representation from raw bytes.
    fn from_raw(raw: RawBuffer<'_>) -> Self;

    /// A reader over the bytes.
    fn reader(&self) -> Reader<'_> {
        self.as_raw().reader()
    }
}

macro_rules! representation {
    ($($t:ty => $name:literal, $materialize:ident, $convert:ident, |$v:ident| $raw:expr;)*) => {
        $(
            impl Representation for $t {
                const NAME: &'static str = $name;

                fn materialize(writer: Writer) -> Self {
                    writer.$materialize()
                }

                fn as_raw(&self) -> RawBuffer<'_> {
                    let $v = self;
                    $raw
                }

                fn from_raw(raw: RawBuffer<'_>) -> Self {
                    raw.$convert()
                }
            }
        )*
    };
}

representation! {
    Vec<u8> => "array", into_vec, to_vec, |v| RawBuffer::Slice(v);
    Bytes => "memory", into_bytes, to_bytes, |v| RawBuffer::Shared(v);
    BytesMut => "mutable memory", into_bytes_mut, to_bytes_mut, |v| RawBuffer::Slice(v);
    ArraySegment => "segment", into_segment, to_segment, |v| RawBuffer::Segment(v);
    ByteSequence => "sequence", into_sequence, to_sequence, |v| RawBuffer::Sequence(v);
}

/// Returns `true` if `T` takes the raw path.
#[must_use]
pub fn is_raw<T: 'static>() -> bool {
    let id = TypeId::of::<T>();
    [
        TypeId::of::<Vec<u8>>(),
        TypeId::of::<Bytes>(),
        TypeId::of::<BytesMut>(),
        TypeId::of::<ArraySegment>(),
        TypeId::of::<ByteSequence>(),
        TypeId::of::<Option<Vec<u8>>>(),
        TypeId::of::<Option<Bytes>>(),
        TypeId::of::<Option<BytesMut>>(),
        TypeId::of::<Option<ArraySegment>>(),
        TypeId::of::<Option<ByteSequence>>(),
    ]
    .contains(&id)
}

fn present<'a, R: Representation>(
    value: &'a Option<R>,
) -> Result<RawBuffer<'a>, SerializationError> {
    value.as_ref().map(R::as_raw).ok_or(SerializationError::ValueRequired {
        type_name: type_name::<Option<R>>(),
    })
}

/// The raw bytes of `value` when `T` is a buffer type.
///
/// `None` of a nullable buffer type is a `ValueRequired` error.
pub fn as_raw<T: 'static>(value: &T) -> Result<Option<RawBuffer<'_>>, SerializationError> {
    let any = value as &dyn Any;
    if let Some(v) = any.downcast_ref::<Vec<u8>>() {
        return Ok(Some(v.as_raw()));
    }
    if let Some(v) = any.downcast_ref::<Bytes>() {
        return Ok(Some(v.as_raw()));
    }
    if let Some(v) = any.downcast_ref::<BytesMut>() {
        return Ok(Some(v.as_raw()));
    }
    if let Some(v) = any.downcast_ref::<ArraySegment>() {
        return Ok(Some(v.as_raw()));
    }
    if let Some(v) = any.downcast_ref::<ByteSequence>() {
        return Ok(Some(v.as_raw()));
    }
    if let Some(v) = any.downcast_ref::<Option<Vec<u8>>>() {
        return present(v).map(Some);
    }
    if let Some(v) = any.downcast_ref::<Option<Bytes>>() {
        return present(v).map(Some);
    }
    if let Some(v) = any.downcast_ref::<Option<BytesMut>>() {
        return present(v).map(Some);
    }
    if let Some(v) = any.downcast_ref::<Option<ArraySegment>>() {
        return present(v).map(Some);
    }
    if let Some(v) = any.downcast_ref::<Option<ByteSequence>>() {
        return present(v).map(Some);
    }
    Ok(None)
}

fn build<R: Representation>(raw: RawBuffer<'_>, nullable: bool) -> Box<dyn Any> {
    if nullable {
        Box::new(Some(R::from_raw(raw)))
    } else {
        Box::new(R::from_raw(raw))
    }
}

/// Builds a `T` from raw bytes when `T` is a buffer type.
#[must_use]
pub fn from_raw<T: 'static>(raw: RawBuffer<'_>) -> Option<T> {
    let id = TypeId::of::<T>();
    let built = if id == TypeId::of::<Vec<u8>>() {
        build::<Vec<u8>>(raw, false)
    } else if id == TypeId::of::<Bytes>() {
        build::<Bytes>(raw, false)
    } else if id == TypeId::of::<BytesMut>() {
        build::<BytesMut>(raw, false)
    } else if id == TypeId::of::<ArraySegment>() {
        build::<ArraySegment>(raw, false)
    } else if id == TypeId::of::<ByteSequence>() {
        build::<ByteSequence>(raw, false)
    } else if id == TypeId::of::<Option<Vec<u8>>>() {
        build::<Vec<u8>>(raw, true)
    } else if id == TypeId::of::<Option<Bytes>>() {
        build::<Bytes>(raw, true)
    } else if id == TypeId::of::<Option<BytesMut>>() {
        build::<BytesMut>(raw, true)
    } else if id == TypeId::of::<Option<ArraySegment>>() {
        build::<ArraySegment>(raw, true)
    } else if id == TypeId::of::<Option<ByteSequence>>() {
        build::<ByteSequence>(raw, true)
    } else {
        return None;
    };
    built.downcast::<T>().ok().map(|value| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_detection() {
        assert!(is_raw::<Vec<u8>>());
        assert!(is_raw::<Option<ByteSequence>>());
        assert!(!is_raw::<Vec<u16>>());
        assert!(!is_raw::<String>());
    }

    #[test]
    fn test_shared_representations_are_not_copied() {
        let bytes = Bytes::from(vec![1, 2, 3]);
        let raw = as_raw(&bytes).unwrap().unwrap();
        let copy = Bytes::from_raw(raw);
        assert_eq!(copy.as_ptr(), bytes.as_ptr());

        let segment = ArraySegment::new(std::sync::Arc::from(&[0u8, 1, 2, 3][..]), 1, 2).unwrap();
        let shared: ArraySegment = from_raw(segment.as_raw()).unwrap();
        assert!(std::sync::Arc::ptr_eq(shared.array(), segment.array()));
        assert_eq!(&*shared, &[1, 2]);
    }

    #[test]
    fn test_absent_nullable_buffer_is_required() {
        let absent: Option<Bytes> = None;
        assert!(matches!(
            as_raw(&absent),
            Err(SerializationError::ValueRequired { .. })
        ));
        let present = Some(vec![9u8]);
        assert_eq!(as_raw(&present).unwrap().unwrap().to_vec(), vec![9]);
        assert!(as_raw(&5u32).unwrap().is_none());
    }

    #[test]
    fn test_conversions_between_representations() {
        let seq: ByteSequence = [Bytes::from_static(b"ab"), Bytes::from_static(b"c")]
            .into_iter()
            .collect();
        let raw = seq.as_raw();
        assert_eq!(raw.len(), 3);
        assert_eq!(Vec::<u8>::from_raw(raw), b"abc");
        assert_eq!(&BytesMut::from_raw(raw)[..], b"abc");
        assert_eq!(&*ArraySegment::from_raw(raw), b"abc");
        assert_eq!(
            from_raw::<Option<Bytes>>(raw),
            Some(Some(Bytes::from_static(b"abc")))
        );
        assert_eq!(from_raw::<u32>(raw), None);

        let mut reader = seq.reader();
        assert!(!reader.is_contiguous());
        assert_eq!(reader.read_u8().unwrap(), b'a');
    }
}
