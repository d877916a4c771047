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

//! Buffer representations without a direct standard-library equivalent.
//!
//! The engine accepts and produces five byte-buffer representations:
//!
//! | representation                 | type                     |
//! |--------------------------------|--------------------------|
//! | owned array                    | `Vec<u8>`                |
//! | bounded view over shared array | [`ArraySegment`]         |
//! | segmented read-only sequence   | [`ByteSequence`]         |
//! | mutable memory window          | [`bytes::BytesMut`]      |
//! | read-only memory window        | [`bytes::Bytes`]         |

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

/// A bounded view (`offset`, `count`) over a shared, immutable array.
///
/// Cloning is cheap: the backing array is reference counted.
///
/// # Examples
///
/// ```rust
/// use lzpack::ArraySegment;
/// use std::sync::Arc;
///
/// let array: Arc<[u8]> = Arc::from(&b"..payload.."[..]);
/// let segment = ArraySegment::new(array, 2, 7).unwrap();
/// assert_eq!(&*segment, b"payload");
/// assert!(ArraySegment::new(Arc::from(&b"abc"[..]), 2, 5).is_none());
/// ```
#[derive(Clone)]
pub struct ArraySegment {
    array: Arc<[u8]>,
    offset: usize,
    count: usize,
}

impl ArraySegment {
    /// Creates a view of `count` bytes starting at `offset`.
    ///
    /// Returns `None` when the range does not fit in `array`.
    #[must_use]
    pub fn new(array: Arc<[u8]>, offset: usize, count: usize) -> Option<Self> {
        let end = offset.checked_add(count)?;
        (end <= array.len()).then_some(Self {
            array,
            offset,
            count,
        })
    }

    /// A view over an entire array.
    #[must_use]
    pub fn whole(array: Arc<[u8]>) -> Self {
        let count = array.len();
        Self {
            array,
            offset: 0,
            count,
        }
    }

    /// The zero-length view.
    #[must_use]
    pub fn empty() -> Self {
        Self::whole(Arc::from(Vec::new()))
    }

    /// The shared backing array.
    #[must_use]
    pub fn array(&self) -> &Arc<[u8]> {
        &self.array
    }

    /// Start of the view within the backing array.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the view.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The bytes covered by the view.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.array[self.offset..self.offset + self.count]
    }

    /// A narrower view sharing the same array.
    #[must_use]
    pub fn slice(&self, start: usize, count: usize) -> Option<Self> {
        let end = start.checked_add(count)?;
        if end > self.count {
            return None;
        }
        Some(Self {
            array: Arc::clone(&self.array),
            offset: self.offset + start,
            count,
        })
    }
}

impl Default for ArraySegment {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for ArraySegment {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ArraySegment {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for ArraySegment {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ArraySegment {}

impl fmt::Debug for ArraySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySegment")
            .field("offset", &self.offset)
            .field("count", &self.count)
            .field("array_len", &self.array.len())
            .finish()
    }
}

impl From<Vec<u8>> for ArraySegment {
    fn from(vec: Vec<u8>) -> Self {
        Self::whole(Arc::from(vec))
    }
}

impl From<&[u8]> for ArraySegment {
    fn from(slice: &[u8]) -> Self {
        Self::whole(Arc::from(slice))
    }
}

/// An ordered sequence of read-only byte segments.
///
/// Models payloads that arrive in pieces (network reads, chained frames).
/// Empty segments are never stored.
///
/// # Examples
///
/// ```rust
/// use bytes::Bytes;
/// use lzpack::ByteSequence;
///
/// let seq: ByteSequence = [Bytes::from_static(b"hel"), Bytes::new(), Bytes::from_static(b"lo")]
///     .into_iter()
///     .collect();
/// assert_eq!(seq.len(), 5);
/// assert_eq!(seq.segments().len(), 2);
/// assert_eq!(seq.to_vec(), b"hello");
/// ```
#[derive(Clone, Default)]
pub struct ByteSequence {
    segments: Vec<Bytes>,
    len: usize,
}

impl ByteSequence {
    /// An empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: Bytes) {
        if !segment.is_empty() {
            self.len += segment.len();
            self.segments.push(segment);
        }
    }

    /// Total length across segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sequence holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The non-empty segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    /// Returns `true` if the bytes are contiguous (zero or one segment).
    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        self.segments.len() <= 1
    }

    /// Copies the sequence into one vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }

    /// Returns the bytes as one contiguous window, copying only when segmented.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self.segments.as_slice() {
            [] => Bytes::new(),
            [single] => single.clone(),
            _ => Bytes::from(self.to_vec()),
        }
    }
}

impl PartialEq for ByteSequence {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .segments
                .iter()
                .flat_map(|s| s.iter())
                .eq(other.segments.iter().flat_map(|s| s.iter()))
    }
}

impl Eq for ByteSequence {}

impl fmt::Debug for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSequence")
            .field("len", &self.len)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl From<Bytes> for ByteSequence {
    fn from(bytes: Bytes) -> Self {
        let mut seq = Self::new();
        seq.push(bytes);
        seq
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(vec: Vec<u8>) -> Self {
        Self::from(Bytes::from(vec))
    }
}

impl From<BytesMut> for ByteSequence {
    fn from(bytes: BytesMut) -> Self {
        Self::from(bytes.freeze())
    }
}

impl FromIterator<Bytes> for ByteSequence {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        let mut seq = Self::new();
        for segment in iter {
            seq.push(segment);
        }
        seq
    }
}
