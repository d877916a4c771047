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

//! Read cursor over one or more immutable byte segments.

use std::borrow::Cow;

use bytes::Bytes;

use super::error::DeserializationError;
use super::options::DeserializeOptions;
use super::writer::MAX_VARINT_LEN;
use crate::timestamp::DateTimeKind;

#[derive(Debug, Clone)]
enum Source<'a> {
    Contiguous(&'a [u8]),
    Chunked {
        chunks: &'a [Bytes],
        index: usize,
        offset: usize,
    },
}

/// Sequential reader over an immutable view.
///
/// Every read is bounds checked against the view; a read that would pass its
/// end fails with [`DeserializationError::UnexpectedEof`] and consumes
/// nothing.
///
/// The reader also carries the per-call decode settings: a forced
/// [`DateTimeKind`] applied to every timestamp read through it, and an
/// optional cap on collection lengths.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::Reader;
///
/// let mut reader = Reader::with_range(&[0xFF, 7, 0, 0xFF], 1, 2).unwrap();
/// assert_eq!(reader.read_u16().unwrap(), 7);
/// assert!(reader.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    source: Source<'a>,
    position: usize,
    len: usize,
    date_time_kind: Option<DateTimeKind>,
    max_collection_len: Option<usize>,
}

impl<'a> Reader<'a> {
    /// Reads the whole of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            source: Source::Contiguous(bytes),
            position: 0,
            len: bytes.len(),
            date_time_kind: None,
            max_collection_len: None,
        }
    }

    /// Reads `len` bytes of `bytes` starting at `offset`.
    pub fn with_range(
        bytes: &'a [u8],
        offset: usize,
        len: usize,
    ) -> Result<Self, DeserializationError> {
        let view = offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or(DeserializationError::InvalidRange {
                offset,
                len,
                available: bytes.len(),
            })?;
        Ok(Self::new(view))
    }

    /// Reads across `chunks` in order without joining them.
    #[must_use]
    pub fn over_sequence(chunks: &'a [Bytes]) -> Self {
        Self {
            len: chunks.iter().map(Bytes::len).sum(),
            source: Source::Chunked {
                chunks,
                index: 0,
                offset: 0,
            },
            position: 0,
            date_time_kind: None,
            max_collection_len: None,
        }
    }

    /// Applies per-call options.
    #[must_use]
    pub fn with_options(mut self, options: Option<&DeserializeOptions>) -> Self {
        self.merge_options(options);
        self
    }

    /// Overrides the settings that `options` sets; unset fields are kept.
    pub fn merge_options(&mut self, options: Option<&DeserializeOptions>) {
        if let Some(options) = options {
            if options.date_time_kind.is_some() {
                self.date_time_kind = options.date_time_kind;
            }
            if options.max_collection_len.is_some() {
                self.max_collection_len = options.max_collection_len;
            }
        }
    }

    /// The settings currently in effect.
    #[must_use]
    pub fn options(&self) -> DeserializeOptions {
        DeserializeOptions {
            date_time_kind: self.date_time_kind,
            max_collection_len: self.max_collection_len,
        }
    }

    /// Replaces the settings.
    pub fn set_options(&mut self, options: DeserializeOptions) {
        self.date_time_kind = options.date_time_kind;
        self.max_collection_len = options.max_collection_len;
    }

    /// Forces every timestamp read through this reader to UTC.
    #[must_use]
    pub fn in_utc(mut self) -> Self {
        self.date_time_kind = Some(DateTimeKind::Utc);
        self
    }

    /// Kind forced onto decoded timestamps, if any.
    #[must_use]
    pub fn date_time_kind(&self) -> Option<DateTimeKind> {
        self.date_time_kind
    }

    /// Cap on decoded collection lengths, if any.
    #[must_use]
    pub fn max_collection_len(&self) -> Option<usize> {
        self.max_collection_len
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len - self.position
    }

    /// Returns `true` if the view is one contiguous slice.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        matches!(self.source, Source::Contiguous(_))
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<(), DeserializationError> {
        if needed > self.remaining() {
            return Err(DeserializationError::UnexpectedEof {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Fills `out` from the view.
    pub fn read_into(&mut self, out: &mut [u8]) -> Result<(), DeserializationError> {
        self.ensure(out.len())?;
        match &mut self.source {
            Source::Contiguous(bytes) => {
                out.copy_from_slice(&bytes[self.position..self.position + out.len()]);
            }
            Source::Chunked {
                chunks,
                index,
                offset,
            } => {
                let mut filled = 0;
                while filled < out.len() {
                    let chunk = &chunks[*index][*offset..];
                    let n = chunk.len().min(out.len() - filled);
                    out[filled..filled + n].copy_from_slice(&chunk[..n]);
                    filled += n;
                    *offset += n;
                    if *offset == chunks[*index].len() {
                        *index += 1;
                        *offset = 0;
                    }
                }
            }
        }
        self.position += out.len();
        Ok(())
    }

    /// Reads `len` bytes, borrowing from the source when they are contiguous.
    pub fn read_slice(&mut self, len: usize) -> Result<Cow<'a, [u8]>, DeserializationError> {
        self.ensure(len)?;
        let borrowed = match &mut self.source {
            Source::Contiguous(bytes) => {
                let bytes: &'a [u8] = *bytes;
                Some(&bytes[self.position..self.position + len])
            }
            Source::Chunked {
                chunks,
                index,
                offset,
            } => {
                let chunks: &'a [Bytes] = *chunks;
                match chunks.get(*index) {
                    Some(chunk) if chunk.len() - *offset > len => {
                        let start = *offset;
                        *offset += len;
                        Some(&chunk[start..start + len])
                    }
                    _ => None,
                }
            }
        };
        match borrowed {
            Some(slice) => {
                self.position += len;
                Ok(Cow::Borrowed(slice))
            }
            None => {
                let mut owned = vec![0u8; len];
                self.read_into(&mut owned)?;
                Ok(Cow::Owned(owned))
            }
        }
    }

    /// Reads a fixed number of bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        let mut out = [0u8; N];
        self.read_into(&mut out)?;
        Ok(out)
    }

    /// Skips `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), DeserializationError> {
        self.read_slice(len).map(|_| ())
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a bool; any byte other than `0` or `1` is malformed.
    pub fn read_bool(&mut self) -> Result<bool, DeserializationError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DeserializationError::invalid_value(
                "bool",
                format!("byte {other:#04x} is neither 0 nor 1"),
            )),
        }
    }

    /// Reads an unsigned LEB128 varint.
    pub fn read_varint(&mut self) -> Result<u64, DeserializationError> {
        let start = self.position;
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            let bits = u64::from(byte & 0x7F);
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(DeserializationError::MalformedVarint { position: start });
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DeserializationError::MalformedVarint { position: start })
    }

    /// Reads a varint length or count.
    pub fn read_len(&mut self) -> Result<usize, DeserializationError> {
        let start = self.position;
        usize::try_from(self.read_varint()?)
            .map_err(|_| DeserializationError::MalformedVarint { position: start })
    }

    /// Reads a collection element count, enforcing the configured cap.
    pub fn read_count(&mut self, type_name: &'static str) -> Result<usize, DeserializationError> {
        let count = self.read_len()?;
        if let Some(max) = self.max_collection_len {
            if count > max {
                return Err(DeserializationError::invalid_value(
                    type_name,
                    format!("{count} elements exceed the limit of {max}"),
                ));
            }
        }
        Ok(count)
    }

    /// Capacity worth preallocating for `count` elements of at least
    /// `min_element_size` bytes each; never more than the view could hold.
    #[must_use]
    pub fn preallocation(&self, count: usize, min_element_size: usize) -> usize {
        count.min(self.remaining() / min_element_size.max(1))
    }

    /// Reads a varint-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, DeserializationError> {
        let len = self.read_len()?;
        let bytes = self.read_slice(len)?;
        Ok(std::str::from_utf8(&bytes)?.to_owned())
    }

    /// Reads a varint-prefixed byte run.
    pub fn read_byte_run(&mut self) -> Result<Cow<'a, [u8]>, DeserializationError> {
        let len = self.read_len()?;
        self.read_slice(len)
    }
}

macro_rules! read_le {
    ($($name:ident: $t:ty),* $(,)?) => {
        impl Reader<'_> {
            $(
                #[doc = concat!("Reads a little-endian `", stringify!($t), "`.")]
                pub fn $name(&mut self) -> Result<$t, DeserializationError> {
                    Ok(<$t>::from_le_bytes(self.read_array()?))
                }
            )*
        }
    };
}

read_le! {
    read_u16: u16,
    read_u32: u32,
    read_u64: u64,
    read_u128: u128,
    read_i8: i8,
    read_i16: i16,
    read_i32: i32,
    read_i64: i64,
    read_i128: i128,
    read_f32: f32,
    read_f64: f64,
}
