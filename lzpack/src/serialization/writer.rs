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

//! Write cursor over a pooled buffer.

use bytes::{Bytes, BytesMut};

use super::buffer_pool::{BufferPool, PooledBuffer};
use super::error::SerializationError;
use super::options::{CompressionMode, CompressionOptions};
use crate::buffers::{ArraySegment, ByteSequence};
use crate::lz4;

/// Flag byte of a stored (uncompressed) payload.
pub const FLAG_STORED: u8 = 0;

/// Flag byte of an LZ4-compressed payload.
pub const FLAG_LZ4: u8 = 1;

/// Smallest span handed out when the buffer grows.
const MIN_SPAN: usize = 256;

/// Longest unsigned LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Sequential writer over one rented buffer.
///
/// Bytes before [`len`](Self::len) are committed; [`get_span`](Self::get_span)
/// exposes writable space after them, which [`advance`](Self::advance)
/// commits. The buffer grows by renting a larger one and copying; it is never
/// shrunk in place.
///
/// A writer created with [`compressible`](Self::compressible) reserves a flag
/// byte at position 0. Its output is always a valid compressed frame: flag
/// `0` with the plain bytes, or flag `1` with an LZ4 block after
/// [`compress_lz4`](Self::compress_lz4).
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::Writer;
///
/// let mut writer = Writer::with_capacity(16);
/// writer.write_u32(7);
/// writer.write_str("hi");
/// assert_eq!(writer.written(), &[7, 0, 0, 0, 2, b'h', b'i']);
/// ```
#[derive(Debug)]
pub struct Writer {
    buffer: PooledBuffer,
    written: usize,
    start: usize,
    compressible: bool,
    finished: bool,
}

impl Writer {
    /// Creates a writer with a small initial buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MIN_SPAN)
    }

    /// Creates a writer whose first buffer holds at least `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BufferPool::rent(capacity),
            written: 0,
            start: 0,
            compressible: false,
            finished: false,
        }
    }

    /// Creates a compressible writer; position 0 holds the frame flag.
    #[must_use]
    pub fn compressible(capacity: usize) -> Self {
        let mut writer = Self::with_capacity(capacity.saturating_add(1));
        writer.compressible = true;
        writer.write_u8(FLAG_STORED);
        writer.start = 1;
        writer
    }

    /// Returns `true` if the writer was created in compressible mode.
    #[must_use]
    pub fn is_compressible(&self) -> bool {
        self.compressible
    }

    /// Committed bytes, including the flag byte of a compressible writer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.written
    }

    /// Returns `true` if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Committed payload bytes, excluding the flag byte of a compressible writer.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.written - self.start
    }

    /// The committed bytes.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.written]
    }

    /// Returns at least `size_hint` writable bytes after the committed prefix.
    ///
    /// The span's contents are unspecified; only bytes later committed with
    /// [`advance`](Self::advance) become part of the output.
    pub fn get_span(&mut self, size_hint: usize) -> &mut [u8] {
        let hint = size_hint.max(1);
        if self.buffer.len() - self.written < hint {
            self.grow(hint);
        }
        &mut self.buffer[self.written..]
    }

    /// Commits `count` bytes of the last span.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the span obtained from [`get_span`](Self::get_span).
    pub fn advance(&mut self, count: usize) {
        assert!(
            self.written + count <= self.buffer.len(),
            "advanced {count} bytes past the end of the span"
        );
        self.written += count;
    }

    fn grow(&mut self, hint: usize) {
        let needed = self.written + hint;
        let capacity = self.buffer.capacity();
        if needed <= capacity {
            let target = needed.max(self.written.saturating_mul(2)).max(MIN_SPAN).min(capacity);
            self.buffer.resize(target);
            return;
        }
        let mut next = BufferPool::rent(needed.max(capacity.saturating_mul(2)));
        next.extend_from_slice(&self.buffer[..self.written]);
        next.resize(needed);
        self.buffer = next;
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let span = self.get_span(bytes.len());
        span[..bytes.len()].copy_from_slice(bytes);
        self.advance(bytes.len());
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Writes a bool as `0` or `1`.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes an unsigned LEB128 varint.
    pub fn write_varint(&mut self, mut value: u64) {
        let span = self.get_span(MAX_VARINT_LEN);
        let mut n = 0;
        while value >= 0x80 {
            span[n] = (value as u8) | 0x80;
            value >>= 7;
            n += 1;
        }
        span[n] = value as u8;
        self.advance(n + 1);
    }

    /// Writes a length or count as a varint.
    pub fn write_len(&mut self, len: usize) {
        self.write_varint(len as u64);
    }

    /// Writes a UTF-8 string with a varint byte-length prefix.
    pub fn write_str(&mut self, value: &str) {
        self.write_len(value.len());
        self.write_bytes(value.as_bytes());
    }

    /// Writes a byte run with a varint length prefix.
    pub fn write_byte_run(&mut self, value: &[u8]) {
        self.write_len(value.len());
        self.write_bytes(value);
    }

    /// Reserves four bytes for a later [`patch_u32`](Self::patch_u32).
    ///
    /// Returns the absolute position of the reservation.
    pub fn reserve_u32(&mut self) -> usize {
        let at = self.written;
        self.write_u32(0);
        at
    }

    /// Overwrites four committed bytes at `at` with `value` (little-endian).
    ///
    /// # Panics
    ///
    /// Panics if `at..at + 4` is not committed.
    pub fn patch_u32(&mut self, at: usize, value: u32) {
        assert!(at + 4 <= self.written, "patch outside committed bytes");
        self.buffer[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Compresses the committed payload in place.
    ///
    /// The frame becomes flag `1` followed by an LZ4 block when the payload is
    /// at least `options.min_compress_size` bytes and the block is smaller;
    /// otherwise it stays flag `0` followed by the plain bytes. Returns the
    /// original payload length, which the reader needs to size its output.
    pub fn compress_lz4(
        &mut self,
        options: &CompressionOptions,
    ) -> Result<usize, SerializationError> {
        if !self.compressible || self.finished {
            return Err(SerializationError::NotCompressible);
        }
        self.finished = true;
        let original = self.payload_len();
        if original < options.min_compress_size.max(1) {
            #[cfg(feature = "tracing")]
            tracing::trace!(original, "payload below compression threshold, stored");
            return Ok(original);
        }

        let bound = lz4::compress_bound(original);
        if bound == 0 {
            return Err(SerializationError::LengthOverflow {
                what: "lz4 payload",
                len: original,
                max: lz4::MAX_INPUT_SIZE,
            });
        }
        let mut frame = BufferPool::rent(bound + 1);
        frame.resize(bound + 1);
        frame[0] = FLAG_LZ4;
        let src = &self.buffer[1..self.written];
        let compressed = match options.mode {
            CompressionMode::Fast { acceleration } => {
                lz4::compress_with_acceleration(src, &mut frame[1..], acceleration)?
            }
            CompressionMode::High { level } => lz4::compress_hc(src, &mut frame[1..], level)?,
        };

        if compressed < original {
            #[cfg(feature = "tracing")]
            tracing::trace!(original, compressed, "payload compressed");
            self.written = compressed + 1;
            self.buffer = frame;
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(original, compressed, "compression did not pay off, stored");
        }
        Ok(original)
    }

    /// Copies the committed bytes into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.written().to_vec()
    }

    /// Materializes the committed bytes as an owned vector.
    ///
    /// When most of the rented buffer is used its allocation is detached from
    /// the pool; otherwise the bytes are copied and the buffer is returned.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.written * 2 < self.buffer.capacity() {
            return self.to_vec();
        }
        self.buffer.truncate(self.written);
        self.buffer.into_vec()
    }

    /// Materializes the committed bytes as a read-only window.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.into_vec())
    }

    /// Materializes the committed bytes as a mutable window.
    #[must_use]
    pub fn into_bytes_mut(self) -> BytesMut {
        BytesMut::from(self.written())
    }

    /// Materializes the committed bytes as a view over a fresh shared array.
    #[must_use]
    pub fn into_segment(self) -> ArraySegment {
        ArraySegment::from(self.written())
    }

    /// Materializes the committed bytes as a single-segment sequence.
    #[must_use]
    pub fn into_sequence(self) -> ByteSequence {
        ByteSequence::from(self.into_bytes())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! write_le {
    ($($name:ident: $t:ty),* $(,)?) => {
        impl Writer {
            $(
                #[doc = concat!("Writes a little-endian `", stringify!($t), "`.")]
                pub fn $name(&mut self, value: $t) {
                    self.write_bytes(&value.to_le_bytes());
                }
            )*
        }
    };
}

write_le! {
    write_u16: u16,
    write_u32: u32,
    write_u64: u64,
    write_u128: u128,
    write_i8: i8,
    write_i16: i16,
    write_i32: i32,
    write_i64: i64,
    write_i128: i128,
    write_f32: f32,
    write_f64: f64,
}
