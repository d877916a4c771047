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

//! Serialization layer for lzpack.
//!
//! This module provides the per-type codec contract, the write and read
//! cursors it composes, buffer pooling, and the compressed-frame format.
//!
//! # Overview
//!
//! The serialization layer consists of several key components:
//!
//! - **[`Codec`] trait**: encode/decode of one concrete type
//! - **[`Union`] trait**: closed tagged unions with explicit discriminators
//! - **[`Writer`]**: growable write cursor over a pooled buffer, with an
//!   in-place switch to LZ4-compressed output
//! - **[`Reader`]**: bounds-checked read cursor over one or more segments
//! - **[`buffer_pool`] module**: size-classed buffer reuse
//! - **Error types**: [`SerializationError`] and [`DeserializationError`]
//!
//! # Wire Layout
//!
//! Values are written without field tags, in declaration order:
//!
//! | value                 | encoding |
//! |-----------------------|----------|
//! | integers, floats      | little-endian, natural width |
//! | `usize` / `isize`     | 64-bit little-endian |
//! | `bool`                | one byte, `0` or `1` |
//! | lengths, counts       | unsigned LEB128 varint |
//! | `String`, byte runs   | varint byte length + bytes |
//! | `Option<T>`           | presence byte + `T` |
//! | sequences, sets, maps | varint count + elements (maps: key, value) |
//! | field-less enums      | varint discriminant |
//! | unions                | varint discriminator + `u32` payload length + payload |
//!
//! # Compressed Frames
//!
//! ```text
//! +-----------+------------------------------------------+
//! | Flag (1B) | Body                                     |
//! +-----------+------------------------------------------+
//! ```
//!
//! - **Flag `0`**: the body is the plain encoding
//! - **Flag nonzero**: the body is one LZ4 block of the plain encoding
//!
//! The decoder needs the original (plain) length to size its output; it is
//! returned by the compressing call and must travel with the frame.
//!
//! # Examples
//!
//! ## Driving the cursors directly
//!
//! ```rust
//! use lzpack::serialization::{Codec, Reader, Writer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = Writer::new();
//! (42u32, String::from("hello")).encode(&mut writer)?;
//! let bytes = writer.into_vec();
//!
//! let mut reader = Reader::new(&bytes);
//! let decoded = <(u32, String)>::decode(&mut reader)?;
//! assert_eq!(decoded, (42, String::from("hello")));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Using the buffer pool
//!
//! ```rust
//! use lzpack::serialization::buffer_pool::BufferPool;
//!
//! // Get a buffer from the pool
//! let mut buffer = BufferPool::rent(1024);
//! buffer.extend_from_slice(b"Hello, world!");
//!
//! // Buffer is automatically returned to pool when dropped
//! drop(buffer);
//! let _again = BufferPool::rent(1024);
//! ```
//!
//! # Thread Safety
//!
//! Codecs are stateless and `Send + Sync + 'static`. The buffer pool is fully
//! thread-safe; cursors are owned by a single call.

pub mod buffer_pool;
mod codecs;
mod error;
mod options;
mod reader;
mod traits;
mod variant;
mod writer;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use error::{DeserializationError, SerializationError};
pub use options::{
    CompressionMode, CompressionOptions, DEFAULT_MIN_COMPRESS_SIZE, DeserializeOptions,
};
pub use reader::Reader;
pub use traits::{Codec, DEFAULT_CAPACITY, Union, sum_fixed};
pub use variant::{VARIANT_HEADER_MAX, decode_variant, encode_variant, unknown_variant};
pub use writer::{FLAG_LZ4, FLAG_STORED, MAX_VARINT_LEN, Writer};
