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

#![doc = include_str!("../../README.md")]
#![allow(clippy::module_inception)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # lzpack - Type-Driven Binary Serialization with LZ4
//!
//! lzpack converts typed values to and from a compact binary encoding and can
//! compress the result with an embedded LZ4 block codec:
//!
//! - **Per-type codecs**: implement or derive [`Codec`] for your types
//! - **Tagged unions**: enums marked `#[lzpack(union)]` keep their variant
//!   identity through a round trip, however deeply they are nested
//! - **Five buffer representations**: `Vec<u8>`, [`Bytes`](bytes::Bytes),
//!   [`BytesMut`](bytes::BytesMut), [`ArraySegment`] and [`ByteSequence`],
//!   with zero-copy pass-through when the value is itself a buffer
//! - **LZ4**: fast and high-compression block encoders, a bounds-checked
//!   decoder and a streaming HC context
//! - **Pooled buffers**: scratch buffers are rented and returned on drop
//!
//! ## Architecture
//!
//! - **[`switcher`]**: public serialize/deserialize entry points per representation
//! - **[`resolver`]**: memoized plain/union classification of type shapes
//! - **[`codec`]**: cached per-(strategy, type) codec instances
//! - **[`serialization`]**: the [`Codec`] contract, cursors, pool, options
//! - **[`lz4`]**: the block compressor and decompressor
//! - **[`equality`]**: structural comparers for primitives and well-known types
//!
//! ## Quick Start
//!
//! ```rust
//! use lzpack::{Codec, Timestamp, DateTimeKind, switcher};
//!
//! #[derive(Debug, PartialEq, Codec)]
//! struct Reading {
//!     flag: bool,
//!     count: i32,
//!     ratio: f64,
//!     when: Timestamp,
//!     label: Option<String>,
//! }
//!
//! # fn example() -> Result<(), lzpack::LzpackError> {
//! let reading = Reading {
//!     flag: true,
//!     count: 25,
//!     ratio: 4.5,
//!     when: Timestamp::from_ymd_hms(2021, 5, 1, 5, 8, 7, DateTimeKind::Local).unwrap(),
//!     label: Some("test".into()),
//! };
//!
//! let bytes = switcher::serialize(&reading)?;
//! assert_eq!(switcher::deserialize::<Reading>(&bytes)?, reading);
//!
//! let utc: Reading = switcher::deserialize_in_utc(&bytes)?;
//! assert_eq!(utc.when.kind(), DateTimeKind::Utc);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ### Tagged Unions
//!
//! ```rust
//! use lzpack::{Codec, switcher};
//!
//! #[derive(Debug, PartialEq, Codec)]
//! #[lzpack(union)]
//! enum Shape {
//!     #[lzpack(tag = 1)]
//!     Circle { radius: f32 },
//!     #[lzpack(tag = 2)]
//!     Rect(f32, f32),
//!     #[lzpack(tag = 3)]
//!     Empty,
//! }
//!
//! let shapes = vec![Shape::Circle { radius: 1.0 }, Shape::Rect(2.0, 3.0), Shape::Empty];
//! let bytes = switcher::serialize(&shapes).unwrap();
//! assert_eq!(switcher::deserialize::<Vec<Shape>>(&bytes).unwrap(), shapes);
//! assert!(lzpack::resolver::is_union::<Vec<Shape>>().unwrap());
//! ```
//!
//! ## Features
//!
//! - **`derive`** (default): `#[derive(Codec)]`
//! - **`tracing`** (default): lifecycle events through `tracing`
//! - **`serde`**: serde support for the option types and `DateTimeKind`
//!
//! ## Error Handling
//!
//! - [`SerializationError`](serialization::SerializationError): encode failures
//! - [`DeserializationError`](serialization::DeserializationError): malformed input
//! - [`Lz4Error`](lz4::Lz4Error): block codec failures
//! - [`ResolveError`](resolver::ResolveError): unusable type declarations
//! - [`LzpackError`]: all of the above
//!
//! ## Safety
//!
//! lzpack is written in 100% safe Rust with `#![deny(unsafe_code)]`.

extern crate self as lzpack;

pub mod buffers;
pub mod codec;
pub mod equality;
pub mod error;
pub mod guid;
pub mod lz4;
pub mod resolver;
pub mod serialization;
pub mod switcher;
pub mod timestamp;

// Re-export procedural macros when the derive feature is enabled
#[cfg(feature = "derive")]
pub use lzpack_macros::Codec;

pub use buffers::{ArraySegment, ByteSequence};
pub use equality::{DefaultComparer, EqualityComparer};
pub use error::LzpackError;
pub use guid::Guid;
pub use serialization::{Codec, Union};
pub use timestamp::{DateTimeKind, Timestamp};
