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

//! Caller-facing configuration.

use crate::lz4::{HC_LEVEL_DEFAULT, clamp_level};
use crate::timestamp::DateTimeKind;

/// Payloads shorter than this are stored uncompressed.
pub const DEFAULT_MIN_COMPRESS_SIZE: usize = 64;

/// Options applied to one deserialize call.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::DeserializeOptions;
/// use lzpack::timestamp::DateTimeKind;
///
/// let options = DeserializeOptions::default()
///     .with_date_time_kind(DateTimeKind::Utc)
///     .with_max_collection_len(10_000);
/// assert_eq!(options.date_time_kind, Some(DateTimeKind::Utc));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeserializeOptions {
    /// When set, every decoded timestamp takes this kind regardless of the
    /// kind that was encoded. The tick value is left unchanged.
    pub date_time_kind: Option<DateTimeKind>,

    /// When set, any collection announcing more elements fails to decode.
    pub max_collection_len: Option<usize>,
}

impl DeserializeOptions {
    /// Options forcing every timestamp to UTC.
    #[must_use]
    pub const fn utc() -> Self {
        Self {
            date_time_kind: Some(DateTimeKind::Utc),
            max_collection_len: None,
        }
    }

    /// Sets the kind forced onto decoded timestamps.
    #[must_use]
    pub fn with_date_time_kind(mut self, kind: DateTimeKind) -> Self {
        self.date_time_kind = Some(kind);
        self
    }

    /// Caps the element count any decoded collection may announce.
    #[must_use]
    pub fn with_max_collection_len(mut self, max: usize) -> Self {
        self.max_collection_len = Some(max);
        self
    }
}

/// LZ4 encoder selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionMode {
    /// Single-pass encoder; larger `acceleration` is faster with a lower ratio.
    Fast {
        /// Acceleration factor, `1` for the best ratio.
        acceleration: u32,
    },
    /// Hash-chain encoder at the given level (`1..=12`).
    High {
        /// Compression level, clamped into range.
        level: i32,
    },
}

impl Default for CompressionMode {
    fn default() -> Self {
        Self::Fast { acceleration: 1 }
    }
}

/// Options for the compressed serialize path.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::{CompressionMode, CompressionOptions};
///
/// let options = CompressionOptions::high(20).with_min_compress_size(256);
/// assert_eq!(options.mode, CompressionMode::High { level: 12 });
/// assert_eq!(options.min_compress_size, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressionOptions {
    /// Encoder used when the payload is large enough.
    pub mode: CompressionMode,

    /// Payloads shorter than this many bytes are stored uncompressed.
    pub min_compress_size: usize,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            mode: CompressionMode::default(),
            min_compress_size: DEFAULT_MIN_COMPRESS_SIZE,
        }
    }
}

impl CompressionOptions {
    /// Fast encoder with the given acceleration.
    #[must_use]
    pub fn fast(acceleration: u32) -> Self {
        Self {
            mode: CompressionMode::Fast {
                acceleration: acceleration.max(1),
            },
            ..Self::default()
        }
    }

    /// High-compression encoder at `level`, clamped to the supported range.
    #[must_use]
    pub fn high(level: i32) -> Self {
        Self {
            mode: CompressionMode::High {
                level: clamp_level(level),
            },
            ..Self::default()
        }
    }

    /// High-compression encoder at the default level.
    #[must_use]
    pub fn high_default() -> Self {
        Self::high(HC_LEVEL_DEFAULT)
    }

    /// Sets the minimum payload size worth compressing.
    #[must_use]
    pub fn with_min_compress_size(mut self, min: usize) -> Self {
        self.min_compress_size = min;
        self
    }
}
