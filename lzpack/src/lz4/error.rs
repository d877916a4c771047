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

//! LZ4 engine error types.
//!
//! Every bounds violation is detected before the offending read or write
//! happens, so a corrupted block always surfaces as one of these variants.

use thiserror::Error;

/// Errors reported by the LZ4 encoders and decoder.
///
/// # Examples
///
/// ```rust
/// use lzpack::lz4::{self, Lz4Error};
///
/// // A block that ends in the middle of a literal run.
/// let mut out = [0u8; 16];
/// let err = lz4::decompress(&[0x50, b'a'], &mut out).unwrap_err();
/// assert!(matches!(err, Lz4Error::TruncatedInput { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Lz4Error {
    /// The input is larger than the block format can describe.
    #[error("input of {len} bytes exceeds the maximum block input of {max} bytes")]
    InputTooLarge {
        /// Size of the rejected input.
        len: usize,
        /// Largest accepted input.
        max: usize,
    },

    /// The destination buffer cannot hold the compressed block.
    #[error("destination of {capacity} bytes is too small for the compressed block")]
    OutputTooSmall {
        /// Capacity of the destination buffer.
        capacity: usize,
    },

    /// The compressed block ends before the current sequence is complete.
    #[error("compressed block truncated at byte {position}")]
    TruncatedInput {
        /// Source position where more bytes were expected.
        position: usize,
    },

    /// A back-reference points before the start of the decoded output.
    #[error("back-reference offset {offset} is invalid at output position {position}")]
    OffsetOutOfRange {
        /// The encoded offset.
        offset: usize,
        /// Output position of the match.
        position: usize,
    },

    /// Decoding would write past the end of the destination buffer.
    #[error("decoded data overflows the destination at output position {position}")]
    OutputOverflow {
        /// Output position where the overflow would start.
        position: usize,
    },

    /// The decoded size differs from the size the caller announced.
    #[error("decoded {actual} bytes but {expected} were expected")]
    LengthMismatch {
        /// Announced original length.
        expected: usize,
        /// Bytes actually produced.
        actual: usize,
    },
}

impl Lz4Error {
    /// Returns `true` if the error was caused by malformed compressed input.
    #[must_use]
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. }
                | Self::OffsetOutOfRange { .. }
                | Self::OutputOverflow { .. }
                | Self::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_input_classification() {
        assert!(Lz4Error::TruncatedInput { position: 3 }.is_corrupt_input());
        assert!(
            Lz4Error::OffsetOutOfRange {
                offset: 9,
                position: 2
            }
            .is_corrupt_input()
        );
        assert!(!Lz4Error::OutputTooSmall { capacity: 1 }.is_corrupt_input());
        assert!(!Lz4Error::InputTooLarge { len: 1, max: 0 }.is_corrupt_input());
    }

    #[test]
    fn test_display() {
        let err = Lz4Error::LengthMismatch {
            expected: 10,
            actual: 7,
        };
        assert_eq!(err.to_string(), "decoded 7 bytes but 10 were expected");
    }
}
