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

//! Serialization error types.
//!
//! Two families, one per direction. Both are returned, never logged, so the
//! host application decides how failures are observed.
//!
//! # Error Categories
//!
//! - **Argument errors**: a required value is absent or a sub-view is out of
//!   range. Reported at the call boundary before any work is done.
//! - **Malformed input**: truncated buffers, bad varints, unknown
//!   discriminators, corrupt LZ4 blocks. No partial value is ever returned.
//! - **Configuration errors**: a type's shape cannot be classified
//!   ([`ResolveError`]). Reported at first use of the type.

use thiserror::Error;

use crate::lz4::Lz4Error;
use crate::resolver::ResolveError;

/// Error that occurs while encoding a value.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::SerializationError;
/// use lzpack::switcher;
///
/// let absent: Option<Vec<u8>> = None;
/// let err = switcher::serialize(&absent).unwrap_err();
/// assert!(matches!(err, SerializationError::ValueRequired { .. }));
/// assert!(err.is_argument_error());
/// ```
#[derive(Debug, Error)]
pub enum SerializationError {
    /// A nullable buffer representation was `None` where a value is required.
    #[error("a value of type {type_name} is required")]
    ValueRequired {
        /// The requested type.
        type_name: &'static str,
    },

    /// A length or count does not fit the wire format.
    #[error("length {len} of {what} exceeds the wire-format limit of {max}")]
    LengthOverflow {
        /// What was being written.
        what: &'static str,
        /// The offending length.
        len: usize,
        /// Largest encodable length.
        max: usize,
    },

    /// The writer was not created in compressible mode.
    #[error("writer was not created in compressible mode")]
    NotCompressible,

    /// The LZ4 encoder failed.
    #[error("lz4 compression failed: {0}")]
    Compression(#[from] Lz4Error),

    /// The type's shape could not be classified.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A custom codec reported a failure.
    #[error("{message}")]
    Custom {
        /// Description of the failure.
        message: String,
    },
}

impl SerializationError {
    /// Creates a custom serialization error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lzpack::serialization::SerializationError;
    ///
    /// let error = SerializationError::custom("unsupported value");
    /// assert_eq!(error.to_string(), "unsupported value");
    /// ```
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's arguments.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ValueRequired { .. } | Self::NotCompressible)
    }

    /// Returns `true` for type-shape configuration errors.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }
}

/// Error that occurs while decoding a value.
///
/// # Examples
///
/// ```rust
/// use lzpack::serialization::DeserializationError;
/// use lzpack::switcher;
///
/// // A string announcing 5 bytes but carrying 2.
/// let err = switcher::deserialize::<String>(&[5, b'h', b'i']).unwrap_err();
/// assert!(matches!(err, DeserializationError::UnexpectedEof { needed: 5, remaining: 2 }));
/// assert!(err.is_malformed_input());
/// ```
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The source buffer is absent.
    #[error("a source buffer for {type_name} is required")]
    ValueRequired {
        /// The requested type.
        type_name: &'static str,
    },

    /// The requested sub-view lies outside the source buffer.
    #[error("range {offset}..{offset}+{len} is outside a buffer of {available} bytes")]
    InvalidRange {
        /// Requested start offset.
        offset: usize,
        /// Requested length.
        len: usize,
        /// Bytes available in the source.
        available: usize,
    },

    /// A read would run past the end of the view.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the view.
        remaining: usize,
    },

    /// A LEB128 varint is longer than ten bytes or overflows 64 bits.
    #[error("malformed varint at position {position}")]
    MalformedVarint {
        /// Read position where the varint started.
        position: usize,
    },

    /// The discriminator does not name a known variant.
    #[error("invalid discriminator {tag} for {type_name}")]
    InvalidDiscriminator {
        /// The type being decoded.
        type_name: &'static str,
        /// The tag that was read.
        tag: u64,
    },

    /// A length-delimited payload was not consumed exactly.
    #[error("{what}: declared {expected} bytes but {actual} were consumed")]
    LengthMismatch {
        /// What was being decoded.
        what: &'static str,
        /// Declared payload length.
        expected: usize,
        /// Bytes actually consumed.
        actual: usize,
    },

    /// A string payload is not valid UTF-8.
    #[error("invalid utf-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A decoded value violates its type's invariants.
    #[error("invalid {type_name} value: {reason}")]
    InvalidValue {
        /// The type being decoded.
        type_name: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The LZ4 decoder rejected the payload.
    #[error("lz4 decompression failed: {0}")]
    Compression(#[from] Lz4Error),

    /// The type's shape could not be classified.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A custom codec reported a failure.
    #[error("{message}")]
    Custom {
        /// Description of the failure.
        message: String,
    },
}

impl DeserializationError {
    /// Creates a custom deserialization error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's arguments.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ValueRequired { .. } | Self::InvalidRange { .. })
    }

    /// Returns `true` if the input bytes are malformed.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. }
                | Self::MalformedVarint { .. }
                | Self::InvalidDiscriminator { .. }
                | Self::LengthMismatch { .. }
                | Self::InvalidUtf8(_)
                | Self::InvalidValue { .. }
                | Self::Compression(_)
        )
    }

    /// Returns `true` for type-shape configuration errors.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_serialization_error_display() {
        let error = SerializationError::ValueRequired {
            type_name: "Option<Vec<u8>>",
        };
        assert_eq!(error.to_string(), "a value of type Option<Vec<u8>> is required");
        assert!(error.is_argument_error());
        assert!(!error.is_configuration_error());
    }

    #[test]
    fn test_serialization_error_from_lz4() {
        let error: SerializationError = Lz4Error::OutputTooSmall { capacity: 4 }.into();
        assert!(error.to_string().contains("lz4 compression failed"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_deserialization_error_classification() {
        let eof = DeserializationError::UnexpectedEof {
            needed: 4,
            remaining: 1,
        };
        assert!(eof.is_malformed_input());
        assert!(!eof.is_argument_error());

        let range = DeserializationError::InvalidRange {
            offset: 10,
            len: 5,
            available: 12,
        };
        assert!(range.is_argument_error());
        assert_eq!(range.to_string(), "range 10..10+5 is outside a buffer of 12 bytes");
    }

    #[test]
    fn test_deserialization_error_from_utf8() {
        let bad = [0xFFu8, 0xFE];
        let utf8 = std::str::from_utf8(&bad).unwrap_err();
        let error: DeserializationError = utf8.into();
        assert!(error.is_malformed_input());
        assert!(error.source().is_some());
    }

    #[test]
    fn test_custom_errors() {
        assert_eq!(DeserializationError::custom("boom").to_string(), "boom");
        let invalid = DeserializationError::invalid_value("char", "surrogate");
        assert_eq!(invalid.to_string(), "invalid char value: surrogate");
    }
}
