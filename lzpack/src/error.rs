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

//! Top-level error type for lzpack.
//!
//! Each layer of the engine reports its own error family:
//!
//! 1. **Serialization** ([`SerializationError`]): encode-side failures
//! 2. **Deserialization** ([`DeserializationError`]): malformed or truncated input
//! 3. **Compression** ([`Lz4Error`]): direct use of the block codec
//! 4. **Resolution** ([`ResolveError`]): a type shape that cannot be encoded
//!
//! [`LzpackError`] composes them for callers that want one error type, and
//! classifies every failure the same way regardless of the layer it came
//! from.
//!
//! # Error Handling Strategy
//!
//! - **Argument errors** → fix the call; the input was absent or out of range
//! - **Malformed input** → reject the payload; nothing partial is returned
//! - **Configuration errors** → fix the type declaration; reported at first use
//!
//! # Examples
//!
//! ```rust
//! use lzpack::LzpackError;
//! use lzpack::serialization::DeserializationError;
//!
//! let error: LzpackError = DeserializationError::UnexpectedEof { needed: 4, remaining: 1 }.into();
//! assert!(error.is_deserialization_error());
//! assert!(error.is_malformed_input());
//! ```

use std::error::Error as StdError;
use std::fmt;

use crate::lz4::Lz4Error;
use crate::resolver::ResolveError;
use crate::serialization::{DeserializationError, SerializationError};

/// Top-level error type for lzpack operations.
///
/// # Examples
///
/// ```rust
/// use lzpack::LzpackError;
///
/// fn handle_error(error: LzpackError) {
///     match error {
///         LzpackError::Serialization(e) => eprintln!("encode failed: {e}"),
///         LzpackError::Deserialization(e) => eprintln!("decode failed: {e}"),
///         LzpackError::Compression(e) => eprintln!("lz4 failed: {e}"),
///         LzpackError::Resolve(e) => eprintln!("bad type declaration: {e}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub enum LzpackError {
    /// Encoding a value failed.
    Serialization(SerializationError),

    /// Decoding a value failed.
    Deserialization(DeserializationError),

    /// A direct block compression or decompression call failed.
    Compression(Lz4Error),

    /// A type shape could not be classified.
    Resolve(ResolveError),
}

impl LzpackError {
    /// Returns `true` if this is a serialization error.
    #[must_use]
    pub const fn is_serialization_error(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }

    /// Returns `true` if this is a deserialization error.
    #[must_use]
    pub const fn is_deserialization_error(&self) -> bool {
        matches!(self, Self::Deserialization(_))
    }

    /// Returns `true` if this is a block codec error.
    #[must_use]
    pub const fn is_compression_error(&self) -> bool {
        matches!(self, Self::Compression(_))
    }

    /// Returns `true` if the caller passed an absent or out-of-range input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lzpack::{LzpackError, switcher};
    ///
    /// let error: LzpackError = switcher::deserialize_range::<u8>(&[1, 2], 2, 1)
    ///     .unwrap_err()
    ///     .into();
    /// assert!(error.is_argument_error());
    /// ```
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        match self {
            Self::Serialization(e) => e.is_argument_error(),
            Self::Deserialization(e) => e.is_argument_error(),
            Self::Compression(e) => !e.is_corrupt_input(),
            Self::Resolve(_) => false,
        }
    }

    /// Returns `true` if the input bytes are malformed.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        match self {
            Self::Deserialization(e) => e.is_malformed_input(),
            Self::Compression(e) => e.is_corrupt_input(),
            Self::Serialization(_) | Self::Resolve(_) => false,
        }
    }

    /// Returns `true` if a type declaration is unusable.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::Serialization(e) => e.is_configuration_error(),
            Self::Deserialization(e) => e.is_configuration_error(),
            Self::Compression(_) => false,
            Self::Resolve(_) => true,
        }
    }
}

impl fmt::Display for LzpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization(e) => write!(f, "serialization error: {e}"),
            Self::Deserialization(e) => write!(f, "deserialization error: {e}"),
            Self::Compression(e) => write!(f, "compression error: {e}"),
            Self::Resolve(e) => write!(f, "type resolution error: {e}"),
        }
    }
}

impl StdError for LzpackError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Serialization(e) => Some(e),
            Self::Deserialization(e) => Some(e),
            Self::Compression(e) => Some(e),
            Self::Resolve(e) => Some(e),
        }
    }
}

impl From<SerializationError> for LzpackError {
    fn from(error: SerializationError) -> Self {
        Self::Serialization(error)
    }
}

impl From<DeserializationError> for LzpackError {
    fn from(error: DeserializationError) -> Self {
        Self::Deserialization(error)
    }
}

impl From<Lz4Error> for LzpackError {
    fn from(error: Lz4Error) -> Self {
        Self::Compression(error)
    }
}

impl From<ResolveError> for LzpackError {
    fn from(error: ResolveError) -> Self {
        Self::Resolve(error)
    }
}
