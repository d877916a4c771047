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

//! 128-bit identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use crate::equality::{DefaultComparer, EqualityComparer};

/// A 16-byte globally unique identifier.
///
/// Stored and encoded as its 16 raw bytes. The text form follows the mixed
/// endian layout where the first three groups are little-endian fields.
///
/// # Examples
///
/// ```rust
/// use lzpack::Guid;
///
/// let id: Guid = "00112233-4455-6677-8899-aabbccddeeff".parse().unwrap();
/// assert_eq!(id.as_bytes()[0], 0x33);
/// assert_eq!(id.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Guid([u8; 16]);

/// Error returned when parsing a malformed GUID string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid guid text {text:?}")]
pub struct ParseGuidError {
    text: String,
}

impl Guid {
    /// The all-zero identifier.
    pub const NIL: Self = Self([0; 16]);

    /// Wraps 16 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier from its text-form fields.
    #[must_use]
    pub fn from_fields(a: u32, b: u16, c: u16, d: [u8; 8]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&a.to_le_bytes());
        bytes[4..6].copy_from_slice(&b.to_le_bytes());
        bytes[6..8].copy_from_slice(&c.to_le_bytes());
        bytes[8..].copy_from_slice(&d);
        Self(bytes)
    }

    /// The raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns `true` for [`Guid::NIL`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0; 16]
    }

    fn fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let b = &self.0;
        let mut d = [0u8; 8];
        d.copy_from_slice(&b[8..]);
        (
            u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            u16::from_le_bytes([b[4], b[5]]),
            u16::from_le_bytes([b[6], b[7]]),
            d,
        )
    }
}

impl From<[u8; 16]> for Guid {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Hash for Guid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(DefaultComparer.hash_code(self));
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c, d) = self.fields();
        write!(f, "{a:08x}-{b:04x}-{c:04x}-{:02x}{:02x}-", d[0], d[1])?;
        for byte in &d[2..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

impl FromStr for Guid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseGuidError { text: s.to_owned() };
        if !s.chars().all(|c| c == '-' || c.is_ascii_hexdigit()) {
            return Err(error());
        }
        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != 5
            || groups.iter().map(|g| g.len()).ne([8usize, 4, 4, 4, 12])
        {
            return Err(error());
        }
        let a = u32::from_str_radix(groups[0], 16).map_err(|_| error())?;
        let b = u16::from_str_radix(groups[1], 16).map_err(|_| error())?;
        let c = u16::from_str_radix(groups[2], 16).map_err(|_| error())?;
        let tail = format!("{}{}", groups[3], groups[4]);
        let mut d = [0u8; 8];
        for (i, byte) in d.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&tail[i * 2..i * 2 + 2], 16).map_err(|_| error())?;
        }
        Ok(Self::from_fields(a, b, c, d))
    }
}
