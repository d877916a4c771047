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

//! Structural equality and 32-bit hash codes for well-known value types.
//!
//! Used outside the codec hot path: diagnostics, tests, and as the [`Hash`]
//! implementation of [`Guid`] and [`Timestamp`]. Every comparer is total:
//! equal values always produce equal hash codes.
//!
//! # Examples
//!
//! ```rust
//! use lzpack::equality::{DefaultComparer, EqualityComparer};
//!
//! let cmp = DefaultComparer;
//! assert!(cmp.equals(&f64::NAN, &f64::NAN));
//! assert!(cmp.equals(&0.0f64, &-0.0f64));
//! assert_eq!(cmp.hash_code(&0.0f64), cmp.hash_code(&-0.0f64));
//! ```

use std::time::Duration;

use crate::guid::Guid;
use crate::timestamp::Timestamp;

/// Equality and hashing for values of `T`.
pub trait EqualityComparer<T: ?Sized> {
    /// Returns `true` if `a` and `b` are equal.
    fn equals(&self, a: &T, b: &T) -> bool;

    /// A 32-bit hash code consistent with [`equals`](Self::equals).
    fn hash_code(&self, value: &T) -> i32;
}

/// The comparer for every built-in value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultComparer;

#[inline]
fn fold64(value: u64) -> i32 {
    (value ^ (value >> 32)) as i32
}

#[inline]
fn fold128(value: u128) -> i32 {
    fold64(value as u64) ^ fold64((value >> 64) as u64)
}

/// FNV-1a over a byte run.
fn hash_bytes(bytes: &[u8]) -> i32 {
    let mut hash: u32 = 0x811C_9DC5;
    for &byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash as i32
}

macro_rules! narrow_comparer {
    ($($t:ty),*) => {
        $(
            impl EqualityComparer<$t> for DefaultComparer {
                #[inline]
                fn equals(&self, a: &$t, b: &$t) -> bool {
                    a == b
                }

                #[inline]
                fn hash_code(&self, value: &$t) -> i32 {
                    *value as i32
                }
            }
        )*
    };
}

narrow_comparer!(u8, i8, u16, i16, u32, i32);

macro_rules! wide_comparer {
    ($($t:ty),*) => {
        $(
            impl EqualityComparer<$t> for DefaultComparer {
                #[inline]
                fn equals(&self, a: &$t, b: &$t) -> bool {
                    a == b
                }

                #[inline]
                fn hash_code(&self, value: &$t) -> i32 {
                    fold64(*value as u64)
                }
            }
        )*
    };
}

wide_comparer!(u64, i64, usize, isize);

impl EqualityComparer<u128> for DefaultComparer {
    fn equals(&self, a: &u128, b: &u128) -> bool {
        a == b
    }

    fn hash_code(&self, value: &u128) -> i32 {
        fold128(*value)
    }
}

impl EqualityComparer<i128> for DefaultComparer {
    fn equals(&self, a: &i128, b: &i128) -> bool {
        a == b
    }

    fn hash_code(&self, value: &i128) -> i32 {
        fold128(*value as u128)
    }
}

impl EqualityComparer<bool> for DefaultComparer {
    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }

    fn hash_code(&self, value: &bool) -> i32 {
        i32::from(*value)
    }
}

impl EqualityComparer<char> for DefaultComparer {
    fn equals(&self, a: &char, b: &char) -> bool {
        a == b
    }

    fn hash_code(&self, value: &char) -> i32 {
        *value as i32
    }
}

impl EqualityComparer<f32> for DefaultComparer {
    fn equals(&self, a: &f32, b: &f32) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    fn hash_code(&self, value: &f32) -> i32 {
        if *value == 0.0 {
            0
        } else if value.is_nan() {
            f32::NAN.to_bits() as i32
        } else {
            value.to_bits() as i32
        }
    }
}

impl EqualityComparer<f64> for DefaultComparer {
    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    fn hash_code(&self, value: &f64) -> i32 {
        if *value == 0.0 {
            0
        } else if value.is_nan() {
            fold64(f64::NAN.to_bits())
        } else {
            fold64(value.to_bits())
        }
    }
}

impl EqualityComparer<str> for DefaultComparer {
    fn equals(&self, a: &str, b: &str) -> bool {
        a == b
    }

    fn hash_code(&self, value: &str) -> i32 {
        hash_bytes(value.as_bytes())
    }
}

impl EqualityComparer<[u8]> for DefaultComparer {
    fn equals(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }

    fn hash_code(&self, value: &[u8]) -> i32 {
        hash_bytes(value)
    }
}

impl EqualityComparer<Duration> for DefaultComparer {
    fn equals(&self, a: &Duration, b: &Duration) -> bool {
        a == b
    }

    fn hash_code(&self, value: &Duration) -> i32 {
        fold64(value.as_secs()) ^ value.subsec_nanos() as i32
    }
}

impl EqualityComparer<Guid> for DefaultComparer {
    fn equals(&self, a: &Guid, b: &Guid) -> bool {
        a.as_bytes() == b.as_bytes()
    }

    fn hash_code(&self, value: &Guid) -> i32 {
        value
            .as_bytes()
            .chunks_exact(4)
            .map(|word| i32::from_le_bytes([word[0], word[1], word[2], word[3]]))
            .fold(0, |hash, word| hash ^ word)
    }
}

impl EqualityComparer<Timestamp> for DefaultComparer {
    fn equals(&self, a: &Timestamp, b: &Timestamp) -> bool {
        a.ticks() == b.ticks()
    }

    fn hash_code(&self, value: &Timestamp) -> i32 {
        fold64(value.ticks() as u64)
    }
}
