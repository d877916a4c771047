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

//! Calendar timestamps with an explicit kind.
//!
//! A [`Timestamp`] counts 100-nanosecond ticks since `0001-01-01T00:00:00`
//! and carries a [`DateTimeKind`] telling whether the value is UTC, local, or
//! unspecified. The kind is metadata: forcing a different kind never shifts
//! the tick count.
//!
//! # Wire form
//!
//! ```text
//! 63 62 61                                                     0
//! +-----+-------------------------------------------------------+
//! |kind |                    ticks (62 bits)                    |
//! +-----+-------------------------------------------------------+
//! ```
//!
//! Written as 8 little-endian bytes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::equality::{DefaultComparer, EqualityComparer};

/// Ticks per second (one tick is 100 ns).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Largest valid tick count: `9999-12-31T23:59:59.9999999`.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Seconds between `0001-01-01` and the Unix epoch.
const UNIX_EPOCH_SECONDS: i64 = 62_135_596_800;

const KIND_SHIFT: u32 = 62;
const TICKS_MASK: u64 = (1 << KIND_SHIFT) - 1;

/// Interpretation of a timestamp's wall-clock value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DateTimeKind {
    /// No time zone information.
    #[default]
    Unspecified = 0,
    /// Coordinated Universal Time.
    Utc = 1,
    /// The host's local time.
    Local = 2,
}

impl DateTimeKind {
    fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Utc),
            2 => Some(Self::Local),
            _ => None,
        }
    }
}

/// A point on the proleptic Gregorian calendar, years 1 through 9999.
///
/// Equality, ordering and hashing consider only the tick count, so a UTC
/// value equals an unspecified value with the same wall clock.
///
/// # Examples
///
/// ```rust
/// use lzpack::timestamp::{DateTimeKind, Timestamp};
///
/// let local = Timestamp::from_ymd_hms(2021, 5, 1, 5, 8, 7, DateTimeKind::Local).unwrap();
/// let utc = local.specify_kind(DateTimeKind::Utc);
/// assert_eq!(utc.ticks(), local.ticks());
/// assert_eq!(utc.kind(), DateTimeKind::Utc);
/// assert_eq!(utc.to_string(), "2021-05-01T05:08:07Z");
/// ```
#[derive(Clone, Copy)]
pub struct Timestamp {
    ticks: i64,
    kind: DateTimeKind,
}

impl Timestamp {
    /// `0001-01-01T00:00:00`, unspecified kind.
    pub const MIN: Self = Self {
        ticks: 0,
        kind: DateTimeKind::Unspecified,
    };

    /// `9999-12-31T23:59:59.9999999`, unspecified kind.
    pub const MAX: Self = Self {
        ticks: MAX_TICKS,
        kind: DateTimeKind::Unspecified,
    };

    /// Creates a timestamp from a raw tick count.
    ///
    /// Returns `None` when `ticks` is outside `0..=MAX_TICKS`.
    #[must_use]
    pub const fn from_ticks(ticks: i64, kind: DateTimeKind) -> Option<Self> {
        if ticks < 0 || ticks > MAX_TICKS {
            None
        } else {
            Some(Self { ticks, kind })
        }
    }

    /// Creates a timestamp from calendar fields.
    #[must_use]
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        kind: DateTimeKind,
    ) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        Self::from_naive(naive, kind)
    }

    /// Converts a chrono wall-clock value, truncating to tick precision.
    #[must_use]
    pub fn from_naive(value: NaiveDateTime, kind: DateTimeKind) -> Option<Self> {
        let utc = value.and_utc();
        let seconds = utc.timestamp().checked_add(UNIX_EPOCH_SECONDS)?;
        let ticks = seconds
            .checked_mul(TICKS_PER_SECOND)?
            .checked_add(i64::from(utc.timestamp_subsec_nanos() / 100))?;
        Self::from_ticks(ticks, kind)
    }

    /// The wall-clock value as a chrono type.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let seconds = self.ticks.div_euclid(TICKS_PER_SECOND) - UNIX_EPOCH_SECONDS;
        let nanos = (self.ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        DateTime::from_timestamp(seconds, nanos).map(|value| value.naive_utc())
    }

    /// 100-nanosecond ticks since `0001-01-01T00:00:00`.
    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// The kind tag.
    #[must_use]
    pub const fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Same ticks, different kind.
    #[must_use]
    pub const fn specify_kind(self, kind: DateTimeKind) -> Self {
        Self {
            ticks: self.ticks,
            kind,
        }
    }

    /// Packs kind and ticks into the 64-bit wire form.
    #[must_use]
    pub const fn to_binary(&self) -> i64 {
        ((self.kind as u64) << KIND_SHIFT | self.ticks as u64) as i64
    }

    /// Unpacks the 64-bit wire form.
    ///
    /// Returns `None` for an unknown kind or an out-of-range tick count.
    #[must_use]
    pub fn from_binary(value: i64) -> Option<Self> {
        let raw = value as u64;
        let kind = DateTimeKind::from_bits(raw >> KIND_SHIFT)?;
        Self::from_ticks((raw & TICKS_MASK) as i64, kind)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::MIN
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        DefaultComparer.equals(self, other)
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(DefaultComparer.hash_code(self));
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self}, {:?})", self.kind)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = self.to_naive() else {
            return write!(f, "<{} ticks>", self.ticks);
        };
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            value.year(),
            value.month(),
            value.day(),
            value.hour(),
            value.minute(),
            value.second()
        )?;
        let fraction = self.ticks % TICKS_PER_SECOND;
        if fraction != 0 {
            write!(f, ".{fraction:07}")?;
        }
        if self.kind == DateTimeKind::Utc {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

impl TryFrom<NaiveDateTime> for Timestamp {
    type Error = NaiveDateTime;

    fn try_from(value: NaiveDateTime) -> Result<Self, Self::Error> {
        Self::from_naive(value, DateTimeKind::Unspecified).ok_or(value)
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = DateTime<Utc>;

    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_naive(value.naive_utc(), DateTimeKind::Utc).ok_or(value)
    }
}
