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

//! Address-width specializations.
//!
//! The encoders are written once, generic over [`Width`]. The two
//! implementations differ only in how wide a stored table position is and how
//! many bytes a single match-length comparison consumes.

use super::types::{MINMATCH, read_u32};

/// Native address width of an engine specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// 32-bit table positions and 4-byte comparisons.
    Bits32,
    /// 64-bit table positions and 8-byte comparisons.
    Bits64,
}

impl AddressWidth {
    /// The width of the executing target.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}

pub(crate) trait Width: Send + Sync + 'static {
    /// Position type stored in hash tables.
    type Offset: Copy + Default + Send + Sync + 'static;

    const WIDTH: AddressWidth;

    /// Bytes compared per step while counting match lengths.
    const REG_BYTES: usize;

    /// Logical index at which a streaming context must rebase.
    const INDEX_LIMIT: usize;

    fn store(index: usize) -> Self::Offset;

    fn load(offset: Self::Offset) -> usize;

    fn read_reg(src: &[u8], pos: usize) -> u64;

    /// Widens a 4-byte pattern to a full register.
    fn spread_pattern(pattern: u32) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Width32;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Width64;

impl Width for Width32 {
    type Offset = u32;

    const WIDTH: AddressWidth = AddressWidth::Bits32;
    const REG_BYTES: usize = 4;
    const INDEX_LIMIT: usize = 1 << 31;

    #[inline]
    fn store(index: usize) -> u32 {
        index as u32
    }

    #[inline]
    fn load(offset: u32) -> usize {
        offset as usize
    }

    #[inline]
    fn read_reg(src: &[u8], pos: usize) -> u64 {
        u64::from(read_u32(src, pos))
    }

    #[inline]
    fn spread_pattern(pattern: u32) -> u64 {
        u64::from(pattern)
    }
}

impl Width for Width64 {
    type Offset = u64;

    const WIDTH: AddressWidth = AddressWidth::Bits64;
    const REG_BYTES: usize = 8;
    const INDEX_LIMIT: usize = usize::MAX >> 2;

    #[inline]
    fn store(index: usize) -> u64 {
        index as u64
    }

    #[inline]
    fn load(offset: u64) -> usize {
        offset as usize
    }

    #[inline]
    fn read_reg(src: &[u8], pos: usize) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&src[pos..pos + 8]);
        u64::from_le_bytes(word)
    }

    #[inline]
    fn spread_pattern(pattern: u32) -> u64 {
        u64::from(pattern) | (u64::from(pattern) << 32)
    }
}

/// Counts how many bytes starting at `ip` equal the bytes starting at
/// `matched`, stopping at `limit`. Requires `matched < ip`.
#[inline]
pub(crate) fn count<W: Width>(
    src: &[u8],
    mut ip: usize,
    mut matched: usize,
    limit: usize,
) -> usize {
    let start = ip;
    while ip + W::REG_BYTES <= limit {
        let diff = W::read_reg(src, ip) ^ W::read_reg(src, matched);
        if diff == 0 {
            ip += W::REG_BYTES;
            matched += W::REG_BYTES;
            continue;
        }
        return ip + (diff.trailing_zeros() / 8) as usize - start;
    }
    while ip < limit && src[ip] == src[matched] {
        ip += 1;
        matched += 1;
    }
    ip - start
}

/// Counts bytes from `ip` that continue the repeating 4-byte `pattern`.
pub(crate) fn count_pattern<W: Width>(
    src: &[u8],
    mut ip: usize,
    limit: usize,
    pattern: u32,
) -> usize {
    let start = ip;
    let reg = W::spread_pattern(pattern);
    while ip + W::REG_BYTES <= limit {
        let diff = W::read_reg(src, ip) ^ reg;
        if diff == 0 {
            ip += W::REG_BYTES;
            continue;
        }
        return ip + (diff.trailing_zeros() / 8) as usize - start;
    }
    let mut byte = reg;
    while ip < limit && src[ip] == byte as u8 {
        ip += 1;
        byte >>= 8;
    }
    ip - start
}

/// Counts bytes before `ip`, down to `low`, that continue `pattern` backwards.
/// `pattern` is aligned so that its first byte sits at `ip`.
pub(crate) fn reverse_count_pattern(src: &[u8], mut ip: usize, low: usize, pattern: u32) -> usize {
    let start = ip;
    while ip >= low + MINMATCH {
        if read_u32(src, ip - MINMATCH) != pattern {
            break;
        }
        ip -= MINMATCH;
    }
    let bytes = pattern.to_le_bytes();
    let mut idx = bytes.len();
    while ip > low && idx > 0 {
        if src[ip - 1] != bytes[idx - 1] {
            break;
        }
        ip -= 1;
        idx -= 1;
    }
    start - ip
}

/// Re-aligns a repeating pattern after moving `rotate` bytes along it.
#[inline]
pub(crate) fn rotate_pattern(rotate: usize, pattern: u32) -> u32 {
    let bits = ((rotate & (MINMATCH - 1)) << 3) as u32;
    pattern.rotate_left(bits)
}

/// Returns `true` when all four bytes of the sequence are equal (a period-1 run).
#[inline]
pub(crate) fn is_repeating(pattern: u32) -> bool {
    (pattern & 0xFFFF) == (pattern >> 16) && (pattern & 0xFF) == (pattern >> 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_agrees_across_widths() {
        let mut data = b"abcdefgh_abcdefgh_abcdefgX".to_vec();
        data.extend_from_slice(&[0u8; 8]);
        let limit = data.len();
        let a = count::<Width32>(&data, 9, 0, limit);
        let b = count::<Width64>(&data, 9, 0, limit);
        assert_eq!(a, b);
        assert_eq!(a, 16);
    }

    #[test]
    fn test_count_stops_at_limit() {
        let data = [7u8; 40];
        assert_eq!(count::<Width64>(&data, 10, 0, 25), 15);
        assert_eq!(count::<Width32>(&data, 10, 0, 25), 15);
    }

    #[test]
    fn test_count_pattern() {
        let data = [0xAAu8; 21];
        let pattern = read_u32(&data, 0);
        assert_eq!(count_pattern::<Width64>(&data, 0, data.len(), pattern), 21);
        assert_eq!(count_pattern::<Width32>(&data, 0, data.len(), pattern), 21);

        let mut mixed = b"ababababab".to_vec();
        mixed.push(b'c');
        let pattern = read_u32(&mixed, 0);
        assert_eq!(count_pattern::<Width64>(&mixed, 0, mixed.len(), pattern), 10);
    }

    #[test]
    fn test_reverse_count_pattern() {
        let data = b"xyzabababab";
        // pattern aligned at index 5 ("abab")
        let pattern = read_u32(data, 5);
        assert_eq!(reverse_count_pattern(data, 5, 0, pattern), 2);
        assert_eq!(reverse_count_pattern(data, 5, 4, pattern), 1);
    }

    #[test]
    fn test_rotate_pattern_uses_rotl32() {
        let pattern = 0x4433_2211;
        assert_eq!(rotate_pattern(0, pattern), pattern);
        assert_eq!(rotate_pattern(1, pattern), 0x3322_1144);
        assert_eq!(rotate_pattern(5, pattern), 0x3322_1144);
    }

    #[test]
    fn test_is_repeating() {
        assert!(is_repeating(0x6161_6161));
        assert!(is_repeating(0x0000_0000));
        assert!(!is_repeating(0x6261_6261));
        assert!(!is_repeating(0x6463_6261));
    }

    #[test]
    fn test_native_width() {
        let width = AddressWidth::native();
        assert_eq!(width.bits() as usize, usize::BITS as usize);
    }
}
