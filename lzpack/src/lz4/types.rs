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

//! Block-format constants shared by the encoders and the decoder.

/// Shortest back-reference the block format can express.
pub const MINMATCH: usize = 4;

/// The last five bytes of a block are always literals.
pub const LASTLITERALS: usize = 5;

/// A match must start at least this many bytes before the end of the block.
pub const MFLIMIT: usize = 12;

/// Inputs shorter than this are emitted as a single literal run.
pub const MIN_LENGTH: usize = MFLIMIT + 1;

/// Largest back-reference distance (16-bit little-endian offset).
pub const MAX_DISTANCE: usize = 65_535;

/// Largest input accepted by the block encoders.
pub const MAX_INPUT_SIZE: usize = 0x7E00_0000;

pub(crate) const ML_BITS: u32 = 4;
pub(crate) const ML_MASK: usize = (1 << ML_BITS) - 1;
pub(crate) const RUN_MASK: usize = (1 << (8 - ML_BITS)) - 1;

/// Inputs below this size index their positions in the denser 16-bit table class.
pub(crate) const LIMIT_64K: usize = 65_536 + (MFLIMIT - 1);

/// Hash log of the fast-path table for inputs of 64 KiB and more.
pub(crate) const HASH_LOG: u32 = 12;

/// Hash log of the fast-path table for inputs under 64 KiB.
pub(crate) const HASH_LOG_64K: u32 = HASH_LOG + 1;

/// Match search acceleration: the step grows by one every `1 << SKIP_TRIGGER` misses.
pub(crate) const SKIP_TRIGGER: u32 = 6;

/// Hash log of the high-compression hash table.
pub(crate) const HC_HASH_LOG: u32 = 15;

/// Number of entries in the high-compression chain table.
pub(crate) const HC_CHAIN_SIZE: usize = 1 << 16;

/// Mask applied to a logical index to find its chain slot.
pub(crate) const HC_CHAIN_MASK: usize = HC_CHAIN_SIZE - 1;

/// History kept by a streaming context between blocks.
pub const DICTIONARY_SIZE: usize = 64 * 1024;

/// Lowest high-compression level.
pub const HC_LEVEL_MIN: i32 = 1;

/// Default high-compression level.
pub const HC_LEVEL_DEFAULT: i32 = 9;

/// First level that switches to the price-driven optimal parser.
pub const HC_LEVEL_OPT_MIN: i32 = 10;

/// Highest high-compression level.
pub const HC_LEVEL_MAX: i32 = 12;

/// Knuth's multiplicative constant used by every LZ4 hash.
pub(crate) const PRIME32: u32 = 2_654_435_761;

/// Hashes a 4-byte sequence into a table of `1 << hash_log` entries.
#[inline]
pub(crate) fn hash_sequence(sequence: u32, hash_log: u32) -> usize {
    (sequence.wrapping_mul(PRIME32) >> ((MINMATCH as u32 * 8) - hash_log)) as usize
}

/// Reads the little-endian 32-bit sequence starting at `pos`.
#[inline]
pub(crate) fn read_u32(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

/// Worst-case compressed size of an input of `len` bytes.
///
/// Returns `0` when `len` exceeds [`MAX_INPUT_SIZE`].
#[must_use]
pub const fn compress_bound(len: usize) -> usize {
    if len > MAX_INPUT_SIZE {
        0
    } else {
        len + len / 255 + 16
    }
}

/// Search effort for one high-compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelParams {
    /// Chain candidates examined per position.
    pub attempts: u32,
    /// How many following positions the lazy evaluator looks ahead.
    pub lookahead: usize,
}

const LEVEL_TABLE: [LevelParams; 13] = [
    LevelParams { attempts: 2, lookahead: 0 },
    LevelParams { attempts: 2, lookahead: 0 },
    LevelParams { attempts: 2, lookahead: 0 },
    LevelParams { attempts: 4, lookahead: 1 },
    LevelParams { attempts: 8, lookahead: 1 },
    LevelParams { attempts: 16, lookahead: 1 },
    LevelParams { attempts: 32, lookahead: 1 },
    LevelParams { attempts: 64, lookahead: 1 },
    LevelParams { attempts: 128, lookahead: 1 },
    LevelParams { attempts: 256, lookahead: 1 },
    LevelParams { attempts: 96, lookahead: 2 },
    LevelParams { attempts: 512, lookahead: 2 },
    LevelParams { attempts: 16_384, lookahead: 3 },
];

/// Clamps a requested level into `[HC_LEVEL_MIN, HC_LEVEL_MAX]`.
#[must_use]
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(HC_LEVEL_MIN, HC_LEVEL_MAX)
}

pub(crate) fn level_params(level: i32) -> LevelParams {
    LEVEL_TABLE[clamp_level(level) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_reference_shifts() {
        let seq: u32 = 0x6463_6261;
        let expected = seq.wrapping_mul(2_654_435_761u32) >> 20;
        assert_eq!(hash_sequence(seq, HASH_LOG), expected as usize);
        assert_eq!(
            hash_sequence(seq, HASH_LOG_64K),
            (seq.wrapping_mul(2_654_435_761u32) >> 19) as usize
        );
        assert!(hash_sequence(u32::MAX, HC_HASH_LOG) < 1 << HC_HASH_LOG);
    }

    #[test]
    fn test_compress_bound() {
        assert_eq!(compress_bound(0), 16);
        assert_eq!(compress_bound(255), 255 + 1 + 16);
        assert_eq!(compress_bound(MAX_INPUT_SIZE + 1), 0);
    }

    #[test]
    fn test_level_clamping() {
        assert_eq!(clamp_level(-3), HC_LEVEL_MIN);
        assert_eq!(clamp_level(0), HC_LEVEL_MIN);
        assert_eq!(clamp_level(9), 9);
        assert_eq!(clamp_level(40), HC_LEVEL_MAX);
        assert_eq!(level_params(100), level_params(HC_LEVEL_MAX));
    }
}
