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

//! LZ4 block compression.
//!
//! A safe, index-based implementation of the LZ4 block format with two
//! encoders sharing one decoder:
//!
//! - **Fast** ([`compress`]): single pass, one candidate per hash bucket.
//! - **High compression** ([`compress_hc`]): hash chains with up to 16384
//!   candidates per position and price-driven lazy matching.
//!
//! Blocks produced by either encoder are interchangeable with any LZ4 block
//! decoder. The decoder validates every length and offset before touching
//! memory, so corrupted input yields an [`Lz4Error`] rather than a panic.
//!
//! ```text
//! sequence := token [literal-len ext] literals offset(u16 LE) [match-len ext]
//! token    := literal-len(4 bits) | match-len - 4 (4 bits)
//! ext      := 255* (0..254)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use lzpack::lz4;
//!
//! let input = b"abcabcabcabcabcabcabcabcabcabcabcabc".repeat(8);
//! let mut packed = vec![0u8; lz4::compress_bound(input.len())];
//! let n = lz4::compress_hc(&input, &mut packed, lz4::HC_LEVEL_DEFAULT).unwrap();
//! assert!(n < input.len());
//!
//! let mut out = vec![0u8; input.len()];
//! lz4::decompress_exact(&packed[..n], &mut out).unwrap();
//! assert_eq!(out, input);
//! ```

mod block;
mod decode;
mod engine;
mod error;
mod hc;
mod sequence;
mod stream;
mod types;
mod width;

pub use engine::{Lz4Engine, engine, engine_for};
pub use error::Lz4Error;
pub use sequence::{literals_price, sequence_price};
pub use stream::Lz4HcStream;
pub use types::{
    DICTIONARY_SIZE, HC_LEVEL_DEFAULT, HC_LEVEL_MAX, HC_LEVEL_MIN, HC_LEVEL_OPT_MIN, LASTLITERALS,
    MAX_DISTANCE, MAX_INPUT_SIZE, MFLIMIT, MINMATCH, clamp_level, compress_bound,
};
pub use width::AddressWidth;

/// Compresses `src` into `dst` with the fast encoder.
///
/// `dst` should be at least [`compress_bound`]`(src.len())` bytes.
pub fn compress(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    engine().compress(src, dst, 1)
}

/// Fast encoder with an explicit acceleration factor (`1` = best ratio).
pub fn compress_with_acceleration(
    src: &[u8],
    dst: &mut [u8],
    acceleration: u32,
) -> Result<usize, Lz4Error> {
    engine().compress(src, dst, acceleration)
}

/// Compresses `src` into `dst` with the high-compression encoder.
pub fn compress_hc(src: &[u8], dst: &mut [u8], level: i32) -> Result<usize, Lz4Error> {
    engine().compress_hc(src, dst, level)
}

/// Decodes one block into `dst` and returns the decoded length.
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    engine().decompress(src, dst)
}

/// Decodes one block that must fill `dst` exactly.
pub fn decompress_exact(src: &[u8], dst: &mut [u8]) -> Result<(), Lz4Error> {
    let produced = engine().decompress(src, dst)?;
    if produced != dst.len() {
        return Err(Lz4Error::LengthMismatch {
            expected: dst.len(),
            actual: produced,
        });
    }
    Ok(())
}

/// Decodes one block whose back-references may reach into `dict`.
pub fn decompress_with_dict(src: &[u8], dst: &mut [u8], dict: &[u8]) -> Result<usize, Lz4Error> {
    engine().decompress_with_dict(src, dst, dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_exact_rejects_short_output() {
        let input = b"short";
        let mut packed = vec![0u8; compress_bound(input.len())];
        let n = compress(input, &mut packed).unwrap();
        let mut out = vec![0u8; 8];
        assert_eq!(
            decompress_exact(&packed[..n], &mut out),
            Err(Lz4Error::LengthMismatch {
                expected: 8,
                actual: 5
            })
        );
    }

    #[test]
    fn test_fast_and_hc_share_decoder() {
        let input: Vec<u8> = (0..70_000u32).map(|i| (i % 1_000 / 7) as u8).collect();
        let mut fast = vec![0u8; compress_bound(input.len())];
        let mut high = vec![0u8; compress_bound(input.len())];
        let nf = compress(&input, &mut fast).unwrap();
        let nh = compress_hc(&input, &mut high, HC_LEVEL_MAX).unwrap();
        assert!(nh <= nf);

        for block in [&fast[..nf], &high[..nh]] {
            let mut out = vec![0u8; input.len()];
            decompress_exact(block, &mut out).unwrap();
            assert_eq!(out, input);
        }
    }
}
