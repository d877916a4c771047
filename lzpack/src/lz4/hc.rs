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

//! High-compression block compressor.
//!
//! Positions are tracked as logical indices: `window[i - base]` is the byte at
//! logical index `i`. The hash table maps a 4-byte sequence to its most recent
//! logical index and the chain table links every index to the previous one
//! with the same hash, stored as a 16-bit delta capped at [`MAX_DISTANCE`].
//!
//! ```text
//!  low_limit        dict_limit                 end
//!     |  history        |   block being encoded  |
//!     +-----------------+------------------------+
//!     ^ base == low_limit for a fresh window
//! ```

use std::fmt;

use super::error::Lz4Error;
use super::sequence::{SequenceWriter, sequence_price};
use super::types::{
    DICTIONARY_SIZE, HC_CHAIN_MASK, HC_CHAIN_SIZE, HC_HASH_LOG, LASTLITERALS, LevelParams,
    MAX_DISTANCE, MAX_INPUT_SIZE, MFLIMIT, MIN_LENGTH, MINMATCH, clamp_level, hash_sequence,
    level_params, read_u32,
};
use super::width::{
    Width, count, count_pattern, is_repeating, reverse_count_pattern, rotate_pattern,
};

/// First logical index handed out by a fresh context.
///
/// Zeroed hash slots therefore always sit more than [`MAX_DISTANCE`] behind
/// any real position and are never mistaken for a candidate.
pub(crate) const START_INDEX: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HcMatch {
    start: usize,
    offset: usize,
    len: usize,
}

impl HcMatch {
    fn end(&self) -> usize {
        self.start + self.len
    }

    /// Bytes saved relative to storing everything from `anchor` as literals.
    fn gain(&self, anchor: usize) -> isize {
        (self.end() - anchor) as isize - sequence_price(self.start - anchor, self.len) as isize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Untested,
    Confirmed,
    Rejected,
}

pub(crate) struct HcContext<W: Width> {
    hash_table: Vec<W::Offset>,
    chain_table: Vec<u16>,
    base: usize,
    dict_limit: usize,
    low_limit: usize,
    next_to_update: usize,
    level: i32,
}

impl<W: Width> fmt::Debug for HcContext<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HcContext")
            .field("width", &W::WIDTH)
            .field("base", &self.base)
            .field("dict_limit", &self.dict_limit)
            .field("low_limit", &self.low_limit)
            .field("next_to_update", &self.next_to_update)
            .field("level", &self.level)
            .finish()
    }
}

impl<W: Width> HcContext<W> {
    pub(crate) fn new(level: i32) -> Self {
        Self {
            hash_table: vec![W::Offset::default(); 1 << HC_HASH_LOG],
            chain_table: vec![0; HC_CHAIN_SIZE],
            base: START_INDEX,
            dict_limit: START_INDEX,
            low_limit: START_INDEX,
            next_to_update: START_INDEX,
            level: clamp_level(level),
        }
    }

    pub(crate) fn reset(&mut self, level: i32) {
        self.hash_table.fill(W::Offset::default());
        self.chain_table.fill(0);
        self.base = START_INDEX;
        self.dict_limit = START_INDEX;
        self.low_limit = START_INDEX;
        self.next_to_update = START_INDEX;
        self.level = clamp_level(level);
    }

    pub(crate) fn level(&self) -> i32 {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: i32) {
        self.level = clamp_level(level);
    }

    #[inline]
    fn hash_at(&self, window: &[u8], index: usize) -> usize {
        hash_sequence(read_u32(window, index - self.base), HC_HASH_LOG)
    }

    /// Indexes every position in `[next_to_update, target)`.
    fn insert(&mut self, window: &[u8], target: usize) {
        let mut index = self.next_to_update;
        if target <= index {
            return;
        }
        while index < target {
            let h = self.hash_at(window, index);
            let previous = W::load(self.hash_table[h]);
            let delta = index.saturating_sub(previous).min(MAX_DISTANCE);
            self.chain_table[index & HC_CHAIN_MASK] = delta as u16;
            self.hash_table[h] = W::store(index);
            index += 1;
        }
        self.next_to_update = target;
    }

    /// Searches the chain at `ip` for a match longer than `longest`.
    ///
    /// Matches may extend backwards down to `low`; the returned start is never
    /// below it. Candidates are always verified byte for byte.
    fn find_wider_match(
        &mut self,
        window: &[u8],
        ip: usize,
        low: usize,
        limit: usize,
        longest: usize,
        params: LevelParams,
    ) -> Option<HcMatch> {
        self.insert(window, ip);
        let base = self.base;
        let lowest = self.low_limit.max(ip.saturating_sub(MAX_DISTANCE));
        let look_back = ip - low;
        let pattern = read_u32(window, ip - base);

        let mut best = None;
        let mut best_len = longest;
        let mut repeat = Repeat::Untested;
        let mut src_pattern_len = 0usize;
        let mut attempts = params.attempts;
        let mut candidate = W::load(self.hash_table[self.hash_at(window, ip)]);

        while candidate >= lowest && candidate < ip && attempts > 0 {
            attempts -= 1;
            if read_u32(window, candidate - base) == pattern {
                let forward = MINMATCH
                    + count::<W>(
                        window,
                        ip - base + MINMATCH,
                        candidate - base + MINMATCH,
                        limit - base,
                    );
                let mut back = 0usize;
                while back < look_back
                    && candidate - back > self.low_limit
                    && window[ip - base - back - 1] == window[candidate - base - back - 1]
                {
                    back += 1;
                }
                let len = forward + back;
                if len > best_len {
                    best_len = len;
                    best = Some(HcMatch {
                        start: ip - back,
                        offset: ip - candidate,
                        len,
                    });
                    if ip + forward >= limit {
                        break;
                    }
                }
            }

            let delta = self.chain_table[candidate & HC_CHAIN_MASK] as usize;
            if delta == 0 || delta > candidate {
                break;
            }
            let mut next = candidate - delta;

            if delta == 1 {
                if repeat == Repeat::Untested {
                    if is_repeating(pattern) {
                        let from = ip - base + MINMATCH;
                        src_pattern_len =
                            MINMATCH + count_pattern::<W>(window, from, limit - base, pattern);
                        repeat = Repeat::Confirmed;
                    } else {
                        repeat = Repeat::Rejected;
                    }
                }
                if repeat == Repeat::Confirmed
                    && next >= lowest
                    && read_u32(window, next - base) == pattern
                {
                    // Skip along a run of the same pattern instead of walking it byte by byte.
                    let forward = MINMATCH
                        + count_pattern::<W>(window, next - base + MINMATCH, limit - base, pattern);
                    let back = reverse_count_pattern(window, next - base, lowest - base, pattern);
                    if back + forward >= src_pattern_len && forward <= src_pattern_len {
                        next = next + forward - src_pattern_len;
                    } else {
                        let aligned = if rotate_pattern(back, pattern) == pattern {
                            back
                        } else {
                            back - 1
                        };
                        next -= aligned;
                    }
                }
            }
            candidate = next;
        }
        best
    }

    /// Compresses `window[dict_limit - base..]` into `dst`.
    pub(crate) fn compress_block(
        &mut self,
        window: &[u8],
        dst: &mut [u8],
    ) -> Result<usize, Lz4Error> {
        let base = self.base;
        let start = self.dict_limit;
        let end = base + window.len();
        let len = end - start;
        if len > MAX_INPUT_SIZE {
            return Err(Lz4Error::InputTooLarge {
                len,
                max: MAX_INPUT_SIZE,
            });
        }

        let mut out = SequenceWriter::new(dst);
        if len < MIN_LENGTH {
            return out.finish(&window[start - base..]);
        }

        let params = level_params(self.level);
        let mflimit = end - MFLIMIT;
        let match_limit = end - LASTLITERALS;
        let mut ip = start;
        let mut anchor = start;

        while ip <= mflimit {
            let Some(mut current) =
                self.find_wider_match(window, ip, anchor, match_limit, MINMATCH - 1, params)
            else {
                ip += 1;
                continue;
            };

            // Lazy evaluation: a longer match shortly after may be cheaper overall.
            let mut attempts = params.lookahead;
            let mut next_ip = ip + 1;
            while attempts > 0 && next_ip <= mflimit {
                attempts -= 1;
                if let Some(candidate) =
                    self.find_wider_match(window, next_ip, anchor, match_limit, current.len, params)
                {
                    if candidate.gain(anchor) > current.gain(anchor) {
                        current = candidate;
                        attempts = params.lookahead;
                    }
                }
                next_ip += 1;
            }

            out.write_sequence(
                &window[anchor - base..current.start - base],
                current.offset,
                current.len,
            )?;
            ip = current.end();
            anchor = ip;
        }

        out.finish(&window[anchor - base..])
    }
}

/// Compresses `src` as one independent high-compression block.
pub(crate) fn compress_hc<W: Width>(
    src: &[u8],
    dst: &mut [u8],
    level: i32,
) -> Result<usize, Lz4Error> {
    if src.len() > MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge {
            len: src.len(),
            max: MAX_INPUT_SIZE,
        });
    }
    let mut ctx = HcContext::<W>::new(level);
    ctx.compress_block(src, dst)
}

/// Operations of a streaming high-compression context.
pub(crate) trait StreamState: Send + fmt::Debug {
    fn reset(&mut self, level: i32);
    fn level(&self) -> i32;
    fn set_level(&mut self, level: i32);
    fn load_dict(&mut self, dict: &[u8]) -> usize;
    fn compress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error>;
    fn save_dict(&self, buf: &mut [u8]) -> usize;
    fn history_len(&self) -> usize;
}

/// Streaming context: owns up to [`DICTIONARY_SIZE`] bytes of history plus the
/// block being compressed.
pub(crate) struct HcStream<W: Width> {
    ctx: HcContext<W>,
    window: Vec<u8>,
}

impl<W: Width> fmt::Debug for HcStream<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HcStream")
            .field("ctx", &self.ctx)
            .field("history", &self.window.len())
            .finish()
    }
}

impl<W: Width> HcStream<W> {
    pub(crate) fn new(level: i32) -> Self {
        Self {
            ctx: HcContext::new(level),
            window: Vec::new(),
        }
    }

    fn trim_history(&mut self) {
        if self.window.len() > DICTIONARY_SIZE {
            let dropped = self.window.len() - DICTIONARY_SIZE;
            self.window.drain(..dropped);
            self.ctx.base += dropped;
        }
        // Positions below `base` are no longer addressable in the window.
        self.ctx.low_limit = self.ctx.base;
        self.ctx.dict_limit = self.ctx.dict_limit.max(self.ctx.base);
        self.ctx.next_to_update = self.ctx.next_to_update.max(self.ctx.base);
    }

    /// Restarts the logical index space, re-indexing the retained history.
    fn rebase(&mut self) {
        let history = std::mem::take(&mut self.window);
        let level = self.ctx.level;
        self.ctx.reset(level);
        self.index_dictionary(history);
        #[cfg(feature = "tracing")]
        tracing::trace!(width = ?W::WIDTH, "lz4 hc stream rebased");
    }

    fn index_dictionary(&mut self, mut dict: Vec<u8>) -> usize {
        if dict.len() > DICTIONARY_SIZE {
            dict.drain(..dict.len() - DICTIONARY_SIZE);
        }
        let len = dict.len();
        self.window = dict;
        self.ctx.dict_limit = self.ctx.base + len;
        self.ctx.low_limit = self.ctx.base;
        if len >= MINMATCH {
            let target = self.ctx.base + len - (MINMATCH - 1);
            self.ctx.insert(&self.window, target);
        }
        len
    }
}

impl<W: Width> StreamState for HcStream<W> {
    fn reset(&mut self, level: i32) {
        self.ctx.reset(level);
        self.window.clear();
    }

    fn level(&self) -> i32 {
        self.ctx.level()
    }

    fn set_level(&mut self, level: i32) {
        self.ctx.set_level(level);
    }

    fn load_dict(&mut self, dict: &[u8]) -> usize {
        let level = self.ctx.level;
        self.ctx.reset(level);
        self.index_dictionary(dict.to_vec())
    }

    fn compress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
        if src.len() > MAX_INPUT_SIZE {
            return Err(Lz4Error::InputTooLarge {
                len: src.len(),
                max: MAX_INPUT_SIZE,
            });
        }
        self.trim_history();
        if self.ctx.base + self.window.len() + src.len() > W::INDEX_LIMIT {
            self.rebase();
        }
        let history = self.window.len();
        self.ctx.dict_limit = self.ctx.base + history;
        self.window.extend_from_slice(src);

        let result = self.ctx.compress_block(&self.window, dst);
        if result.is_err() {
            self.window.truncate(history);
            self.ctx.next_to_update = self.ctx.next_to_update.min(self.ctx.dict_limit);
        }
        result
    }

    fn save_dict(&self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(DICTIONARY_SIZE).min(self.window.len());
        buf[..n].copy_from_slice(&self.window[self.window.len() - n..]);
        n
    }

    fn history_len(&self) -> usize {
        self.window.len().min(DICTIONARY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz4::decode::decompress_block;
    use crate::lz4::types::{HC_LEVEL_MAX, compress_bound};
    use crate::lz4::width::{Width32, Width64};

    fn sample_text(len: usize) -> Vec<u8> {
        let words: [&[u8]; 6] = [
            b"lorem ",
            b"ipsum ",
            b"dolor ",
            b"sit ",
            b"amet, ",
            b"consectetur ",
        ];
        let mut out = Vec::with_capacity(len);
        let mut i = 0usize;
        while out.len() < len {
            out.extend_from_slice(words[(i * 7 + i / 3) % words.len()]);
            i += 1;
        }
        out.truncate(len);
        out
    }

    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    fn hc_round_trip<W: Width>(input: &[u8], level: i32) -> usize {
        let mut compressed = vec![0u8; compress_bound(input.len())];
        let n = compress_hc::<W>(input, &mut compressed, level).unwrap();
        let mut output = vec![0u8; input.len()];
        let m = decompress_block(&compressed[..n], &mut output, 0).unwrap();
        assert_eq!(m, input.len());
        assert_eq!(output, input);
        n
    }

    #[test]
    fn test_round_trip_all_levels() {
        let input = sample_text(10_000);
        for level in 1..=HC_LEVEL_MAX {
            hc_round_trip::<Width64>(&input, level);
            hc_round_trip::<Width32>(&input, level);
        }
    }

    #[test]
    fn test_higher_levels_do_not_lose_ratio_on_text() {
        let input = sample_text(50_000);
        let low = hc_round_trip::<Width64>(&input, 1);
        let high = hc_round_trip::<Width64>(&input, 9);
        assert!(high <= low, "level 9 produced {high} bytes, level 1 {low}");
    }

    #[test]
    fn test_long_single_byte_run_uses_pattern_skip() {
        let mut input = vec![b'z'; 200_000];
        input.extend_from_slice(b"tail bytes here");
        let n = hc_round_trip::<Width64>(&input, 12);
        assert!(n < 2_000);
        hc_round_trip::<Width32>(&input, 12);
    }

    #[test]
    fn test_two_byte_pattern() {
        let input = b"ab".repeat(40_000);
        hc_round_trip::<Width64>(&input, 9);
        hc_round_trip::<Width32>(&input, 9);
    }

    #[test]
    fn test_short_and_empty_inputs() {
        hc_round_trip::<Width64>(&[], 9);
        hc_round_trip::<Width64>(b"tiny", 9);
        hc_round_trip::<Width64>(b"exactly13byte", 9);
    }

    #[test]
    fn test_stream_references_previous_block() {
        let first = noise(4_000, 7);
        let second = first.clone();
        let mut stream = HcStream::<Width64>::new(9);

        let mut block1 = vec![0u8; compress_bound(first.len())];
        let n1 = stream.compress_continue(&first, &mut block1).unwrap();
        let mut block2 = vec![0u8; compress_bound(second.len())];
        let n2 = stream.compress_continue(&second, &mut block2).unwrap();
        assert!(n2 < n1 / 4, "second block should mostly reference the first");

        let mut out = first.clone();
        out.resize(first.len() + second.len(), 0);
        let produced = decompress_block(&block2[..n2], &mut out, first.len()).unwrap();
        assert_eq!(produced, second.len());
        assert_eq!(&out[first.len()..], &second[..]);
    }

    #[test]
    fn test_stream_with_loaded_dictionary() {
        let dict = sample_text(2_000);
        let mut stream = HcStream::<Width32>::new(6);
        assert_eq!(stream.load_dict(&dict), dict.len());

        let block = dict[100..1_900].to_vec();
        let mut compressed = vec![0u8; compress_bound(block.len())];
        let n = stream.compress_continue(&block, &mut compressed).unwrap();

        let mut out = dict.clone();
        out.resize(dict.len() + block.len(), 0);
        decompress_block(&compressed[..n], &mut out, dict.len()).unwrap();
        assert_eq!(&out[dict.len()..], &block[..]);
    }

    #[test]
    fn test_rebase_keeps_history_usable() {
        let first = sample_text(3_000);
        let mut stream = HcStream::<Width32>::new(9);
        let mut scratch = vec![0u8; compress_bound(first.len())];
        stream.compress_continue(&first, &mut scratch).unwrap();

        stream.rebase();
        assert_eq!(stream.ctx.base, START_INDEX);
        assert_eq!(stream.history_len(), first.len());

        let mut compressed = vec![0u8; compress_bound(first.len())];
        let n = stream.compress_continue(&first, &mut compressed).unwrap();
        let mut out = first.clone();
        out.resize(first.len() * 2, 0);
        decompress_block(&compressed[..n], &mut out, first.len()).unwrap();
        assert_eq!(&out[first.len()..], &first[..]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stream = HcStream::<Width64>::new(3);
        let chunk = sample_text(30_000);
        let mut dst = vec![0u8; compress_bound(chunk.len())];
        for _ in 0..5 {
            stream.compress_continue(&chunk, &mut dst).unwrap();
        }
        assert!(stream.window.len() <= DICTIONARY_SIZE + chunk.len());

        let mut saved = vec![0u8; DICTIONARY_SIZE];
        let n = stream.save_dict(&mut saved);
        assert_eq!(n, DICTIONARY_SIZE);
        assert_eq!(&saved[n - 10..], &chunk[chunk.len() - 10..]);
    }

    #[test]
    fn test_failed_block_leaves_stream_usable() {
        let mut stream = HcStream::<Width64>::new(9);
        let input = noise(5_000, 11);
        let mut tiny = vec![0u8; 64];
        assert!(stream.compress_continue(&input, &mut tiny).is_err());
        assert_eq!(stream.window.len(), 0);

        let text = sample_text(5_000);
        let mut dst = vec![0u8; compress_bound(text.len())];
        let n = stream.compress_continue(&text, &mut dst).unwrap();
        let mut out = vec![0u8; text.len()];
        decompress_block(&dst[..n], &mut out, 0).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_tiny_blocks_past_trimmed_history() {
        let mut stream = HcStream::<Width64>::new(9);
        let tiny = b"0123456789ab";
        let mut plain = Vec::new();
        let mut dst = vec![0u8; compress_bound(tiny.len())];
        for _ in 0..6_000 {
            stream.compress_continue(tiny, &mut dst).unwrap();
            plain.extend_from_slice(tiny);
        }
        assert!(stream.ctx.next_to_update >= stream.ctx.base);

        let last = sample_text(160);
        let mut compressed = vec![0u8; compress_bound(last.len())];
        let n = stream.compress_continue(&last, &mut compressed).unwrap();

        let start = plain.len();
        let mut out = plain;
        out.resize(start + last.len(), 0);
        let produced = decompress_block(&compressed[..n], &mut out, start).unwrap();
        assert_eq!(produced, last.len());
        assert_eq!(&out[start..], &last[..]);
    }
}
