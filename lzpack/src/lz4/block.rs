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

//! Single-pass ("fast") block compressor.
//!
//! One hash table over 4-byte sequences, one candidate per bucket. Misses
//! accelerate the scan so incompressible data is skipped quickly.

use super::error::Lz4Error;
use super::sequence::SequenceWriter;
use super::types::{
    HASH_LOG, HASH_LOG_64K, LASTLITERALS, LIMIT_64K, MAX_DISTANCE, MAX_INPUT_SIZE, MFLIMIT,
    MIN_LENGTH, MINMATCH, SKIP_TRIGGER, hash_sequence, read_u32,
};
use super::width::{Width, count};

/// Position table of the fast compressor.
struct HashTable<W: Width> {
    slots: Vec<W::Offset>,
    hash_log: u32,
}

impl<W: Width> HashTable<W> {
    fn for_input(len: usize) -> Self {
        let hash_log = if len < LIMIT_64K { HASH_LOG_64K } else { HASH_LOG };
        Self {
            slots: vec![W::Offset::default(); 1 << hash_log],
            hash_log,
        }
    }

    #[inline]
    fn hash(&self, src: &[u8], pos: usize) -> usize {
        hash_sequence(read_u32(src, pos), self.hash_log)
    }

    #[inline]
    fn get(&self, h: usize) -> usize {
        W::load(self.slots[h])
    }

    #[inline]
    fn put(&mut self, h: usize, pos: usize) {
        self.slots[h] = W::store(pos);
    }
}

/// Compresses `src` into `dst` as one LZ4 block and returns the block length.
///
/// `acceleration` trades ratio for speed; `1` is the reference default.
pub(crate) fn compress_fast<W: Width>(
    src: &[u8],
    dst: &mut [u8],
    acceleration: u32,
) -> Result<usize, Lz4Error> {
    let len = src.len();
    if len > MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge {
            len,
            max: MAX_INPUT_SIZE,
        });
    }
    let mut out = SequenceWriter::new(dst);
    if len < MIN_LENGTH {
        return out.finish(src);
    }

    let acceleration = acceleration.max(1);
    let mflimit_plus_one = len - MFLIMIT + 1;
    let match_limit = len - LASTLITERALS;
    let mut table = HashTable::<W>::for_input(len);

    let mut anchor = 0usize;
    let h0 = table.hash(src, 0);
    table.put(h0, 0);
    let mut ip = 1usize;
    let mut forward_h = table.hash(src, ip);

    'search: loop {
        // Find the first match after `anchor`.
        let mut match_pos;
        {
            let mut forward_ip = ip;
            let mut step = 1usize;
            let mut search_nb = acceleration << SKIP_TRIGGER;
            loop {
                let h = forward_h;
                ip = forward_ip;
                forward_ip += step;
                step = (search_nb >> SKIP_TRIGGER) as usize;
                search_nb += 1;

                if forward_ip > mflimit_plus_one {
                    break 'search;
                }

                match_pos = table.get(h);
                forward_h = table.hash(src, forward_ip);
                table.put(h, ip);

                if match_pos >= ip || match_pos + MAX_DISTANCE < ip {
                    continue;
                }
                if read_u32(src, match_pos) == read_u32(src, ip) {
                    break;
                }
            }
        }

        // Extend the match backwards over the pending literals.
        while ip > anchor && match_pos > 0 && src[ip - 1] == src[match_pos - 1] {
            ip -= 1;
            match_pos -= 1;
        }

        let mut literals_start = anchor;
        loop {
            let match_len =
                MINMATCH + count::<W>(src, ip + MINMATCH, match_pos + MINMATCH, match_limit);
            out.write_sequence(&src[literals_start..ip], ip - match_pos, match_len)?;
            ip += match_len;
            anchor = ip;

            if ip >= mflimit_plus_one {
                break 'search;
            }

            let h = table.hash(src, ip - 2);
            table.put(h, ip - 2);

            // Immediate follow-up match with no literals in between.
            let h = table.hash(src, ip);
            let candidate = table.get(h);
            table.put(h, ip);
            if candidate < ip
                && candidate + MAX_DISTANCE >= ip
                && read_u32(src, candidate) == read_u32(src, ip)
            {
                match_pos = candidate;
                literals_start = ip;
                continue;
            }
            break;
        }

        ip += 1;
        forward_h = table.hash(src, ip);
    }

    out.finish(&src[anchor..])
}
