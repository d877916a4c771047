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

//! Streaming high-compression context.

use super::engine::engine;
use super::error::Lz4Error;
use super::hc::{HcStream, StreamState};
use super::types::HC_LEVEL_DEFAULT;
use super::width::{AddressWidth, Width32, Width64};

/// A high-compression context that carries history between blocks.
///
/// Each call to [`compress_continue`](Self::compress_continue) produces an
/// independent LZ4 block whose back-references may reach up to 64 KiB into
/// the data compressed before it. Decode such a block with
/// [`decompress_with_dict`](super::decompress_with_dict), passing the
/// plaintext of the preceding blocks as the dictionary.
///
/// # Examples
///
/// ```rust
/// use lzpack::lz4::{self, Lz4HcStream};
///
/// let first = b"header: value; header: value; header: value".to_vec();
/// let second = b"header: value; header: other".to_vec();
///
/// let mut stream = Lz4HcStream::new(9);
/// let mut block1 = vec![0u8; lz4::compress_bound(first.len())];
/// let n1 = stream.compress_continue(&first, &mut block1).unwrap();
/// let mut block2 = vec![0u8; lz4::compress_bound(second.len())];
/// let n2 = stream.compress_continue(&second, &mut block2).unwrap();
///
/// let mut out = vec![0u8; second.len()];
/// lz4::decompress_with_dict(&block2[..n2], &mut out, &first).unwrap();
/// assert_eq!(out, second);
/// # let _ = n1;
/// ```
#[derive(Debug)]
pub struct Lz4HcStream {
    state: Box<dyn StreamState>,
}

impl Lz4HcStream {
    /// Creates a context for the process-wide engine width.
    #[must_use]
    pub fn new(level: i32) -> Self {
        Self::with_width(engine().address_width(), level)
    }

    /// Creates a context for an explicit address width.
    #[must_use]
    pub fn with_width(width: AddressWidth, level: i32) -> Self {
        let state: Box<dyn StreamState> = match width {
            AddressWidth::Bits32 => Box::new(HcStream::<Width32>::new(level)),
            AddressWidth::Bits64 => Box::new(HcStream::<Width64>::new(level)),
        };
        Self { state }
    }

    /// Clears all history and tables, keeping the current level.
    pub fn reset(&mut self) {
        let level = self.state.level();
        self.state.reset(level);
    }

    /// Clears all history and tables and switches to `level`.
    pub fn reset_with_level(&mut self, level: i32) {
        self.state.reset(level);
    }

    /// The effective (clamped) compression level.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.state.level()
    }

    /// Changes the level used for subsequent blocks.
    pub fn set_level(&mut self, level: i32) {
        self.state.set_level(level);
    }

    /// Resets the context and primes it with `dict`.
    ///
    /// Only the last 64 KiB are kept. Returns the number of bytes retained.
    pub fn load_dict(&mut self, dict: &[u8]) -> usize {
        self.state.load_dict(dict)
    }

    /// Compresses the next block, referencing earlier blocks where profitable.
    ///
    /// On error the block is discarded and the previous history is kept.
    pub fn compress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
        self.state.compress_continue(src, dst)
    }

    /// Copies the most recent history (up to 64 KiB) into `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn save_dict(&self, buf: &mut [u8]) -> usize {
        self.state.save_dict(buf)
    }

    /// Bytes of history available to the next block.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.state.history_len()
    }
}

impl Default for Lz4HcStream {
    fn default() -> Self {
        Self::new(HC_LEVEL_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz4::{compress_bound, decompress_with_dict};

    fn record(i: usize) -> Vec<u8> {
        format!("{{\"id\":{i},\"name\":\"user-{i}\",\"active\":true,\"tags\":[\"a\",\"b\"]}}\n")
            .into_bytes()
    }

    #[test]
    fn test_many_blocks_decode_with_running_history() {
        for width in [AddressWidth::Bits32, AddressWidth::Bits64] {
            let mut stream = Lz4HcStream::with_width(width, 9);
            let mut plain = Vec::new();
            for i in 0..200 {
                let block = record(i);
                let mut packed = vec![0u8; compress_bound(block.len())];
                let n = stream.compress_continue(&block, &mut packed).unwrap();

                let mut out = vec![0u8; block.len()];
                let m = decompress_with_dict(&packed[..n], &mut out, &plain).unwrap();
                assert_eq!(m, block.len());
                assert_eq!(out, block);
                plain.extend_from_slice(&block);
            }
        }
    }

    #[test]
    fn test_level_is_clamped() {
        let mut stream = Lz4HcStream::new(0);
        assert_eq!(stream.level(), 1);
        stream.set_level(99);
        assert_eq!(stream.level(), 12);
        stream.reset_with_level(5);
        assert_eq!(stream.level(), 5);
        assert_eq!(Lz4HcStream::default().level(), HC_LEVEL_DEFAULT);
    }

    #[test]
    fn test_reset_drops_history() {
        let mut stream = Lz4HcStream::default();
        let block = record(1);
        let mut packed = vec![0u8; compress_bound(block.len())];
        stream.compress_continue(&block, &mut packed).unwrap();
        assert_eq!(stream.history_len(), block.len());
        stream.reset();
        assert_eq!(stream.history_len(), 0);
    }

    #[test]
    fn test_save_dict_returns_latest_bytes() {
        let mut stream = Lz4HcStream::default();
        assert_eq!(stream.load_dict(b"0123456789"), 10);
        let mut buf = [0u8; 4];
        assert_eq!(stream.save_dict(&mut buf), 4);
        assert_eq!(&buf, b"6789");
    }
}
