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

//! Bounds-checked block decoder.

use super::error::Lz4Error;
use super::types::{MINMATCH, ML_MASK, RUN_MASK};

/// Reads a length extension (`255, 255, ..., n < 255`) and adds it to `base`.
#[inline]
fn read_extension(src: &[u8], ip: &mut usize, base: usize) -> Result<usize, Lz4Error> {
    let mut len = base;
    loop {
        let byte = *src
            .get(*ip)
            .ok_or(Lz4Error::TruncatedInput { position: *ip })?;
        *ip += 1;
        len = len
            .checked_add(byte as usize)
            .ok_or(Lz4Error::TruncatedInput { position: *ip })?;
        if byte != 255 {
            return Ok(len);
        }
    }
}

/// Decodes one block into `out[start..]`.
///
/// `out[..start]` holds history (a dictionary or earlier blocks) that
/// back-references may reach into. Returns the number of bytes produced.
pub(crate) fn decompress_block(
    src: &[u8],
    out: &mut [u8],
    start: usize,
) -> Result<usize, Lz4Error> {
    if start > out.len() {
        return Err(Lz4Error::OutputOverflow { position: start });
    }
    let mut ip = 0usize;
    let mut op = start;

    loop {
        let token = *src
            .get(ip)
            .ok_or(Lz4Error::TruncatedInput { position: ip })? as usize;
        ip += 1;

        let mut literal_len = token >> 4;
        if literal_len == RUN_MASK {
            literal_len = read_extension(src, &mut ip, literal_len)?;
        }
        let literal_end = ip
            .checked_add(literal_len)
            .filter(|end| *end <= src.len())
            .ok_or(Lz4Error::TruncatedInput { position: ip })?;
        let out_end = op
            .checked_add(literal_len)
            .filter(|end| *end <= out.len())
            .ok_or(Lz4Error::OutputOverflow { position: op })?;
        out[op..out_end].copy_from_slice(&src[ip..literal_end]);
        ip = literal_end;
        op = out_end;

        if ip == src.len() {
            break;
        }

        if ip + 2 > src.len() {
            return Err(Lz4Error::TruncatedInput { position: ip });
        }
        let offset = u16::from_le_bytes([src[ip], src[ip + 1]]) as usize;
        ip += 2;
        if offset == 0 || offset > op {
            return Err(Lz4Error::OffsetOutOfRange {
                offset,
                position: op - start,
            });
        }

        let mut match_len = token & ML_MASK;
        if match_len == ML_MASK {
            match_len = read_extension(src, &mut ip, match_len)?;
        }
        match_len += MINMATCH;
        let match_end = op
            .checked_add(match_len)
            .filter(|end| *end <= out.len())
            .ok_or(Lz4Error::OutputOverflow { position: op })?;

        let from = op - offset;
        if offset >= match_len {
            out.copy_within(from..from + match_len, op);
        } else {
            // Overlapping copy: replicate the `offset`-byte period forward.
            let mut copied = 0;
            while copied < match_len {
                let chunk = offset.min(match_len - copied);
                out.copy_within(from + copied..from + copied + chunk, op + copied);
                copied += chunk;
            }
        }
        op = match_end;
    }

    Ok(op - start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_only_block() {
        let block = [0x50, b'h', b'e', b'l', b'l', b'o'];
        let mut out = [0u8; 5];
        assert_eq!(decompress_block(&block, &mut out, 0).unwrap(), 5);
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn test_overlapping_match() {
        // "a" then match offset 1, length 4 + 5 = 9, then 5 literals
        let block = [0x15, b'a', 1, 0, 0x50, b'b', b'c', b'd', b'e', b'f'];
        let mut out = [0u8; 15];
        assert_eq!(decompress_block(&block, &mut out, 0).unwrap(), 15);
        assert_eq!(&out, b"aaaaaaaaaabcdef");
    }

    #[test]
    fn test_empty_block() {
        let mut out = [0u8; 0];
        assert_eq!(decompress_block(&[0], &mut out, 0).unwrap(), 0);
        assert!(matches!(
            decompress_block(&[], &mut out, 0),
            Err(Lz4Error::TruncatedInput { position: 0 })
        ));
    }

    #[test]
    fn test_offset_before_output_start() {
        let block = [0x10, b'a', 2, 0, 0x00];
        let mut out = [0u8; 16];
        assert!(matches!(
            decompress_block(&block, &mut out, 0),
            Err(Lz4Error::OffsetOutOfRange { offset: 2, .. })
        ));
    }

    #[test]
    fn test_zero_offset_rejected() {
        let block = [0x10, b'a', 0, 0, 0x00];
        let mut out = [0u8; 16];
        assert!(matches!(
            decompress_block(&block, &mut out, 0),
            Err(Lz4Error::OffsetOutOfRange { offset: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_literals() {
        let block = [0x50, b'h', b'e'];
        let mut out = [0u8; 5];
        assert!(matches!(
            decompress_block(&block, &mut out, 0),
            Err(Lz4Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_stream_ending_after_match_is_truncated() {
        let block = [0x10, b'a', 1, 0];
        let mut out = [0u8; 16];
        assert!(matches!(
            decompress_block(&block, &mut out, 0),
            Err(Lz4Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_output_overflow() {
        let block = [0x1F, b'a', 1, 0, 200, 0x00];
        let mut out = [0u8; 32];
        assert!(matches!(
            decompress_block(&block, &mut out, 0),
            Err(Lz4Error::OutputOverflow { .. })
        ));
    }

    #[test]
    fn test_match_into_history() {
        let mut out = *b"abcd\0\0\0\0\0\0\0\0\0";
        // match offset 4, length 4, then 5 literals
        let block = [0x00, 4, 0, 0x50, b'v', b'w', b'x', b'y', b'z'];
        assert_eq!(decompress_block(&block, &mut out, 4).unwrap(), 9);
        assert_eq!(&out, b"abcdabcdvwxyz");
    }
}
