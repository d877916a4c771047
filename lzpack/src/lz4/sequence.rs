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

//! Token and length-extension emission shared by both encoders.

use super::error::Lz4Error;
use super::types::{LASTLITERALS, MINMATCH, ML_BITS, ML_MASK, RUN_MASK};

/// Bytes needed to encode a literal run of `len` (token excluded).
#[inline]
fn literal_extension_len(len: usize) -> usize {
    if len >= RUN_MASK {
        1 + (len - RUN_MASK) / 255
    } else {
        0
    }
}

/// Bytes needed to encode a match length of `len` (token excluded).
#[inline]
fn match_extension_len(len: usize) -> usize {
    let code = len - MINMATCH;
    if code >= ML_MASK {
        1 + (code - ML_MASK) / 255
    } else {
        0
    }
}

/// Encoded cost of a literal run, token excluded.
#[must_use]
pub fn literals_price(len: usize) -> usize {
    len + literal_extension_len(len)
}

/// Encoded cost of one full sequence: token, literals, offset and match extension.
#[must_use]
pub fn sequence_price(literal_len: usize, match_len: usize) -> usize {
    let mut price = 1 + 2 + literals_price(literal_len);
    if match_len >= ML_MASK + MINMATCH {
        price += 1 + (match_len - (ML_MASK + MINMATCH)) / 255;
    }
    price
}

#[inline]
fn write_extension(dst: &mut [u8], op: &mut usize, mut rest: usize) {
    while rest >= 255 {
        dst[*op] = 255;
        *op += 1;
        rest -= 255;
    }
    dst[*op] = rest as u8;
    *op += 1;
}

/// Bounded output cursor over a destination block.
pub(crate) struct SequenceWriter<'a> {
    dst: &'a mut [u8],
    op: usize,
}

impl<'a> SequenceWriter<'a> {
    pub(crate) fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, op: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.op
    }

    fn overflow(&self) -> Lz4Error {
        Lz4Error::OutputTooSmall {
            capacity: self.dst.len(),
        }
    }

    /// Emits `literals` followed by a back-reference of `match_len` bytes at `offset`.
    pub(crate) fn write_sequence(
        &mut self,
        literals: &[u8],
        offset: usize,
        match_len: usize,
    ) -> Result<(), Lz4Error> {
        debug_assert!(match_len >= MINMATCH);
        debug_assert!(offset > 0 && offset <= u16::MAX as usize);
        let lit_len = literals.len();
        let needed = 1
            + literal_extension_len(lit_len)
            + lit_len
            + 2
            + match_extension_len(match_len)
            + LASTLITERALS
            + 1;
        if self.op + needed > self.dst.len() {
            return Err(self.overflow());
        }

        let token = self.op;
        self.op += 1;
        if lit_len >= RUN_MASK {
            self.dst[token] = (RUN_MASK as u8) << ML_BITS;
            write_extension(self.dst, &mut self.op, lit_len - RUN_MASK);
        } else {
            self.dst[token] = (lit_len as u8) << ML_BITS;
        }
        self.dst[self.op..self.op + lit_len].copy_from_slice(literals);
        self.op += lit_len;

        self.dst[self.op..self.op + 2].copy_from_slice(&(offset as u16).to_le_bytes());
        self.op += 2;

        let code = match_len - MINMATCH;
        if code >= ML_MASK {
            self.dst[token] |= ML_MASK as u8;
            write_extension(self.dst, &mut self.op, code - ML_MASK);
        } else {
            self.dst[token] |= code as u8;
        }
        Ok(())
    }

    /// Emits the closing literal-only sequence and returns the block length.
    pub(crate) fn finish(mut self, literals: &[u8]) -> Result<usize, Lz4Error> {
        let lit_len = literals.len();
        if self.op + 1 + literal_extension_len(lit_len) + lit_len > self.dst.len() {
            return Err(self.overflow());
        }
        let token = self.op;
        self.op += 1;
        if lit_len >= RUN_MASK {
            self.dst[token] = (RUN_MASK as u8) << ML_BITS;
            write_extension(self.dst, &mut self.op, lit_len - RUN_MASK);
        } else {
            self.dst[token] = (lit_len as u8) << ML_BITS;
        }
        self.dst[self.op..self.op + lit_len].copy_from_slice(literals);
        self.op += lit_len;
        Ok(self.op)
    }
}
