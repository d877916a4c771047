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

//! Address-width strategy selection.

use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use super::block::compress_fast;
use super::decode::decompress_block;
use super::error::Lz4Error;
use super::hc::compress_hc;
use super::types::DICTIONARY_SIZE;
use super::width::{AddressWidth, Width, Width32, Width64};

/// One width specialization of the LZ4 block codec.
///
/// Obtained through [`engine`], which picks the specialization matching the
/// target's pointer width exactly once per process.
pub trait Lz4Engine: Send + Sync + fmt::Debug {
    /// Width of the table positions this engine stores.
    fn address_width(&self) -> AddressWidth;

    /// Fast single-pass compression. Returns the compressed length.
    fn compress(&self, src: &[u8], dst: &mut [u8], acceleration: u32) -> Result<usize, Lz4Error>;

    /// High-compression with a hash chain search at `level` (clamped to `[1, 12]`).
    fn compress_hc(&self, src: &[u8], dst: &mut [u8], level: i32) -> Result<usize, Lz4Error>;

    /// Decodes one block into `dst`. Returns the decoded length.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error>;

    /// Decodes one block whose back-references may reach into `dict`.
    fn decompress_with_dict(
        &self,
        src: &[u8],
        dst: &mut [u8],
        dict: &[u8],
    ) -> Result<usize, Lz4Error>;
}

struct Engine<W: Width>(PhantomData<W>);

impl<W: Width> fmt::Debug for Engine<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Engine").field(&W::WIDTH).finish()
    }
}

impl<W: Width> Lz4Engine for Engine<W> {
    fn address_width(&self) -> AddressWidth {
        W::WIDTH
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], acceleration: u32) -> Result<usize, Lz4Error> {
        compress_fast::<W>(src, dst, acceleration)
    }

    fn compress_hc(&self, src: &[u8], dst: &mut [u8], level: i32) -> Result<usize, Lz4Error> {
        compress_hc::<W>(src, dst, level)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
        decompress_block(src, dst, 0)
    }

    fn decompress_with_dict(
        &self,
        src: &[u8],
        dst: &mut [u8],
        dict: &[u8],
    ) -> Result<usize, Lz4Error> {
        let history = &dict[dict.len().saturating_sub(DICTIONARY_SIZE)..];
        if history.is_empty() {
            return decompress_block(src, dst, 0);
        }
        let mut window = Vec::with_capacity(history.len() + dst.len());
        window.extend_from_slice(history);
        window.resize(history.len() + dst.len(), 0);
        let produced = decompress_block(src, &mut window, history.len())?;
        dst[..produced].copy_from_slice(&window[history.len()..history.len() + produced]);
        Ok(produced)
    }
}

static ENGINE_32: Engine<Width32> = Engine(PhantomData);
static ENGINE_64: Engine<Width64> = Engine(PhantomData);

/// Returns the engine specialized for `width`.
#[must_use]
pub fn engine_for(width: AddressWidth) -> &'static dyn Lz4Engine {
    match width {
        AddressWidth::Bits32 => &ENGINE_32,
        AddressWidth::Bits64 => &ENGINE_64,
    }
}

/// Returns the process-wide engine, selecting it on first call.
pub fn engine() -> &'static dyn Lz4Engine {
    static SELECTED: OnceLock<&'static dyn Lz4Engine> = OnceLock::new();
    *SELECTED.get_or_init(|| {
        let width = AddressWidth::native();
        #[cfg(feature = "tracing")]
        tracing::debug!(bits = width.bits(), "selected lz4 engine");
        engine_for(width)
    })
}
