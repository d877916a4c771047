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

//! Built-in [`Codec`](super::Codec) implementations.
//!
//! | module          | types |
//! |-----------------|-------|
//! | `primitives`    | integers, floats, `bool`, `char`, `()`, `String` |
//! | `collections`   | `Option`, smart pointers, sequences, arrays, maps, sets, tuples |
//! | `well_known`    | [`Timestamp`](crate::Timestamp), [`Guid`](crate::Guid), `Duration` |
//! | `buffers`       | `Bytes`, `BytesMut`, [`ArraySegment`], [`ByteSequence`] |
//!
//! `Vec<u8>` uses the generic `Vec` codec, whose `u8` fast path writes the
//! same bytes as the buffer codecs: a varint length and the raw bytes.
//!
//! [`ArraySegment`]: crate::ArraySegment
//! [`ByteSequence`]: crate::ByteSequence

mod buffers;
mod collections;
mod primitives;
mod well_known;

/// Upper bound of a varint length prefix for typical payloads.
pub(crate) const LEN_PREFIX_ESTIMATE: usize = 5;
