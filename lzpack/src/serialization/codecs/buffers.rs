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

use bytes::{Bytes, BytesMut};

use super::LEN_PREFIX_ESTIMATE;
use crate::buffers::{ArraySegment, ByteSequence};
use crate::resolver::{ShapeKind, TypeShape};
use crate::serialization::{Codec, DeserializationError, Reader, SerializationError, Writer};

// Buffer types nested in a record are written as a varint length and the raw
// bytes; top-level buffers bypass the codec entirely (see `switcher`).
macro_rules! buffer_codec {
    ($($t:ty => |$bytes:ident| $from:expr;)*) => {
        $(
            impl Codec for $t {
                fn shape() -> TypeShape {
                    TypeShape::of::<Self>(ShapeKind::Buffer)
                }

                fn capacity(&self) -> usize {
                    LEN_PREFIX_ESTIMATE + self.len()
                }

                fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
                    writer.write_byte_run(&self[..]);
                    Ok(())
                }

                fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
                    let $bytes = reader.read_byte_run()?;
                    Ok($from)
                }
            }
        )*
    };
}

buffer_codec! {
    Bytes => |bytes| Bytes::from(bytes.into_owned());
    BytesMut => |bytes| BytesMut::from(&bytes[..]);
    ArraySegment => |bytes| ArraySegment::from(&bytes[..]);
}

impl Codec for ByteSequence {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Buffer)
    }

    fn capacity(&self) -> usize {
        LEN_PREFIX_ESTIMATE + self.len()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        for segment in self.segments() {
            writer.write_bytes(segment);
        }
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let bytes = reader.read_byte_run()?;
        Ok(ByteSequence::from(bytes.into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: Codec>(value: &T) -> Vec<u8> {
        let mut writer = Writer::new();
        value.encode(&mut writer).unwrap();
        writer.to_vec()
    }

    #[test]
    fn test_buffers_share_the_byte_run_layout() {
        let expected = vec![3, b'a', b'b', b'c'];
        assert_eq!(encode(&b"abc".to_vec()), expected);
        assert_eq!(encode(&Bytes::from_static(b"abc")), expected);
        assert_eq!(encode(&BytesMut::from(&b"abc"[..])), expected);
        assert_eq!(encode(&ArraySegment::from(&b"abc"[..])), expected);
        let seq: ByteSequence = [Bytes::from_static(b"a"), Bytes::from_static(b"bc")]
            .into_iter()
            .collect();
        assert_eq!(encode(&seq), expected);

        assert_eq!(ByteSequence::decode(&mut Reader::new(&expected)).unwrap(), seq);
        assert_eq!(&Bytes::decode(&mut Reader::new(&expected)).unwrap()[..], b"abc");
        assert_eq!(&ArraySegment::decode(&mut Reader::new(&expected)).unwrap()[..], b"abc");
    }

    #[test]
    fn test_buffers_are_never_unions() {
        assert!(!crate::resolver::is_union::<Bytes>().unwrap());
        assert!(!crate::resolver::is_union::<Vec<ArraySegment>>().unwrap());
    }
}
