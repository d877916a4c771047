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

use super::LEN_PREFIX_ESTIMATE;
use crate::resolver::TypeShape;
use crate::serialization::{Codec, DeserializationError, Reader, SerializationError, Writer};

macro_rules! fixed_codec {
    ($($t:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Codec for $t {
                const FIXED_SIZE: Option<usize> = Some(std::mem::size_of::<$t>());

                fn shape() -> TypeShape {
                    TypeShape::primitive::<Self>()
                }

                fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
                    writer.$write(*self);
                    Ok(())
                }

                fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
                    reader.$read()
                }
            }
        )*
    };
}

fixed_codec! {
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
    i8 => write_i8, read_i8;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    i128 => write_i128, read_i128;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

// Byte slices are copied in one pass rather than element by element.
impl Codec for u8 {
    const FIXED_SIZE: Option<usize> = Some(1);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_u8(*self);
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        reader.read_u8()
    }

    fn encode_slice(items: &[Self], writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_bytes(items);
        Ok(())
    }

    fn decode_vec(
        reader: &mut Reader<'_>,
        count: usize,
    ) -> Result<Vec<Self>, DeserializationError> {
        Ok(reader.read_slice(count)?.into_owned())
    }
}

impl Codec for usize {
    const FIXED_SIZE: Option<usize> = Some(8);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_u64(*self as u64);
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let value = reader.read_u64()?;
        usize::try_from(value).map_err(|_| {
            DeserializationError::invalid_value("usize", format!("{value} does not fit the target"))
        })
    }
}

impl Codec for isize {
    const FIXED_SIZE: Option<usize> = Some(8);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_i64(*self as i64);
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let value = reader.read_i64()?;
        isize::try_from(value).map_err(|_| {
            DeserializationError::invalid_value("isize", format!("{value} does not fit the target"))
        })
    }
}

impl Codec for char {
    const FIXED_SIZE: Option<usize> = Some(4);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_u32(u32::from(*self));
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let value = reader.read_u32()?;
        char::from_u32(value).ok_or_else(|| {
            DeserializationError::invalid_value("char", format!("{value:#x} is not a scalar value"))
        })
    }
}

impl Codec for () {
    const FIXED_SIZE: Option<usize> = Some(0);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, _writer: &mut Writer) -> Result<(), SerializationError> {
        Ok(())
    }

    fn decode(_reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        Ok(())
    }
}

impl Codec for String {
    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn capacity(&self) -> usize {
        LEN_PREFIX_ESTIMATE + self.len()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_str(self);
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        reader.read_string()
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
    fn test_little_endian_layout() {
        assert_eq!(encode(&0x0102_0304u32), vec![4, 3, 2, 1]);
        assert_eq!(encode(&-2i16), vec![0xFE, 0xFF]);
        assert_eq!(encode(&1.0f32), 1.0f32.to_le_bytes().to_vec());
        assert_eq!(encode(&7usize), vec![7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode(&'A'), vec![0x41, 0, 0, 0]);
        assert!(encode(&()).is_empty());
    }

    #[test]
    fn test_string_layout_and_capacity() {
        let value = String::from("héllo");
        let bytes = encode(&value);
        assert_eq!(bytes[0], 6);
        assert_eq!(&bytes[1..], "héllo".as_bytes());
        assert!(Codec::capacity(&value) >= bytes.len());
        assert_eq!(String::decode(&mut Reader::new(&bytes)).unwrap(), value);
    }

    #[test]
    fn test_invalid_char_and_bool() {
        let surrogate = 0xD800u32.to_le_bytes();
        assert!(matches!(
            char::decode(&mut Reader::new(&surrogate)),
            Err(DeserializationError::InvalidValue { type_name: "char", .. })
        ));
        assert!(bool::decode(&mut Reader::new(&[2])).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            String::decode(&mut Reader::new(&[2, 0xC3, 0x28])),
            Err(DeserializationError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_float_bits_survive() {
        for value in [f64::NAN, -0.0, f64::INFINITY, f64::MIN_POSITIVE] {
            let bytes = encode(&value);
            let decoded = f64::decode(&mut Reader::new(&bytes)).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_byte_fast_path() {
        let mut writer = Writer::new();
        u8::encode_slice(&[1, 2, 3], &mut writer).unwrap();
        let bytes = writer.to_vec();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(u8::decode_vec(&mut Reader::new(&bytes), 3).unwrap(), vec![1, 2, 3]);
        assert!(u8::decode_vec(&mut Reader::new(&bytes), 4).is_err());
    }
}
