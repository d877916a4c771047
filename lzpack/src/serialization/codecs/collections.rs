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

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use super::LEN_PREFIX_ESTIMATE;
use crate::resolver::{ShapeKind, TypeShape};
use crate::serialization::sum_fixed;
use crate::serialization::{Codec, DeserializationError, Reader, SerializationError, Writer};

/// Capacity of a run of elements: exact for fixed-size elements.
fn elements_capacity<'a, T: Codec + 'a>(len: usize, items: impl Iterator<Item = &'a T>) -> usize {
    LEN_PREFIX_ESTIMATE
        + match T::FIXED_SIZE {
            Some(size) => size.saturating_mul(len),
            None => items.map(|item| item.capacity()).fold(0, usize::saturating_add),
        }
}

fn duplicate(type_name: &'static str) -> DeserializationError {
    DeserializationError::invalid_value(type_name, "duplicate key")
}

impl<T: Codec> Codec for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Optional(T::shape))
    }

    fn capacity(&self) -> usize {
        1 + self.as_ref().map_or(0, Codec::capacity)
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        match self {
            Some(value) => {
                writer.write_u8(1);
                value.encode(writer)
            }
            None => {
                writer.write_u8(0);
                Ok(())
            }
        }
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => T::decode(reader).map(Some),
            other => Err(DeserializationError::invalid_value(
                std::any::type_name::<Self>(),
                format!("presence byte {other:#04x}"),
            )),
        }
    }
}

impl<T: Codec> Codec for Box<T> {
    const FIXED_SIZE: Option<usize> = T::FIXED_SIZE;

    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Container(T::shape))
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        (**self).encode(writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        T::decode(reader).map(Box::new)
    }
}

impl<T: Codec> Codec for Arc<T> {
    const FIXED_SIZE: Option<usize> = T::FIXED_SIZE;

    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Container(T::shape))
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        (**self).encode(writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        T::decode(reader).map(Arc::new)
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Collection(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.iter())
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        T::encode_slice(self, writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let count = reader.read_count(std::any::type_name::<Self>())?;
        T::decode_vec(reader, count)
    }
}

impl<T: Codec> Codec for Box<[T]> {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Collection(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.iter())
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        T::encode_slice(self, writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        Vec::<T>::decode(reader).map(Vec::into_boxed_slice)
    }
}

impl<T: Codec> Codec for VecDeque<T> {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Collection(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.iter())
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        let (front, back) = self.as_slices();
        T::encode_slice(front, writer)?;
        T::encode_slice(back, writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        Vec::<T>::decode(reader).map(VecDeque::from)
    }
}

// Arrays carry no length prefix: the length is part of the type.
impl<T: Codec, const N: usize> Codec for [T; N] {
    const FIXED_SIZE: Option<usize> = match T::FIXED_SIZE {
        Some(size) => Some(size * N),
        None => None,
    };

    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Array(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(N, self.iter()) - LEN_PREFIX_ESTIMATE
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        T::encode_slice(self, writer)
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        T::decode_vec(reader, N)?.try_into().map_err(|items: Vec<T>| {
            DeserializationError::invalid_value(
                std::any::type_name::<Self>(),
                format!("decoded {} of {N} elements", items.len()),
            )
        })
    }
}

impl<K, V, S> Codec for HashMap<K, V, S>
where
    K: Codec + Eq + Hash,
    V: Codec,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Map {
            key: K::shape,
            value: V::shape,
        })
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.keys()) + elements_capacity(self.len(), self.values())
            - LEN_PREFIX_ESTIMATE
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        for (key, value) in self {
            key.encode(writer)?;
            value.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let type_name = std::any::type_name::<Self>();
        let count = reader.read_count(type_name)?;
        let min_entry = K::FIXED_SIZE.unwrap_or(1) + V::FIXED_SIZE.unwrap_or(0);
        let capacity = reader.preallocation(count, min_entry);
        let mut map = HashMap::with_capacity_and_hasher(capacity, S::default());
        for _ in 0..count {
            let key = K::decode(reader)?;
            let value = V::decode(reader)?;
            if map.insert(key, value).is_some() {
                return Err(duplicate(type_name));
            }
        }
        Ok(map)
    }
}

impl<K, V> Codec for BTreeMap<K, V>
where
    K: Codec + Ord,
    V: Codec,
{
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Map {
            key: K::shape,
            value: V::shape,
        })
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.keys()) + elements_capacity(self.len(), self.values())
            - LEN_PREFIX_ESTIMATE
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        for (key, value) in self {
            key.encode(writer)?;
            value.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let type_name = std::any::type_name::<Self>();
        let count = reader.read_count(type_name)?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::decode(reader)?;
            let value = V::decode(reader)?;
            if map.insert(key, value).is_some() {
                return Err(duplicate(type_name));
            }
        }
        Ok(map)
    }
}

impl<T, S> Codec for HashSet<T, S>
where
    T: Codec + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Collection(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.iter())
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        self.iter().try_for_each(|item| item.encode(writer))
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let type_name = std::any::type_name::<Self>();
        let count = reader.read_count(type_name)?;
        let capacity = reader.preallocation(count, T::FIXED_SIZE.unwrap_or(1));
        let mut set = HashSet::with_capacity_and_hasher(capacity, S::default());
        for _ in 0..count {
            if !set.insert(T::decode(reader)?) {
                return Err(duplicate(type_name));
            }
        }
        Ok(set)
    }
}

impl<T: Codec + Ord> Codec for BTreeSet<T> {
    fn shape() -> TypeShape {
        TypeShape::of::<Self>(ShapeKind::Collection(T::shape))
    }

    fn capacity(&self) -> usize {
        elements_capacity(self.len(), self.iter())
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_len(self.len());
        self.iter().try_for_each(|item| item.encode(writer))
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let type_name = std::any::type_name::<Self>();
        let count = reader.read_count(type_name)?;
        let mut set = BTreeSet::new();
        for _ in 0..count {
            if !set.insert(T::decode(reader)?) {
                return Err(duplicate(type_name));
            }
        }
        Ok(set)
    }
}

macro_rules! tuple_codec {
    ($(($($name:ident: $idx:tt),+))*) => {
        $(
            impl<$($name: Codec),+> Codec for ($($name,)+) {
                const FIXED_SIZE: Option<usize> = sum_fixed(&[$($name::FIXED_SIZE),+]);

                fn shape() -> TypeShape {
                    TypeShape::of::<Self>(ShapeKind::Tuple(vec![$($name::shape),+]))
                }

                fn capacity(&self) -> usize {
                    0 $(+ Codec::capacity(&self.$idx))+
                }

                fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
                    $(self.$idx.encode(writer)?;)+
                    Ok(())
                }

                fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
                    Ok(($($name::decode(reader)?,)+))
                }
            }
        )*
    };
}

tuple_codec! {
    (A: 0)
    (A: 0, B: 1)
    (A: 0, B: 1, C: 2)
    (A: 0, B: 1, C: 2, D: 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: Codec>(value: &T) -> (Vec<u8>, T) {
        let mut writer = Writer::new();
        value.encode(&mut writer).unwrap();
        let bytes = writer.to_vec();
        let mut reader = Reader::new(&bytes);
        let decoded = T::decode(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        (bytes, decoded)
    }

    #[test]
    fn test_option_layout() {
        assert_eq!(round_trip(&Some(5u16)).0, vec![1, 5, 0]);
        assert_eq!(round_trip(&None::<u16>).0, vec![0]);
        assert!(Option::<u8>::decode(&mut Reader::new(&[2, 0])).is_err());
    }

    #[test]
    fn test_vec_and_deque() {
        let (bytes, decoded) = round_trip(&vec![1u32, 2, 3]);
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes.len(), 13);
        assert_eq!(decoded, vec![1, 2, 3]);

        let mut deque = VecDeque::from(vec![String::from("b")]);
        deque.push_front(String::from("a"));
        assert_eq!(round_trip(&deque).1, deque);

        let boxed: Box<[i8]> = vec![-1, 0, 1].into_boxed_slice();
        assert_eq!(round_trip(&boxed).1, boxed);
    }

    #[test]
    fn test_arrays_have_no_prefix() {
        assert_eq!(<[u16; 3]>::FIXED_SIZE, Some(6));
        assert_eq!(<[String; 2]>::FIXED_SIZE, None);
        let (bytes, decoded) = round_trip(&[7u16, 8, 9]);
        assert_eq!(bytes, vec![7, 0, 8, 0, 9, 0]);
        assert_eq!(decoded, [7, 8, 9]);
        let strings = [String::from("x"), String::new()];
        assert_eq!(round_trip(&strings).1, strings);
    }

    #[test]
    fn test_maps_and_sets() {
        let map: HashMap<String, u8> = [("a".into(), 1), ("b".into(), 2)].into_iter().collect();
        assert_eq!(round_trip(&map).1, map);
        let tree: BTreeMap<u8, Vec<u8>> = [(1, vec![1]), (2, vec![])].into_iter().collect();
        assert_eq!(round_trip(&tree).1, tree);
        let set: HashSet<u32> = [1, 2, 3].into_iter().collect();
        assert_eq!(round_trip(&set).1, set);
        let ordered: BTreeSet<char> = ['z', 'a'].into_iter().collect();
        assert_eq!(round_trip(&ordered).1, ordered);
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let bytes = [2u8, 1, 10, 1, 20];
        assert!(matches!(
            BTreeMap::<u8, u8>::decode(&mut Reader::new(&bytes)),
            Err(DeserializationError::InvalidValue { .. })
        ));
        assert!(HashMap::<u8, u8>::decode(&mut Reader::new(&bytes)).is_err());
        assert!(BTreeSet::<u8>::decode(&mut Reader::new(&[2, 1, 1])).is_err());
        assert!(HashSet::<u8>::decode(&mut Reader::new(&[2, 1, 1])).is_err());
    }

    #[test]
    fn test_collection_cap() {
        let bytes = [3u8, 1, 2, 3];
        let options =
            crate::serialization::DeserializeOptions::default().with_max_collection_len(2);
        let mut reader = Reader::new(&bytes).with_options(Some(&options));
        assert!(matches!(
            Vec::<u8>::decode(&mut reader),
            Err(DeserializationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let mut writer = Writer::new();
        writer.write_len(usize::MAX >> 8);
        let bytes = writer.to_vec();
        assert!(matches!(
            Vec::<u64>::decode(&mut Reader::new(&bytes)),
            Err(DeserializationError::UnexpectedEof { .. })
        ));
        assert!(HashMap::<u64, u64>::decode(&mut Reader::new(&bytes)).is_err());
    }

    #[test]
    fn test_tuples_and_containers() {
        assert_eq!(<(u8, u32)>::FIXED_SIZE, Some(5));
        assert_eq!(<(u8, String)>::FIXED_SIZE, None);
        let value = (1u8, String::from("two"), Box::new(3i64), Arc::new(4.0f32));
        assert_eq!(round_trip(&value).1, value);
        assert_eq!(round_trip(&(true,)).1, (true,));
    }

    #[test]
    fn test_capacity_estimates_cover_output() {
        let value = vec![String::from("alpha"), String::from("beta")];
        let (bytes, _) = round_trip(&value);
        assert!(Codec::capacity(&value) >= bytes.len());
    }
}
