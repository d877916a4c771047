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

//! The cached per-(strategy, type) codec instance.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::strategy::Strategy;
use crate::serialization::{
    Codec, DeserializationError, DeserializeOptions, Reader, SerializationError, Writer,
};

type InstanceMap = HashMap<(TypeId, TypeId), Arc<dyn Any + Send + Sync>>;

fn instances() -> &'static RwLock<InstanceMap> {
    static INSTANCES: OnceLock<RwLock<InstanceMap>> = OnceLock::new();
    INSTANCES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Codec instance for `T` under strategy `S`.
///
/// Instances hold only precomputed metadata and are shared process-wide:
/// [`instance`](Self::instance) returns the same `Arc` to every caller, even
/// when several threads race to create it.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use lzpack::codec::{PlainStrategy, TypeSerializer};
/// use lzpack::serialization::{Reader, Writer};
///
/// let codec = TypeSerializer::<PlainStrategy, (u8, String)>::instance();
/// assert!(Arc::ptr_eq(&codec, &TypeSerializer::instance()));
///
/// let value = (1, String::from("one"));
/// let mut writer = Writer::with_capacity(codec.get_capacity(&value));
/// codec.serialize(&mut writer, &value).unwrap();
/// let bytes = writer.into_vec();
/// assert_eq!(codec.deserialize(&mut Reader::new(&bytes), None).unwrap(), value);
/// ```
pub struct TypeSerializer<S, T> {
    fixed_size: Option<usize>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S: Strategy, T: Codec> TypeSerializer<S, T> {
    fn new() -> Self {
        Self {
            fixed_size: T::FIXED_SIZE,
            _marker: PhantomData,
        }
    }

    /// The shared instance, created on first use.
    pub fn instance() -> Arc<Self> {
        let key = (TypeId::of::<S>(), TypeId::of::<T>());
        if let Some(found) = instances().read().get(&key).cloned() {
            if let Ok(instance) = found.downcast::<Self>() {
                return instance;
            }
        }

        let shared = instances()
            .write()
            .entry(key)
            .or_insert_with(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    strategy = S::NAME,
                    type_name = std::any::type_name::<T>(),
                    "created codec instance"
                );
                Arc::new(Self::new()) as Arc<dyn Any + Send + Sync>
            })
            .clone();

        shared.downcast::<Self>().unwrap_or_else(|_| Arc::new(Self::new()))
    }

    /// Encoded size shared by every value, if fixed.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        self.fixed_size
    }

    /// Cheap estimate of the encoded length of `value`.
    #[must_use]
    pub fn get_capacity(&self, value: &T) -> usize {
        self.fixed_size.unwrap_or_else(|| value.capacity()) + S::capacity_slack()
    }

    /// Writes `value` at the writer's position.
    pub fn serialize(&self, writer: &mut Writer, value: &T) -> Result<(), SerializationError> {
        value.encode(writer)
    }

    /// Reads one value, applying `options` for the duration of the call.
    ///
    /// The reader's own settings are restored afterwards, on success and on
    /// failure.
    pub fn deserialize(
        &self,
        reader: &mut Reader<'_>,
        options: Option<&DeserializeOptions>,
    ) -> Result<T, DeserializationError> {
        let saved = reader.options();
        reader.merge_options(options);
        let result = S::decode::<T>(reader);
        reader.set_options(saved);
        result
    }

    /// Reads one value with every timestamp forced to UTC.
    pub fn deserialize_in_utc(&self, reader: &mut Reader<'_>) -> Result<T, DeserializationError> {
        self.deserialize(reader, Some(&DeserializeOptions::utc()))
    }
}

impl<S: Strategy, T> fmt::Debug for TypeSerializer<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSerializer")
            .field("strategy", &S::NAME)
            .field("type", &std::any::type_name::<T>())
            .field("fixed_size", &self.fixed_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::codec::{PlainStrategy, UnionStrategy};
    use crate::timestamp::{DateTimeKind, Timestamp};

    #[test]
    fn test_instances_are_shared_per_strategy() {
        let plain = TypeSerializer::<PlainStrategy, u64>::instance();
        assert!(Arc::ptr_eq(&plain, &TypeSerializer::<PlainStrategy, u64>::instance()));
        let union = TypeSerializer::<UnionStrategy, u64>::instance();
        assert_eq!(plain.fixed_size(), Some(8));
        assert_eq!(union.get_capacity(&1), 8 + UnionStrategy::capacity_slack());
    }

    #[test]
    fn test_concurrent_creation_agrees() {
        struct Fresh;
        impl Codec for Fresh {
            fn shape() -> crate::resolver::TypeShape {
                crate::resolver::TypeShape::primitive::<Self>()
            }
            fn encode(&self, _: &mut Writer) -> Result<(), SerializationError> {
                Ok(())
            }
            fn decode(_: &mut Reader<'_>) -> Result<Self, DeserializationError> {
                Ok(Fresh)
            }
        }

        let handles: Vec<_> = (0..16)
            .map(|_| thread::spawn(TypeSerializer::<PlainStrategy, Fresh>::instance))
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }

    #[test]
    fn test_options_are_scoped_to_the_call() {
        let stamp = Timestamp::from_ymd_hms(2021, 5, 1, 5, 8, 7, DateTimeKind::Local).unwrap();
        let mut writer = Writer::new();
        stamp.encode(&mut writer).unwrap();
        stamp.encode(&mut writer).unwrap();
        let bytes = writer.into_vec();

        let codec = TypeSerializer::<PlainStrategy, Timestamp>::instance();
        let mut reader = Reader::new(&bytes);
        assert_eq!(codec.deserialize_in_utc(&mut reader).unwrap().kind(), DateTimeKind::Utc);
        assert_eq!(reader.date_time_kind(), None);
        assert_eq!(codec.deserialize(&mut reader, None).unwrap().kind(), DateTimeKind::Local);
    }
}
