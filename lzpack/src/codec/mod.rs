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

//! Codec selection and caching.
//!
//! A type is served by one of two strategies, chosen by the
//! [`resolver`](crate::resolver): [`PlainStrategy`] for closed shapes and
//! [`UnionStrategy`] for tagged unions or types that reach one. The chosen
//! [`TypeSerializer`] is created once per (strategy, type) pair and shared.

mod serializer;
mod strategy;

use std::sync::Arc;

pub use serializer::TypeSerializer;
pub use strategy::{PlainStrategy, Strategy, UnionStrategy};

use crate::resolver::{ResolveError, Resolver};
use crate::serialization::{
    Codec, DeserializationError, DeserializeOptions, Reader, SerializationError, Writer,
};

/// The codec instance selected for `T`.
#[derive(Debug)]
pub enum SelectedCodec<T> {
    /// `T` has no union in its shape.
    Plain(Arc<TypeSerializer<PlainStrategy, T>>),
    /// `T` is, or contains, a tagged union.
    Union(Arc<TypeSerializer<UnionStrategy, T>>),
}

impl<T: Codec> SelectedCodec<T> {
    /// Classifies `T` and returns its shared codec instance.
    ///
    /// A malformed union declaration surfaces here, at first use of the type.
    pub fn for_type() -> Result<Self, ResolveError> {
        Ok(if Resolver::global().is_union_type::<T>()? {
            Self::Union(TypeSerializer::instance())
        } else {
            Self::Plain(TypeSerializer::instance())
        })
    }

    /// Returns `true` if the union strategy was selected.
    #[must_use]
    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    /// See [`TypeSerializer::get_capacity`].
    #[must_use]
    pub fn get_capacity(&self, value: &T) -> usize {
        match self {
            Self::Plain(codec) => codec.get_capacity(value),
            Self::Union(codec) => codec.get_capacity(value),
        }
    }

    /// See [`TypeSerializer::serialize`].
    pub fn serialize(&self, writer: &mut Writer, value: &T) -> Result<(), SerializationError> {
        match self {
            Self::Plain(codec) => codec.serialize(writer, value),
            Self::Union(codec) => codec.serialize(writer, value),
        }
    }

    /// See [`TypeSerializer::deserialize`].
    pub fn deserialize(
        &self,
        reader: &mut Reader<'_>,
        options: Option<&DeserializeOptions>,
    ) -> Result<T, DeserializationError> {
        match self {
            Self::Plain(codec) => codec.deserialize(reader, options),
            Self::Union(codec) => codec.deserialize(reader, options),
        }
    }

    /// See [`TypeSerializer::deserialize_in_utc`].
    pub fn deserialize_in_utc(&self, reader: &mut Reader<'_>) -> Result<T, DeserializationError> {
        match self {
            Self::Plain(codec) => codec.deserialize_in_utc(reader),
            Self::Union(codec) => codec.deserialize_in_utc(reader),
        }
    }
}
