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

//! Plain/union classification of codec types.
//!
//! A type needs the union-aware codec when it is a tagged union itself or
//! when any serialized member, transitively, is one. The decision depends
//! only on the static [`TypeShape`] graph and is memoized per type for the
//! life of the process.
//!
//! # Algorithm
//!
//! 1. Enums and leaves are never unions.
//! 2. Collections, arrays, optionals, owning containers and newtype records
//!    are unwrapped to the type they carry, at most [`MAX_UNWRAP_DEPTH`]
//!    layers deep; deeper nesting falls through as "not a union".
//! 3. A tagged union (after unwrapping) is a union.
//! 4. Otherwise the serialized members are walked depth first with a visited
//!    set, so self-referential graphs terminate. Reaching any tagged union
//!    classifies the root as a union.
//!
//! Union shapes are validated when they are reached: an empty variant list
//! or a repeated discriminator is a [`ResolveError`], reported at first use.
//!
//! # Concurrency
//!
//! Lookups take a `parking_lot` read lock. A miss computes the answer
//! without holding any lock, then inserts it under the write lock unless
//! another thread got there first, in which case that thread's answer is
//! returned. Every caller therefore observes the same classification.

mod shape;

pub use shape::{Member, ShapeFn, ShapeKind, TypeShape, VariantShape};

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use parking_lot::RwLock;
use thiserror::Error;

use crate::serialization::Codec;

/// Wrapper layers stripped before a type is treated as opaque.
pub const MAX_UNWRAP_DEPTH: usize = 8;

/// A type shape that cannot be used for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two variants of a union share a discriminator.
    #[error("union {type_name} declares discriminator {tag} more than once")]
    DuplicateDiscriminator {
        /// The union type.
        type_name: &'static str,
        /// The repeated discriminator.
        tag: u32,
    },

    /// A union declares no variants.
    #[error("union {type_name} declares no variants")]
    EmptyUnion {
        /// The union type.
        type_name: &'static str,
    },
}

/// Memoizing classifier.
///
/// The process-wide instance is used by the serializer; separate instances
/// are useful in tests.
#[derive(Debug, Default)]
pub struct Resolver {
    cache: RwLock<HashMap<TypeId, Result<bool, ResolveError>>>,
}

impl Resolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide resolver.
    pub fn global() -> &'static Resolver {
        static GLOBAL: OnceLock<Resolver> = OnceLock::new();
        GLOBAL.get_or_init(Resolver::new)
    }

    /// Classifies `T`.
    pub fn is_union_type<T: Codec>(&self) -> Result<bool, ResolveError> {
        self.is_union(T::shape)
    }

    /// Classifies the type described by `shape`.
    pub fn is_union(&self, shape: ShapeFn) -> Result<bool, ResolveError> {
        let root = shape();
        if let Some(known) = self.cache.read().get(&root.id) {
            return known.clone();
        }

        let computed = classify(&root);
        #[cfg(feature = "tracing")]
        tracing::debug!(type_name = root.name, result = ?computed, "classified type");

        self.cache
            .write()
            .entry(root.id)
            .or_insert(computed)
            .clone()
    }

    /// Number of memoized classifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Returns `true` if nothing has been classified yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

/// Classifies `T` with the process-wide resolver.
///
/// # Examples
///
/// ```rust
/// use lzpack::resolver::is_union;
///
/// assert!(!is_union::<Vec<String>>().unwrap());
/// ```
pub fn is_union<T: Codec>() -> Result<bool, ResolveError> {
    Resolver::global().is_union_type::<T>()
}

/// Validates a union's discriminator set.
pub fn validate_union(shape: &TypeShape) -> Result<(), ResolveError> {
    let ShapeKind::Union(variants) = &shape.kind else {
        return Ok(());
    };
    if variants.is_empty() {
        return Err(ResolveError::EmptyUnion {
            type_name: shape.name,
        });
    }
    let mut seen = HashSet::with_capacity(variants.len());
    for variant in variants {
        if !seen.insert(variant.tag) {
            return Err(ResolveError::DuplicateDiscriminator {
                type_name: shape.name,
                tag: variant.tag,
            });
        }
    }
    Ok(())
}

/// Strips wrapper layers; `None` when nesting exceeds [`MAX_UNWRAP_DEPTH`].
fn unwrap(shape: TypeShape) -> Option<TypeShape> {
    let mut current = shape;
    for _ in 0..MAX_UNWRAP_DEPTH {
        match current.unwrap_once() {
            Some(inner) => current = inner,
            None => return Some(current),
        }
    }
    current.unwrap_once().is_none().then_some(current)
}

fn classify(root: &TypeShape) -> Result<bool, ResolveError> {
    if matches!(root.kind, ShapeKind::Primitive | ShapeKind::Buffer | ShapeKind::Enum) {
        return Ok(false);
    }
    let Some(target) = unwrap(root.clone()) else {
        return Ok(false);
    };
    if target.is_union_kind() {
        validate_union(&target)?;
        return Ok(true);
    }
    let mut visited = HashSet::new();
    visited.insert(root.id);
    visited.insert(target.id);
    walk(&target, &mut visited)
}

fn walk(shape: &TypeShape, visited: &mut HashSet<TypeId>) -> Result<bool, ResolveError> {
    let children: Vec<ShapeFn> = match &shape.kind {
        ShapeKind::Record(members) => members
            .iter()
            .filter(|member| member.serialized)
            .map(|member| member.shape)
            .collect(),
        ShapeKind::Tuple(items) => items.clone(),
        ShapeKind::Map { key, value } => vec![*key, *value],
        _ => return Ok(false),
    };

    for child in children {
        let Some(target) = unwrap(child()) else {
            continue;
        };
        if target.is_union_kind() {
            validate_union(&target)?;
            return Ok(true);
        }
        if visited.insert(target.id) && walk(&target, visited)? {
            return Ok(true);
        }
    }
    Ok(false)
}
