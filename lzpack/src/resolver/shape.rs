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

//! Static type shapes.
//!
//! Every [`Codec`](crate::serialization::Codec) type describes itself with a
//! [`TypeShape`]: an identity plus a [`ShapeKind`] naming the type's role and
//! the shapes it contains. Shapes are produced by plain `fn` pointers, so a
//! self-referential type graph is described lazily and never materialized
//! as a whole.

use std::any::{TypeId, type_name};
use std::fmt;

/// Produces the shape of one type.
pub type ShapeFn = fn() -> TypeShape;

/// A named data member of a record or union variant.
#[derive(Clone, Copy)]
pub struct Member {
    /// Field name (or position for tuple fields).
    pub name: &'static str,
    /// Whether the member participates in encoding.
    pub serialized: bool,
    /// The member's shape.
    pub shape: ShapeFn,
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("serialized", &self.serialized)
            .finish()
    }
}

/// One declared variant of a union.
#[derive(Debug, Clone)]
pub struct VariantShape {
    /// Wire discriminator.
    pub tag: u32,
    /// Variant name.
    pub name: &'static str,
    /// Data members carried by the variant.
    pub members: Vec<Member>,
}

/// The structural role of a type.
#[derive(Clone)]
pub enum ShapeKind {
    /// Scalars, strings and other leaf values.
    Primitive,
    /// One of the raw byte-buffer representations.
    Buffer,
    /// A field-less enumeration encoded as its discriminant.
    Enum,
    /// A sequence or set of elements.
    Collection(ShapeFn),
    /// A key/value map.
    Map {
        /// Key shape.
        key: ShapeFn,
        /// Value shape.
        value: ShapeFn,
    },
    /// A fixed-length array.
    Array(ShapeFn),
    /// A nullable value.
    Optional(ShapeFn),
    /// A generic owning container (`Box`, `Arc`).
    Container(ShapeFn),
    /// A record whose only member wraps another type.
    Newtype(ShapeFn),
    /// An anonymous product.
    Tuple(Vec<ShapeFn>),
    /// A record with named or positional members.
    Record(Vec<Member>),
    /// A closed tagged union.
    Union(Vec<VariantShape>),
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.write_str("Primitive"),
            Self::Buffer => f.write_str("Buffer"),
            Self::Enum => f.write_str("Enum"),
            Self::Collection(_) => f.write_str("Collection"),
            Self::Map { .. } => f.write_str("Map"),
            Self::Array(_) => f.write_str("Array"),
            Self::Optional(_) => f.write_str("Optional"),
            Self::Container(_) => f.write_str("Container"),
            Self::Newtype(_) => f.write_str("Newtype"),
            Self::Tuple(items) => write!(f, "Tuple({})", items.len()),
            Self::Record(members) => f.debug_list().entries(members).finish(),
            Self::Union(variants) => f.debug_list().entries(variants).finish(),
        }
    }
}

/// Identity and structure of one type.
#[derive(Debug, Clone)]
pub struct TypeShape {
    /// Runtime type identity.
    pub id: TypeId,
    /// Type name for diagnostics.
    pub name: &'static str,
    /// Structural role.
    pub kind: ShapeKind,
}

impl TypeShape {
    /// The shape of `T` with the given kind.
    #[must_use]
    pub fn of<T: ?Sized + 'static>(kind: ShapeKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind,
        }
    }

    /// A leaf shape.
    #[must_use]
    pub fn primitive<T: ?Sized + 'static>() -> Self {
        Self::of::<T>(ShapeKind::Primitive)
    }

    /// Returns `true` if the type itself is a tagged union.
    #[must_use]
    pub fn is_union_kind(&self) -> bool {
        matches!(self.kind, ShapeKind::Union(_))
    }

    /// Shape reached by stripping one wrapper layer, if this is a wrapper.
    #[must_use]
    pub fn unwrap_once(&self) -> Option<TypeShape> {
        match &self.kind {
            ShapeKind::Collection(inner)
            | ShapeKind::Array(inner)
            | ShapeKind::Optional(inner)
            | ShapeKind::Container(inner)
            | ShapeKind::Newtype(inner) => Some(inner()),
            _ => None,
        }
    }
}
