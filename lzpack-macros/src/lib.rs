//! Procedural macros for the lzpack serialization engine.
//!
//! This crate provides `#[derive(Codec)]`, which generates the per-type codec
//! and the static type shape the resolver classifies.
//!
//! # Example
//!
//! ```ignore
//! use lzpack::Codec;
//!
//! #[derive(Codec)]
//! struct Reading {
//!     count: i32,
//!     #[lzpack(skip)]
//!     cached: Option<String>,
//! }
//!
//! #[derive(Codec)]
//! #[lzpack(union)]
//! enum Event {
//!     #[lzpack(tag = 1)]
//!     Started { at: lzpack::Timestamp },
//!     #[lzpack(tag = 2)]
//!     Reading(Reading),
//! }
//! ```
//!
//! This will generate:
//! - A `Codec` impl for `Reading` that writes `count` and decodes `cached` as `None`
//! - `Codec` and `Union` impls for `Event` with a tagged, length-framed payload

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod generate;
mod parse;

/// Derive `lzpack::serialization::Codec`.
///
/// # Supported Items
///
/// - **Structs** (named, tuple and unit): serialized fields in declaration
///   order with no per-field framing. A one-field tuple struct is a newtype.
/// - **Field-less enums**: the declaration index as a varint.
/// - **Union enums** (`#[lzpack(union)]`): a varint tag, a 4-byte payload
///   length and the variant's serialized fields. Also implements `Union`.
///
/// # Attributes
///
/// - `#[lzpack(union)]` on an enum: encode it as a tagged union
/// - `#[lzpack(tag = N)]` on a union variant: its discriminator
///   (defaults to the declaration index). Duplicate tags are rejected.
/// - `#[lzpack(skip)]` on a field: never written; decoded as `Default::default()`
///
/// Every type parameter receives a `Codec` bound.
#[proc_macro_derive(Codec, attributes(lzpack))]
pub fn derive_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let def = match parse::parse_codec(&input) {
        Ok(def) => def,
        Err(err) => return err.to_compile_error().into(),
    };

    TokenStream::from(generate::generate_codec(&def))
}
