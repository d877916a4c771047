//! Code generation for `#[derive(Codec)]`.
//!
//! Everything generated refers to the runtime crate through absolute
//! `::lzpack::...` paths, so the derive works wherever `lzpack` is a
//! dependency (and inside `lzpack` itself, which aliases its own name).

use crate::parse::{Body, CodecDef, FieldDef, FieldStyle, FieldsDef, VariantDef};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident, parse_quote};

/// Generate the `Codec` impl (and the `Union` impl for union enums).
pub fn generate_codec(def: &CodecDef) -> TokenStream {
    match &def.body {
        Body::Struct(fields) => generate_struct(def, fields),
        Body::Enum(variants) => generate_enum(def, variants),
        Body::Union(variants) => generate_union(def, variants),
    }
}

/// Every type parameter must itself be a codec.
fn with_codec_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(parse_quote!(::lzpack::serialization::Codec));
    }
    generics
}

/// `Member` descriptors for a struct or variant.
fn member_shapes(fields: &FieldsDef) -> Vec<TokenStream> {
    fields
        .fields
        .iter()
        .map(|field| {
            let name = &field.name;
            let ty = &field.ty;
            if field.skip {
                quote! {
                    ::lzpack::resolver::Member {
                        name: #name,
                        serialized: false,
                        shape: || ::lzpack::resolver::TypeShape::primitive::<#ty>(),
                    }
                }
            } else {
                quote! {
                    ::lzpack::resolver::Member {
                        name: #name,
                        serialized: true,
                        shape: <#ty as ::lzpack::serialization::Codec>::shape,
                    }
                }
            }
        })
        .collect()
}

/// Field initializers for a braced constructor, in declaration order.
fn decode_fields(fields: &FieldsDef, reader: &Ident) -> Vec<TokenStream> {
    fields
        .fields
        .iter()
        .map(|field| {
            let member = &field.member;
            if field.skip {
                quote! { #member: ::core::default::Default::default() }
            } else {
                let ty = &field.ty;
                quote! { #member: <#ty as ::lzpack::serialization::Codec>::decode(#reader)? }
            }
        })
        .collect()
}

fn generate_struct(def: &CodecDef, fields: &FieldsDef) -> TokenStream {
    let name = &def.ident;
    let generics = with_codec_bounds(&def.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let active: Vec<&FieldDef> = fields.serialized().collect();
    let types: Vec<_> = active.iter().map(|field| &field.ty).collect();
    let members: Vec<_> = active.iter().map(|field| &field.member).collect();

    let newtype =
        fields.style == FieldStyle::Unnamed && fields.fields.len() == 1 && active.len() == 1;
    let shape_kind = if newtype {
        let ty = types[0];
        quote! {
            ::lzpack::resolver::ShapeKind::Newtype(<#ty as ::lzpack::serialization::Codec>::shape)
        }
    } else {
        let shapes = member_shapes(fields);
        quote! { ::lzpack::resolver::ShapeKind::Record(::std::vec![#(#shapes),*]) }
    };

    let reader: Ident = parse_quote!(__reader);
    let inits = decode_fields(fields, &reader);

    quote! {
        #[automatically_derived]
        impl #impl_generics ::lzpack::serialization::Codec for #name #ty_generics #where_clause {
            const FIXED_SIZE: ::core::option::Option<usize> = ::lzpack::serialization::sum_fixed(&[
                #(<#types as ::lzpack::serialization::Codec>::FIXED_SIZE),*
            ]);

            fn shape() -> ::lzpack::resolver::TypeShape {
                ::lzpack::resolver::TypeShape::of::<Self>(#shape_kind)
            }

            fn capacity(&self) -> usize {
                0 #(+ ::lzpack::serialization::Codec::capacity(&self.#members))*
            }

            fn encode(
                &self,
                __writer: &mut ::lzpack::serialization::Writer,
            ) -> ::core::result::Result<(), ::lzpack::serialization::SerializationError> {
                #(::lzpack::serialization::Codec::encode(&self.#members, __writer)?;)*
                ::core::result::Result::Ok(())
            }

            fn decode(
                #reader: &mut ::lzpack::serialization::Reader<'_>,
            ) -> ::core::result::Result<Self, ::lzpack::serialization::DeserializationError> {
                ::core::result::Result::Ok(Self { #(#inits),* })
            }
        }
    }
}

fn generate_enum(def: &CodecDef, variants: &[Ident]) -> TokenStream {
    let name = &def.ident;
    let name_str = name.to_string();
    let generics = with_codec_bounds(&def.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let discriminants: Vec<u64> = (0..variants.len() as u64).collect();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::lzpack::serialization::Codec for #name #ty_generics #where_clause {
            fn shape() -> ::lzpack::resolver::TypeShape {
                ::lzpack::resolver::TypeShape::of::<Self>(::lzpack::resolver::ShapeKind::Enum)
            }

            fn capacity(&self) -> usize {
                ::lzpack::serialization::MAX_VARINT_LEN
            }

            fn encode(
                &self,
                __writer: &mut ::lzpack::serialization::Writer,
            ) -> ::core::result::Result<(), ::lzpack::serialization::SerializationError> {
                let discriminant: u64 = match *self {
                    #(Self::#variants => #discriminants,)*
                };
                __writer.write_varint(discriminant);
                ::core::result::Result::Ok(())
            }

            fn decode(
                __reader: &mut ::lzpack::serialization::Reader<'_>,
            ) -> ::core::result::Result<Self, ::lzpack::serialization::DeserializationError> {
                match __reader.read_varint()? {
                    #(#discriminants => ::core::result::Result::Ok(Self::#variants),)*
                    tag => ::core::result::Result::Err(
                        ::lzpack::serialization::DeserializationError::InvalidDiscriminator {
                            type_name: #name_str,
                            tag,
                        },
                    ),
                }
            }
        }
    }
}

/// Braced pattern binding every serialized member of a variant.
fn variant_pattern(variant: &VariantDef) -> TokenStream {
    let ident = &variant.ident;
    let bindings = variant.fields.serialized().map(|field| {
        let member = &field.member;
        let binding = &field.binding;
        quote! { #member: #binding }
    });
    quote! { Self::#ident { #(#bindings,)* .. } }
}

fn generate_union(def: &CodecDef, variants: &[VariantDef]) -> TokenStream {
    let name = &def.ident;
    let name_str = name.to_string();
    let generics = with_codec_bounds(&def.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let tags: Vec<u32> = variants.iter().map(|variant| variant.tag).collect();
    let idents: Vec<&Ident> = variants.iter().map(|variant| &variant.ident).collect();
    let variant_names: Vec<String> = idents.iter().map(|ident| ident.to_string()).collect();

    let variant_shapes = variants.iter().map(|variant| {
        let tag = variant.tag;
        let variant_name = variant.ident.to_string();
        let members = member_shapes(&variant.fields);
        quote! {
            ::lzpack::resolver::VariantShape {
                tag: #tag,
                name: #variant_name,
                members: ::std::vec![#(#members),*],
            }
        }
    });

    let capacity_arms = variants.iter().map(|variant| {
        let pattern = variant_pattern(variant);
        let bindings = variant.fields.serialized().map(|field| &field.binding);
        quote! {
            #pattern => 0 #(+ ::lzpack::serialization::Codec::capacity(#bindings))*
        }
    });

    let encode_arms = variants.iter().map(|variant| {
        let pattern = variant_pattern(variant);
        let tag = variant.tag;
        let bindings = variant.fields.serialized().map(|field| &field.binding);
        quote! {
            #pattern => ::lzpack::serialization::encode_variant(__writer, #tag, |__writer| {
                #(::lzpack::serialization::Codec::encode(#bindings, __writer)?;)*
                ::core::result::Result::Ok(())
            })
        }
    });

    let reader: Ident = parse_quote!(__reader);
    let decode_arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let tag = variant.tag;
        let inits = decode_fields(&variant.fields, &reader);
        quote! {
            #tag => ::core::result::Result::Ok(Self::#ident { #(#inits),* })
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::lzpack::serialization::Union for #name #ty_generics #where_clause {
            const VARIANTS: &'static [(u32, &'static str)] = &[#((#tags, #variant_names)),*];

            fn discriminator(&self) -> u32 {
                match self {
                    #(Self::#idents { .. } => #tags,)*
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#idents { .. } => #variant_names,)*
                }
            }
        }

        #[automatically_derived]
        impl #impl_generics ::lzpack::serialization::Codec for #name #ty_generics #where_clause {
            fn shape() -> ::lzpack::resolver::TypeShape {
                ::lzpack::resolver::TypeShape::of::<Self>(::lzpack::resolver::ShapeKind::Union(
                    ::std::vec![#(#variant_shapes),*],
                ))
            }

            fn capacity(&self) -> usize {
                ::lzpack::serialization::VARIANT_HEADER_MAX
                    + match self {
                        #(#capacity_arms,)*
                    }
            }

            fn encode(
                &self,
                __writer: &mut ::lzpack::serialization::Writer,
            ) -> ::core::result::Result<(), ::lzpack::serialization::SerializationError> {
                match self {
                    #(#encode_arms,)*
                }
            }

            fn decode(
                __reader: &mut ::lzpack::serialization::Reader<'_>,
            ) -> ::core::result::Result<Self, ::lzpack::serialization::DeserializationError> {
                ::lzpack::serialization::decode_variant(__reader, #name_str, |__tag, #reader| {
                    match __tag {
                        #(#decode_arms,)*
                        other => ::core::result::Result::Err(
                            ::lzpack::serialization::unknown_variant(#name_str, other),
                        ),
                    }
                })
            }
        }
    }
}
