//! Parsing logic for `#[derive(Codec)]`.
//!
//! This module turns a [`DeriveInput`] into a [`CodecDef`]: the serialized
//! members of a struct, the variants of a C-like enum, or the tagged variants
//! of a union enum. All attribute validation happens here so that
//! [`generate`](crate::generate) only sees well-formed definitions.

use std::collections::HashMap;

use syn::{
    Attribute, Data, DataEnum, DeriveInput, Error, Expr, ExprLit, Fields, Generics, Ident, Index,
    Lit, Member, Meta, Result, Token, Type, punctuated::Punctuated,
};

/// How a struct or variant lays out its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    /// `{ a: T, b: U }`
    Named,
    /// `(T, U)`
    Unnamed,
    /// No members.
    Unit,
}

/// One member of a struct or union variant.
pub struct FieldDef {
    /// Accessor used in field expressions and braced patterns.
    pub member: Member,
    /// Local binding used when destructuring a variant.
    pub binding: Ident,
    /// Declared name (`"0"`, `"1"`, ... for positional members).
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// `#[lzpack(skip)]`: not written, decoded as `Default`.
    pub skip: bool,
}

/// The members of a struct or variant.
pub struct FieldsDef {
    pub style: FieldStyle,
    pub fields: Vec<FieldDef>,
}

impl FieldsDef {
    /// Members that take part in the encoding, in declaration order.
    pub fn serialized(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.skip)
    }
}

/// One variant of a union enum.
pub struct VariantDef {
    pub ident: Ident,
    pub tag: u32,
    pub fields: FieldsDef,
}

/// What kind of codec to generate.
pub enum Body {
    /// A struct encoded as its serialized members in order.
    Struct(FieldsDef),
    /// A field-less enum encoded as a varint discriminant (declaration index).
    Enum(Vec<Ident>),
    /// A closed tagged union.
    Union(Vec<VariantDef>),
}

/// Parsed derive input.
pub struct CodecDef {
    pub ident: Ident,
    pub generics: Generics,
    pub body: Body,
}

/// Container- and variant-level options collected from `#[lzpack(...)]`.
#[derive(Default)]
struct Options {
    union: bool,
    skip: bool,
    tag: Option<u32>,
}

/// Parse the input of `#[derive(Codec)]`.
pub fn parse_codec(input: &DeriveInput) -> Result<CodecDef> {
    let options = parse_options(&input.attrs)?;
    if options.skip || options.tag.is_some() {
        return Err(Error::new_spanned(
            &input.ident,
            "`skip` and `tag` are not valid on a type; use them on fields and variants",
        ));
    }

    let body = match &input.data {
        Data::Struct(data) => {
            if options.union {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[lzpack(union)] can only be used on enums",
                ));
            }
            Body::Struct(parse_fields(&data.fields)?)
        }
        Data::Enum(data) if options.union => Body::Union(parse_union(&input.ident, data)?),
        Data::Enum(data) => Body::Enum(parse_enum(data)?),
        Data::Union(data) => {
            return Err(Error::new_spanned(
                data.union_token,
                "Codec cannot be derived for untagged unions",
            ));
        }
    };

    Ok(CodecDef {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        body,
    })
}

fn parse_fields(fields: &Fields) -> Result<FieldsDef> {
    let style = match fields {
        Fields::Named(_) => FieldStyle::Named,
        Fields::Unnamed(_) => FieldStyle::Unnamed,
        Fields::Unit => FieldStyle::Unit,
    };

    let mut parsed = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let options = parse_options(&field.attrs)?;
        if options.union || options.tag.is_some() {
            return Err(Error::new_spanned(
                field,
                "only #[lzpack(skip)] is valid on a field",
            ));
        }
        let (member, name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        };
        parsed.push(FieldDef {
            member,
            binding: quote::format_ident!("__lzpack_{}", index),
            name,
            ty: field.ty.clone(),
            skip: options.skip,
        });
    }

    Ok(FieldsDef {
        style,
        fields: parsed,
    })
}

fn parse_enum(data: &DataEnum) -> Result<Vec<Ident>> {
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let options = parse_options(&variant.attrs)?;
        if options.tag.is_some() || options.skip {
            return Err(Error::new_spanned(
                variant,
                "#[lzpack(tag = N)] requires #[lzpack(union)] on the enum",
            ));
        }
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "enums with fields must be marked #[lzpack(union)]",
            ));
        }
        variants.push(variant.ident.clone());
    }
    Ok(variants)
}

fn parse_union(ident: &Ident, data: &DataEnum) -> Result<Vec<VariantDef>> {
    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            ident,
            "a union needs at least one variant",
        ));
    }

    let mut seen: HashMap<u32, Ident> = HashMap::new();
    let mut variants = Vec::with_capacity(data.variants.len());
    for (index, variant) in data.variants.iter().enumerate() {
        let options = parse_options(&variant.attrs)?;
        if options.union || options.skip {
            return Err(Error::new_spanned(
                variant,
                "only #[lzpack(tag = N)] is valid on a variant",
            ));
        }
        let tag = match options.tag {
            Some(tag) => tag,
            None => u32::try_from(index)
                .map_err(|_| Error::new_spanned(variant, "too many variants"))?,
        };
        if let Some(previous) = seen.insert(tag, variant.ident.clone()) {
            return Err(Error::new_spanned(
                &variant.ident,
                format!("duplicate union tag {tag} (already used by `{previous}`)"),
            ));
        }
        variants.push(VariantDef {
            ident: variant.ident.clone(),
            tag,
            fields: parse_fields(&variant.fields)?,
        });
    }
    Ok(variants)
}

/// Collect every `#[lzpack(...)]` attribute on an item.
fn parse_options(attrs: &[Attribute]) -> Result<Options> {
    let mut options = Options::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("lzpack")) {
        let list = attr.meta.require_list()?;
        let nested = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in nested {
            match &meta {
                Meta::Path(path) if path.is_ident("union") => options.union = true,
                Meta::Path(path) if path.is_ident("skip") => options.skip = true,
                Meta::NameValue(nv) if nv.path.is_ident("tag") => {
                    if options.tag.is_some() {
                        return Err(Error::new_spanned(&meta, "tag specified more than once"));
                    }
                    options.tag = Some(parse_tag(&nv.value)?);
                }
                _ => {
                    return Err(Error::new_spanned(
                        &meta,
                        "unknown lzpack attribute; expected `union`, `skip` or `tag = N`",
                    ));
                }
            }
        }
    }
    Ok(options)
}

/// Parse `tag = N`.
fn parse_tag(value: &Expr) -> Result<u32> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Int(lit_int),
        ..
    }) = value
    {
        lit_int.base10_parse()
    } else {
        Err(Error::new_spanned(value, "tag must be an integer literal"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_struct_with_skip() {
        let input: DeriveInput = parse_quote! {
            struct Reading {
                a: u32,
                #[lzpack(skip)]
                b: String,
                c: bool,
            }
        };
        let def = parse_codec(&input).unwrap();
        let Body::Struct(fields) = def.body else {
            panic!("expected struct");
        };
        assert_eq!(fields.style, FieldStyle::Named);
        let names: Vec<_> = fields.serialized().map(|f| f.name.clone()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_union_tags() {
        let input: DeriveInput = parse_quote! {
            #[lzpack(union)]
            enum Shape {
                #[lzpack(tag = 7)]
                Circle { radius: f32 },
                Empty,
            }
        };
        let def = parse_codec(&input).unwrap();
        let Body::Union(variants) = def.body else {
            panic!("expected union");
        };
        assert_eq!(variants[0].tag, 7);
        assert_eq!(variants[1].tag, 1);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let input: DeriveInput = parse_quote! {
            #[lzpack(union)]
            enum Shape {
                #[lzpack(tag = 1)]
                A,
                #[lzpack(tag = 1)]
                B,
            }
        };
        let err = parse_codec(&input).err().unwrap();
        assert!(err.to_string().contains("duplicate union tag 1"));
    }

    #[test]
    fn test_implicit_tag_collision_rejected() {
        let input: DeriveInput = parse_quote! {
            #[lzpack(union)]
            enum Shape {
                A,
                #[lzpack(tag = 0)]
                B,
            }
        };
        assert!(parse_codec(&input).is_err());
    }

    #[test]
    fn test_data_enum_requires_union() {
        let input: DeriveInput = parse_quote! {
            enum Shape {
                A(u8),
            }
        };
        let err = parse_codec(&input).err().unwrap();
        assert!(err.to_string().contains("#[lzpack(union)]"));
    }

    #[test]
    fn test_union_on_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            #[lzpack(union)]
            struct Shape;
        };
        assert!(parse_codec(&input).is_err());
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Shape {
                #[lzpack(rename = "x")]
                a: u8,
            }
        };
        assert!(parse_codec(&input).is_err());
    }
}
