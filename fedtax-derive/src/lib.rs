use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro that documents the input fields of a tax document record.
///
/// For each field, extracts:
/// - Field name (respects #[serde(rename = "...")])
/// - Kind: `amount` for `Decimal` fields, `text` for `Option<String>` metadata
/// - Description (from doc comments)
///
/// Generates a `field_schema() -> &'static [DocumentField]` method. The
/// `DocumentField` type must be in scope at the derive site.
#[proc_macro_derive(FieldSchema, attributes(serde))]
pub fn derive_field_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("FieldSchema only supports structs with named fields"),
        },
        _ => panic!("FieldSchema only supports structs"),
    };

    let field_info: Vec<_> = fields
        .iter()
        .filter(|field| !has_serde_flag(&field.attrs, "skip"))
        .map(|field| {
            let field_name = field.ident.as_ref().unwrap().to_string();
            let input_name = get_serde_value(&field.attrs, "rename").unwrap_or(field_name);
            let alias = get_serde_value(&field.attrs, "alias").unwrap_or_default();
            let kind = if is_type_named(&field.ty, "Decimal") {
                "amount"
            } else {
                "text"
            };
            let doc = get_doc_comment(&field.attrs);
            (input_name, alias, kind, doc)
        })
        .collect();

    let field_entries = field_info.iter().map(|(name, alias, kind, desc)| {
        quote! {
            DocumentField {
                name: #name,
                alias: #alias,
                kind: #kind,
                description: #desc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn field_schema() -> &'static [DocumentField] {
                static SCHEMA: &[DocumentField] = &[
                    #(#field_entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

/// Look for `key = "..."` inside any `#[serde(...)]` attribute.
fn get_serde_value(attrs: &[syn::Attribute], key: &str) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        if let Meta::List(meta_list) = &attr.meta {
            let mut found = None;
            let _ = meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident(key) {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    found = Some(lit.value());
                } else if meta.input.peek(syn::Token![=]) {
                    // consume values of keys we don't care about
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

fn has_serde_flag(attrs: &[syn::Attribute], flag: &str) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("serde") {
            return false;
        }
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) {
                found = true;
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
        found
    })
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_type_named(ty: &Type, ident: &str) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == ident;
        }
    }
    false
}
