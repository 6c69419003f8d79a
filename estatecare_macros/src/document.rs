use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let collection = match collection_attr(&input.attrs)? {
        Some(collection) => collection,
        None => LitStr::new(&default_collection(&name.to_string()), Span::call_site()),
    };
    let id_field = id_field(input)?;

    Ok(quote! {
        impl ::estatecare::Document for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }
        }
    })
}

/// `#[document(collection = "...")]` on the struct.
fn collection_attr(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut collection = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;
    }
    Ok(collection)
}

/// The field tagged `#[document(id)]`, else a field named `id`.
fn id_field(input: &DeriveInput) -> syn::Result<Ident> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Document can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Document can only be derived for structs",
            ))
        }
    };

    let mut tagged = None;
    for field in fields {
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("document")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    tagged = field.ident.clone();
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;
        }
    }
    if let Some(ident) = tagged {
        return Ok(ident);
    }

    fields
        .iter()
        .filter_map(|field| field.ident.clone())
        .find(|ident| ident == "id")
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Document needs a field named `id` or one marked #[document(id)]",
            )
        })
}

/// `ServiceOrder` becomes `service_orders`.
fn default_collection(type_name: &str) -> String {
    let mut snake = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.char_indices() {
        if ch.is_uppercase() && i > 0 {
            snake.push('_');
        }
        snake.extend(ch.to_lowercase());
    }
    snake.push('s');
    snake
}
