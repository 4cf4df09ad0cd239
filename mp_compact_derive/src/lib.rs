extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, parse_macro_input};

/// How a struct field takes part in the object's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Plain value, packed through `Pack`/`Unpack`.
    Value,
    /// Base object whose fields come before this struct's own.
    Parent,
    /// Field described by its own `MpObject` impl.
    Nested,
    Skip,
}

/// Read the `#[mp(...)]` attribute of a field.
fn field_role(field: &Field) -> syn::Result<Role> {
    let mut role = Role::Value;
    for attr in &field.attrs {
        if !attr.path().is_ident("mp") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("parent") {
                Role::Parent
            } else if meta.path.is_ident("nested") {
                Role::Nested
            } else if meta.path.is_ident("skip") {
                Role::Skip
            } else {
                return Err(meta.error("expected `parent`, `nested` or `skip`"));
            };
            if role != Role::Value {
                return Err(meta.error("conflicting #[mp] field attributes"));
            }
            role = next;
            Ok(())
        })?;
    }
    Ok(role)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let named = match &input.data {
        Data::Struct(ds) => match &ds.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Only named fields supported",
                ));
            }
        },
        _ => return Err(syn::Error::new_spanned(&input.ident, "Only structs supported")),
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic structs not supported",
        ));
    }

    let mut parent = None;
    let mut registrations = Vec::new();

    for field in named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let name = ident.to_string();

        match field_role(field)? {
            Role::Skip => {}
            Role::Value => registrations.push(quote! {
                object.reg(#name, |s| &s.#ident, |s| &mut s.#ident);
            }),
            Role::Nested => registrations.push(quote! {
                object.reg_object(
                    #name,
                    ::mp_compact::__private::Arc::new(
                        <#ty as ::mp_compact::MpObject>::object()?
                    ),
                    |s| &s.#ident,
                    |s| &mut s.#ident,
                )?;
            }),
            Role::Parent => {
                if parent.is_some() {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "only one #[mp(parent)] field allowed",
                    ));
                }
                parent = Some(quote! {
                    object.inherit(
                        ::mp_compact::__private::Arc::new(
                            <#ty as ::mp_compact::MpObject>::object()?
                        ),
                        |s| &s.#ident,
                        |s| &mut s.#ident,
                    )?;
                });
            }
        }
    }

    let ident = &input.ident;
    let type_name = ident.to_string();

    Ok(quote! {
        impl ::mp_compact::MpObject for #ident {
            const NAME: &'static str = #type_name;

            fn assemble(
                object: &mut ::mp_compact::Object<Self>,
            ) -> ::mp_compact::Result<()> {
                #parent
                #( #registrations )*
                Ok(())
            }
        }
    })
}

/// Implement `mp_compact::MpObject` for a struct with named fields.
///
/// Fields are registered in declaration order. Field attributes:
/// - `#[mp(parent)]` the field is the base object, packed before all others
/// - `#[mp(nested)]` the field's type implements `MpObject` itself
/// - `#[mp(skip)]` the field is not serialized
#[proc_macro_derive(MpObject, attributes(mp))]
pub fn derive_mp_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
