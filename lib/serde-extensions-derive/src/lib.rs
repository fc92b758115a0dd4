use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

/// Derive `serde_extensions::Overwrite`
///
/// Every field becomes optional, a field present in the input replaces the current value and
/// keys that are not fields are ignored.
#[proc_macro_derive(Overwrite)]
pub fn overwrite_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    impl_overwrite_macro(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn impl_overwrite_macro(ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &ast.ident;
    let optional_name = format_ident!("Optional{}", name);

    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Only structs are supported")),
    };

    let field_names: Vec<_> = fields.iter().map(|field| &field.ident).collect();
    let field_types: Vec<_> = fields.iter().map(|field| &field.ty).collect();

    Ok(quote! {
        #[derive(::serde::Deserialize)]
        struct #optional_name {
            #( #field_names: Option<#field_types>, )*
        }

        impl ::serde_extensions::Overwrite for #name {
            /// Overwrite self with a serde object
            fn overwrite<'de, D>(&mut self, d: D) -> Result<(), D::Error>
            where
                D: ::serde::Deserializer<'de>
            {
                let optional: #optional_name = ::serde::de::Deserialize::deserialize(d)?;
                #(
                    if let Some(field) = optional.#field_names {
                        self.#field_names = field;
                    }
                )*
                Ok(())
            }
        }
    })
}
