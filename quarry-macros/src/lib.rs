mod decode_column;
mod table_name;

use decode_column::{ColumnMetadata, decode_column};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use quarry_core::{ForeignKey, Value, validate_descriptors};
use syn::{Fields, ItemStruct, parse_macro_input};
use table_name::table_name;

/// Implements `quarry::Entity` from `#[column("...")]` field annotations.
///
/// ```rust,ignore
/// #[derive(Entity, Default)]
/// #[table_name("users")]
/// struct User {
///     #[column("id,pk")]
///     id: i64,
///     #[column("email,unique,length(120)")]
///     email: String,
///     #[column("team_id,fk(team:id,cascade)")]
///     team_id: Option<i64>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(column, table_name))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    match entity(&item) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn entity(item: &ItemStruct) -> syn::Result<TokenStream2> {
    let name = &item.ident;
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "Entity cannot be derived for generic types",
        ));
    }
    if !matches!(item.fields, Fields::Named(..)) {
        return Err(syn::Error::new_spanned(
            item,
            "Entity can only be derived for structs with named fields",
        ));
    }
    let table_name = table_name(item)?;
    let columns = item
        .fields
        .iter()
        .filter_map(|f| decode_column(f).transpose())
        .collect::<syn::Result<Vec<_>>>()?;
    let check = columns
        .iter()
        .map(|c| {
            c.annotation
                .clone()
                .into_descriptor(c.ident.to_string(), Value::Null)
        })
        .collect::<Vec<_>>();
    validate_descriptors(&name.to_string(), &check)
        .map_err(|e| syn::Error::new(name.span(), format!("{:#}", e)))?;

    let descriptors = columns.iter().map(encode_descriptor);
    let column_names = columns
        .iter()
        .map(|c| c.annotation.column_name.as_str())
        .collect::<Vec<_>>();
    let field_names = columns
        .iter()
        .map(|c| c.ident.to_string())
        .collect::<Vec<_>>();
    let idents = columns.iter().map(|c| &c.ident).collect::<Vec<_>>();
    Ok(quote! {
        impl ::quarry::Entity for #name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn descriptors() -> &'static [::quarry::FieldDescriptor] {
                static RESULT: ::std::sync::LazyLock<Box<[::quarry::FieldDescriptor]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#descriptors),*].into_boxed_slice());
                &RESULT
            }

            fn column_map() -> &'static ::quarry::ColumnMap {
                static RESULT: ::std::sync::LazyLock<::quarry::ColumnMap> =
                    ::std::sync::LazyLock::new(|| {
                        ::quarry::ColumnMap::new(<#name as ::quarry::Entity>::descriptors())
                    });
                &RESULT
            }

            fn column_value(&self, column: &str) -> Option<::quarry::Value> {
                match column {
                    #(#column_names => Some(::quarry::AsValue::as_value(
                        ::std::clone::Clone::clone(&self.#idents)
                    )),)*
                    _ => None,
                }
            }

            fn scan_target(&mut self, field: &str) -> Option<&mut dyn ::quarry::Scan> {
                match field {
                    #(#field_names => Some(&mut self.#idents as &mut dyn ::quarry::Scan),)*
                    _ => None,
                }
            }
        }
    })
}

fn encode_descriptor(column: &ColumnMetadata) -> TokenStream2 {
    let ty = &column.ty;
    let annotation = &column.annotation;
    let column_name = &annotation.column_name;
    let field_name = column.ident.to_string();
    let primary_key = annotation.primary_key;
    let unique = annotation.unique;
    let nullable = annotation.nullable;
    let length = match annotation.length {
        Some(length) => quote!(Some(#length)),
        None => quote!(None),
    };
    let foreign_key = match &annotation.foreign_key {
        Some(ForeignKey {
            table,
            column,
            on_delete,
        }) => {
            let (table, column) = (table.as_ref(), column.as_ref());
            let on_delete = match on_delete {
                Some(v) => {
                    let v = v.as_ref();
                    quote!(Some(::std::borrow::Cow::Borrowed(#v)))
                }
                None => quote!(None),
            };
            quote! {
                Some(::quarry::ForeignKey {
                    table: ::std::borrow::Cow::Borrowed(#table),
                    column: ::std::borrow::Cow::Borrowed(#column),
                    on_delete: #on_delete,
                })
            }
        }
        None => quote!(None),
    };
    quote! {
        ::quarry::FieldDescriptor {
            column_name: ::std::borrow::Cow::Borrowed(#column_name),
            field_name: ::std::borrow::Cow::Borrowed(#field_name),
            value: <#ty as ::quarry::AsValue>::as_empty_value(),
            primary_key: #primary_key,
            unique: #unique,
            nullable: #nullable,
            length: #length,
            foreign_key: #foreign_key,
        }
    }
}
