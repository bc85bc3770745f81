use syn::{ItemStruct, LitStr};

/// `#[table_name("...")]`, otherwise the lower-cased type name.
pub(crate) fn table_name(item: &ItemStruct) -> syn::Result<String> {
    let default_table_name = item.ident.to_string().to_lowercase();
    let Some(attr) = item
        .attrs
        .iter()
        .find(|attr| attr.meta.path().is_ident("table_name"))
    else {
        return Ok(default_table_name);
    };
    let value = attr
        .meta
        .require_list()
        .and_then(|v| v.parse_args::<LitStr>())
        .map_err(|e| {
            syn::Error::new(
                e.span(),
                format!(
                    "Error while parsing `table_name`, use it like #[table_name(\"{}\")]",
                    default_table_name
                ),
            )
        })?;
    if value.value().trim().is_empty() {
        return Err(syn::Error::new(value.span(), "The table name is empty"));
    }
    Ok(value.value())
}
