use quarry_core::{Annotation, parse_annotation};
use syn::{Field, GenericArgument, Ident, LitStr, PathArguments, Type};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) annotation: Annotation,
}

/// `Option<..>`, written as `Option`, `std::option::Option` or `core::option::Option`.
fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    if path.qself.is_some() {
        return false;
    }
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    last.ident == "Option"
        && matches!(
            &last.arguments,
            PathArguments::AngleBracketed(args)
                if matches!(args.args.first(), Some(GenericArgument::Type(..)))
        )
}

/// Metadata of a field carrying `#[column("...")]`, `None` for fields without it.
pub(crate) fn decode_column(field: &Field) -> syn::Result<Option<ColumnMetadata>> {
    let Some(attr) = field
        .attrs
        .iter()
        .find(|attr| attr.meta.path().is_ident("column"))
    else {
        return Ok(None);
    };
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(
            field,
            "Entity can only be derived for structs with named fields",
        ));
    };
    let literal = attr
        .meta
        .require_list()
        .and_then(|v| v.parse_args::<LitStr>())
        .map_err(|e| {
            syn::Error::new(
                e.span(),
                format!(
                    "Error while parsing `column`, use it like #[column(\"{},pk\")]",
                    ident
                ),
            )
        })?;
    let mut annotation = parse_annotation(&literal.value())
        .map_err(|e| syn::Error::new(literal.span(), format!("{:#}", e)))?;
    annotation.nullable |= is_option(&field.ty);
    Ok(Some(ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        annotation,
    }))
}

#[cfg(test)]
mod tests {
    use super::is_option;
    use syn::parse_quote;

    #[test]
    fn detects_option() {
        assert!(is_option(&parse_quote!(Option<i32>)));
        assert!(is_option(&parse_quote!(::std::option::Option<String>)));
        assert!(!is_option(&parse_quote!(Vec<Option<i32>>)));
        assert!(!is_option(&parse_quote!(i64)));
    }
}
