use crate::{
    FieldDescriptor, ForeignKey, OrmError, Result, Value, is_identifier, split_top_level,
};
use std::{borrow::Cow, collections::HashSet};

/// Parsed column annotation.
///
/// Grammar: `name[,pk][,unique][,nullable][,length(n)][,fk(table:column[,action])]`.
/// The first token is the column name, the others are matched case insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub column_name: String,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
    pub length: Option<u32>,
    pub foreign_key: Option<ForeignKey>,
}

impl Annotation {
    pub fn into_descriptor(
        self,
        field_name: impl Into<Cow<'static, str>>,
        value: Value,
    ) -> FieldDescriptor {
        FieldDescriptor {
            column_name: self.column_name.into(),
            field_name: field_name.into(),
            value,
            primary_key: self.primary_key,
            unique: self.unique,
            nullable: self.nullable,
            length: self.length,
            foreign_key: self.foreign_key,
        }
    }
}

fn invalid(annotation: &str, reason: impl Into<Cow<'static, str>>) -> crate::Error {
    OrmError::InvalidAnnotation {
        annotation: annotation.to_string().into(),
        reason: reason.into(),
    }
    .into()
}

/// Content of `keyword(...)` when `token` has that shape.
fn call<'t>(token: &'t str, keyword: &str) -> Option<&'t str> {
    let head = token.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    token[keyword.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_foreign_key(annotation: &str, content: &str) -> Result<ForeignKey> {
    let parts = split_top_level(content);
    if parts.len() > 2 {
        return Err(invalid(
            annotation,
            "fk(...) accepts a `table:column` target and an optional on delete action",
        ));
    }
    let target = parts[0].trim();
    let Some((table, column)) = target.split_once(':') else {
        return Err(invalid(
            annotation,
            format!("fk target `{target}` must have the form `table:column`"),
        ));
    };
    let (table, column) = (table.trim(), column.trim());
    if !is_identifier(table) || !is_identifier(column) {
        return Err(invalid(
            annotation,
            format!("fk target `{target}` must name a table and a column"),
        ));
    }
    let on_delete = match parts.get(1).map(|v| v.trim()) {
        Some("") => {
            return Err(invalid(annotation, "the fk on delete action is empty"));
        }
        Some(action) => Some(Cow::Owned(action.to_string())),
        None => None,
    };
    Ok(ForeignKey {
        table: table.to_string().into(),
        column: column.to_string().into(),
        on_delete,
    })
}

/// Parse one field annotation.
///
/// Malformed input, including a malformed `fk(...)` token, is rejected with
/// [`OrmError::InvalidAnnotation`].
pub fn parse_annotation(annotation: &str) -> Result<Annotation> {
    let mut tokens = split_top_level(annotation).into_iter().map(str::trim);
    let column_name = tokens.next().unwrap_or_default();
    if column_name.is_empty() {
        return Err(invalid(annotation, "the column name is missing"));
    }
    if !is_identifier(column_name) {
        return Err(invalid(
            annotation,
            format!("`{column_name}` is not a valid column name"),
        ));
    }
    let mut result = Annotation {
        column_name: column_name.to_string(),
        ..Default::default()
    };
    for token in tokens.filter(|v| !v.is_empty()) {
        if token.eq_ignore_ascii_case("pk") {
            result.primary_key = true;
        } else if token.eq_ignore_ascii_case("unique") {
            result.unique = true;
        } else if token.eq_ignore_ascii_case("nullable") {
            result.nullable = true;
        } else if let Some(length) = call(token, "length") {
            let length = length.trim();
            match length.parse::<u32>() {
                Ok(n) if n > 0 => result.length = Some(n),
                _ => {
                    return Err(invalid(
                        annotation,
                        format!("length `{length}` must be a positive integer"),
                    ));
                }
            }
        } else if let Some(content) = call(token, "fk") {
            if result.foreign_key.is_some() {
                return Err(invalid(annotation, "a column can have a single fk"));
            }
            result.foreign_key = Some(parse_foreign_key(annotation, content)?);
        } else {
            return Err(invalid(annotation, format!("unknown token `{token}`")));
        }
    }
    Ok(result)
}

/// Checks the descriptors of one record type as a whole.
pub fn validate_descriptors(type_name: &str, descriptors: &[FieldDescriptor]) -> Result<()> {
    let mut names = HashSet::new();
    for descriptor in descriptors {
        if descriptor.column_name.is_empty() {
            return Err(OrmError::Metadata(
                format!("`{type_name}`.`{}` has an empty column name", descriptor.field_name).into(),
            )
            .into());
        }
        if !names.insert(descriptor.column_name.as_ref()) {
            return Err(OrmError::Metadata(
                format!(
                    "`{type_name}` declares column `{}` more than once",
                    descriptor.column_name
                )
                .into(),
            )
            .into());
        }
    }
    if descriptors.iter().filter(|d| d.primary_key).count() > 1 {
        return Err(OrmError::Metadata(
            format!("`{type_name}` marks more than one column as pk").into(),
        )
        .into());
    }
    Ok(())
}
