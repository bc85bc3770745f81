use crate::{
    Action, AsValue, DEFAULT_ID_COLUMN, Entity, Error, FieldDescriptor, OrmError, Result,
    RowLabeled, Value, validate_descriptors,
};
use std::borrow::Cow;

/// Prefixed table name.
pub fn prefixed_table_name(prefix: &str, name: &str) -> String {
    let mut result = String::with_capacity(prefix.len() + name.len());
    result.push_str(prefix);
    result.push_str(name);
    result
}

/// One column of a [`TableSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: Cow<'static, str>,
    /// Type prototype.
    pub value: Value,
    pub length: Option<u32>,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
}

impl ColumnSchema {
    fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        Self {
            name: descriptor.column_name.clone(),
            value: descriptor.value.as_null(),
            length: descriptor.length.filter(|_| descriptor.value.is_textual()),
            nullable: descriptor.nullable && !descriptor.primary_key,
            unique: descriptor.unique,
            primary_key: descriptor.primary_key,
        }
    }

    fn implicit_id() -> Self {
        Self {
            name: DEFAULT_ID_COLUMN.into(),
            value: Value::Uuid(None),
            length: None,
            nullable: false,
            unique: false,
            primary_key: true,
        }
    }
}

/// `FOREIGN KEY (column) REFERENCES table(references) [ON DELETE action]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySchema {
    pub column: Cow<'static, str>,
    /// Prefixed target table.
    pub table: String,
    pub references: Cow<'static, str>,
    pub on_delete: Option<Action>,
}

/// Everything needed to emit the DDL of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    pub foreign_keys: Vec<ForeignKeySchema>,
}

impl TableSchema {
    /// Schema of `E`, table and foreign key targets receive `prefix`.
    pub fn of<E: Entity>(prefix: &str) -> Result<Self> {
        Self::from_descriptors(
            prefixed_table_name(prefix, E::table_name()),
            E::descriptors(),
            prefix,
        )
    }

    /// Build and validate a schema.
    ///
    /// Fails with a schema error on an empty name or an invalid on delete
    /// action, so nothing is ever executed for an invalid table.
    pub fn from_descriptors(
        name: impl Into<String>,
        descriptors: &[FieldDescriptor],
        prefix: &str,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(OrmError::EmptyTableName.into());
        }
        validate_descriptors(&name, descriptors)?;
        let mut columns: Vec<_> = descriptors.iter().map(ColumnSchema::from_descriptor).collect();
        if !columns.iter().any(|c| c.primary_key) {
            match columns.iter_mut().find(|c| c.name == DEFAULT_ID_COLUMN) {
                Some(id) => {
                    id.primary_key = true;
                    id.nullable = false;
                }
                None => columns.insert(0, ColumnSchema::implicit_id()),
            }
        }
        let foreign_keys = descriptors
            .iter()
            .filter_map(|d| d.foreign_key.as_ref().map(|fk| (d, fk)))
            .map(|(d, fk)| {
                Ok(ForeignKeySchema {
                    column: d.column_name.clone(),
                    table: prefixed_table_name(prefix, &fk.table),
                    references: fk.column.clone(),
                    on_delete: fk.action(&name, &d.column_name)?,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            name,
            columns,
            foreign_keys,
        })
    }

    pub fn primary_key(&self) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

impl LiveColumn {
    /// Read a `column_name, data_type, is_nullable` row.
    pub fn from_row(row: &RowLabeled) -> Result<Self> {
        let get = |label: &'static str| -> Result<String> {
            let value = row
                .get_column(label)
                .ok_or_else(|| Error::msg(format!("Catalog row is missing `{label}`")))?;
            String::try_from_value(value.clone())
        };
        Ok(Self {
            name: get("column_name")?,
            data_type: get("data_type")?,
            nullable: get("is_nullable")?.eq_ignore_ascii_case("YES"),
        })
    }
}
