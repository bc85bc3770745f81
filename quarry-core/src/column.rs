use crate::{OrmError, Result, Value};
use std::{borrow::Cow, collections::HashMap, fmt};

/// Referential action applied to dependent rows when a referenced row is deleted.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl Action {
    /// Case insensitive keyword lookup, surrounding and repeated spaces are ignored.
    pub fn from_keyword(keyword: &str) -> Option<Action> {
        let keyword = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
        Some(match keyword.to_ascii_uppercase().as_str() {
            "NO ACTION" => Action::NoAction,
            "RESTRICT" => Action::Restrict,
            "CASCADE" => Action::Cascade,
            "SET NULL" => Action::SetNull,
            "SET DEFAULT" => Action::SetDefault,
            _ => return None,
        })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Action::NoAction => "NO ACTION",
            Action::Restrict => "RESTRICT",
            Action::Cascade => "CASCADE",
            Action::SetNull => "SET NULL",
            Action::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Target of a foreign key, as written in the annotation.
///
/// The table is unprefixed. The on delete text is kept verbatim, it is
/// validated when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: Cow<'static, str>,
    pub column: Cow<'static, str>,
    pub on_delete: Option<Cow<'static, str>>,
}

impl ForeignKey {
    /// Validated on delete action, `None` when the annotation has none.
    pub fn action(&self, table: &str, column: &str) -> Result<Option<Action>> {
        let Some(on_delete) = &self.on_delete else {
            return Ok(None);
        };
        match Action::from_keyword(on_delete) {
            Some(action) => Ok(Some(action)),
            None => Err(OrmError::InvalidConstraint {
                table: table.to_string().into(),
                column: column.to_string().into(),
                action: on_delete.clone(),
            }
            .into()),
        }
    }
}

/// Derived metadata of one column of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Column name, unique within the record type.
    pub column_name: Cow<'static, str>,
    /// Name of the Rust field backing the column.
    pub field_name: Cow<'static, str>,
    /// Empty value of the field type, it decides the SQL type.
    pub value: Value,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
    /// Maximum length, textual columns only.
    pub length: Option<u32>,
    pub foreign_key: Option<ForeignKey>,
}

impl FieldDescriptor {
    pub fn new(
        column_name: impl Into<Cow<'static, str>>,
        field_name: impl Into<Cow<'static, str>>,
        value: Value,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            field_name: field_name.into(),
            value,
            primary_key: false,
            unique: false,
            nullable: false,
            length: None,
            foreign_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.column_name
    }
}

/// Reverse lookup from column name to field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new(descriptors: &[FieldDescriptor]) -> Self {
        Self {
            columns: descriptors
                .iter()
                .map(|d| (d.column_name.to_string(), d.field_name.to_string()))
                .collect(),
        }
    }

    /// Field backing `column`.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Column backed by `field`.
    pub fn column(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find_map(|(c, f)| (f == field).then_some(c.as_str()))
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.columns.values().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
