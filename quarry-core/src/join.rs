use crate::{
    Condition, Entity, FieldDescriptor, OrmError, Projection, Result, RowLabeled, Select,
    SqlWriter, Statement, is_identifier, prefixed_table_name,
};
use anyhow::Context;
use std::{borrow::Cow, collections::HashSet, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        })
    }
}

/// One side of a join: a record type and the columns projected from it.
#[derive(Debug, Clone)]
pub struct JoinSide {
    /// Unprefixed table name.
    pub table: Cow<'static, str>,
    pub descriptors: &'static [FieldDescriptor],
    /// Projected columns, empty projects every mapped column.
    pub columns: Vec<Cow<'static, str>>,
}

impl JoinSide {
    pub fn of<E: Entity>() -> Self {
        Self {
            table: E::table_name().into(),
            descriptors: E::descriptors(),
            columns: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.descriptors.iter().any(|d| d.column_name == column)
    }

    fn projected(&self) -> Vec<Cow<'static, str>> {
        if self.columns.is_empty() {
            self.descriptors
                .iter()
                .map(|d| d.column_name.clone())
                .collect()
        } else {
            self.columns.clone()
        }
    }
}

/// Routes the result column `table.column` into the destination field `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// `table.column`, the table either prefixed or not.
    pub source: Cow<'static, str>,
    pub field: Cow<'static, str>,
}

impl ColumnMapping {
    pub fn new(source: impl Into<Cow<'static, str>>, field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
            field: field.into(),
        }
    }
}

/// A two table join.
///
/// Result columns are labeled `table.column` with the prefixed table name,
/// so equally named columns on both sides stay distinct.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub main: JoinSide,
    pub joined: JoinSide,
    /// Raw SQL, copied verbatim.
    pub on: Cow<'static, str>,
    /// Must be set before the join is built.
    pub join_type: Option<JoinType>,
    pub conditions: Vec<Condition>,
    pub column_mappings: Vec<ColumnMapping>,
}

impl JoinSpec {
    pub fn new<M: Entity, J: Entity>(on: impl Into<Cow<'static, str>>) -> Self {
        Self {
            main: JoinSide::of::<M>(),
            joined: JoinSide::of::<J>(),
            on: on.into(),
            join_type: None,
            conditions: Vec::new(),
            column_mappings: Vec::new(),
        }
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = Some(join_type);
        self
    }

    pub fn inner(self) -> Self {
        self.join_type(JoinType::Inner)
    }

    pub fn left(self) -> Self {
        self.join_type(JoinType::Left)
    }

    pub fn right(self) -> Self {
        self.join_type(JoinType::Right)
    }

    pub fn full(self) -> Self {
        self.join_type(JoinType::Full)
    }

    pub fn main_columns<C: Into<Cow<'static, str>>>(
        mut self,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        self.main.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn join_columns<C: Into<Cow<'static, str>>>(
        mut self,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        self.joined.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn map_column(
        mut self,
        source: impl Into<Cow<'static, str>>,
        field: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.column_mappings.push(ColumnMapping::new(source, field));
        self
    }

    /// `SELECT "t"."c" AS "t.c", ... FROM main JOIN joined ON ...`, tables receive `prefix`.
    pub fn build(&self, writer: &(impl SqlWriter + ?Sized), prefix: &str) -> Result<Statement> {
        let Some(join_type) = self.join_type else {
            return Err(OrmError::MissingJoinType {
                main: self.main.table.clone(),
                joined: self.joined.table.clone(),
            }
            .into());
        };
        let main_table = prefixed_table_name(prefix, &self.main.table);
        let joined_table = prefixed_table_name(prefix, &self.joined.table);
        let projection = |table: &str, side: &JoinSide| {
            side.projected()
                .into_iter()
                .map(|column| {
                    let label = format!("{table}.{column}");
                    Projection::qualified(table.to_string(), column, label)
                })
                .collect::<Vec<_>>()
        };
        Select::from_table(main_table.clone())
            .fields(projection(&main_table, &self.main))
            .fields(projection(&joined_table, &self.joined))
            .join(join_type, joined_table, self.on.clone())
            .filters(self.conditions.iter().cloned())
            .build(writer)
    }

    /// Result label feeding each field of `D`.
    ///
    /// Explicit mappings come first. Every other field of `D` is matched by
    /// column name against the main table, then the joined table.
    pub fn bindings<D: Entity>(&self, prefix: &str) -> Result<Vec<(String, Cow<'static, str>)>> {
        let main_table = prefixed_table_name(prefix, &self.main.table);
        let joined_table = prefixed_table_name(prefix, &self.joined.table);
        let columns = D::column_map();
        let mut result = Vec::new();
        let mut mapped = HashSet::new();
        for mapping in &self.column_mappings {
            let Some((table, column)) = mapping
                .source
                .split_once('.')
                .filter(|(table, column)| !table.is_empty() && is_identifier(column))
            else {
                return Err(OrmError::QueryBuild(
                    format!("Column mapping `{}` is not `table.column`", mapping.source).into(),
                )
                .into());
            };
            if !columns.contains_field(&mapping.field) {
                return Err(OrmError::Shape(
                    format!(
                        "`{}` has no field `{}` to receive `{}`",
                        D::table_name(),
                        mapping.field,
                        mapping.source
                    )
                    .into(),
                )
                .into());
            }
            let table = if table == self.main.table || table == main_table {
                &main_table
            } else if table == self.joined.table || table == joined_table {
                &joined_table
            } else {
                return Err(OrmError::QueryBuild(
                    format!("Table `{}` is not part of the join", table).into(),
                )
                .into());
            };
            result.push((format!("{table}.{column}"), mapping.field.clone()));
            mapped.insert(mapping.field.clone());
        }
        for descriptor in D::descriptors() {
            if mapped.contains(&descriptor.field_name) {
                continue;
            }
            let column = &descriptor.column_name;
            let table = if self.main.has_column(column) {
                &main_table
            } else if self.joined.has_column(column) {
                &joined_table
            } else {
                continue;
            };
            result.push((format!("{table}.{column}"), descriptor.field_name.clone()));
        }
        Ok(result)
    }
}

/// Populate `target` from a joined row following `bindings`.
///
/// Labels absent from the row leave the field untouched.
pub fn materialize_joined<D: Entity>(
    row: &RowLabeled,
    bindings: &[(String, Cow<'static, str>)],
    target: &mut D,
) -> Result<()> {
    for (label, field) in bindings {
        let Some(value) = row.get_column(label) else {
            continue;
        };
        let Some(slot) = target.scan_target(field) else {
            continue;
        };
        slot.scan(value.clone()).with_context(|| OrmError::Scan {
            column: label.clone().into(),
            field: field.clone(),
        })?;
    }
    Ok(())
}
