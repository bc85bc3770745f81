use crate::{
    Condition, DEFAULT_ID_COLUMN, Entity, JoinType, OrmError, QueryConfig, Result, Search,
    SqlWriter, Value,
};
use std::borrow::Cow;
use uuid::Uuid;

/// Default page size of a paginated select without an explicit limit.
pub const DEFAULT_LIMIT: u64 = 10;

/// SQL text with its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// One projected column, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub field: Cow<'static, str>,
    /// Table owning `field`, written quoted as is.
    pub table: Option<Cow<'static, str>>,
    pub alias: Option<Cow<'static, str>>,
}

impl Projection {
    pub fn aliased(field: impl Into<Cow<'static, str>>, alias: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            table: None,
            alias: Some(alias.into()),
        }
    }

    /// `"table"."column" AS "alias"`, the table name comes from metadata and is not checked.
    pub fn qualified(
        table: impl Into<Cow<'static, str>>,
        column: impl Into<Cow<'static, str>>,
        alias: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: column.into(),
            table: Some(table.into()),
            alias: Some(alias.into()),
        }
    }
}

impl From<&'static str> for Projection {
    fn from(value: &'static str) -> Self {
        Self {
            field: value.into(),
            table: None,
            alias: None,
        }
    }
}

impl From<String> for Projection {
    fn from(value: String) -> Self {
        Self {
            field: value.into(),
            table: None,
            alias: None,
        }
    }
}

impl From<Cow<'static, str>> for Projection {
    fn from(value: Cow<'static, str>) -> Self {
        Self {
            field: value,
            table: None,
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: Cow<'static, str>,
    /// Raw SQL, copied verbatim.
    pub on: Cow<'static, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: Cow<'static, str>,
    pub descending: bool,
}

/// `SELECT` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: Cow<'static, str>,
    /// Empty projects `*`.
    pub fields: Vec<Projection>,
    pub joins: Vec<JoinClause>,
    pub conditions: Vec<Condition>,
    pub search: Option<Search>,
    pub group_by: Vec<Cow<'static, str>>,
    /// Raw SQL predicates, AND-ed.
    pub having: Vec<Cow<'static, str>>,
    pub order_by: Vec<Ordering>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Without an explicit limit, cap the rows at `default_limit`.
    pub paginate: bool,
    pub default_limit: u64,
}

impl Select {
    pub fn from_table(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            search: None,
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            paginate: false,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Select driven by a [`QueryConfig`].
    ///
    /// `table` and `default_fields` apply when the configuration does not name
    /// its own. Pagination is on when pagination or search is allowed.
    pub fn from_config<F: Into<Cow<'static, str>>>(
        table: impl Into<Cow<'static, str>>,
        config: &QueryConfig,
        default_fields: impl IntoIterator<Item = F>,
    ) -> Self {
        let mut select = Self::from_table(config.table.clone().unwrap_or_else(|| table.into()));
        select.fields = if config.fields.is_empty() {
            default_fields
                .into_iter()
                .map(|v| Projection::from(v.into()))
                .collect()
        } else {
            config.fields.iter().cloned().map(Projection::from).collect()
        };
        select.conditions = config.conditions.clone();
        select.search = config.search_clause();
        select.group_by = config.group_by.clone();
        select.having = config.having.clone();
        if let Some(order_by) = &config.order_by {
            select.order_by.push(Ordering {
                field: order_by.clone(),
                descending: config.descending,
            });
        }
        select.limit = (config.limit > 0).then_some(config.limit);
        select.offset = (config.offset > 0).then_some(config.offset);
        select.paginate = config.allow_pagination || config.allow_search;
        select
    }

    pub fn field(mut self, field: impl Into<Projection>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<P: Into<Projection>>(mut self, fields: impl IntoIterator<Item = P>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn join(
        mut self,
        join_type: JoinType,
        table: impl Into<Cow<'static, str>>,
        on: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.joins.push(JoinClause {
            join_type,
            table: table.into(),
            on: on.into(),
        });
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filters(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn search(mut self, search: Search) -> Self {
        self.search = Some(search);
        self
    }

    pub fn group_by(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.group_by.push(field.into());
        self
    }

    pub fn having(mut self, predicate: impl Into<Cow<'static, str>>) -> Self {
        self.having.push(predicate.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<Cow<'static, str>>, descending: bool) -> Self {
        self.order_by.push(Ordering {
            field: field.into(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn paginate(mut self, default_limit: u64) -> Self {
        self.paginate = true;
        self.default_limit = default_limit;
        self
    }

    pub fn build(&self, writer: &(impl SqlWriter + ?Sized)) -> Result<Statement> {
        let mut statement = Statement::default();
        writer.write_select(&mut statement.sql, &mut statement.args, self)?;
        Ok(statement)
    }
}

/// `INSERT` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Cow<'static, str>,
    pub columns: Vec<Cow<'static, str>>,
    pub values: Vec<Value>,
}

impl Insert {
    pub fn into_table(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Every mapped column of `entity`, in declaration order.
    ///
    /// A record without a key column gets a fresh `id` for the implicit UUID key.
    pub fn from_entity<E: Entity>(table: impl Into<Cow<'static, str>>, entity: &E) -> Self {
        let mut insert = Self::into_table(table).implicit_key::<E>();
        for descriptor in E::descriptors() {
            if let Some(value) = entity.column_value(&descriptor.column_name) {
                insert.columns.push(descriptor.column_name.clone());
                insert.values.push(value);
            }
        }
        insert
    }

    /// Only `columns`, each must be mapped on `E`.
    pub fn from_entity_columns<E: Entity>(
        table: impl Into<Cow<'static, str>>,
        entity: &E,
        columns: &[&str],
    ) -> Result<Self> {
        let mut insert = Self::into_table(table).implicit_key::<E>();
        for column in columns {
            let Some(value) = entity.column_value(column) else {
                return Err(OrmError::UnmappedColumn {
                    table: E::table_name().into(),
                    column: column.to_string().into(),
                }
                .into());
            };
            insert.columns.push(column.to_string().into());
            insert.values.push(value);
        }
        Ok(insert)
    }

    fn implicit_key<E: Entity>(self) -> Self {
        if E::primary_key_descriptor().is_some() {
            return self;
        }
        self.value(DEFAULT_ID_COLUMN, Value::Uuid(Some(Uuid::new_v4())))
    }

    pub fn value(mut self, column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn build(&self, writer: &(impl SqlWriter + ?Sized)) -> Result<Statement> {
        let mut statement = Statement::default();
        writer.write_insert(&mut statement.sql, &mut statement.args, self)?;
        Ok(statement)
    }
}

/// `UPDATE` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Cow<'static, str>,
    pub assignments: Vec<(Cow<'static, str>, Value)>,
    pub conditions: Vec<Condition>,
}

impl Update {
    pub fn table(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Sets every non key column of `entity`.
    ///
    /// Without `conditions` the row is identified by the primary key value of
    /// the record, a record without one is rejected rather than updating the
    /// whole table.
    pub fn from_entity<E: Entity>(
        table: impl Into<Cow<'static, str>>,
        entity: &E,
        conditions: Vec<Condition>,
    ) -> Result<Self> {
        let mut update = Self::table(table);
        let pk = E::primary_key_column();
        for descriptor in E::descriptors() {
            if descriptor.column_name == pk {
                continue;
            }
            if let Some(value) = entity.column_value(&descriptor.column_name) {
                update.assignments.push((descriptor.column_name.clone(), value));
            }
        }
        if !conditions.is_empty() {
            update.conditions = conditions;
            return Ok(update);
        }
        match entity.primary_key_value() {
            Some(value) if !value.is_null() => {
                update.conditions.push(Condition::equal(pk, value));
                Ok(update)
            }
            _ => Err(OrmError::QueryBuild(
                format!(
                    "Updating `{}` requires a primary key value or a condition",
                    update.table
                )
                .into(),
            )
            .into()),
        }
    }

    pub fn set(mut self, column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filters(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn build(&self, writer: &(impl SqlWriter + ?Sized)) -> Result<Statement> {
        if self.conditions.is_empty() {
            log::warn!("UPDATE `{}` without conditions affects every row", self.table);
        }
        let mut statement = Statement::default();
        writer.write_update(&mut statement.sql, &mut statement.args, self)?;
        Ok(statement)
    }
}

/// `DELETE` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Cow<'static, str>,
    pub conditions: Vec<Condition>,
}

impl Delete {
    pub fn from_table(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filters(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn build(&self, writer: &(impl SqlWriter + ?Sized)) -> Result<Statement> {
        if self.conditions.is_empty() {
            log::warn!("DELETE FROM `{}` without conditions removes every row", self.table);
        }
        let mut statement = Statement::default();
        writer.write_delete(&mut statement.sql, &mut statement.args, self)?;
        Ok(statement)
    }
}
