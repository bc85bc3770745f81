use crate::{
    Condition, ConnectorConfig, Delete, Driver, Entity, Executor, Insert, JoinSpec, LiveColumn,
    OrmError, QueryConfig, Result, RowLabeled, RowsAffected, Select, SqlWriter, Statement,
    TableSchema, Update, Value, materialize, materialize_all, materialize_joined,
    stream::TryStreamExt, truncate_long,
};

/// How [`Connector::find_first`] identifies the row.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Equality on the primary key column.
    PrimaryKey(Value),
    /// Explicit conditions, AND-ed.
    Conditions(Vec<Condition>),
}

impl From<Vec<Condition>> for Lookup {
    fn from(value: Vec<Condition>) -> Self {
        Lookup::Conditions(value)
    }
}

impl From<Condition> for Lookup {
    fn from(value: Condition) -> Self {
        Lookup::Conditions(vec![value])
    }
}

/// Entry point of every operation.
///
/// The connector holds no connection: each operation runs on the executor it
/// receives, a connection or a transaction. Statements running on a
/// transaction are never committed or rolled back here.
#[derive(Debug, Clone, Default)]
pub struct Connector {
    config: ConnectorConfig,
}

impl Connector {
    pub fn new(config: ConnectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Prefixed table name of `E`.
    pub fn table_name<E: Entity>(&self) -> String {
        self.config.table_name(E::table_name())
    }

    async fn fetch_rows(
        &self,
        executor: &mut impl Executor,
        operation: &'static str,
        statement: Statement,
    ) -> Result<Vec<RowLabeled>> {
        log::debug!("{}: {}", operation, truncate_long!(statement.sql));
        let result = async {
            let query = executor.prepare_statement(statement).await?;
            executor.fetch(query).try_collect::<Vec<_>>().await
        }
        .await;
        result.map_err(|e| {
            log::error!("{} failed: {:#}", operation, e);
            e.context(OrmError::execution(operation))
        })
    }

    async fn execute_statement(
        &self,
        executor: &mut impl Executor,
        operation: &'static str,
        statement: Statement,
    ) -> Result<RowsAffected> {
        log::debug!("{}: {}", operation, truncate_long!(statement.sql));
        let result = async {
            let query = executor.prepare_statement(statement).await?;
            executor.execute(query).await
        }
        .await;
        result.map_err(|e| {
            log::error!("{} failed: {:#}", operation, e);
            e.context(OrmError::execution(operation))
        })
    }

    /// `CREATE TABLE IF NOT EXISTS` for `E`.
    ///
    /// The schema is validated first, an invalid one issues no statement.
    pub async fn create_table<E: Entity>(&self, executor: &mut impl Executor) -> Result<()> {
        let schema = TableSchema::of::<E>(&self.config.table_prefix)?;
        let mut sql = String::new();
        executor
            .driver()
            .sql_writer()
            .write_create_table(&mut sql, &schema, true);
        self.execute_statement(executor, "create table", Statement { sql, args: Vec::new() })
            .await?;
        Ok(())
    }

    pub async fn drop_table<E: Entity>(
        &self,
        executor: &mut impl Executor,
        cascade: bool,
    ) -> Result<()> {
        let mut sql = String::new();
        executor.driver().sql_writer().write_drop_table(
            &mut sql,
            &self.table_name::<E>(),
            true,
            cascade,
        );
        self.execute_statement(executor, "drop table", Statement { sql, args: Vec::new() })
            .await?;
        Ok(())
    }

    /// Create the table of `E`, or add and alter its columns when it exists.
    ///
    /// Columns are never dropped. Returns the number of statements executed.
    pub async fn migrate_table<E: Entity>(&self, executor: &mut impl Executor) -> Result<usize> {
        let schema = TableSchema::of::<E>(&self.config.table_prefix)?;
        let writer = executor.driver().sql_writer();
        let mut statement = Statement::default();
        writer.write_list_columns(&mut statement.sql, &mut statement.args, &schema.name);
        let live = self
            .fetch_rows(executor, "list columns", statement)
            .await?
            .iter()
            .map(LiveColumn::from_row)
            .collect::<Result<Vec<_>>>()?;
        if live.is_empty() {
            log::info!("Creating table `{}`", schema.name);
            let mut sql = String::new();
            writer.write_create_table(&mut sql, &schema, true);
            self.execute_statement(executor, "create table", Statement { sql, args: Vec::new() })
                .await?;
            return Ok(1);
        }
        let statements = writer.write_alter_table(&schema, &live);
        for sql in &statements {
            log::info!("Migrating `{}`: {}", schema.name, sql);
            self.execute_statement(
                executor,
                "alter table",
                Statement {
                    sql: sql.clone(),
                    args: Vec::new(),
                },
            )
            .await?;
        }
        Ok(statements.len())
    }

    /// Insert every mapped column of `entity`.
    pub async fn insert<E: Entity>(
        &self,
        executor: &mut impl Executor,
        entity: &E,
    ) -> Result<RowsAffected> {
        let statement = Insert::from_entity(self.table_name::<E>(), entity)
            .build(&executor.driver().sql_writer())?;
        self.execute_statement(executor, "insert", statement).await
    }

    /// Insert only `columns` of `entity`, every column must be mapped.
    pub async fn insert_columns<E: Entity>(
        &self,
        executor: &mut impl Executor,
        entity: &E,
        columns: &[&str],
    ) -> Result<RowsAffected> {
        let statement = Insert::from_entity_columns(self.table_name::<E>(), entity, columns)?
            .build(&executor.driver().sql_writer())?;
        self.execute_statement(executor, "insert", statement).await
    }

    /// Populate `target` from the first matching row, returns whether a row was found.
    pub async fn find_first<E: Entity>(
        &self,
        executor: &mut impl Executor,
        target: &mut E,
        lookup: impl Into<Lookup>,
    ) -> Result<bool> {
        let conditions = match lookup.into() {
            Lookup::PrimaryKey(value) => vec![Condition::equal(E::primary_key_column(), value)],
            Lookup::Conditions(conditions) => conditions,
        };
        let statement = Select::from_table(self.table_name::<E>())
            .fields(E::descriptors().iter().map(|d| d.column_name.clone()))
            .filters(conditions)
            .limit(1)
            .build(&executor.driver().sql_writer())?;
        let rows = self.fetch_rows(executor, "find first", statement).await?;
        match rows.into_iter().next() {
            Some(row) => {
                materialize(row, target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Every row selected by `config`, one fresh record per row.
    pub async fn find_all<E: Entity + Default>(
        &self,
        executor: &mut impl Executor,
        config: &QueryConfig,
    ) -> Result<Vec<E>> {
        let mut select = Select::from_config(
            self.table_name::<E>(),
            config,
            E::descriptors().iter().map(|d| d.column_name.clone()),
        );
        select.default_limit = self.config.default_limit;
        let statement = select.build(&executor.driver().sql_writer())?;
        let rows = self.fetch_rows(executor, "find all", statement).await?;
        materialize_all(rows)
    }

    /// Update every non key column of `entity`, returns the affected rows.
    ///
    /// Without `conditions` the row is matched on the primary key of `entity`.
    pub async fn update<E: Entity>(
        &self,
        executor: &mut impl Executor,
        entity: &E,
        conditions: Vec<Condition>,
    ) -> Result<u64> {
        let statement = Update::from_entity(self.table_name::<E>(), entity, conditions)?
            .build(&executor.driver().sql_writer())?;
        Ok(self
            .execute_statement(executor, "update", statement)
            .await?
            .rows_affected)
    }

    /// Delete the rows of `E` matching `conditions`, all of them when empty.
    pub async fn delete<E: Entity>(
        &self,
        executor: &mut impl Executor,
        conditions: Vec<Condition>,
    ) -> Result<u64> {
        let statement = Delete::from_table(self.table_name::<E>())
            .filters(conditions)
            .build(&executor.driver().sql_writer())?;
        Ok(self
            .execute_statement(executor, "delete", statement)
            .await?
            .rows_affected)
    }

    pub async fn delete_by_id<E: Entity>(
        &self,
        executor: &mut impl Executor,
        id: impl Into<Value>,
    ) -> Result<u64> {
        self.delete::<E>(
            executor,
            vec![Condition::equal(E::primary_key_column(), id)],
        )
        .await
    }

    /// Run caller written SQL returning rows, `args` bind to its placeholders in order.
    pub async fn custom_query(
        &self,
        executor: &mut impl Executor,
        sql: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Vec<RowLabeled>> {
        let statement = Statement {
            sql: sql.into(),
            args,
        };
        self.fetch_rows(executor, "custom query", statement).await
    }

    /// Run caller written SQL modifying rows.
    pub async fn custom_mutate(
        &self,
        executor: &mut impl Executor,
        sql: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<RowsAffected> {
        let statement = Statement {
            sql: sql.into(),
            args,
        };
        self.execute_statement(executor, "custom mutate", statement)
            .await
    }

    /// Rows of the join, labeled `table.column`.
    pub async fn join(
        &self,
        executor: &mut impl Executor,
        spec: &JoinSpec,
    ) -> Result<Vec<RowLabeled>> {
        let statement = spec.build(&executor.driver().sql_writer(), &self.config.table_prefix)?;
        self.fetch_rows(executor, "join", statement).await
    }

    /// Rows of the join materialized into `D`, see [`JoinSpec::bindings`].
    pub async fn join_into<D: Entity + Default>(
        &self,
        executor: &mut impl Executor,
        spec: &JoinSpec,
    ) -> Result<Vec<D>> {
        let bindings = spec.bindings::<D>(&self.config.table_prefix)?;
        let rows = self.join(executor, spec).await?;
        rows.iter()
            .map(|row| {
                let mut record = D::default();
                materialize_joined(row, &bindings, &mut record)?;
                Ok(record)
            })
            .collect()
    }
}
