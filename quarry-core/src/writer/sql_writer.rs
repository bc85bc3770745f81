use crate::{
    Action, ColumnSchema, Condition, Delete, ForeignKeySchema, Fragment, Insert, JoinClause,
    JoinType, LiveColumn, OrmError, Projection, Result, Search, Select, TableSchema, Update,
    Value, is_field_reference, is_identifier, separated_by, try_separated_by, writer::SqlContext,
};
use std::fmt::Write;

/// Length of a text column declared without `length(n)`.
pub const DEFAULT_VARCHAR_LENGTH: u32 = 255;

/// Dialect printer converting statements, conditions and schemas into SQL text.
///
/// Every method has a default rendering close to PostgreSQL, drivers override
/// what their database spells differently.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Whether the current fragment context allows alias declaration.
    fn alias_declaration(&self, context: &mut SqlContext) -> bool {
        matches!(context.fragment, Fragment::SqlSelect)
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut SqlContext,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut SqlContext, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    fn write_table_name(&self, context: &mut SqlContext, out: &mut String, name: &str) {
        self.write_identifier_quoted(context, out, name);
    }

    /// Render `column`, `table.column`, `table.*` or `*`, quoting each part.
    fn write_field_ref(&self, context: &mut SqlContext, out: &mut String, field: &str) {
        if field == "*" {
            out.push('*');
            return;
        }
        match field.split_once('.') {
            Some((table, column)) => {
                self.write_identifier_quoted(context, out, table);
                out.push('.');
                if column == "*" {
                    out.push('*');
                } else {
                    self.write_identifier_quoted(context, out, column);
                }
            }
            None => self.write_identifier_quoted(context, out, field),
        }
    }

    /// Positional placeholder, 1-based.
    fn write_placeholder(&self, _context: &mut SqlContext, out: &mut String, index: usize) {
        let _ = write!(out, "${}", index);
    }

    /// Append `value` to `args` and write its placeholder.
    fn write_argument(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        value: Value,
    ) {
        args.push(value);
        self.write_placeholder(context, out, args.len());
    }

    /// Render the SQL type for a `Value` prototype.
    fn write_column_type(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        value: &Value,
        length: Option<u32>,
    ) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) | Value::Int16(..) | Value::UInt8(..) => out.push_str("SMALLINT"),
            Value::Int32(..) | Value::UInt16(..) => out.push_str("INTEGER"),
            Value::Int64(..) | Value::UInt32(..) => out.push_str("BIGINT"),
            Value::UInt64(..) => out.push_str("NUMERIC(20)"),
            Value::Float32(..) => out.push_str("REAL"),
            Value::Float64(..) => out.push_str("DOUBLE PRECISION"),
            Value::Decimal(..) => out.push_str("NUMERIC"),
            Value::Varchar(..) => match length.unwrap_or(DEFAULT_VARCHAR_LENGTH) {
                n if n > DEFAULT_VARCHAR_LENGTH => out.push_str("TEXT"),
                n => drop(write!(out, "VARCHAR({})", n)),
            },
            Value::Blob(..) => out.push_str("BYTEA"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP"),
            Value::TimestampWithTimezone(..) => out.push_str("TIMESTAMPTZ"),
            Value::Uuid(..) => out.push_str("UUID"),
            Value::List(.., inner) => {
                self.write_column_type(context, out, inner, None);
                out.push_str("[]");
            }
            Value::Null => {
                log::error!("Value::Null carries no type, falling back to TEXT");
                out.push_str("TEXT");
            }
        }
    }

    /// Column type as a standalone string.
    fn column_type(&self, value: &Value, length: Option<u32>) -> String {
        let mut out = String::new();
        self.write_column_type(&mut SqlContext::default(), &mut out, value, length);
        out
    }

    /// Whether a declared type and a type reported by the catalog are the same type.
    fn column_type_matches(&self, declared: &str, live: &str) -> bool {
        let declared = canonical_type(declared);
        let live = canonical_type(live);
        declared == live || (live == "array" && declared.ends_with("[]"))
    }

    /// Render one condition.
    fn write_condition(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        condition: &Condition,
    ) -> Result<()> {
        if !is_field_reference(&condition.field) {
            return Err(condition.invalid("not a valid column reference"));
        }
        let operator = &condition.operator;
        if !operator.is_valid() {
            return Err(condition.invalid(format!("`{}` is not a valid operator", operator)));
        }
        if operator.is_list() {
            let Value::List(items, ..) = &condition.value else {
                return Err(condition.invalid(format!("{} requires a sequence value", operator)));
            };
            let items = items.as_deref().unwrap_or_default();
            if items.is_empty() {
                out.push_str(if operator.is_negated() { "1 = 1" } else { "1 = 0" });
                return Ok(());
            }
            self.write_field_ref(context, out, &condition.field);
            let _ = write!(out, " {} (", operator);
            separated_by(
                out,
                items,
                |out, v| self.write_argument(context, out, args, v.clone()),
                ", ",
            );
            out.push(')');
        } else if operator.is_like() {
            let Value::Varchar(Some(text)) = &condition.value else {
                return Err(condition.invalid(format!("{} requires a text value", operator)));
            };
            self.write_field_ref(context, out, &condition.field);
            let _ = write!(out, " {} ", operator);
            self.write_argument(context, out, args, Value::Varchar(Some(format!("%{text}%"))));
        } else {
            if condition.value.is_sequence() {
                return Err(condition.invalid(format!(
                    "{} does not accept a sequence value, use IN or NOT IN",
                    operator
                )));
            }
            self.write_field_ref(context, out, &condition.field);
            let _ = write!(out, " {} ", operator);
            self.write_argument(context, out, args, condition.value.clone());
        }
        Ok(())
    }

    /// `(f1 LIKE $n OR f2 LIKE $m)`, every field bound to `%text%`.
    fn write_search(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        search: &Search,
    ) -> Result<()> {
        out.push('(');
        try_separated_by(
            out,
            &search.fields,
            |out, field| {
                if !is_field_reference(field) {
                    return Err(OrmError::InvalidCondition {
                        field: field.clone(),
                        reason: "not a valid search column".into(),
                    });
                }
                self.write_field_ref(context, out, field);
                out.push_str(" LIKE ");
                self.write_argument(
                    context,
                    out,
                    args,
                    Value::Varchar(Some(format!("%{}%", search.text))),
                );
                Ok(())
            },
            " OR ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Conditions joined by `AND`, followed by the search group when it is active.
    fn write_conditions(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        conditions: &[Condition],
        search: Option<&Search>,
    ) -> Result<()> {
        try_separated_by(
            out,
            conditions,
            |out, c| self.write_condition(context, out, args, c),
            " AND ",
        )?;
        if let Some(search) = search.filter(|s| s.is_active()) {
            if !conditions.is_empty() {
                out.push_str(" AND ");
            }
            self.write_search(context, out, args, search)?;
        }
        Ok(())
    }

    /// `WHERE ...`, nothing at all without conditions.
    fn write_where(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        conditions: &[Condition],
        search: Option<&Search>,
    ) -> Result<()> {
        if conditions.is_empty() && !search.is_some_and(Search::is_active) {
            return Ok(());
        }
        out.push_str("\nWHERE ");
        self.write_conditions(context, out, args, conditions, search)
    }

    /// Render join keyword(s) for the given join type.
    fn write_join_type(&self, _context: &mut SqlContext, out: &mut String, join_type: JoinType) {
        out.push_str(match join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        });
    }

    /// Render a JOIN clause, the `ON` condition is copied verbatim.
    fn write_join(&self, context: &mut SqlContext, out: &mut String, join: &JoinClause) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        if join.on.trim().is_empty() {
            return Err(OrmError::QueryBuild(
                format!("The join with `{}` has no ON condition", join.table).into(),
            )
            .into());
        }
        self.write_join_type(&mut context, out, join.join_type);
        out.push(' ');
        self.write_table_name(&mut context, out, &join.table);
        out.push_str(" ON ");
        out.push_str(&join.on);
        Ok(())
    }

    fn write_projection(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        projection: &Projection,
    ) -> Result<()> {
        let field = &projection.field;
        let valid = match &projection.table {
            Some(table) => !table.is_empty() && is_identifier(field),
            None => {
                field == "*"
                    || is_field_reference(field)
                    || field
                        .strip_suffix(".*")
                        .is_some_and(|table| is_identifier(table))
            }
        };
        if !valid {
            return Err(OrmError::QueryBuild(
                format!("`{}` is not a valid column reference", field).into(),
            )
            .into());
        }
        if let Some(table) = &projection.table {
            self.write_identifier_quoted(context, out, table);
            out.push('.');
            self.write_identifier_quoted(context, out, field);
        } else {
            self.write_field_ref(context, out, field);
        }
        if let Some(alias) = &projection.alias
            && self.alias_declaration(context)
        {
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, alias);
        }
        Ok(())
    }

    /// `LIMIT` and `OFFSET`, explicit values are bound as arguments.
    fn write_limit_offset(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        args: &mut Vec<Value>,
        select: &Select,
    ) {
        match select.limit {
            Some(limit) => {
                out.push_str("\nLIMIT ");
                self.write_argument(context, out, args, bound_integer(limit));
            }
            None if select.paginate => {
                let _ = write!(out, "\nLIMIT {}", select.default_limit);
            }
            None => {}
        }
        if let Some(offset) = select.offset {
            out.push_str("\nOFFSET ");
            self.write_argument(context, out, args, bound_integer(offset));
        }
    }

    /// Emit SELECT statement (projection, FROM, JOIN, WHERE, GROUP BY, HAVING, ORDER, LIMIT).
    fn write_select(&self, out: &mut String, args: &mut Vec<Value>, select: &Select) -> Result<()> {
        if select.table.trim().is_empty() {
            return Err(OrmError::EmptyTableName.into());
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = SqlContext::new(Fragment::SqlSelect);
        out.push_str("SELECT ");
        if select.fields.is_empty() {
            out.push('*');
        } else {
            try_separated_by(
                out,
                &select.fields,
                |out, v| self.write_projection(&mut context, out, v),
                ", ",
            )?;
        }
        out.push_str("\nFROM ");
        let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
        self.write_table_name(&mut context, out, &select.table);
        for join in &select.joins {
            out.push('\n');
            self.write_join(&mut context, out, join)?;
        }
        let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
        self.write_where(
            &mut context,
            out,
            args,
            &select.conditions,
            select.search.as_ref(),
        )?;
        if !select.group_by.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlSelectGroupBy);
            out.push_str("\nGROUP BY ");
            try_separated_by(
                out,
                &select.group_by,
                |out, v| {
                    if !is_field_reference(v) {
                        return Err(OrmError::QueryBuild(
                            format!("`{}` is not a valid GROUP BY column", v).into(),
                        ));
                    }
                    self.write_field_ref(&mut context, out, v);
                    Ok(())
                },
                ", ",
            )?;
        }
        if !select.having.is_empty() {
            out.push_str("\nHAVING ");
            separated_by(out, &select.having, |out, v| out.push_str(v), " AND ");
        }
        if !select.order_by.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            out.push_str("\nORDER BY ");
            try_separated_by(
                out,
                &select.order_by,
                |out, v| {
                    if !is_field_reference(&v.field) {
                        return Err(OrmError::QueryBuild(
                            format!("`{}` is not a valid ORDER BY column", v.field).into(),
                        ));
                    }
                    self.write_field_ref(&mut context, out, &v.field);
                    out.push_str(if v.descending { " DESC" } else { " ASC" });
                    Ok(())
                },
                ", ",
            )?;
        }
        let mut context = context.switch_fragment(Fragment::SqlSelectLimit);
        self.write_limit_offset(&mut context, out, args, select);
        out.push(';');
        Ok(())
    }

    /// Emit INSERT statement, one placeholder per value.
    fn write_insert(&self, out: &mut String, args: &mut Vec<Value>, insert: &Insert) -> Result<()> {
        if insert.table.trim().is_empty() {
            return Err(OrmError::EmptyTableName.into());
        }
        if insert.columns.len() != insert.values.len() {
            return Err(OrmError::QueryBuild(
                format!(
                    "INSERT INTO `{}` has {} columns but {} values",
                    insert.table,
                    insert.columns.len(),
                    insert.values.len()
                )
                .into(),
            )
            .into());
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = SqlContext::new(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table_name(&mut context, out, &insert.table);
        if insert.columns.is_empty() {
            out.push_str(" DEFAULT VALUES;");
            return Ok(());
        }
        out.push_str(" (");
        separated_by(
            out,
            &insert.columns,
            |out, v| self.write_identifier_quoted(&mut context, out, v),
            ", ",
        );
        out.push_str(")\nVALUES (");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            &insert.values,
            |out, v| self.write_argument(&mut context, out, args, v.clone()),
            ", ",
        );
        out.push_str(");");
        Ok(())
    }

    /// Emit UPDATE statement, `SET` arguments come before the `WHERE` ones.
    fn write_update(&self, out: &mut String, args: &mut Vec<Value>, update: &Update) -> Result<()> {
        if update.table.trim().is_empty() {
            return Err(OrmError::EmptyTableName.into());
        }
        if update.assignments.is_empty() {
            return Err(OrmError::QueryBuild(
                format!("UPDATE `{}` has no column to set", update.table).into(),
            )
            .into());
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = SqlContext::new(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table_name(&mut context, out, &update.table);
        out.push_str("\nSET ");
        let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
        separated_by(
            out,
            &update.assignments,
            |out, (column, value)| {
                self.write_identifier_quoted(&mut context, out, column);
                out.push_str(" = ");
                self.write_argument(&mut context, out, args, value.clone());
            },
            ", ",
        );
        let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
        self.write_where(&mut context, out, args, &update.conditions, None)?;
        out.push(';');
        Ok(())
    }

    /// Emit DELETE statement with an optional WHERE clause.
    fn write_delete(&self, out: &mut String, args: &mut Vec<Value>, delete: &Delete) -> Result<()> {
        if delete.table.trim().is_empty() {
            return Err(OrmError::EmptyTableName.into());
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = SqlContext::new(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_table_name(&mut context, out, &delete.table);
        let mut context = context.switch_fragment(Fragment::SqlDeleteFromWhere);
        self.write_where(&mut context, out, args, &delete.conditions, None)?;
        out.push(';');
        Ok(())
    }

    /// Emit BEGIN statement.
    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    /// Emit COMMIT statement.
    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    /// Emit ROLLBACK statement.
    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }

    /// Emit CREATE TABLE with columns and foreign keys.
    fn write_create_table(&self, out: &mut String, schema: &TableSchema, if_not_exists: bool) {
        let mut context = SqlContext::new(Fragment::SqlCreateTable);
        out.reserve(128 + schema.columns.len() * 64 + schema.foreign_keys.len() * 96);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table_name(&mut context, out, &schema.name);
        out.push_str(" (\n");
        separated_by(
            out,
            &schema.columns,
            |out, v| self.write_create_table_column_fragment(&mut context, out, v),
            ",\n",
        );
        let mut context = context.switch_fragment(Fragment::SqlCreateTableForeignKey);
        for foreign_key in &schema.foreign_keys {
            out.push_str(",\n");
            self.write_create_table_foreign_key(&mut context, out, foreign_key);
        }
        out.push_str("\n);");
    }

    /// Emit single column definition fragment.
    fn write_create_table_column_fragment(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        column: &ColumnSchema,
    ) {
        self.write_identifier_quoted(context, out, &column.name);
        out.push(' ');
        self.write_column_type(context, out, &column.value, column.length);
        out.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if column.unique && !column.primary_key {
            out.push_str(" UNIQUE");
        }
        if column.primary_key {
            out.push_str(" PRIMARY KEY");
        }
    }

    fn write_create_table_foreign_key(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        foreign_key: &ForeignKeySchema,
    ) {
        out.push_str("FOREIGN KEY (");
        self.write_identifier_quoted(context, out, &foreign_key.column);
        out.push_str(") REFERENCES ");
        self.write_table_name(context, out, &foreign_key.table);
        out.push('(');
        self.write_identifier_quoted(context, out, &foreign_key.references);
        out.push(')');
        if let Some(on_delete) = &foreign_key.on_delete {
            out.push_str(" ON DELETE ");
            self.write_create_table_references_action(context, out, on_delete);
        }
    }

    /// Emit referential action keyword.
    fn write_create_table_references_action(
        &self,
        _context: &mut SqlContext,
        out: &mut String,
        action: &Action,
    ) {
        out.push_str(action.keyword());
    }

    /// Emit DROP TABLE statement.
    fn write_drop_table(&self, out: &mut String, name: &str, if_exists: bool, cascade: bool) {
        let mut context = SqlContext::new(Fragment::SqlDropTable);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_name(&mut context, out, name);
        if cascade {
            out.push_str(" CASCADE");
        }
        out.push(';');
    }

    /// Catalog query returning `column_name`, `data_type` and `is_nullable` for `table`.
    fn write_list_columns(&self, out: &mut String, args: &mut Vec<Value>, table: &str) {
        let mut context = SqlContext::default();
        out.push_str(
            "SELECT column_name, data_type, is_nullable\nFROM information_schema.columns\nWHERE table_name = ",
        );
        self.write_argument(&mut context, out, args, Value::Varchar(Some(table.into())));
        out.push(';');
    }

    fn write_add_column(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        out.push_str("ALTER TABLE ");
        self.write_table_name(context, out, table);
        out.push_str(" ADD COLUMN ");
        self.write_create_table_column_fragment(context, out, column);
        out.push(';');
    }

    fn write_alter_column_type(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        out.push_str("ALTER TABLE ");
        self.write_table_name(context, out, table);
        out.push_str(" ALTER COLUMN ");
        self.write_identifier_quoted(context, out, &column.name);
        out.push_str(" TYPE ");
        self.write_column_type(context, out, &column.value, column.length);
        out.push(';');
    }

    fn write_alter_column_nullability(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        out.push_str("ALTER TABLE ");
        self.write_table_name(context, out, table);
        out.push_str(" ALTER COLUMN ");
        self.write_identifier_quoted(context, out, &column.name);
        out.push_str(if column.nullable {
            " DROP NOT NULL;"
        } else {
            " SET NOT NULL;"
        });
    }

    /// Statements bringing the live columns of a table in line with `schema`.
    ///
    /// Columns are added or altered, never dropped. Live columns absent from
    /// the schema are left alone.
    fn write_alter_table(&self, schema: &TableSchema, live: &[LiveColumn]) -> Vec<String> {
        let mut context = SqlContext::new(Fragment::SqlAlterTable);
        let mut result = Vec::new();
        let mut push = |out: String| {
            if !out.is_empty() {
                result.push(out);
            }
        };
        for column in &schema.columns {
            let Some(current) = live.iter().find(|v| v.name == column.name) else {
                let mut out = String::new();
                self.write_add_column(&mut context, &mut out, &schema.name, column);
                push(out);
                continue;
            };
            let declared = self.column_type(&column.value, column.length);
            if !self.column_type_matches(&declared, &current.data_type) {
                let mut out = String::new();
                self.write_alter_column_type(&mut context, &mut out, &schema.name, column);
                push(out);
            }
            if !column.primary_key && column.nullable != current.nullable {
                let mut out = String::new();
                self.write_alter_column_nullability(&mut context, &mut out, &schema.name, column);
                push(out);
            }
        }
        result
    }
}

fn bound_integer(value: u64) -> Value {
    Value::Int64(Some(i64::try_from(value).unwrap_or(i64::MAX)))
}

/// Lower case type name without length or precision, synonyms folded together.
pub fn canonical_type(value: &str) -> String {
    let lower = value.trim().to_ascii_lowercase();
    let (base, array) = match lower.strip_suffix("[]") {
        Some(base) => (base.trim(), true),
        None => (lower.as_str(), false),
    };
    let base = match base.find('(') {
        Some(i) => base[..i].trim(),
        None => base,
    };
    let base = match base {
        "character varying" | "varchar" | "nvarchar" => "varchar",
        "character" | "char" | "bpchar" => "char",
        "int" | "int4" | "integer" => "integer",
        "int2" | "smallint" => "smallint",
        "int8" | "bigint" => "bigint",
        "float4" | "real" => "real",
        "float8" | "double" | "double precision" => "double precision",
        "bool" | "boolean" => "boolean",
        "decimal" | "numeric" => "numeric",
        "timestamp" | "timestamp without time zone" => "timestamp",
        "timestamptz" | "timestamp with time zone" => "timestamptz",
        "time" | "time without time zone" => "time",
        "timetz" | "time with time zone" => "timetz",
        v => v,
    };
    if array {
        format!("{base}[]")
    } else {
        base.to_string()
    }
}

/// Fallback generic SQL writer (closest to PostgreSQL conventions).
#[derive(Default)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    /// Construct a new generic writer.
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
