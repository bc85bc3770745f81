use quarry_core::{ColumnSchema, Select, SqlContext, SqlWriter, Value};
use std::fmt::Write;

/// Dialect of SQLite: `?n` placeholders, storage class types, no column alteration.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

/// Column affinity of a declared type, following the SQLite type name rules.
pub fn sqlite_affinity(declared: &str) -> &'static str {
    let declared = declared.to_ascii_uppercase();
    if declared.contains("INT") {
        "INTEGER"
    } else if declared.contains("CHAR") || declared.contains("CLOB") || declared.contains("TEXT")
    {
        "TEXT"
    } else if declared.contains("BLOB") || declared.trim().is_empty() {
        "BLOB"
    } else if declared.contains("REAL") || declared.contains("FLOA") || declared.contains("DOUB")
    {
        "REAL"
    } else {
        "NUMERIC"
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_placeholder(&self, _context: &mut SqlContext, out: &mut String, index: usize) {
        let _ = write!(out, "?{}", index);
    }

    fn write_column_type(
        &self,
        _context: &mut SqlContext,
        out: &mut String,
        value: &Value,
        length: Option<u32>,
    ) {
        match value {
            Value::Boolean(..) => out.push_str("INTEGER"),
            Value::Int8(..) => out.push_str("INTEGER"),
            Value::Int16(..) => out.push_str("INTEGER"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("INTEGER"),
            Value::UInt8(..) => out.push_str("INTEGER"),
            Value::UInt16(..) => out.push_str("INTEGER"),
            Value::UInt32(..) => out.push_str("INTEGER"),
            Value::UInt64(..) => out.push_str("INTEGER"),
            Value::Float32(..) => out.push_str("REAL"),
            Value::Float64(..) => out.push_str("REAL"),
            Value::Decimal(..) => out.push_str("REAL"),
            Value::Varchar(..) => match length {
                Some(n) => drop(write!(out, "VARCHAR({})", n)),
                None => out.push_str("TEXT"),
            },
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("TEXT"),
            Value::Time(..) => out.push_str("TEXT"),
            Value::Timestamp(..) => out.push_str("TEXT"),
            Value::TimestampWithTimezone(..) => out.push_str("TEXT"),
            Value::Uuid(..) => out.push_str("TEXT"),
            Value::List(..) | Value::Null => {
                log::error!(
                    "SQLite has no column type for {:?}, falling back to BLOB",
                    value
                );
                out.push_str("BLOB");
            }
        }
    }

    fn column_type_matches(&self, declared: &str, live: &str) -> bool {
        sqlite_affinity(declared) == sqlite_affinity(live)
    }

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
                self.write_argument(
                    context,
                    out,
                    args,
                    Value::Int64(Some(i64::try_from(limit).unwrap_or(i64::MAX))),
                );
            }
            None if select.paginate => {
                let _ = write!(out, "\nLIMIT {}", select.default_limit);
            }
            // OFFSET is only accepted after a LIMIT
            None if select.offset.is_some() => out.push_str("\nLIMIT -1"),
            None => {}
        }
        if let Some(offset) = select.offset {
            out.push_str("\nOFFSET ");
            self.write_argument(
                context,
                out,
                args,
                Value::Int64(Some(i64::try_from(offset).unwrap_or(i64::MAX))),
            );
        }
    }

    fn write_drop_table(&self, out: &mut String, name: &str, if_exists: bool, cascade: bool) {
        if cascade {
            log::debug!("SQLite has no DROP TABLE ... CASCADE, dropping `{}` alone", name);
        }
        let mut context = SqlContext::default();
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_name(&mut context, out, name);
        out.push(';');
    }

    fn write_list_columns(&self, out: &mut String, args: &mut Vec<Value>, table: &str) {
        let mut context = SqlContext::default();
        out.push_str(
            "SELECT name AS column_name, type AS data_type, \
            CASE WHEN \"notnull\" = 0 AND pk = 0 THEN 'YES' ELSE 'NO' END AS is_nullable\n\
            FROM pragma_table_info(",
        );
        self.write_argument(&mut context, out, args, Value::Varchar(Some(table.into())));
        out.push_str(");");
    }

    fn write_add_column(
        &self,
        context: &mut SqlContext,
        out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        let mut column = column.clone();
        if !column.nullable || column.unique || column.primary_key {
            log::warn!(
                "SQLite cannot add the constrained column `{}` to `{}`, it is added as a plain nullable column",
                column.name,
                table
            );
            column.nullable = true;
            column.unique = false;
            column.primary_key = false;
        }
        out.push_str("ALTER TABLE ");
        self.write_table_name(context, out, table);
        out.push_str(" ADD COLUMN ");
        self.write_create_table_column_fragment(context, out, &column);
        out.push(';');
    }

    fn write_alter_column_type(
        &self,
        _context: &mut SqlContext,
        _out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        log::warn!(
            "SQLite cannot change the type of `{}`.`{}`, the column is left as is",
            table,
            column.name
        );
    }

    fn write_alter_column_nullability(
        &self,
        _context: &mut SqlContext,
        _out: &mut String,
        table: &str,
        column: &ColumnSchema,
    ) {
        log::warn!(
            "SQLite cannot change the nullability of `{}`.`{}`, the column is left as is",
            table,
            column.name
        );
    }
}
