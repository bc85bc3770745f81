#[cfg(test)]
mod tests {
    use quarry_core::{ColumnSchema, Driver, SqlWriter, TableSchema, Value};
    use quarry_sqlite::{SqliteDriver, SqliteSqlWriter, sqlite_affinity};
    use quarry_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        let driver = SqliteDriver::new();
        let connection = driver
            .connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        execute_tests(connection).await;
    }

    #[test]
    fn column_types() {
        let column = |name: &'static str, value: Value, length: Option<u32>| ColumnSchema {
            name: name.into(),
            value,
            length,
            nullable: false,
            unique: false,
            primary_key: false,
        };
        let schema = TableSchema {
            name: "labels".into(),
            columns: vec![
                column("code", Value::Varchar(None), Some(12)),
                column("body", Value::Varchar(None), None),
                column("price", Value::Decimal(None), None),
            ],
            foreign_keys: Vec::new(),
        };
        let mut sql = String::new();
        SqliteSqlWriter {}.write_create_table(&mut sql, &schema, false);
        assert_eq!(
            sql,
            "CREATE TABLE \"labels\" (\n\"code\" VARCHAR(12) NOT NULL,\n\"body\" TEXT NOT NULL,\n\"price\" REAL NOT NULL\n);"
        );
        assert_eq!(sqlite_affinity("VARCHAR(12)"), "TEXT");
    }

    #[tokio::test]
    async fn rejects_foreign_urls() {
        init_logs();
        let result = SqliteDriver::new()
            .connect("postgres://localhost/db")
            .await;
        assert!(result.is_err());
    }
}
