#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry::{
        ConnectorConfig, Entity, ErrorKind, GenericSqlWriter, SqlWriter, TableSchema, error_kind,
    };
    use time::PrimitiveDateTime;
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[derive(Entity)]
    #[table_name("departments")]
    struct Department {
        #[column("id,pk")]
        id: i32,
        #[column("title,unique,length(80)")]
        title: String,
    }

    #[derive(Entity)]
    #[table_name("employees")]
    struct Employee {
        #[column("id,pk")]
        id: Uuid,
        #[column("name,length(300)")]
        name: String,
        #[column("department_id,nullable,fk(departments:id,Set Null)")]
        department_id: Option<i32>,
        #[column("manager_id,fk(employees:id)")]
        manager_id: Option<Uuid>,
        #[column("hired_at")]
        hired_at: PrimitiveDateTime,
        #[column("active")]
        active: bool,
    }

    #[derive(Entity)]
    struct Badge {
        #[column("code")]
        code: String,
    }

    #[derive(Entity)]
    #[table_name("desks")]
    struct Desk {
        #[column("id,pk")]
        id: i64,
        #[column("employee_id,fk(employees:id,explode)")]
        employee_id: Uuid,
    }

    #[test]
    fn create_from_derive() {
        let schema = TableSchema::of::<Employee>("").expect("Valid schema");
        let mut sql = String::new();
        WRITER.write_create_table(&mut sql, &schema, true);
        assert_eq!(
            sql,
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS "employees" (
                "id" UUID NOT NULL PRIMARY KEY,
                "name" TEXT NOT NULL,
                "department_id" INTEGER NULL,
                "manager_id" UUID NULL,
                "hired_at" TIMESTAMP NOT NULL,
                "active" BOOLEAN NOT NULL,
                FOREIGN KEY ("department_id") REFERENCES "departments"("id") ON DELETE SET NULL,
                FOREIGN KEY ("manager_id") REFERENCES "employees"("id")
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn table_prefix() {
        let config = ConnectorConfig::new().table_prefix("hr_");
        assert_eq!(config.table_name(Department::table_name()), "hr_departments");
        let schema = TableSchema::of::<Employee>(&config.table_prefix).expect("Valid schema");
        assert_eq!(schema.name, "hr_employees");
        assert_eq!(
            schema
                .foreign_keys
                .iter()
                .map(|v| v.table.as_str())
                .collect::<Vec<_>>(),
            ["hr_departments", "hr_employees"]
        );

        let schema = TableSchema::of::<Department>("hr_").expect("Valid schema");
        let mut sql = String::new();
        WRITER.write_create_table(&mut sql, &schema, false);
        assert_eq!(
            sql,
            indoc! {r#"
                CREATE TABLE "hr_departments" (
                "id" INTEGER NOT NULL PRIMARY KEY,
                "title" VARCHAR(80) NOT NULL UNIQUE
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn implicit_key() {
        let schema = TableSchema::of::<Badge>("").expect("Valid schema");
        let mut sql = String::new();
        WRITER.write_create_table(&mut sql, &schema, true);
        assert_eq!(
            sql,
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS "badge" (
                "id" UUID NOT NULL PRIMARY KEY,
                "code" VARCHAR(255) NOT NULL
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn invalid_action() {
        let error = TableSchema::of::<Desk>("").expect_err("`explode` is not an action");
        assert_eq!(error_kind(&error), Some(ErrorKind::Schema));
        assert!(format!("{error:#}").contains("explode"));
    }
}
