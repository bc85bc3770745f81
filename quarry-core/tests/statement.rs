#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        Condition, Delete, ErrorKind, GenericSqlWriter, Insert, JoinType, QueryConfig, Search,
        Select, Update, Value, compile_conditions, error_kind,
    };

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[test]
    fn select_everything() {
        let statement = Select::from_table("users")
            .fields(["id", "email"])
            .filter(Condition::equal("age", 30))
            .filter(Condition::is_in("id", [1, 2, 3]))
            .order_by("email", true)
            .limit(5)
            .offset(10)
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT "id", "email"
                FROM "users"
                WHERE "age" = $1 AND "id" IN ($2, $3, $4)
                ORDER BY "email" DESC
                LIMIT $5
                OFFSET $6;
            "#}
            .trim()
        );
        assert_eq!(
            statement.args,
            vec![
                Value::Int32(Some(30)),
                Value::Int32(Some(1)),
                Value::Int32(Some(2)),
                Value::Int32(Some(3)),
                Value::Int64(Some(5)),
                Value::Int64(Some(10)),
            ]
        );
    }

    #[test]
    fn select_pagination() {
        let statement = Select::from_table("users")
            .paginate(10)
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT *
                FROM "users"
                LIMIT 10;
            "#}
            .trim()
        );
        assert!(statement.args.is_empty());

        // An explicit limit wins
        let statement = Select::from_table("users")
            .paginate(10)
            .limit(3)
            .build(&WRITER)
            .expect("Valid select");
        assert!(statement.sql.ends_with("LIMIT $1;"));
        assert_eq!(statement.args, vec![Value::Int64(Some(3))]);
    }

    #[test]
    fn select_search() {
        let statement = Select::from_table("users")
            .filter(Condition::greater("age", 18))
            .search(Search::new(["email", "nickname"], "bob"))
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT *
                FROM "users"
                WHERE "age" > $1 AND ("email" LIKE $2 OR "nickname" LIKE $3);
            "#}
            .trim()
        );
        assert_eq!(statement.args[1], Value::Varchar(Some("%bob%".into())));
        assert_eq!(statement.args[2], Value::Varchar(Some("%bob%".into())));

        // Without text the search contributes nothing
        let statement = Select::from_table("users")
            .search(Search::new(["email"], ""))
            .build(&WRITER)
            .expect("Valid select");
        assert!(!statement.sql.contains("WHERE"));
    }

    #[test]
    fn select_group_having_join() {
        let statement = Select::from_table("orders")
            .field("customers.name")
            .join(JoinType::Left, "customers", r#""customers"."id" = "orders"."customer_id""#)
            .group_by("customers.name")
            .having("COUNT(*) > 2")
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT "customers"."name"
                FROM "orders"
                LEFT JOIN "customers" ON "customers"."id" = "orders"."customer_id"
                GROUP BY "customers"."name"
                HAVING COUNT(*) > 2;
            "#}
            .trim()
        );
    }

    #[test]
    fn select_from_config() {
        let config = QueryConfig::new()
            .filter(Condition::not_equal("email", ""))
            .order_by("id")
            .descending(true)
            .limit(3)
            .offset(6);
        let statement = Select::from_config("users", &config, ["id", "email"])
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT "id", "email"
                FROM "users"
                WHERE "email" != $1
                ORDER BY "id" DESC
                LIMIT $2
                OFFSET $3;
            "#}
            .trim()
        );

        // Table and fields of the configuration win
        let config = QueryConfig::new()
            .table("archived_users")
            .fields(["email"])
            .paginate(true);
        let statement = Select::from_config("users", &config, ["id", "email"])
            .build(&WRITER)
            .expect("Valid select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT "email"
                FROM "archived_users"
                LIMIT 10;
            "#}
            .trim()
        );
    }

    #[test]
    fn select_rejects() {
        let error = Select::from_table("")
            .build(&WRITER)
            .expect_err("An empty table name must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::Schema));

        let error = Select::from_table("users")
            .field("email; DROP TABLE users")
            .build(&WRITER)
            .expect_err("A malformed projection must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));

        let error = Select::from_table("users")
            .order_by("1; --", false)
            .build(&WRITER)
            .expect_err("A malformed ordering must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));

        let error = Select::from_table("users")
            .join(JoinType::Inner, "teams", "  ")
            .build(&WRITER)
            .expect_err("A join without ON must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
    }

    #[test]
    fn insert() {
        let statement = Insert::into_table("users")
            .value("id", 1)
            .value("email", "ann@example.com")
            .build(&WRITER)
            .expect("Valid insert");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                INSERT INTO "users" ("id", "email")
                VALUES ($1, $2);
            "#}
            .trim()
        );
        assert_eq!(
            statement.args,
            vec![
                Value::Int32(Some(1)),
                Value::Varchar(Some("ann@example.com".into()))
            ]
        );

        let statement = Insert::into_table("users")
            .build(&WRITER)
            .expect("Valid insert");
        assert_eq!(statement.sql, r#"INSERT INTO "users" DEFAULT VALUES;"#);

        let mut insert = Insert::into_table("users").value("id", 1);
        insert.values.push(Value::Null);
        let error = insert
            .build(&WRITER)
            .expect_err("Mismatched columns and values must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
    }

    #[test]
    fn update() {
        let statement = Update::table("users")
            .set("email", "new@example.com")
            .set("age", 31)
            .filter(Condition::equal("id", 7))
            .build(&WRITER)
            .expect("Valid update");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                UPDATE "users"
                SET "email" = $1, "age" = $2
                WHERE "id" = $3;
            "#}
            .trim()
        );
        assert_eq!(statement.args.len(), 3);

        let statement = Update::table("users")
            .set("active", false)
            .build(&WRITER)
            .expect("An update without conditions is allowed");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                UPDATE "users"
                SET "active" = $1;
            "#}
            .trim()
        );

        let error = Update::table("users")
            .filter(Condition::equal("id", 7))
            .build(&WRITER)
            .expect_err("An update without assignments must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
    }

    #[test]
    fn delete() {
        let statement = Delete::from_table("users")
            .filter(Condition::less_equal("age", 12))
            .filter(Condition::like("email", "@spam."))
            .build(&WRITER)
            .expect("Valid delete");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                DELETE FROM "users"
                WHERE "age" <= $1 AND "email" LIKE $2;
            "#}
            .trim()
        );
        assert_eq!(statement.args[1], Value::Varchar(Some("%@spam.%".into())));

        let statement = Delete::from_table("users")
            .build(&WRITER)
            .expect("A delete without conditions is allowed");
        assert_eq!(statement.sql, r#"DELETE FROM "users";"#);
    }

    #[test]
    fn conditions() {
        let compiled = compile_conditions(
            &WRITER,
            &[
                Condition::is_in("id", Vec::<i64>::new()),
                Condition::not_in("id", Vec::<i64>::new()),
                Condition::not_like("email", "test"),
                Condition::new("name", "ILIKE", "ann"),
            ],
            None,
            Vec::new(),
        )
        .expect("Valid conditions");
        assert_eq!(
            compiled.clause,
            r#"1 = 0 AND 1 = 1 AND "email" NOT LIKE $1 AND "name" ILIKE $2"#
        );
        assert_eq!(
            compiled.args,
            vec![
                Value::Varchar(Some("%test%".into())),
                Value::Varchar(Some("ann".into()))
            ]
        );

        // Placeholders continue after the existing arguments
        let compiled = compile_conditions(
            &WRITER,
            &[Condition::equal("users.id", 1)],
            Some(&Search::new(["users.email"], "x")),
            vec![Value::Null, Value::Null],
        )
        .expect("Valid conditions");
        assert_eq!(
            compiled.clause,
            r#""users"."id" = $3 AND ("users"."email" LIKE $4)"#
        );
        assert_eq!(compiled.args.len(), 4);

        let compiled = compile_conditions(&WRITER, &[], None, Vec::new()).expect("Nothing");
        assert!(compiled.clause.is_empty());
    }

    #[test]
    fn one_placeholder_per_argument() {
        let conditions = [
            Condition::equal("a", 1),
            Condition::is_in("b", ["x", "y", "z"].map(String::from)),
            Condition::like("c", "d"),
            Condition::is_in("e", Vec::<i32>::new()),
            Condition::greater_equal("f", 2.5),
            Condition::not_in("g", [1_u8]),
        ];
        for taken in 0..=conditions.len() {
            let compiled = compile_conditions(&WRITER, &conditions[..taken], None, Vec::new())
                .expect("Valid conditions");
            assert_eq!(
                compiled.clause.matches('$').count(),
                compiled.args.len(),
                "{}",
                compiled.clause
            );
        }
    }

    #[test]
    fn invalid_conditions() {
        for condition in [
            Condition::equal("", 1),
            Condition::equal("a b", 1),
            Condition::new("a", "= 1 OR 1 =", 1),
            Condition::new("a", "IN", 1),
            Condition::equal("a", vec![1, 2]),
            Condition::like("a", 1),
        ] {
            let error = compile_conditions(&WRITER, &[condition.clone()], None, Vec::new())
                .expect_err(&format!("{:?} must be rejected", condition));
            assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
        }
    }
}
