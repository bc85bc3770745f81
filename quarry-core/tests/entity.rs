#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        AsValue, ColumnMap, Condition, Entity, ErrorKind, FieldDescriptor, GenericSqlWriter,
        Insert, OrmError, RowLabeled, Scan, Update, Value, error_kind, extract, materialize,
        materialize_all, orm_error, parse_annotation, scan_column,
    };
    use std::sync::{Arc, LazyLock};

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[derive(Default, Debug, PartialEq)]
    struct User {
        id: i64,
        email: String,
        nickname: Option<String>,
        age: i32,
        session: Option<String>,
    }

    impl Entity for User {
        fn table_name() -> &'static str {
            "user"
        }

        fn descriptors() -> &'static [FieldDescriptor] {
            static DESCRIPTORS: LazyLock<Vec<FieldDescriptor>> = LazyLock::new(|| {
                [
                    ("id,pk", "id", i64::as_empty_value()),
                    ("email,unique,length(120)", "email", String::as_empty_value()),
                    ("nickname,nullable", "nickname", Option::<String>::as_empty_value()),
                    ("user_age", "age", i32::as_empty_value()),
                ]
                .into_iter()
                .map(|(annotation, field, value)| {
                    parse_annotation(annotation)
                        .expect("Valid annotation")
                        .into_descriptor(field, value)
                })
                .collect()
            });
            &DESCRIPTORS
        }

        fn column_map() -> &'static ColumnMap {
            static MAP: LazyLock<ColumnMap> = LazyLock::new(|| ColumnMap::new(User::descriptors()));
            &MAP
        }

        fn column_value(&self, column: &str) -> Option<Value> {
            Some(match column {
                "id" => self.id.as_value(),
                "email" => self.email.clone().as_value(),
                "nickname" => self.nickname.clone().as_value(),
                "user_age" => self.age.as_value(),
                _ => return None,
            })
        }

        fn scan_target(&mut self, field: &str) -> Option<&mut dyn Scan> {
            let target: &mut dyn Scan = match field {
                "id" => &mut self.id,
                "email" => &mut self.email,
                "nickname" => &mut self.nickname,
                "age" => &mut self.age,
                _ => return None,
            };
            Some(target)
        }
    }

    #[derive(Default, Debug)]
    struct Tag {
        label: String,
    }

    impl Entity for Tag {
        fn table_name() -> &'static str {
            "tag"
        }

        fn descriptors() -> &'static [FieldDescriptor] {
            static DESCRIPTORS: LazyLock<Vec<FieldDescriptor>> = LazyLock::new(|| {
                vec![FieldDescriptor::new("label", "label", String::as_empty_value())]
            });
            &DESCRIPTORS
        }

        fn column_map() -> &'static ColumnMap {
            static MAP: LazyLock<ColumnMap> = LazyLock::new(|| ColumnMap::new(Tag::descriptors()));
            &MAP
        }

        fn column_value(&self, column: &str) -> Option<Value> {
            (column == "label").then(|| self.label.clone().as_value())
        }

        fn scan_target(&mut self, field: &str) -> Option<&mut dyn Scan> {
            (field == "label").then_some(&mut self.label as &mut dyn Scan)
        }
    }

    fn ann() -> User {
        User {
            id: 1,
            email: "ann@example.com".into(),
            nickname: None,
            age: 30,
            session: None,
        }
    }

    fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            Arc::from(labels.iter().map(|v| v.to_string()).collect::<Vec<_>>()),
            values.into_boxed_slice(),
        )
    }

    #[test]
    fn metadata() {
        let (descriptors, columns) = extract::<User>();
        assert!(std::ptr::eq(descriptors, User::descriptors()));
        assert!(std::ptr::eq(columns, User::column_map()));
        assert_eq!(
            descriptors
                .iter()
                .map(|d| d.column_name.as_ref())
                .collect::<Vec<_>>(),
            ["id", "email", "nickname", "user_age"]
        );
        assert!(descriptors[0].primary_key);
        assert!(descriptors[1].unique);
        assert_eq!(descriptors[1].length, Some(120));
        assert!(descriptors[2].nullable);
        assert_eq!(descriptors[3].value, Value::Int32(None));
        assert_eq!(columns.len(), 4);
        assert_eq!(columns.field("user_age"), Some("age"));
        assert_eq!(columns.column("age"), Some("user_age"));
        assert!(!columns.contains_column("session"));
        assert!(!columns.contains_field("session"));

        assert_eq!(User::primary_key_column(), "id");
        assert_eq!(ann().primary_key_value(), Some(Value::Int64(Some(1))));
        assert_eq!(Tag::primary_key_column(), "id");
        assert_eq!(Tag::default().primary_key_value(), None);
    }

    #[test]
    fn insert_record() {
        let statement = Insert::from_entity("user", &ann())
            .build(&WRITER)
            .expect("Valid insert");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                INSERT INTO "user" ("id", "email", "nickname", "user_age")
                VALUES ($1, $2, $3, $4);
            "#}
            .trim()
        );
        assert_eq!(
            statement.args,
            vec![
                Value::Int64(Some(1)),
                Value::Varchar(Some("ann@example.com".into())),
                Value::Varchar(None),
                Value::Int32(Some(30)),
            ]
        );

        let statement = Insert::from_entity_columns("user", &ann(), &["email"])
            .expect("Mapped column")
            .build(&WRITER)
            .expect("Valid insert");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                INSERT INTO "user" ("email")
                VALUES ($1);
            "#}
            .trim()
        );

        let error = Insert::from_entity_columns("user", &ann(), &["email", "session"])
            .expect_err("An unmapped column must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
        assert!(matches!(
            orm_error(&error),
            Some(OrmError::UnmappedColumn { column, .. }) if column == "session"
        ));
    }

    #[test]
    fn insert_implicit_key() {
        let tag = Tag {
            label: "blue".into(),
        };
        let first = Insert::from_entity("tag", &tag)
            .build(&WRITER)
            .expect("Valid insert");
        assert_eq!(
            first.sql,
            indoc! {r#"
                INSERT INTO "tag" ("id", "label")
                VALUES ($1, $2);
            "#}
            .trim()
        );
        assert!(matches!(first.args[0], Value::Uuid(Some(..))));
        assert_eq!(first.args[1], Value::Varchar(Some("blue".into())));

        // Every insert gets its own key
        let second = Insert::from_entity("tag", &tag)
            .build(&WRITER)
            .expect("Valid insert");
        assert_ne!(first.args[0], second.args[0]);

        let statement = Insert::from_entity_columns("tag", &tag, &["label"])
            .expect("Mapped column")
            .build(&WRITER)
            .expect("Valid insert");
        assert!(statement.sql.starts_with(r#"INSERT INTO "tag" ("id", "label")"#));
    }

    #[test]
    fn update_record() {
        let statement = Update::from_entity("user", &ann(), Vec::new())
            .expect("Keyed update")
            .build(&WRITER)
            .expect("Valid update");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                UPDATE "user"
                SET "email" = $1, "nickname" = $2, "user_age" = $3
                WHERE "id" = $4;
            "#}
            .trim()
        );
        assert_eq!(statement.args[3], Value::Int64(Some(1)));

        let statement = Update::from_entity(
            "user",
            &ann(),
            vec![Condition::equal("email", "ann@example.com")],
        )
        .expect("Conditional update")
        .build(&WRITER)
        .expect("Valid update");
        assert!(statement.sql.ends_with(r#"WHERE "email" = $4;"#));

        let error = Update::from_entity(
            "tag",
            &Tag {
                label: "blue".into(),
            },
            Vec::new(),
        )
        .expect_err("Without a key nor conditions the update must be rejected");
        assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
    }

    #[test]
    fn materialize_row() {
        let mut user = User {
            session: Some("kept".into()),
            ..Default::default()
        };
        materialize(
            row(
                &["id", "email", "nickname", "user_age", "last_login"],
                vec![
                    Value::Int64(Some(7)),
                    Value::from("bob@example.com"),
                    Value::Null,
                    Value::Int64(Some(41)),
                    Value::from("yesterday"),
                ],
            ),
            &mut user,
        )
        .expect("Compatible row");
        assert_eq!(
            user,
            User {
                id: 7,
                email: "bob@example.com".into(),
                nickname: None,
                age: 41,
                session: Some("kept".into()),
            }
        );

        // Missing columns leave the fields untouched
        materialize(row(&["nickname"], vec![Value::from("bobby")]), &mut user)
            .expect("Compatible row");
        assert_eq!(user.nickname.as_deref(), Some("bobby"));
        assert_eq!(user.email, "bob@example.com");

        assert!(!scan_column(&mut user, "age", Value::Int32(Some(1))).expect("Ignored column"));
        assert_eq!(user.age, 41);
    }

    #[test]
    fn materialize_failure() {
        let mut user = ann();
        let error = materialize(
            row(&["user_age"], vec![Value::from("thirty")]),
            &mut user,
        )
        .expect_err("Text cannot fill an integer field");
        assert_eq!(error_kind(&error), Some(ErrorKind::Execution));
        assert!(matches!(
            orm_error(&error),
            Some(OrmError::Scan { column, field }) if column == "user_age" && field == "age"
        ));

        let error = materialize(
            row(&["user_age"], vec![Value::Int64(Some(i64::MAX))]),
            &mut user,
        )
        .expect_err("Out of range integer");
        assert_eq!(error_kind(&error), Some(ErrorKind::Execution));
    }

    #[test]
    fn materialize_rows() {
        let labels = ["id", "email"];
        let users = materialize_all::<User>([
            row(&labels, vec![Value::Int64(Some(1)), Value::from("a@example.com")]),
            row(&labels, vec![Value::Int64(Some(2)), Value::from("b@example.com")]),
        ])
        .expect("Compatible rows");
        assert_eq!(
            users.iter().map(|u| (u.id, u.email.as_str())).collect::<Vec<_>>(),
            [(1, "a@example.com"), (2, "b@example.com")]
        );
        assert!(users.iter().all(|u| u.age == 0 && u.nickname.is_none()));

        assert!(materialize_all::<User>([]).expect("No rows").is_empty());
    }
}
