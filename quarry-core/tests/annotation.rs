#[cfg(test)]
mod tests {
    use quarry_core::{
        Action, ErrorKind, FieldDescriptor, ForeignKey, Value, error_kind, parse_annotation,
        validate_descriptors,
    };
    use std::borrow::Cow;

    #[test]
    fn column_name_only() {
        let annotation = parse_annotation("email").expect("A bare name is valid");
        assert_eq!(annotation.column_name, "email");
        assert!(!annotation.primary_key);
        assert!(!annotation.unique);
        assert!(!annotation.nullable);
        assert_eq!(annotation.length, None);
        assert_eq!(annotation.foreign_key, None);
    }

    #[test]
    fn every_token() {
        let annotation = parse_annotation("owner_id, PK, Unique,nullable, length(64), fk(users:id, set null)")
            .expect("Every token is valid");
        assert_eq!(annotation.column_name, "owner_id");
        assert!(annotation.primary_key);
        assert!(annotation.unique);
        assert!(annotation.nullable);
        assert_eq!(annotation.length, Some(64));
        assert_eq!(
            annotation.foreign_key,
            Some(ForeignKey {
                table: "users".into(),
                column: "id".into(),
                on_delete: Some("set null".into()),
            })
        );
    }

    #[test]
    fn foreign_key_without_action() {
        let annotation = parse_annotation("team,fk(teams:code)").expect("The action is optional");
        let foreign_key = annotation.foreign_key.expect("The fk must be parsed");
        assert_eq!(foreign_key.table, "teams");
        assert_eq!(foreign_key.column, "code");
        assert_eq!(foreign_key.on_delete, None);
        assert_eq!(
            foreign_key
                .action("members", "team")
                .expect("No action is valid"),
            None
        );
    }

    #[test]
    fn malformed() {
        for annotation in [
            "",
            " ,pk",
            "1column",
            "name,primary",
            "name,length(0)",
            "name,length(abc)",
            "name,fk(users)",
            "name,fk(users:)",
            "name,fk(users:id,)",
            "name,fk(users:id,cascade,restrict)",
            "name,fk(a:b),fk(c:d)",
        ] {
            let error = parse_annotation(annotation)
                .expect_err(&format!("`{}` must be rejected", annotation));
            assert_eq!(
                error_kind(&error),
                Some(ErrorKind::Metadata),
                "Unexpected error for `{}`: {:#}",
                annotation,
                error
            );
        }
    }

    #[test]
    fn actions() {
        for (keyword, action) in [
            ("cascade", Action::Cascade),
            ("RESTRICT", Action::Restrict),
            ("set  null", Action::SetNull),
            (" Set Default ", Action::SetDefault),
            ("no action", Action::NoAction),
        ] {
            assert_eq!(Action::from_keyword(keyword), Some(action));
        }
        assert_eq!(Action::from_keyword("DROP"), None);
        assert_eq!(Action::SetNull.keyword(), "SET NULL");

        let foreign_key = ForeignKey {
            table: "users".into(),
            column: "id".into(),
            on_delete: Some("DROP".into()),
        };
        let error = foreign_key
            .action("posts", "author_id")
            .expect_err("DROP is not an action");
        assert_eq!(error_kind(&error), Some(ErrorKind::Schema));
    }

    #[test]
    fn descriptors_as_a_whole() {
        let descriptor = |annotation: &str, field: &'static str| {
            parse_annotation(annotation)
                .expect("Valid annotation")
                .into_descriptor(field, Value::Int64(None))
        };
        let valid = [descriptor("id,pk", "id"), descriptor("total", "total")];
        validate_descriptors("Order", &valid).expect("Valid descriptors");

        let duplicated = [descriptor("id,pk", "id"), descriptor("id", "other")];
        let error = validate_descriptors("Order", &duplicated).expect_err("Duplicated column");
        assert_eq!(error_kind(&error), Some(ErrorKind::Metadata));

        let two_keys = [descriptor("id,pk", "id"), descriptor("code,pk", "code")];
        let error = validate_descriptors("Order", &two_keys).expect_err("Two primary keys");
        assert_eq!(error_kind(&error), Some(ErrorKind::Metadata));

        let unnamed = [FieldDescriptor::new(Cow::Borrowed(""), "field", Value::Null)];
        let error = validate_descriptors("Order", &unnamed).expect_err("Empty column name");
        assert_eq!(error_kind(&error), Some(ErrorKind::Metadata));
    }
}
