#[cfg(test)]
mod tests {
    use quarry::{Entity, RowLabeled, Value, extract, materialize};
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use time::{Date, macros::date};

    #[derive(Entity, Default, Debug, PartialEq)]
    struct Customer {
        #[column("id,pk")]
        id: i64,
        #[column("full_name,length(60)")]
        name: String,
        #[column("email,unique")]
        email: Option<String>,
        #[column("balance")]
        balance: Decimal,
        #[column("joined_on")]
        joined: Option<Date>,
        notes: String,
    }

    #[derive(Entity, Default, Debug)]
    #[table_name("trade_log")]
    struct Trade {
        #[column("symbol")]
        symbol: String,
        #[column("id")]
        id: u32,
    }

    #[derive(Entity, Default, Debug)]
    struct Reading {
        #[column("sensor")]
        sensor: String,
        #[column("celsius,nullable")]
        celsius: f32,
    }

    #[test]
    fn derived_metadata() {
        assert_eq!(Customer::table_name(), "customer");
        assert_eq!(Trade::table_name(), "trade_log");
        assert_eq!(Reading::table_name(), "reading");

        let (descriptors, columns) = extract::<Customer>();
        assert_eq!(
            descriptors
                .iter()
                .map(|d| (d.column_name.as_ref(), d.field_name.as_ref()))
                .collect::<Vec<_>>(),
            [
                ("id", "id"),
                ("full_name", "name"),
                ("email", "email"),
                ("balance", "balance"),
                ("joined_on", "joined"),
            ]
        );
        assert!(descriptors[0].primary_key);
        assert_eq!(descriptors[1].length, Some(60));
        assert!(!descriptors[1].nullable);
        assert!(descriptors[2].unique);
        assert!(descriptors[2].nullable);
        assert_eq!(descriptors[3].value, Value::Decimal(None));
        assert_eq!(descriptors[4].value, Value::Date(None));
        assert!(descriptors[4].nullable);
        assert_eq!(columns.field("full_name"), Some("name"));
        assert_eq!(columns.column("joined"), Some("joined_on"));
        assert!(!columns.contains_field("notes"));

        // The statics are built once
        assert!(std::ptr::eq(Customer::descriptors(), extract::<Customer>().0));

        let reading = Reading::descriptors();
        assert!(reading[1].nullable);
        assert_eq!(reading[1].value, Value::Float32(None));
    }

    #[test]
    fn primary_keys() {
        assert_eq!(Customer::primary_key_column(), "id");
        assert_eq!(
            Customer {
                id: 9,
                ..Default::default()
            }
            .primary_key_value(),
            Some(Value::Int64(Some(9)))
        );

        // Falls back to the column named `id`
        assert_eq!(Trade::primary_key_column(), "id");
        assert!(Trade::primary_key_descriptor().is_some());
        assert_eq!(
            Trade {
                symbol: "ACME".into(),
                id: 3
            }
            .primary_key_value(),
            Some(Value::UInt32(Some(3)))
        );

        // Implicit key, not carried by the record
        assert!(Reading::primary_key_descriptor().is_none());
        assert_eq!(Reading::primary_key_column(), "id");
        assert_eq!(Reading::default().primary_key_value(), None);
    }

    #[test]
    fn column_values() {
        let customer = Customer {
            id: 1,
            name: "Grace".into(),
            email: None,
            balance: Decimal::new(1250, 2),
            joined: Some(date!(2023 - 05 - 17)),
            notes: "not persisted".into(),
        };
        assert_eq!(
            customer.column_value("full_name"),
            Some(Value::Varchar(Some("Grace".into())))
        );
        assert_eq!(customer.column_value("email"), Some(Value::Varchar(None)));
        assert_eq!(
            customer.column_value("balance"),
            Some(Value::Decimal(Some(Decimal::new(1250, 2))))
        );
        assert_eq!(customer.column_value("name"), None);
        assert_eq!(customer.column_value("notes"), None);
    }

    #[test]
    fn materialize_derived() {
        let mut customer = Customer {
            notes: "kept".into(),
            ..Default::default()
        };
        materialize(
            RowLabeled::new(
                Arc::from(
                    ["id", "full_name", "email", "balance", "joined_on", "rank"]
                        .map(String::from)
                        .to_vec(),
                ),
                vec![
                    Value::Int64(Some(4)),
                    Value::from("Ada"),
                    Value::from("ada@example.com"),
                    Value::Float64(Some(10.5)),
                    Value::from("1990-12-10"),
                    Value::Int64(Some(1)),
                ]
                .into_boxed_slice(),
            ),
            &mut customer,
        )
        .expect("Compatible row");
        assert_eq!(
            customer,
            Customer {
                id: 4,
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
                balance: Decimal::new(105, 1),
                joined: Some(date!(1990 - 12 - 10)),
                notes: "kept".into(),
            }
        );
    }
}
