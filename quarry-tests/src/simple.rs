use crate::silent_logs;
use quarry::{Condition, Connection, Connector, Entity, Lookup, QueryConfig};
use rust_decimal::Decimal;
use std::sync::LazyLock;
use time::{
    Date, PrimitiveDateTime,
    macros::{date, datetime},
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("gadgets")]
struct Gadget {
    #[column("id,pk")]
    id: i64,
    #[column("name,unique,length(80)")]
    name: String,
    #[column("description")]
    description: Option<String>,
    #[column("active")]
    active: bool,
    #[column("weight")]
    weight: f64,
    #[column("price")]
    price: Decimal,
    #[column("released")]
    released: Option<Date>,
    #[column("serial")]
    serial: Uuid,
    #[column("updated_at,nullable")]
    updated_at: Option<PrimitiveDateTime>,
    /// Not mapped, never read nor written.
    scratch: String,
}

#[derive(Entity, Default, Debug, PartialEq)]
struct Memo {
    #[column("body")]
    body: String,
}

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn simple<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Gadget>(connection, false)
        .await
        .expect("Failed to drop Gadget table");
    connector
        .create_table::<Gadget>(connection)
        .await
        .expect("Failed to create Gadget table");
    // Idempotent
    connector
        .create_table::<Gadget>(connection)
        .await
        .expect("Creating Gadget table a second time should not fail");

    let lamp = Gadget {
        id: 1,
        name: "Desk lamp".into(),
        description: Some("Warm light, adjustable arm".into()),
        active: true,
        weight: 2.25,
        price: Decimal::new(125, 1),
        released: Some(date!(2024 - 03 - 15)),
        serial: Uuid::new_v4(),
        updated_at: Some(datetime!(2024-03-15 10:30:00)),
        scratch: "never stored".into(),
    };
    let stool = Gadget {
        id: 2,
        name: "Stool".into(),
        description: None,
        active: false,
        weight: 4.0,
        price: Decimal::new(30, 0),
        released: None,
        serial: Uuid::new_v4(),
        updated_at: None,
        scratch: String::new(),
    };
    let result = connector
        .insert(connection, &lamp)
        .await
        .expect("Failed to insert the lamp");
    assert_eq!(result.rows_affected, 1);
    connector
        .insert(connection, &stool)
        .await
        .expect("Failed to insert the stool");

    // By primary key
    let mut found = Gadget::default();
    let exists = connector
        .find_first(connection, &mut found, Lookup::PrimaryKey(1.into()))
        .await
        .expect("Failed to find the lamp");
    assert!(exists);
    assert_eq!(
        found,
        Gadget {
            scratch: String::new(),
            ..lamp.clone()
        }
    );

    // By condition, the nulls come back as None
    let mut found = Gadget::default();
    let exists = connector
        .find_first(connection, &mut found, Condition::equal("name", "Stool"))
        .await
        .expect("Failed to find the stool");
    assert!(exists);
    assert_eq!(found, stool);

    // Missing row leaves the target untouched
    let mut missing = Gadget {
        name: "untouched".into(),
        ..Default::default()
    };
    let exists = connector
        .find_first(connection, &mut missing, Lookup::PrimaryKey(99.into()))
        .await
        .expect("Looking up a missing row should not fail");
    assert!(!exists);
    assert_eq!(missing.name, "untouched");

    let all = connector
        .find_all::<Gadget>(connection, &QueryConfig::new().order_by("id"))
        .await
        .expect("Failed to list the gadgets");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Desk lamp");
    assert_eq!(all[1].name, "Stool");

    // Unique
    let duplicate = Gadget {
        id: 3,
        ..stool.clone()
    };
    let result = silent_logs! {
        connector.insert(connection, &duplicate).await
    };
    assert!(result.is_err(), "A duplicate name must be rejected");
    assert_eq!(
        quarry::error_kind(&result.unwrap_err()),
        Some(quarry::ErrorKind::Execution)
    );

    // Partial insert naming a column the record does not map
    #[derive(Entity, Default)]
    #[table_name("gadgets")]
    struct GadgetName {
        #[column("id,pk")]
        id: i64,
        #[column("name")]
        name: String,
    }
    let result = silent_logs! {
        connector
            .insert_columns(connection, &GadgetName { id: 4, name: "Only a name".into() }, &["id", "missing"])
            .await
    };
    assert_eq!(
        quarry::error_kind(&result.expect_err("Unknown columns must be rejected")),
        Some(quarry::ErrorKind::QueryBuild)
    );

    // No key column, the implicit `id` is generated on insert
    connector
        .drop_table::<Memo>(connection, false)
        .await
        .expect("Failed to drop Memo table");
    connector
        .create_table::<Memo>(connection)
        .await
        .expect("Failed to create Memo table");
    for body in ["Water the plants", "Call the plumber"] {
        let result = connector
            .insert(connection, &Memo { body: body.into() })
            .await
            .expect("Failed to insert a memo");
        assert_eq!(result.rows_affected, 1);
    }
    let memos = connector
        .find_all::<Memo>(connection, &QueryConfig::new().order_by("body"))
        .await
        .expect("Failed to list the memos");
    assert_eq!(
        memos,
        [
            Memo {
                body: "Call the plumber".into()
            },
            Memo {
                body: "Water the plants".into()
            },
        ]
    );
    let rows = connector
        .custom_query(connection, r#"SELECT "id" FROM "memo""#, Vec::new())
        .await
        .expect("Failed to read the memo keys");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row.values()[0].is_null()));
    assert_ne!(rows[0].values()[0], rows[1].values()[0]);
}
