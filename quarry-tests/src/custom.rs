use crate::silent_logs;
use quarry::{Connection, Connector, Entity, ErrorKind, Value, error_kind, materialize};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("notes")]
struct Note {
    #[column("id,pk")]
    id: i64,
    #[column("body")]
    body: String,
    #[column("pinned")]
    pinned: bool,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn custom<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Note>(connection, false)
        .await
        .expect("Failed to drop Note table");
    connector
        .create_table::<Note>(connection)
        .await
        .expect("Failed to create Note table");

    let result = connector
        .custom_mutate(
            connection,
            r#"INSERT INTO "notes" ("id", "body", "pinned") VALUES ($1, $2, $3)"#,
            vec![Value::from(1), Value::from("first"), Value::from(true)],
        )
        .await
        .expect("Failed to insert with custom SQL");
    assert_eq!(result.rows_affected, 1);
    connector
        .custom_mutate(
            connection,
            r#"INSERT INTO "notes" ("id", "body", "pinned") VALUES ($1, $2, $3)"#,
            vec![Value::from(2), Value::from("second"), Value::from(false)],
        )
        .await
        .expect("Failed to insert with custom SQL");

    let rows = connector
        .custom_query(
            connection,
            r#"SELECT "id", "body", "pinned" FROM "notes" WHERE "id" > $1 ORDER BY "id""#,
            vec![Value::Int64(Some(0))],
        )
        .await
        .expect("Failed to run the custom query");
    assert_eq!(rows.len(), 2);
    assert_eq!(&*rows[0].labels, ["id", "body", "pinned"]);
    let mut note = Note::default();
    materialize(rows[1].clone(), &mut note).expect("Failed to materialize the row");
    assert_eq!(
        note,
        Note {
            id: 2,
            body: "second".into(),
            pinned: false,
        }
    );

    let result = connector
        .custom_mutate(
            connection,
            r#"UPDATE "notes" SET "pinned" = $1"#,
            vec![Value::from(true)],
        )
        .await
        .expect("Failed to update with custom SQL");
    assert_eq!(result.rows_affected, 2);

    // Execution errors keep the driver message in the chain
    let result = silent_logs! {
        connector
            .custom_query(connection, "SELECT * FROM \"no_such_table\"", Vec::new())
            .await
    };
    let error = result.expect_err("Querying a missing table must fail");
    assert_eq!(error_kind(&error), Some(ErrorKind::Execution));
    assert!(format!("{:#}", error).contains("no_such_table"));
}
