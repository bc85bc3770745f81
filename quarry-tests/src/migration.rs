use quarry::{Connection, Connector, ConnectorConfig, Entity, Lookup, QueryConfig};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("evolving")]
struct EvolvingV1 {
    #[column("id,pk")]
    id: i64,
    #[column("name")]
    name: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("evolving")]
struct EvolvingV2 {
    #[column("id,pk")]
    id: i64,
    #[column("name")]
    name: String,
    #[column("nickname")]
    nickname: Option<String>,
    #[column("score")]
    score: Option<f64>,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn migration<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<EvolvingV1>(connection, false)
        .await
        .expect("Failed to drop Evolving table");

    // A missing table is created
    let executed = connector
        .migrate_table::<EvolvingV1>(connection)
        .await
        .expect("Failed to migrate a missing table");
    assert_eq!(executed, 1);
    connector
        .insert(
            connection,
            &EvolvingV1 {
                id: 1,
                name: "before".into(),
            },
        )
        .await
        .expect("Failed to insert with the first version");

    // New columns are added, existing rows read them as null
    let executed = connector
        .migrate_table::<EvolvingV2>(connection)
        .await
        .expect("Failed to add the new columns");
    assert_eq!(executed, 2);
    let mut row = EvolvingV2::default();
    assert!(
        connector
            .find_first(connection, &mut row, Lookup::PrimaryKey(1.into()))
            .await
            .expect("Failed to read a migrated row")
    );
    assert_eq!(
        row,
        EvolvingV2 {
            id: 1,
            name: "before".into(),
            nickname: None,
            score: None,
        }
    );
    connector
        .insert(
            connection,
            &EvolvingV2 {
                id: 2,
                name: "after".into(),
                nickname: Some("later".into()),
                score: Some(9.5),
            },
        )
        .await
        .expect("Failed to insert with the second version");

    // Nothing left to do
    let executed = connector
        .migrate_table::<EvolvingV2>(connection)
        .await
        .expect("Failed to migrate an up to date table");
    assert_eq!(executed, 0);

    // The older version still reads the table, ignoring the new columns
    let rows = connector
        .find_all::<EvolvingV1>(connection, &QueryConfig::new().order_by("id"))
        .await
        .expect("Failed to read with the first version");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "after");

    // Prefixed tables
    let prefixed = Connector::new(ConnectorConfig::new().table_prefix("v2_"));
    assert_eq!(prefixed.table_name::<EvolvingV2>(), "v2_evolving");
    prefixed
        .drop_table::<EvolvingV2>(connection, false)
        .await
        .expect("Failed to drop the prefixed table");
    let executed = prefixed
        .migrate_table::<EvolvingV2>(connection)
        .await
        .expect("Failed to create the prefixed table");
    assert_eq!(executed, 1);
    let rows = prefixed
        .custom_query(connection, r#"SELECT * FROM "v2_evolving""#, Vec::new())
        .await
        .expect("The prefixed table must exist");
    assert!(rows.is_empty());
}
