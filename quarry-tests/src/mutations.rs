use quarry::{Condition, Connection, Connector, Entity, Lookup, QueryConfig};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("counters")]
struct Counter {
    #[column("id,pk")]
    id: i64,
    #[column("label")]
    label: String,
    #[column("value")]
    value: i64,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn mutations<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Counter>(connection, false)
        .await
        .expect("Failed to drop Counter table");
    connector
        .create_table::<Counter>(connection)
        .await
        .expect("Failed to create Counter table");
    let counters = [
        (1, "alpha", 5),
        (2, "beta", 15),
        (3, "gamma", 25),
        (4, "delta", 35),
    ];
    for (id, label, value) in counters {
        let result = connector
            .insert(
                connection,
                &Counter {
                    id,
                    label: label.into(),
                    value,
                },
            )
            .await
            .expect("Failed to insert a counter");
        assert_eq!(result.rows_affected, 1);
    }

    // Update by primary key
    let updated = connector
        .update(
            connection,
            &Counter {
                id: 2,
                label: "beta".into(),
                value: 16,
            },
            Vec::new(),
        )
        .await
        .expect("Failed to update by primary key");
    assert_eq!(updated, 1);
    let mut counter = Counter::default();
    assert!(
        connector
            .find_first(connection, &mut counter, Lookup::PrimaryKey(2.into()))
            .await
            .expect("Failed to read the updated counter")
    );
    assert_eq!(counter.value, 16);

    // Same values, the row still counts as affected
    let updated = connector
        .update(
            connection,
            &Counter {
                id: 2,
                label: "beta".into(),
                value: 16,
            },
            Vec::new(),
        )
        .await
        .expect("Failed to repeat the update");
    assert_eq!(updated, 1);

    // Missing row
    let updated = connector
        .update(
            connection,
            &Counter {
                id: 42,
                label: "nobody".into(),
                value: 0,
            },
            Vec::new(),
        )
        .await
        .expect("Updating a missing row should not fail");
    assert_eq!(updated, 0);

    // Explicit conditions replace the primary key
    let updated = connector
        .update(
            connection,
            &Counter {
                id: 0,
                label: "big".into(),
                value: 100,
            },
            vec![Condition::greater("value", 20)],
        )
        .await
        .expect("Failed to update by condition");
    assert_eq!(updated, 2);
    let big = connector
        .find_all::<Counter>(
            connection,
            &QueryConfig::new()
                .filter(Condition::equal("label", "big"))
                .order_by("id"),
        )
        .await
        .expect("Failed to read the updated counters");
    assert_eq!(big.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 4]);

    // Delete
    let deleted = connector
        .delete::<Counter>(connection, vec![Condition::less("value", 10)])
        .await
        .expect("Failed to delete by condition");
    assert_eq!(deleted, 1);
    let deleted = connector
        .delete_by_id::<Counter>(connection, 2)
        .await
        .expect("Failed to delete by id");
    assert_eq!(deleted, 1);
    let deleted = connector
        .delete_by_id::<Counter>(connection, 2)
        .await
        .expect("Deleting a missing row should not fail");
    assert_eq!(deleted, 0);

    // No condition deletes everything
    let deleted = connector
        .delete::<Counter>(connection, Vec::new())
        .await
        .expect("Failed to delete every counter");
    assert_eq!(deleted, 2);
    let remaining = connector
        .find_all::<Counter>(connection, &QueryConfig::new())
        .await
        .expect("Failed to list the counters");
    assert!(remaining.is_empty());
}
