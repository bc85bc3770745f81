use crate::silent_logs;
use quarry::{Connection, Connector, Entity, QueryConfig, Transaction};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("ledger")]
struct Entry {
    #[column("id,pk")]
    id: i64,
    #[column("amount")]
    amount: i64,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn transactions<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    connector
        .drop_table::<Entry>(&mut transaction, false)
        .await
        .expect("Failed to drop Entry table");
    connector
        .create_table::<Entry>(&mut transaction)
        .await
        .expect("Failed to create Entry table");
    transaction
        .commit()
        .await
        .expect("Failed to commit the transaction");

    // Committed
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    for (id, amount) in [(1, 100), (2, -40)] {
        connector
            .insert(&mut transaction, &Entry { id, amount })
            .await
            .expect("Failed to insert an entry");
    }
    let entries = connector
        .find_all::<Entry>(&mut transaction, &QueryConfig::new())
        .await
        .expect("Failed to read inside the transaction");
    assert_eq!(entries.len(), 2);
    transaction
        .commit()
        .await
        .expect("Failed to commit the transaction");

    // Rolled back
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    connector
        .insert(&mut transaction, &Entry { id: 3, amount: 7 })
        .await
        .expect("Failed to insert an entry");
    connector
        .delete_by_id::<Entry>(&mut transaction, 1)
        .await
        .expect("Failed to delete an entry");
    transaction
        .rollback()
        .await
        .expect("Failed to rollback the transaction");

    // Dropped without a decision, also rolled back
    {
        let mut transaction = connection
            .begin()
            .await
            .expect("Could not begin a transaction");
        connector
            .insert(&mut transaction, &Entry { id: 4, amount: 1 })
            .await
            .expect("Failed to insert an entry");
        silent_logs! {
            drop(transaction)
        };
    }

    let entries = connector
        .find_all::<Entry>(connection, &QueryConfig::new().order_by("id"))
        .await
        .expect("Failed to read the entries");
    assert_eq!(
        entries,
        vec![Entry { id: 1, amount: 100 }, Entry { id: 2, amount: -40 }]
    );
}
