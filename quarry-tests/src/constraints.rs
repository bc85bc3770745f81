use crate::silent_logs;
use quarry::{Connection, Connector, Entity, ErrorKind, error_kind};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default)]
#[table_name("owners")]
struct Owner {
    #[column("id,pk")]
    id: i64,
}

#[derive(Entity, Default)]
#[table_name("broken_pets")]
struct BrokenPet {
    #[column("id,pk")]
    id: i64,
    #[column("owner_id,fk(owners:id,DROP)")]
    owner_id: i64,
}

#[derive(Entity, Default)]
#[table_name("pets")]
struct Pet {
    #[column("id,pk")]
    id: i64,
    #[column("owner_id,nullable,fk(owners:id,set null)")]
    owner_id: Option<i64>,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn constraints<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Pet>(connection, false)
        .await
        .expect("Failed to drop Pet table");
    connector
        .drop_table::<BrokenPet>(connection, false)
        .await
        .expect("Failed to drop BrokenPet table");
    connector
        .drop_table::<Owner>(connection, false)
        .await
        .expect("Failed to drop Owner table");
    connector
        .create_table::<Owner>(connection)
        .await
        .expect("Failed to create Owner table");

    // An invalid on delete action fails before any statement runs
    let result = silent_logs! {
        connector.create_table::<BrokenPet>(connection).await
    };
    assert_eq!(
        error_kind(&result.expect_err("DROP is not an on delete action")),
        Some(ErrorKind::Schema)
    );
    let result = silent_logs! {
        connector
            .custom_query(connection, r#"SELECT * FROM "broken_pets""#, Vec::new())
            .await
    };
    assert!(result.is_err(), "The broken table must not exist");

    // SET NULL detaches the dependent rows
    connector
        .create_table::<Pet>(connection)
        .await
        .expect("Failed to create Pet table");
    connector
        .insert(connection, &Owner { id: 1 })
        .await
        .expect("Failed to insert an owner");
    connector
        .insert(
            connection,
            &Pet {
                id: 1,
                owner_id: Some(1),
            },
        )
        .await
        .expect("Failed to insert a pet");
    let result = silent_logs! {
        connector
            .insert(connection, &Pet { id: 2, owner_id: Some(7) })
            .await
    };
    assert!(result.is_err(), "A pet of a missing owner must be rejected");
    connector
        .delete_by_id::<Owner>(connection, 1)
        .await
        .expect("Failed to delete the owner");
    let mut pet = Pet::default();
    assert!(
        connector
            .find_first(connection, &mut pet, quarry::Lookup::PrimaryKey(1.into()))
            .await
            .expect("Failed to read the pet")
    );
    assert_eq!(pet.owner_id, None);
}
