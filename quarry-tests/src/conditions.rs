use crate::silent_logs;
use quarry::{Condition, Connection, Connector, Entity, ErrorKind, QueryConfig, error_kind};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("fruits")]
struct Fruit {
    #[column("id,pk")]
    id: i64,
    #[column("name")]
    name: String,
    #[column("color")]
    color: Option<String>,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

async fn names<C: Connection>(
    connector: &Connector,
    connection: &mut C,
    conditions: Vec<Condition>,
) -> Vec<String> {
    connector
        .find_all::<Fruit>(
            connection,
            &QueryConfig::new().filters(conditions).order_by("id"),
        )
        .await
        .expect("Failed to filter the fruits")
        .into_iter()
        .map(|f| f.name)
        .collect()
}

pub async fn conditions<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Fruit>(connection, false)
        .await
        .expect("Failed to drop Fruit table");
    connector
        .create_table::<Fruit>(connection)
        .await
        .expect("Failed to create Fruit table");
    let fruits = [
        (1, "apple", Some("red")),
        (2, "banana", Some("yellow")),
        (3, "cherry", Some("red")),
        (4, "durian", None),
    ];
    for (id, name, color) in fruits {
        connector
            .insert(
                connection,
                &Fruit {
                    id,
                    name: name.into(),
                    color: color.map(Into::into),
                },
            )
            .await
            .expect("Failed to insert a fruit");
    }

    assert_eq!(
        names(&connector, connection, vec![Condition::equal("color", "red")]).await,
        ["apple", "cherry"]
    );
    assert_eq!(
        names(&connector, connection, vec![Condition::not_equal("name", "apple")]).await,
        ["banana", "cherry", "durian"]
    );
    assert_eq!(
        names(
            &connector,
            connection,
            vec![
                Condition::greater_equal("id", 2),
                Condition::less("id", 4)
            ]
        )
        .await,
        ["banana", "cherry"]
    );
    assert_eq!(
        names(&connector, connection, vec![Condition::new("id", ">", 3)]).await,
        ["durian"]
    );

    // Lists
    assert_eq!(
        names(
            &connector,
            connection,
            vec![Condition::is_in("name", ["apple", "cherry"].map(String::from))]
        )
        .await,
        ["apple", "cherry"]
    );
    assert_eq!(
        names(
            &connector,
            connection,
            vec![Condition::not_in("id", [1_i64, 2])]
        )
        .await,
        ["cherry", "durian"]
    );
    assert!(
        names(
            &connector,
            connection,
            vec![Condition::is_in("name", Vec::<String>::new())]
        )
        .await
        .is_empty()
    );
    assert_eq!(
        names(
            &connector,
            connection,
            vec![Condition::not_in("name", Vec::<String>::new())]
        )
        .await
        .len(),
        4
    );

    // Substring match
    assert_eq!(
        names(&connector, connection, vec![Condition::like("name", "an")]).await,
        ["banana", "durian"]
    );
    assert_eq!(
        names(&connector, connection, vec![Condition::not_like("name", "an")]).await,
        ["apple", "cherry"]
    );

    // Rejected before reaching the database
    let invalid = [
        Condition::new("name", "; DROP", "apple"),
        Condition::equal("name; DROP TABLE fruits", "apple"),
        Condition::new("id", "IN", 1),
        Condition::like("name", 5),
    ];
    for condition in invalid {
        let result = silent_logs! {
            connector
                .find_all::<Fruit>(connection, &QueryConfig::new().filter(condition.clone()))
                .await
        };
        let error = result.expect_err("An invalid condition must be rejected");
        assert_eq!(
            error_kind(&error),
            Some(ErrorKind::QueryBuild),
            "Unexpected error for {:?}: {:#}",
            condition,
            error
        );
    }
}
