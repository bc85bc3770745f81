use crate::silent_logs;
use quarry::{
    Condition, Connection, Connector, ConnectorConfig, Entity, ErrorKind, JoinSpec,
    QueryConfig, Value, error_kind,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("authors")]
struct Author {
    #[column("id,pk")]
    id: i64,
    #[column("name")]
    name: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("books")]
struct Book {
    #[column("id,pk")]
    id: i64,
    #[column("author_id,fk(authors:id,cascade)")]
    author_id: i64,
    #[column("title")]
    title: String,
}

/// Destination of the joined rows, it has no table of its own.
#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("book_listing")]
struct BookListing {
    #[column("title")]
    title: String,
    #[column("author")]
    author: String,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

const ON: &str = r#""authors"."id" = "books"."author_id""#;

pub async fn joins<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Book>(connection, false)
        .await
        .expect("Failed to drop Book table");
    connector
        .drop_table::<Author>(connection, false)
        .await
        .expect("Failed to drop Author table");
    connector
        .create_table::<Author>(connection)
        .await
        .expect("Failed to create Author table");
    connector
        .create_table::<Book>(connection)
        .await
        .expect("Failed to create Book table");
    for (id, name) in [(1, "Ursula"), (2, "Italo"), (3, "Nobody")] {
        connector
            .insert(
                connection,
                &Author {
                    id,
                    name: name.into(),
                },
            )
            .await
            .expect("Failed to insert an author");
    }
    for (id, author_id, title) in [
        (10, 1, "A Wizard of Earthsea"),
        (11, 1, "The Lathe of Heaven"),
        (12, 2, "Invisible Cities"),
    ] {
        connector
            .insert(
                connection,
                &Book {
                    id,
                    author_id,
                    title: title.into(),
                },
            )
            .await
            .expect("Failed to insert a book");
    }

    // Inner join drops the author without books
    let rows = connector
        .join(connection, &JoinSpec::new::<Author, Book>(ON).inner())
        .await
        .expect("Failed to run the inner join");
    assert_eq!(rows.len(), 3);
    assert!(rows[0].get_column("authors.name").is_some());
    assert!(rows[0].get_column("books.title").is_some());

    // Left join keeps it with nulls on the book side
    let rows = connector
        .join(connection, &JoinSpec::new::<Author, Book>(ON).left())
        .await
        .expect("Failed to run the left join");
    assert_eq!(rows.len(), 4);
    let lonely = rows
        .iter()
        .find(|row| row.get_column("authors.name") == Some(&Value::from("Nobody")))
        .expect("The author without books must be in a left join");
    assert_eq!(lonely.get_column("books.title"), Some(&Value::Null));

    #[cfg(not(feature = "disable-full-join"))]
    {
        let rows = connector
            .join(connection, &JoinSpec::new::<Author, Book>(ON).full())
            .await
            .expect("Failed to run the full join");
        assert_eq!(rows.len(), 4);
    }

    // Projection and filtering
    let rows = connector
        .join(
            connection,
            &JoinSpec::new::<Author, Book>(ON)
                .inner()
                .main_columns(["name"])
                .join_columns(["title"])
                .filter(Condition::equal("authors.id", 2)),
        )
        .await
        .expect("Failed to run the filtered join");
    assert_eq!(rows.len(), 1);
    assert_eq!(&*rows[0].labels, ["authors.name", "books.title"]);
    assert_eq!(
        rows[0].values[1],
        Value::Varchar(Some("Invisible Cities".into()))
    );

    // Into records, `author` comes from an explicit mapping
    let mut listing = connector
        .join_into::<BookListing>(
            connection,
            &JoinSpec::new::<Author, Book>(ON)
                .inner()
                .map_column("authors.name", "author"),
        )
        .await
        .expect("Failed to materialize the join");
    listing.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(
        listing,
        vec![
            BookListing {
                title: "A Wizard of Earthsea".into(),
                author: "Ursula".into(),
            },
            BookListing {
                title: "Invisible Cities".into(),
                author: "Italo".into(),
            },
            BookListing {
                title: "The Lathe of Heaven".into(),
                author: "Ursula".into(),
            },
        ]
    );

    // The join type is mandatory
    let result = silent_logs! {
        connector
            .join(connection, &JoinSpec::new::<Author, Book>(ON))
            .await
    };
    assert_eq!(
        error_kind(&result.expect_err("A join without a type must be rejected")),
        Some(ErrorKind::QueryBuild)
    );

    // Mapping into a field the destination does not have
    let result = silent_logs! {
        connector
            .join_into::<BookListing>(
                connection,
                &JoinSpec::new::<Author, Book>(ON)
                    .inner()
                    .map_column("authors.name", "writer"),
            )
            .await
    };
    assert_eq!(
        error_kind(&result.expect_err("A mapping to a missing field must be rejected")),
        Some(ErrorKind::Shape)
    );

    // Deleting an author cascades to the books
    let deleted = connector
        .delete_by_id::<Author>(connection, 1)
        .await
        .expect("Failed to delete an author");
    assert_eq!(deleted, 1);
    let books = connector
        .find_all::<Book>(connection, &QueryConfig::new())
        .await
        .expect("Failed to list the books");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Invisible Cities");

    // Prefixes that are not plain identifiers
    let prefixed = Connector::new(ConnectorConfig::new().table_prefix("app-"));
    prefixed
        .drop_table::<Book>(connection, false)
        .await
        .expect("Failed to drop the prefixed Book table");
    prefixed
        .drop_table::<Author>(connection, false)
        .await
        .expect("Failed to drop the prefixed Author table");
    prefixed
        .create_table::<Author>(connection)
        .await
        .expect("Failed to create the prefixed Author table");
    prefixed
        .create_table::<Book>(connection)
        .await
        .expect("Failed to create the prefixed Book table");
    prefixed
        .insert(
            connection,
            &Author {
                id: 1,
                name: "Octavia".into(),
            },
        )
        .await
        .expect("Failed to insert a prefixed author");
    prefixed
        .insert(
            connection,
            &Book {
                id: 1,
                author_id: 1,
                title: "Kindred".into(),
            },
        )
        .await
        .expect("Failed to insert a prefixed book");
    let listing = prefixed
        .join_into::<BookListing>(
            connection,
            &JoinSpec::new::<Author, Book>(r#""app-authors"."id" = "app-books"."author_id""#)
                .left()
                .map_column("authors.name", "author"),
        )
        .await
        .expect("Failed to join the prefixed tables");
    assert_eq!(
        listing,
        vec![BookListing {
            title: "Kindred".into(),
            author: "Octavia".into(),
        }]
    );
}
