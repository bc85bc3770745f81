use crate::silent_logs;
use quarry::{Connection, Connector, Entity, ErrorKind, QueryConfig, error_kind};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("articles")]
struct Article {
    #[column("id,pk")]
    id: i64,
    #[column("title,length(120)")]
    title: String,
    #[column("views")]
    views: i32,
}
static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn ids(articles: &[Article]) -> Vec<i64> {
    articles.iter().map(|a| a.id).collect()
}

pub async fn pagination<C: Connection>(connection: &mut C) {
    let _lock = MUTEX.lock().await;
    let connector = Connector::default();

    // Setup
    connector
        .drop_table::<Article>(connection, false)
        .await
        .expect("Failed to drop Article table");
    connector
        .create_table::<Article>(connection)
        .await
        .expect("Failed to create Article table");
    for i in 1..=15 {
        connector
            .insert(
                connection,
                &Article {
                    id: i,
                    title: format!("test{}", i),
                    views: i as i32 * 10,
                },
            )
            .await
            .expect("Failed to insert an article");
    }

    // Without a limit every row is returned
    let articles = connector
        .find_all::<Article>(connection, &QueryConfig::new().order_by("id"))
        .await
        .expect("Failed to list the articles");
    assert_eq!(articles.len(), 15);

    // Pagination without a limit falls back to the default page size
    let articles = connector
        .find_all::<Article>(connection, &QueryConfig::new().order_by("id").paginate(true))
        .await
        .expect("Failed to read the first page");
    assert_eq!(ids(&articles), (1..=10).collect::<Vec<_>>());

    // Consecutive pages are disjoint
    let mut pages = Vec::new();
    for offset in [0, 5] {
        let page = connector
            .find_all::<Article>(
                connection,
                &QueryConfig::new().order_by("id").limit(5).offset(offset),
            )
            .await
            .expect("Failed to read a page");
        assert_eq!(page.len(), 5);
        pages.extend(ids(&page));
    }
    assert_eq!(pages, (1..=10).collect::<Vec<_>>());

    let articles = connector
        .find_all::<Article>(
            connection,
            &QueryConfig::new().order_by("id").limit(5).offset(10),
        )
        .await
        .expect("Failed to read the last page");
    assert_eq!(ids(&articles), vec![11, 12, 13, 14, 15]);

    // Offset alone
    let articles = connector
        .find_all::<Article>(connection, &QueryConfig::new().order_by("id").offset(12))
        .await
        .expect("Failed to skip the first rows");
    assert_eq!(ids(&articles), vec![13, 14, 15]);

    // Request parameters
    let config = QueryConfig::from_query_string("?limit=3&order_by=views&order=desc")
        .expect("Valid parameters must be accepted");
    let articles = connector
        .find_all::<Article>(connection, &config)
        .await
        .expect("Failed to read with request parameters");
    assert_eq!(
        articles.iter().map(|a| a.views).collect::<Vec<_>>(),
        vec![150, 140, 130]
    );

    // Search matches test5 and test15
    let config = QueryConfig::new().order_by("id").search(["title"], "test5");
    let articles = connector
        .find_all::<Article>(connection, &config)
        .await
        .expect("Failed to search the articles");
    assert_eq!(ids(&articles), vec![5, 15]);

    // Search text from the request, fields from the caller
    let mut config = QueryConfig::new().order_by("id").search(["title"], "");
    config
        .apply_query_string("search=test1&limit=4")
        .expect("Valid parameters must be accepted");
    let articles = connector
        .find_all::<Article>(connection, &config)
        .await
        .expect("Failed to search with request parameters");
    assert_eq!(ids(&articles), vec![1, 10, 11, 12]);

    // Projection, the other fields keep their defaults
    let articles = connector
        .find_all::<Article>(
            connection,
            &QueryConfig::new()
                .fields(["id", "title"])
                .order_by("id")
                .limit(1),
        )
        .await
        .expect("Failed to read a projection");
    assert_eq!(
        articles,
        vec![Article {
            id: 1,
            title: "test1".into(),
            views: 0,
        }]
    );

    // Malformed parameters are rejected before anything runs
    let mut config = QueryConfig::new();
    let error = config
        .apply_query_string("limit=abc")
        .expect_err("A non numeric limit must be rejected");
    assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild));
    assert_eq!(config, QueryConfig::new());
    let result = silent_logs! {
        connector
            .find_all::<Article>(connection, &QueryConfig::new().order_by("views; DROP TABLE articles"))
            .await
    };
    assert_eq!(
        error_kind(&result.expect_err("A malformed order field must be rejected")),
        Some(ErrorKind::QueryBuild)
    );
}
