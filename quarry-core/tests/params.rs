#[cfg(test)]
mod tests {
    use quarry_core::{ErrorKind, OrmError, QueryConfig, QueryParams, error_kind, orm_error};

    #[test]
    fn parse() {
        let params = QueryParams::parse("?limit=5&search=big%20box&limit=7&name=a+b");
        assert_eq!(params.get("limit"), Some("7"));
        assert_eq!(params.get("search"), Some("big box"));
        assert_eq!(params.get("name"), Some("a b"));
        assert_eq!(params.get("offset"), None);
        assert_eq!(QueryParams::parse(""), QueryParams::default());
    }

    #[test]
    fn from_query_string() {
        let config = QueryConfig::from_query_string(
            "limit=5&offset=20&order_by=name&order=DESC&search=box&tracking=abc",
        )
        .expect("Valid parameters");
        assert_eq!(config.limit, 5);
        assert_eq!(config.offset, 20);
        assert_eq!(config.order_by.as_deref(), Some("name"));
        assert!(config.descending);
        assert!(config.allow_search);
        assert_eq!(config.search_text, "box");
        // No search fields, nothing to search on
        assert_eq!(config.search_clause(), None);

        let config = QueryConfig::from_query_string("?orderBy=items.price&descending=yes")
            .expect("Valid parameters");
        assert_eq!(config.order_by.as_deref(), Some("items.price"));
        assert!(config.descending);

        // Empty values count as missing
        let config = QueryConfig::from_query_string("limit=&offset=3&order=")
            .expect("Valid parameters");
        assert_eq!(config.limit, 0);
        assert_eq!(config.offset, 3);
        assert!(!config.descending);
    }

    #[test]
    fn apply_to_existing() {
        let mut config = QueryConfig::new()
            .fields(["id", "name"])
            .search(["name"], "")
            .limit(50);
        config
            .apply_query_string("search=lamp&order_by=name")
            .expect("Valid parameters");
        assert_eq!(config.limit, 50);
        let search = config.search_clause().expect("Active search");
        assert_eq!(search.text, "lamp");
        assert_eq!(search.fields, ["name"]);

        let params = [("limit", "4"), ("order", "asc")]
            .into_iter()
            .collect::<QueryParams>();
        params.apply(&mut config).expect("Valid parameters");
        assert_eq!(config.limit, 4);
        assert!(!config.descending);
    }

    #[test]
    fn malformed() {
        for query in [
            "limit=-1",
            "offset=ten",
            "order=up",
            "descending=maybe",
            "order_by=name;DROP",
            "order_by=1",
        ] {
            let error = QueryConfig::from_query_string(query)
                .expect_err(&format!("`{query}` must be rejected"));
            assert_eq!(error_kind(&error), Some(ErrorKind::QueryBuild), "{query}");
            assert!(
                matches!(orm_error(&error), Some(OrmError::InvalidParameter { .. })),
                "{query}"
            );
        }
    }

    #[test]
    fn failure_leaves_config_unchanged() {
        let mut config = QueryConfig::new().fields(["id", "name"]).limit(7);
        let before = config.clone();
        assert!(config.apply_query_string("offset=2&limit=x").is_err());
        assert_eq!(config, before);
        // Ordering must stay within the projection
        assert!(config.apply_query_string("offset=2&order_by=email").is_err());
        assert_eq!(config, before);
    }
}
