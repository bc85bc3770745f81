use crate::{DEFAULT_LIMIT, prefixed_table_name};
use std::env;

/// Environment variable read by [`ConnectorConfig::from_env`].
pub const TABLE_PREFIX_ENV: &str = "QUARRY_TABLE_PREFIX";

/// Settings shared by every operation of a [`crate::Connector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Prepended verbatim to every table name, empty means no prefix.
    pub table_prefix: String,
    /// Page size of paginated reads without an explicit limit.
    pub default_limit: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl ConnectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the prefix taken from `QUARRY_TABLE_PREFIX` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(prefix) = env::var(TABLE_PREFIX_ENV) {
            log::debug!("Using table prefix `{}` from {}", prefix, TABLE_PREFIX_ENV);
            config.table_prefix = prefix;
        }
        config
    }

    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn table_name(&self, name: &str) -> String {
        prefixed_table_name(&self.table_prefix, name)
    }
}
