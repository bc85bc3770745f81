use crate::{OrmError, QueryConfig, Result, is_field_reference};
use std::borrow::Cow;

fn invalid(name: &str, reason: impl Into<Cow<'static, str>>) -> crate::Error {
    OrmError::InvalidParameter {
        name: name.to_string().into(),
        reason: reason.into(),
    }
    .into()
}

fn parse_count(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid(name, format!("`{}` is not a non negative integer", value)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(name, format!("`{}` is not a boolean", value))),
    }
}

impl QueryConfig {
    /// Apply request parameters.
    ///
    /// Recognized keys: `limit`, `offset`, `order_by` (or `orderBy`),
    /// `order` (`asc` or `desc`), `descending` and `search`. Empty values count
    /// as missing, unknown keys are ignored. A malformed value is rejected with
    /// an invalid parameter error and leaves the configuration unchanged.
    pub fn apply_params<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()> {
        let mut config = self.clone();
        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            if value.trim().is_empty() {
                continue;
            }
            match key {
                "limit" => config.limit = parse_count(key, value)?,
                "offset" => config.offset = parse_count(key, value)?,
                "order_by" | "orderBy" => {
                    let field = value.trim();
                    if !is_field_reference(field) {
                        return Err(invalid(key, format!("`{}` is not a column", field)));
                    }
                    if !config.fields.is_empty() && !config.fields.iter().any(|f| f == field) {
                        return Err(invalid(
                            key,
                            format!("`{}` is not one of the selected fields", field),
                        ));
                    }
                    config.order_by = Some(field.to_string().into());
                }
                "order" => {
                    config.descending = match value.trim().to_ascii_lowercase().as_str() {
                        "asc" => false,
                        "desc" => true,
                        _ => return Err(invalid(key, "expected `asc` or `desc`")),
                    }
                }
                "descending" => config.descending = parse_flag(key, value)?,
                "search" => {
                    config.search_text = value.to_string();
                    config.allow_search = true;
                }
                _ => log::trace!("Ignoring query parameter `{}`", key),
            }
        }
        *self = config;
        Ok(())
    }

    /// Apply a form encoded query string, with or without the leading `?`.
    pub fn apply_query_string(&mut self, query: &str) -> Result<()> {
        QueryParams::parse(query).apply(self)
    }

    /// Default configuration with the parameters of `query` applied.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_query_string(query)?;
        Ok(config)
    }
}

/// Query string of a listing request, decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Last value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    pub fn apply(&self, config: &mut QueryConfig) -> Result<()> {
        config.apply_params(self.pairs.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
