use crate::{Condition, Search};
use std::borrow::Cow;

/// Declarative description of a read.
///
/// `limit` and `offset` use `0` for unset. When pagination or search is
/// allowed and no limit is given, the read is capped at the connector default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConfig {
    /// Table override, used verbatim.
    pub table: Option<Cow<'static, str>>,
    /// Projection, empty selects every mapped column.
    pub fields: Vec<Cow<'static, str>>,
    pub conditions: Vec<Condition>,
    pub order_by: Option<Cow<'static, str>>,
    pub descending: bool,
    pub limit: u64,
    pub offset: u64,
    pub allow_pagination: bool,
    pub allow_search: bool,
    pub search_fields: Vec<Cow<'static, str>>,
    pub search_text: String,
    pub group_by: Vec<Cow<'static, str>>,
    pub having: Vec<Cow<'static, str>>,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<Cow<'static, str>>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn fields<F: Into<Cow<'static, str>>>(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filters(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn order_by(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn paginate(mut self, allow: bool) -> Self {
        self.allow_pagination = allow;
        self
    }

    /// Enable search over `fields` for `text`.
    pub fn search<F: Into<Cow<'static, str>>>(
        mut self,
        fields: impl IntoIterator<Item = F>,
        text: impl Into<String>,
    ) -> Self {
        self.allow_search = true;
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self.search_text = text.into();
        self
    }

    pub fn group_by(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.group_by.push(field.into());
        self
    }

    pub fn having(mut self, predicate: impl Into<Cow<'static, str>>) -> Self {
        self.having.push(predicate.into());
        self
    }

    /// The search clause, only when search is allowed and has both fields and text.
    pub fn search_clause(&self) -> Option<Search> {
        if !self.allow_search {
            return None;
        }
        let search = Search {
            fields: self.search_fields.clone(),
            text: self.search_text.clone(),
        };
        search.is_active().then_some(search)
    }
}
