use crate::{Driver, Error, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// A statement ready to be executed by an [`crate::Executor`].
///
/// Either raw SQL text or a driver prepared handle carrying its bound arguments.
pub enum Query<D: Driver> {
    /// Unprepared SQL text.
    Raw(String),
    /// Driver prepared handle.
    Prepared(D::Prepared),
}

impl<D: Driver> Query<D> {
    /// Bind `args` to the placeholders in order, after any value already bound.
    ///
    /// Raw text has no placeholders to bind, it only accepts an empty list.
    pub fn bind_all(&mut self, args: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        let mut args = args.into_iter().peekable();
        let Self::Prepared(prepared) = self else {
            if args.peek().is_some() {
                return Err(Error::msg("Cannot bind arguments to a raw query"));
            }
            return Ok(self);
        };
        for arg in args {
            let index = prepared.bound();
            prepared.bind_value(arg, index)?;
        }
        Ok(self)
    }
}

impl<D: Driver> Display for Query<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(query) => f.write_str(&truncate_long!(query)),
            Query::Prepared(query) => query.fmt(f),
        }
    }
}

/// Outcome of a modifying statement (INSERT/UPDATE/DELETE/DDL).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted identifier when available.
    pub last_affected_id: Option<i64>,
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its column labels, in result order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Items emitted by `Executor::run`, rows and modify results mixed.
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}
