use crate::{Connection, Prepared, Result, SqlWriter, Transaction};
use std::future::Future;

/// A database backend: its connection, dialect writer, prepared handle and transaction types.
pub trait Driver: Send + Sync {
    type Connection: Connection;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;
    type Transaction<'c>: Transaction<'c>;

    /// URL scheme, `NAME://...`.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    fn connect(&self, url: &str) -> impl Future<Output = Result<Self::Connection>> + Send {
        Self::Connection::connect(url)
    }
}
