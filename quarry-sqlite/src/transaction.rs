use crate::{SqliteConnection, SqliteDriver};
use libsqlite3_sys::sqlite3_exec;
use quarry_core::{
    Driver, Executor, Query, QueryResult, Result, SqlWriter, Transaction, stream::Stream,
};
use std::{future::Future, ptr};

/// Transaction borrowing its connection, rolled back when dropped unfinished.
pub struct SqliteTransaction<'c> {
    connection: &'c mut SqliteConnection,
    finished: bool,
}

impl<'c> SqliteTransaction<'c> {
    pub async fn new(connection: &'c mut SqliteConnection) -> Result<Self> {
        let mut sql = String::new();
        connection
            .driver()
            .sql_writer()
            .write_transaction_begin(&mut sql);
        connection.execute(Query::Raw(sql)).await?;
        Ok(Self {
            connection,
            finished: false,
        })
    }
}

impl<'c> Executor for SqliteTransaction<'c> {
    type Driver = SqliteDriver;

    fn driver(&self) -> &SqliteDriver {
        self.connection.driver()
    }

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<SqliteDriver>>> + Send {
        self.connection.prepare(query)
    }

    fn run(&mut self, query: Query<SqliteDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.connection.run(query)
    }
}

impl<'c> Transaction<'c> for SqliteTransaction<'c> {
    async fn commit(mut self) -> Result<()> {
        let mut sql = String::new();
        self.driver()
            .sql_writer()
            .write_transaction_commit(&mut sql);
        self.connection.execute(Query::Raw(sql)).await?;
        self.finished = true;
        Ok(())
    }

    async fn rollback(mut self) -> Result<()> {
        let mut sql = String::new();
        self.driver()
            .sql_writer()
            .write_transaction_rollback(&mut sql);
        self.connection.execute(Query::Raw(sql)).await?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!("Transaction dropped before commit or rollback, rolling back");
        unsafe {
            sqlite3_exec(
                *self.connection.connection,
                c"ROLLBACK;".as_ptr(),
                None,
                ptr::null_mut(),
                ptr::null_mut(),
            );
        }
    }
}
