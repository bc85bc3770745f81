use crate::{
    Driver, Query, QueryResult, Result, RowLabeled, RowsAffected, Statement,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

/// Anything statements can run on: a connection or a transaction.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// General method to send any query and return any result type (either row or count)
    fn run(&mut self, query: Query<Self::Driver>) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: Query<Self::Driver>) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: Query<Self::Driver>) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }

    /// Prepare the statement text and bind its arguments in order.
    fn prepare_statement(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send {
        async move {
            let Statement { sql, args } = statement;
            let mut query = self.prepare(sql).await?;
            query.bind_all(args)?;
            Ok(query)
        }
    }
}
