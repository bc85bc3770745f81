use crate::{Executor, Result};
use std::future::Future;

/// An open transaction, dropping it without committing rolls it back.
pub trait Transaction<'c>: Executor {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}
