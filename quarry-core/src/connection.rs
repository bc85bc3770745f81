use crate::{Driver, Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection to `url`, the scheme is the driver name.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Start a transaction, it borrows the connection until committed or rolled back.
    fn begin(
        &mut self,
    ) -> impl Future<Output = Result<<Self::Driver as Driver>::Transaction<'_>>> + Send;
}
