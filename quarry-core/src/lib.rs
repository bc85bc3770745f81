mod annotation;
mod as_value;
mod column;
mod condition;
mod config;
mod connection;
mod connector;
mod driver;
mod entity;
mod error;
mod executor;
mod join;
mod materialize;
mod params;
mod prepared;
mod query;
mod query_config;
mod schema;
mod statement;
mod transaction;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context;
pub use annotation::*;
pub use as_value::*;
pub use column::*;
pub use condition::*;
pub use config::*;
pub use connection::*;
pub use connector::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use join::*;
pub use materialize::*;
pub use params::*;
pub use prepared::*;
pub use query::*;
pub use query_config::*;
pub use schema::*;
pub use statement::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
