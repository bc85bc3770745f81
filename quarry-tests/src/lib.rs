mod conditions;
mod constraints;
mod custom;
mod joins;
mod migration;
mod mutations;
mod pagination;
mod simple;
mod transactions;

use crate::{
    conditions::conditions, constraints::constraints, custom::custom, joins::joins,
    migration::migration, mutations::mutations, pagination::pagination, simple::simple,
};
use log::LevelFilter;
use quarry::Connection;
use std::env;
#[cfg(not(feature = "disable-transactions"))]
use transactions::transactions;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(mut connection: C) {
    simple(&mut connection).await;
    pagination(&mut connection).await;
    mutations(&mut connection).await;
    conditions(&mut connection).await;
    custom(&mut connection).await;
    joins(&mut connection).await;
    constraints(&mut connection).await;
    migration(&mut connection).await;
    #[cfg(not(feature = "disable-transactions"))]
    transactions(&mut connection).await;
}

/// Run `code` with logging turned off, for scenarios expected to fail. Evaluates to the value of `code`.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
