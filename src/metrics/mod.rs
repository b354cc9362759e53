use prometheus::{Counter, Histogram};

use crate::metrics::handler::{counter, histogram_fast_ops, histogram_slow_ops};
pub mod handler;

lazy_static::lazy_static!(
    pub static ref ACCOUNTS_CREATED_TOTAL: Counter =
        counter("accounts_created_total", "Total number of accounts opened");

    pub static ref TRANSACTIONS_PROCESSED_TOTAL: Counter =
        counter("transactions_processed_total", "Total number of successful mutating operations");

    pub static ref TRANSACTIONS_FAILED_TOTAL: Counter =
        counter("transactions_failed_total", "Total number of rejected operations");


    pub static ref OPEN_ACCOUNT_TIME_SECONDS: Histogram =
        histogram_fast_ops("open_account_time_seconds", "Total time spent opening accounts in seconds");

    pub static ref GET_ACCOUNT_TIME_SECONDS: Histogram =
        histogram_fast_ops("get_account_time_seconds", "Total time spent reading account snapshots in seconds");

    pub static ref TOP_UP_TIME_SECONDS: Histogram =
        histogram_fast_ops("top_up_time_seconds", "Total time spent crediting accounts in seconds");

    pub static ref TRANSFER_TIME_SECONDS: Histogram =
        histogram_slow_ops("transfer_time_seconds", "Total time spent transferring funds in seconds");
);
