use prometheus::{Counter, Histogram};

use crate::metrics::handler::{counter, histogram_fast_ops, histogram_slow_ops};
pub mod handler;
lazy_static::lazy_static!(
    pub static ref FETCHES_TOTAL: Counter =
        counter("fetches_total", "Total number of per-account transfer fetches");

    pub static ref CACHE_HITS_TOTAL: Counter =
        counter("cache_hits_total", "Total number of transfer-list cache hits");

    pub static ref PAGES_FETCHED_TOTAL: Counter =
        counter("pages_fetched_total", "Total number of result pages retrieved");

    pub static ref RATE_LIMIT_RETRIES_TOTAL: Counter =
        counter("rate_limit_retries_total", "Total number of retries caused by rate limiting");

    pub static ref ACCOUNTS_EXPANDED_TOTAL: Counter =
        counter("accounts_expanded_total", "Total number of accounts expanded during searches");


    pub static ref FETCH_TIME_SECONDS: Histogram =
        histogram_slow_ops("fetch_time_seconds", "Total time spent fetching an account's transfers in seconds");

    pub static ref PAGE_REQUEST_TIME_SECONDS: Histogram =
        histogram_fast_ops("page_request_time_seconds", "Total time spent on a single page request in seconds");
);
