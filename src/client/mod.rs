//! Ledger client: turns the paginated, rate-limited remote index into a
//! dependable "list all outgoing transfers of an account" call.

pub mod cache;
pub mod error;
pub mod interface;

use {
    crate::{
        client::{
            cache::TransferCache,
            error::{ClientError, PageAbandoned, TransportError},
            interface::{ApiReply, TxListTransport},
        },
        config::EtherscanConfig,
        metrics,
        models::{Address, Transfer},
    },
    rand::Rng,
    serde::Deserialize,
    std::{collections::HashSet, sync::Arc, time::Duration},
    tracing::{debug, error, info, warn},
};

// Statuses worth an immediate re-issue before the application layer gets
// involved. The remote signals real rate limiting in the body, not here.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Production transport: one GET against the `txlist` endpoint per page, with
/// a bounded number of immediate re-issues on retryable statuses (no sleep,
/// absorbs connection-level hiccups only).
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    transport_retries: u32,
}

impl HttpTransport {
    pub fn new(config: &EtherscanConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(HttpTransport {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            transport_retries: config.transport_retries,
        })
    }

    async fn send_once(
        &self,
        account: &Address,
        page: usize,
        page_size: usize,
    ) -> Result<reqwest::Response, TransportError> {
        let page_param = page.to_string();
        let offset_param = page_size.to_string();

        self.http
            .get(&self.base_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", account.as_str()),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("page", page_param.as_str()),
                ("offset", offset_param.as_str()),
                ("sort", "asc"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })
    }
}

impl TxListTransport for HttpTransport {
    async fn tx_list_page(
        &self,
        account: &Address,
        page: usize,
        page_size: usize,
    ) -> Result<ApiReply, TransportError> {
        let mut last_retryable = None;

        for _ in 0..=self.transport_retries {
            let response = self.send_once(account, page, page_size).await?;

            let status = response.status().as_u16();
            let retry_after = parse_retry_after(&response);

            if RETRYABLE_STATUSES.contains(&status) {
                last_retryable = Some((status, retry_after));
                continue;
            }
            if !response.status().is_success() {
                return Err(TransportError::Status {
                    status,
                    retry_after,
                });
            }

            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            return Ok(ApiReply { body, retry_after });
        }

        let (status, retry_after) = last_retryable.unwrap_or((0, None));
        Err(TransportError::Status {
            status,
            retry_after,
        })
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    let seconds = response
        .headers()
        .get("retry-after")?
        .to_str()
        .ok()?
        .parse()
        .ok()?;
    Some(Duration::from_secs(seconds))
}

#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// What one remote reply means for the paging loop. Every reply maps to
/// exactly one of these.
#[derive(Debug)]
enum PageOutcome {
    Transfers(Vec<Transfer>),
    Empty,
    RateLimited,
    Unexpected(String),
}

fn classify(body: &str) -> PageOutcome {
    let response: TxListResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return PageOutcome::Unexpected(format!("malformed body: {e}")),
    };

    if response.status == "1" {
        return match serde_json::from_value::<Vec<Transfer>>(response.result) {
            Ok(transfers) if transfers.is_empty() => PageOutcome::Empty,
            Ok(transfers) => PageOutcome::Transfers(transfers),
            Err(e) => PageOutcome::Unexpected(format!("non-list result: {e}")),
        };
    }

    // The remote signals rate limiting at the message level, sometimes in the
    // message field and sometimes in a string-typed result.
    let message = response.message.to_lowercase();
    let result_text = response
        .result
        .as_str()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if message.contains("no transactions") {
        return PageOutcome::Empty;
    }
    if [&message, &result_text]
        .iter()
        .any(|text| text.contains("rate limit") || text.contains("too many requests"))
    {
        return PageOutcome::RateLimited;
    }

    PageOutcome::Unexpected(format!(
        "unrecognized reply: status={:?} message={:?}",
        response.status, response.message
    ))
}

fn backoff_delay(base: f64, cap: Duration, attempt: u32) -> Duration {
    let jitter: f64 = rand::rng().random_range(0.0..1.0);
    Duration::from_secs_f64(base.powi(attempt as i32) + jitter).min(cap)
}

/// Cached, retrying view of the remote index. Fetches never fail from the
/// caller's perspective: on retry exhaustion the transfers accumulated from
/// completed pages are returned and the terminal condition is logged.
pub struct EtherscanClient<T: TxListTransport> {
    transport: T,
    cache: TransferCache,
    max_attempts: u32,
    backoff_base: f64,
    backoff_cap: Duration,
    page_size: usize,
}

impl<T: TxListTransport> EtherscanClient<T> {
    pub fn new(transport: T, cache: TransferCache, config: &EtherscanConfig) -> Self {
        EtherscanClient {
            transport,
            cache,
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
            backoff_cap: Duration::from_secs(config.backoff_cap_secs),
            page_size: config.page_size,
        }
    }

    /// Complete, deduplicated, block-ascending list of transfers whose source
    /// is `account`. Cache hits skip the network entirely; only complete
    /// fetches are cached.
    pub async fn fetch_outgoing_transfers(&self, account: &Address) -> Arc<Vec<Transfer>> {
        if let Some(transfers) = self.cache.get(account) {
            metrics::CACHE_HITS_TOTAL.inc();
            debug!("Cache hit for {account} ({} transfers)", transfers.len());
            return transfers;
        }

        metrics::FETCHES_TOTAL.inc();
        crate::measure!(metrics::FETCH_TIME_SECONDS, {
            self.fetch_all_pages(account).await
        })
    }

    async fn fetch_all_pages(&self, account: &Address) -> Arc<Vec<Transfer>> {
        let mut transfers: Vec<Transfer> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1;

        let complete = loop {
            match self.fetch_page(account, page).await {
                Ok(batch) => {
                    let batch_len = batch.len();
                    for transfer in batch {
                        if seen.insert(transfer.hash.clone()) {
                            transfers.push(transfer);
                        }
                    }
                    // A short or empty page is the last one.
                    if batch_len < self.page_size {
                        break true;
                    }
                    page += 1;
                }
                Err(abandoned) => {
                    error!(
                        "Fetch for {account} incomplete ({abandoned}); returning {} transfers",
                        transfers.len()
                    );
                    break false;
                }
            }
        };

        let transfers = Arc::new(transfers);
        if complete {
            info!(
                "Fetched {} transfers for {account} across {page} page(s)",
                transfers.len()
            );
            self.cache.insert(account.clone(), Arc::clone(&transfers));
        }
        transfers
    }

    async fn fetch_page(
        &self,
        account: &Address,
        page: usize,
    ) -> Result<Vec<Transfer>, PageAbandoned> {
        for attempt in 0..self.max_attempts {
            let reply = crate::measure!(metrics::PAGE_REQUEST_TIME_SECONDS, {
                self.transport
                    .tx_list_page(account, page, self.page_size)
                    .await
            });

            let (delay_hint, reason) = match reply {
                Ok(reply) => {
                    let retry_after = reply.retry_after;
                    match classify(&reply.body) {
                        PageOutcome::Transfers(batch) => {
                            metrics::PAGES_FETCHED_TOTAL.inc();
                            return Ok(batch);
                        }
                        PageOutcome::Empty => {
                            metrics::PAGES_FETCHED_TOTAL.inc();
                            return Ok(Vec::new());
                        }
                        PageOutcome::RateLimited => {
                            metrics::RATE_LIMIT_RETRIES_TOTAL.inc();
                            (retry_after, "rate limited".to_string())
                        }
                        PageOutcome::Unexpected(detail) => (retry_after, detail),
                    }
                }
                Err(TransportError::Status {
                    status,
                    retry_after,
                }) => (retry_after, format!("HTTP status {status}")),
                Err(e) => (None, e.to_string()),
            };

            if attempt + 1 == self.max_attempts {
                break;
            }

            let delay = delay_hint
                .unwrap_or_else(|| backoff_delay(self.backoff_base, self.backoff_cap, attempt));
            warn!(
                "[{}/{}] {reason} for {account} page {page}; retrying in {delay:?}",
                attempt + 1,
                self.max_attempts
            );
            tokio::time::sleep(delay).await;
        }

        Err(PageAbandoned {
            page,
            attempts: self.max_attempts,
        })
    }
}
