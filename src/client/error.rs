use {std::time::Duration, thiserror::Error};

/// Failures at the HTTP layer, before the reply body is even looked at.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed with HTTP status {status}")]
    Status {
        status: u16,
        retry_after: Option<Duration>,
    },
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
#[error("page {page} abandoned after {attempts} attempts")]
pub struct PageAbandoned {
    pub page: usize,
    pub attempts: u32,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
