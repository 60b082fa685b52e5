use {
    crate::{client::error::TransportError, models::Address},
    std::{future::Future, time::Duration},
};

/// One raw reply from the remote index, before classification.
pub struct ApiReply {
    pub body: String,
    /// Parsed `Retry-After` header, when the reply carried one. Overrides the
    /// computed backoff for that attempt.
    pub retry_after: Option<Duration>,
}

/// Seam between the paging/retry logic and the actual HTTP stack, so tests
/// can script replies without a network.
pub trait TxListTransport: Send + Sync {
    fn tx_list_page(
        &self,
        account: &Address,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<ApiReply, TransportError>> + Send;
}
