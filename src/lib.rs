use {
    crate::{
        client::{EtherscanClient, HttpTransport, cache::TransferCache, error::ClientError},
        config::TxtraceConfig,
        search::Search,
    },
    std::{sync::Arc, time::Duration},
};

pub mod client;
pub mod config;
pub mod logging;
pub mod macros;
pub mod metrics;
pub mod models;
pub mod search;

/// Wires configuration, transport, cache and search together. Owns the
/// client for the process lifetime so repeated searches share one cache.
pub struct Tracer {
    pub config: TxtraceConfig,
    client: Arc<EtherscanClient<HttpTransport>>,
}

impl Tracer {
    pub fn new(config: TxtraceConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.etherscan)?;
        let cache = TransferCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        );
        let client = Arc::new(EtherscanClient::new(transport, cache, &config.etherscan));

        Ok(Tracer { config, client })
    }

    /// `true` iff a transfer path from `source` reaches `target` within the
    /// configured depth bound. Malformed input logs an error and yields
    /// `false` without touching the network.
    pub async fn find_connection(&self, source: &str, target: &str) -> bool {
        Search::new(Arc::clone(&self.client), &self.config.search)
            .find_connection(source, target)
            .await
    }
}
