use config::{Config, ConfigError, File, FileFormat};

#[derive(Clone, Debug, serde::Deserialize)]
pub struct TxtraceConfig {
    pub etherscan: EtherscanConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub debug: bool,
}

impl TxtraceConfig {
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::new(config_path, FileFormat::Toml));

        let config: TxtraceConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct EtherscanConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Immediate re-issues on retryable HTTP statuses, no sleep between them.
    #[serde(default = "default_transport_retries")]
    pub transport_retries: u32,
    /// Backoff-governed attempts per page, counting the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,
    #[serde(default = "default_backoff_cap_secs")]
    pub backoff_cap_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: 300,
            max_entries: 10_000,
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 3,
            concurrency: 8,
        }
    }
}

fn default_base_url() -> String {
    "https://api.etherscan.io/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_transport_retries() -> u32 {
    2
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base() -> f64 {
    2.0
}

fn default_backoff_cap_secs() -> u64 {
    30
}

// The API's native maximum page size.
fn default_page_size() -> usize {
    10_000
}
