use {
    clap::Parser,
    tracing::error,
    txtrace::{Tracer, config::TxtraceConfig, logging::init_logging},
};

#[derive(Parser)]
#[command(version, about = "Depth-bounded reachability check between two ledger accounts")]
struct Cli {
    /// Account the search starts from.
    source: String,
    /// Account the search is looking for.
    target: String,
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Overrides [search].max_depth from the config file.
    #[arg(long)]
    max_depth: Option<u32>,
    /// Overrides [search].concurrency from the config file.
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match TxtraceConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config file: {e}");
            std::process::exit(2);
        }
    };

    if let Some(max_depth) = cli.max_depth {
        config.search.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.search.concurrency = concurrency;
    }

    if let Err(e) = init_logging(config.debug) {
        eprintln!("Error: failed to initialize logging: {e}");
    }

    let tracer = match Tracer::new(config) {
        Ok(tracer) => tracer,
        Err(e) => {
            error!("Failed to initialize: {e}");
            std::process::exit(2);
        }
    };

    if tracer.find_connection(&cli.source, &cli.target).await {
        println!("Connection found: {} reaches {}", cli.source, cli.target);
    } else {
        println!("No connection found within the depth bound.");
        std::process::exit(1);
    }
}
