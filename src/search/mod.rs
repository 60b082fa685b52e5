//! Reachability search: bounded breadth-first exploration of the transfer
//! graph, one fetch per newly visited account.

pub mod interface;

use {
    crate::{config::SearchConfig, metrics, models::Address, search::interface::TransferSource},
    dashmap::DashSet,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{sync::Semaphore, task::JoinSet},
    tracing::{debug, error, info},
};

/// What one worker reports back after expanding an account.
enum Expansion {
    Found,
    Next(Vec<Address>),
}

pub struct Search<S> {
    client: Arc<S>,
    max_depth: u32,
    concurrency: usize,
}

impl<S: TransferSource + 'static> Search<S> {
    pub fn new(client: Arc<S>, config: &SearchConfig) -> Self {
        Search {
            client,
            max_depth: config.max_depth,
            concurrency: config.concurrency,
        }
    }

    /// `true` iff some chain of transfers leads from `source` to `target`
    /// within the depth bound. A malformed input logs an error and yields
    /// `false` before any fetch happens.
    pub async fn find_connection(&self, source: &str, target: &str) -> bool {
        let source = match Address::parse(source) {
            Ok(address) => address,
            Err(e) => {
                error!("Invalid source account: {e}");
                return false;
            }
        };
        let target = match Address::parse(target) {
            Ok(address) => address,
            Err(e) => {
                error!("Invalid target account: {e}");
                return false;
            }
        };

        info!(
            "Searching for a path from {source} to {target} (max depth {})",
            self.max_depth
        );
        self.run(source, target).await
    }

    async fn run(&self, source: Address, target: Address) -> bool {
        let visited: Arc<DashSet<Address>> = Arc::new(DashSet::new());
        let found = Arc::new(AtomicBool::new(false));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut frontier = vec![source];

        for depth in 0..=self.max_depth {
            if frontier.is_empty() {
                break;
            }
            debug!("Expanding {} account(s) at depth {depth}", frontier.len());

            // Accounts at exactly max_depth are still expanded for a direct
            // hit on the target, but their destinations go no further.
            let enqueue = depth < self.max_depth;
            let mut workers: JoinSet<Expansion> = JoinSet::new();

            for account in frontier.drain(..) {
                // Atomic check-and-insert: claim the account before fetching
                // so no account is expanded twice across concurrent workers.
                if !visited.insert(account.clone()) {
                    continue;
                }

                let client = Arc::clone(&self.client);
                let semaphore = Arc::clone(&semaphore);
                let visited = Arc::clone(&visited);
                let found = Arc::clone(&found);
                let target = target.clone();

                workers.spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return Expansion::Next(Vec::new());
                    };
                    if found.load(Ordering::Acquire) {
                        return Expansion::Next(Vec::new());
                    }

                    metrics::ACCOUNTS_EXPANDED_TOTAL.inc();
                    debug!("Expanding {account} at depth {depth}");
                    let transfers = client.outgoing_transfers(&account).await;

                    let mut next = Vec::new();
                    for transfer in transfers.iter() {
                        let Some(destination) = transfer.destination() else {
                            continue;
                        };
                        if destination == target {
                            found.store(true, Ordering::Release);
                            info!(
                                "Target {target} reached from {account} at depth {depth} via {}",
                                transfer.hash
                            );
                            return Expansion::Found;
                        }
                        if enqueue && !visited.contains(&destination) {
                            next.push(destination);
                        }
                    }
                    Expansion::Next(next)
                });
            }

            let mut next_frontier = Vec::new();
            while let Some(result) = workers.join_next().await {
                match result {
                    Ok(Expansion::Found) => {
                        // In-flight requests are left to wind down on their
                        // own; the found flag stops them from enqueueing.
                        workers.detach_all();
                        return true;
                    }
                    Ok(Expansion::Next(addresses)) => next_frontier.extend(addresses),
                    Err(e) => error!("Expansion task failed: {e}"),
                }
            }

            frontier = next_frontier;
        }

        info!("No path to {target} within depth {}", self.max_depth);
        false
    }
}
