use {
    crate::models::{Address, Transfer},
    dashmap::DashMap,
    std::{sync::Arc, time::Duration},
    tokio::time::Instant,
};

struct CacheEntry {
    transfers: Arc<Vec<Transfer>>,
    fetched_at: Instant,
}

/// Per-account transfer lists with a time-to-live. Only complete fetches are
/// inserted, so a hit never needs re-pagination. Entries are replaced on
/// refresh, never mutated in place.
pub struct TransferCache {
    entries: DashMap<Address, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl TransferCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        TransferCache {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    pub fn get(&self, account: &Address) -> Option<Arc<Vec<Transfer>>> {
        {
            let entry = self.entries.get(account)?;
            if entry.fetched_at.elapsed() <= self.ttl {
                return Some(Arc::clone(&entry.transfers));
            }
        }
        self.entries.remove(account);
        None
    }

    pub fn insert(&self, account: Address, transfers: Arc<Vec<Transfer>>) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&account) {
            self.evict_stalest();
        }
        self.entries.insert(
            account,
            CacheEntry {
                transfers,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_stalest(&self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.fetched_at)
            .map(|entry| entry.key().clone());

        if let Some(account) = stalest {
            self.entries.remove(&account);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn transfers(n: usize) -> Arc<Vec<Transfer>> {
        Arc::new(
            (0..n)
                .map(|i| Transfer {
                    hash: format!("0xhash{i}"),
                    from: account(1).as_str().to_string(),
                    to: account(2).as_str().to_string(),
                    block_number: i as u64,
                    timestamp: 1_700_000_000 + i as u64,
                })
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_returns_same_data() {
        let cache = TransferCache::new(Duration::from_secs(60), 16);
        cache.insert(account(1), transfers(3));

        tokio::time::advance(Duration::from_secs(59)).await;

        let hit = cache.get(&account(1)).unwrap();
        assert_eq!(hit.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TransferCache::new(Duration::from_secs(60), 16);
        cache.insert(account(1), transfers(3));

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(cache.get(&account(1)).is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalest_entry_evicted_at_capacity() {
        let cache = TransferCache::new(Duration::from_secs(600), 2);

        cache.insert(account(1), transfers(1));
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert(account(2), transfers(1));
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert(account(3), transfers(1));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&account(1)).is_none());
        assert!(cache.get(&account(2)).is_some());
        assert!(cache.get(&account(3)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_replaces_entry_without_eviction() {
        let cache = TransferCache::new(Duration::from_secs(600), 2);

        cache.insert(account(1), transfers(1));
        cache.insert(account(2), transfers(1));
        cache.insert(account(1), transfers(5));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&account(1)).unwrap().len(), 5);
    }
}
