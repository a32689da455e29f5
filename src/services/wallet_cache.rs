// Read-through cache for wallet balances with a fixed TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::constants::{WALLET_CACHE_MAX_ENTRIES, WALLET_CACHE_STALE_SECS};
use crate::error::Result;
use crate::models::{WalletBalanceCacheEntry, WalletBalances, WalletTransaction};
use crate::utils::shorten_address;

/// Source of on-chain wallet data.
#[async_trait]
pub trait WalletDataProvider: Send + Sync {
    async fn get_wallet_data(&self, address: &str) -> Result<WalletBalances>;

    async fn get_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<WalletTransaction>>;
}

#[derive(Debug, Clone)]
struct CachedBalances {
    fetched_at: Instant,
    entry: WalletBalanceCacheEntry,
}

/// Wallet balances keyed by address. Errors are never cached, so an address
/// whose fetch keeps failing is retried on every read.
pub struct WalletDataCache {
    provider: Arc<dyn WalletDataProvider>,
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, CachedBalances>>,
    fetch_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl WalletDataCache {
    pub fn new(provider: Arc<dyn WalletDataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            max_entries: WALLET_CACHE_MAX_ENTRIES,
            entries: RwLock::new(HashMap::new()),
            fetch_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Balances for `address`. Never fails: a provider error yields the last
    /// known balances (even if expired), otherwise zeroed balances.
    pub async fn get(&self, address: &str) -> WalletBalances {
        let address = address.trim();
        if address.is_empty() {
            return WalletBalances::default();
        }

        if let Some(balances) = self.fresh(address).await {
            return balances;
        }

        let fetch_lock = self.fetch_lock_for(address).await;
        let _guard = fetch_lock.lock().await;
        if let Some(balances) = self.fresh(address).await {
            return balances;
        }

        match self.provider.get_wallet_data(address).await {
            Ok(balances) => {
                self.store(address, balances.clone()).await;
                balances
            }
            Err(e) => {
                tracing::error!(
                    "Error getting wallet balances for {}: {}",
                    shorten_address(address),
                    e
                );
                match self.entry(address).await {
                    Some(cached) => {
                        tracing::info!("Using expired cache data due to error");
                        cached.balances
                    }
                    None => WalletBalances::default(),
                }
            }
        }
    }

    /// Fetches from the provider regardless of age and stores the result.
    /// Unlike `get`, the error is returned to the caller.
    pub async fn refresh(&self, address: &str) -> Result<WalletBalances> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(WalletBalances::default());
        }
        let fetch_lock = self.fetch_lock_for(address).await;
        let _guard = fetch_lock.lock().await;

        let balances = self.provider.get_wallet_data(address).await?;
        self.store(address, balances.clone()).await;
        Ok(balances)
    }

    /// Recent transactions straight from the provider; these are not cached.
    pub async fn recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<WalletTransaction>> {
        self.provider.get_recent_transactions(address, limit).await
    }

    pub async fn entry(&self, address: &str) -> Option<WalletBalanceCacheEntry> {
        self.entries
            .read()
            .await
            .get(address.trim())
            .map(|cached| cached.entry.clone())
    }

    pub async fn invalidate(&self, address: &str) {
        if self.entries.write().await.remove(address.trim()).is_some() {
            tracing::debug!("Cleared balance cache for {}", shorten_address(address));
        }
    }

    #[cfg(test)]
    fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    async fn fresh(&self, address: &str) -> Option<WalletBalances> {
        let guard = self.entries.read().await;
        let cached = guard.get(address)?;
        if cached.fetched_at.elapsed() < self.ttl {
            return Some(cached.entry.balances.clone());
        }
        None
    }

    async fn store(&self, address: &str, balances: WalletBalances) {
        let mut guard = self.entries.write().await;
        guard.insert(
            address.to_string(),
            CachedBalances {
                fetched_at: Instant::now(),
                entry: WalletBalanceCacheEntry {
                    address: address.to_string(),
                    balances,
                    fetched_at: Utc::now(),
                },
            },
        );
        if guard.len() > self.max_entries {
            let stale_after = Duration::from_secs(WALLET_CACHE_STALE_SECS);
            guard.retain(|_, cached| cached.fetched_at.elapsed() <= stale_after);
        }
        if guard.len() > self.max_entries {
            // still full of recent entries: evict the oldest down to the cap
            let mut by_age: Vec<(Instant, String)> = guard
                .iter()
                .map(|(key, cached)| (cached.fetched_at, key.clone()))
                .collect();
            by_age.sort();
            let excess = guard.len() - self.max_entries;
            for (_, key) in by_age.into_iter().take(excess) {
                guard.remove(&key);
            }
        }
    }

    // Internal helper that supports `fetch_lock_for` operations.
    async fn fetch_lock_for(&self, address: &str) -> Arc<Mutex<()>> {
        {
            let guard = self.fetch_locks.read().await;
            if let Some(lock) = guard.get(address) {
                return lock.clone();
            }
        }

        let mut guard = self.fetch_locks.write().await;
        if let Some(lock) = guard.get(address) {
            return lock.clone();
        }
        let lock = Arc::new(Mutex::new(()));
        guard.insert(address.to_string(), lock.clone());

        if guard.len() > self.max_entries {
            let entries = self.entries.read().await;
            guard.retain(|key, _| entries.contains_key(key));
        }
        lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenBalance;
    use crate::test_support::{sample_balances, StubWalletProvider, WALLET};

    fn cache_with(provider: Arc<StubWalletProvider>) -> WalletDataCache {
        WalletDataCache::new(provider, Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn read_within_ttl_skips_provider() {
        // Memastikan pembacaan kedua dalam 30 detik tidak memanggil provider
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider.clone());

        let first = cache.get(WALLET).await;
        tokio::time::advance(Duration::from_secs(29)).await;
        let second = cache.get(WALLET).await;

        assert_eq!(provider.balance_calls(), 1);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn read_after_ttl_refetches_once() {
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider.clone());

        cache.get(WALLET).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        cache.get(WALLET).await;
        cache.get(WALLET).await;

        assert_eq!(provider.balance_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_provider_serves_last_known_value() {
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider.clone());

        let before = cache.get(WALLET).await;
        provider.set_failing(true);
        tokio::time::advance(Duration::from_secs(120)).await;

        let after = cache.get(WALLET).await;
        assert_eq!(after, before);
        // errors are not cached, so the next read retries
        cache.get(WALLET).await;
        assert_eq!(provider.balance_calls(), 3);
    }

    #[tokio::test]
    async fn failing_provider_without_history_returns_zeroes() {
        let provider = Arc::new(StubWalletProvider::failing());
        let cache = cache_with(provider);

        let balances = cache.get(WALLET).await;
        assert_eq!(balances.sol_balance, 0.0);
        assert!(balances.token_balances.is_empty());
    }

    #[tokio::test]
    async fn empty_address_never_hits_provider() {
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider.clone());

        assert_eq!(cache.get("  ").await, WalletBalances::default());
        assert_eq!(cache.refresh("").await.unwrap(), WalletBalances::default());
        assert_eq!(provider.balance_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_oldest_recent_entries() {
        // Memastikan cache tidak tumbuh melewati batas walau semua entri masih baru
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider).with_max_entries(3);

        for address in ["wallet-a", "wallet-b", "wallet-c", "wallet-d", "wallet-e"] {
            cache.get(address).await;
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        assert!(cache.entry("wallet-a").await.is_none());
        assert!(cache.entry("wallet-b").await.is_none());
        for address in ["wallet-c", "wallet-d", "wallet-e"] {
            assert!(cache.entry(address).await.is_some(), "{} was evicted", address);
        }
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = Arc::new(cache_with(provider.clone()));

        let reads = (0..8).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get(WALLET).await })
        });
        for read in futures_util::future::join_all(reads).await {
            assert_eq!(read.unwrap().sol_balance, 2.5);
        }
        assert_eq!(provider.balance_calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch_and_entry_tracks_address() {
        let provider = Arc::new(StubWalletProvider::new(sample_balances()));
        let cache = cache_with(provider.clone());

        cache.get(WALLET).await;
        let entry = cache.entry(WALLET).await.unwrap();
        assert_eq!(entry.address, WALLET);

        cache.invalidate(WALLET).await;
        assert!(cache.entry(WALLET).await.is_none());
        cache.get(WALLET).await;
        assert_eq!(provider.balance_calls(), 2);
    }

    #[tokio::test]
    async fn refresh_reports_errors_but_keeps_cache() {
        let provider = Arc::new(StubWalletProvider::new(WalletBalances {
            sol_balance: 1.0,
            token_balances: vec![TokenBalance {
                symbol: "BONK".to_string(),
                mint: None,
                balance: 1_000.0,
                decimals: Some(5),
                usd_value: None,
            }],
        }));
        let cache = cache_with(provider.clone());

        cache.refresh(WALLET).await.unwrap();
        provider.set_failing(true);
        assert!(cache.refresh(WALLET).await.is_err());
        assert_eq!(cache.entry(WALLET).await.unwrap().balances.sol_balance, 1.0);
    }
}
