use crate::domain::errors::FetchError;
use crate::domain::logging::LogComponent;
use crate::log_debug;
use crate::domain::market_data::{DataSource, FetchFuture, FetchMode, Granularity, RawSeries, Symbol};
use futures::FutureExt;
use futures::future::Shared;
use std::collections::{HashMap, VecDeque};

/// One fetch result, shared by every caller waiting on it.
pub type SharedFetch = Shared<FetchFuture>;

/// Fetched data of one symbol, one entry per range.
///
/// An entry is inserted as soon as a fetch starts, so concurrent searches
/// for the same data await the same request.
pub struct DataCache {
    symbol: Symbol,
    entries: HashMap<Granularity, SharedFetch>,
}

impl DataCache {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol, entries: HashMap::new() }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn get_or_fetch(&mut self, source: &dyn DataSource, granularity: Granularity) -> SharedFetch {
        if let Some(existing) = self.entries.get(&granularity) {
            return existing.clone();
        }

        let fetch = match granularity.fetch_mode() {
            FetchMode::Intraday => source.fetch_intraday(&self.symbol),
            FetchMode::History => source.fetch_daily(&self.symbol, granularity),
        };
        let shared = fetch.shared();
        self.entries.insert(granularity, shared.clone());
        shared
    }

    /// Drop the entry if its fetch completed with an error.
    pub fn evict_failed(&mut self, granularity: Granularity) -> bool {
        let failed = self
            .entries
            .get(&granularity)
            .and_then(|entry| entry.peek())
            .is_some_and(|result| result.is_err());
        if failed {
            self.entries.remove(&granularity);
        }
        failed
    }

    pub fn contains(&self, granularity: Granularity) -> bool {
        self.entries.contains_key(&granularity)
    }

    /// Completed data, if any.
    pub fn peek(&self, granularity: Granularity) -> Option<&Result<RawSeries, FetchError>> {
        self.entries.get(&granularity).and_then(|entry| entry.peek())
    }
}

/// Per-symbol caches, least recently used first. Holds at most `capacity`
/// symbols.
pub struct DataCacheRegistry {
    capacity: usize,
    caches: VecDeque<DataCache>,
}

impl DataCacheRegistry {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), caches: VecDeque::new() }
    }

    pub fn fetch(&mut self, source: &dyn DataSource, symbol: &Symbol, granularity: Granularity) -> SharedFetch {
        let cache = self.touch(symbol);
        cache.get_or_fetch(source, granularity)
    }

    /// Forget a failed fetch so the next search retries it.
    pub fn evict_failed(&mut self, symbol: &Symbol, granularity: Granularity) -> bool {
        let evicted = self
            .caches
            .iter_mut()
            .find(|cache| cache.symbol() == symbol)
            .is_some_and(|cache| cache.evict_failed(granularity));
        if evicted {
            log_debug!(LogComponent::Application("DataCache"), "evicted failed {} fetch for {}", granularity, symbol);
        }
        evicted
    }

    pub fn contains(&self, symbol: &Symbol, granularity: Granularity) -> bool {
        self.get(symbol).is_some_and(|cache| cache.contains(granularity))
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&DataCache> {
        self.caches.iter().find(|cache| cache.symbol() == symbol)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Move the symbol's cache to the most recent slot, creating it if needed.
    fn touch(&mut self, symbol: &Symbol) -> &mut DataCache {
        let cache = match self.caches.iter().position(|cache| cache.symbol() == symbol) {
            Some(index) => self.caches.remove(index).unwrap_or_else(|| DataCache::new(symbol.clone())),
            None => DataCache::new(symbol.clone()),
        };

        while self.caches.len() >= self.capacity {
            if let Some(dropped) = self.caches.pop_front() {
                log_debug!(LogComponent::Application("DataCache"), "dropping cached data for {}", dropped.symbol());
            }
        }

        self.caches.push_back(cache);
        let last = self.caches.len() - 1;
        &mut self.caches[last]
    }
}
