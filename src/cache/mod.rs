//! Partitioned resource cache.
//!
//! [`ResourceCache`] holds every resource decoded from a response, keyed on
//! `(type, id)`. Each resource type lazily gets its own moka store
//! (a *partition*) with a fixed TTL from write time and a bounded capacity.
//!
//! The cache is owned by a [`Dispatcher`](crate::Dispatcher) and lives as
//! long as it does. Relationship resolution in
//! [`Item::from_json`](crate::Item::from_json) only ever *reads* from it:
//! a miss yields an absent relation, never a fetch.
//!
//! # Active partition
//!
//! Flows that have no resource type at hand use the *active* partition,
//! selected with [`ResourceCache::set_active`]. It starts out as
//! [`DEFAULT_PARTITION`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::sync::Cache;
use tracing::trace;

use crate::resource::Item;
use crate::telemetry;

/// Name of the partition that is active until [`ResourceCache::set_active`]
/// selects another one.
pub const DEFAULT_PARTITION: &str = "default";

/// Configuration for the resource cache.
///
/// ```rust
/// # use hugin::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries per partition. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries, counted from write time. Default: 60 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries per partition.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

type Partition = Cache<u64, Arc<Item>>;

/// In-memory store of decoded resources, partitioned by resource type.
///
/// Thread-safe: moka handles concurrent access inside a partition, the
/// partition map itself sits behind an `RwLock`. Writes to the same key are
/// last-write-wins with no merge.
pub struct ResourceCache {
    config: CacheConfig,
    partitions: RwLock<HashMap<String, Partition>>,
    active: RwLock<String>,
}

impl ResourceCache {
    /// Create an empty cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            config: config.clone(),
            partitions: RwLock::new(HashMap::new()),
            active: RwLock::new(DEFAULT_PARTITION.to_string()),
        }
    }

    /// The configuration this cache was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a resource by id within a type partition.
    ///
    /// Returns `None` on a miss or when the entry has expired. Callers that
    /// want a fallback apply it themselves (`unwrap_or`).
    pub fn get(&self, id: u64, resource_type: &str) -> Option<Arc<Item>> {
        let found = self.partition(resource_type).get(&id);
        let counter = if found.is_some() {
            telemetry::CACHE_HITS_TOTAL
        } else {
            telemetry::CACHE_MISSES_TOTAL
        };
        metrics::counter!(counter, "type" => resource_type.to_string()).increment(1);
        found
    }

    /// Store a resource under `(resource_type, id)`, overwriting any prior
    /// entry. The TTL starts now.
    pub fn set(&self, id: u64, item: Arc<Item>, resource_type: &str) -> &Self {
        trace!(resource_type, id, "caching resource");
        self.partition(resource_type).insert(id, item);
        self
    }

    /// Store a resource under its own type and id.
    pub fn insert(&self, item: Arc<Item>) -> &Self {
        let id = item.id();
        let resource_type = item.resource_type().to_string();
        self.set(id, item, &resource_type)
    }

    /// Whether a live entry exists for `(resource_type, id)`.
    ///
    /// Does not count towards hit/miss metrics.
    pub fn contains(&self, id: u64, resource_type: &str) -> bool {
        self.partition(resource_type).contains_key(&id)
    }

    /// Snapshot of every live entry in a partition, ordered by id.
    pub fn all(&self, resource_type: &str) -> Vec<Arc<Item>> {
        let mut items: Vec<Arc<Item>> = self
            .partition(resource_type)
            .iter()
            .map(|(_, item)| item)
            .collect();
        items.sort_by_key(|item| item.id());
        items
    }

    /// Select the partition used by the `*_active` operations.
    pub fn set_active(&self, resource_type: impl Into<String>) -> &Self {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = resource_type.into();
        self
    }

    /// Name of the currently active partition.
    pub fn active(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// [`get`](Self::get) against the active partition.
    pub fn get_active(&self, id: u64) -> Option<Arc<Item>> {
        self.get(id, &self.active())
    }

    /// [`set`](Self::set) against the active partition.
    pub fn set_active_entry(&self, id: u64, item: Arc<Item>) -> &Self {
        self.set(id, item, &self.active())
    }

    /// [`all`](Self::all) against the active partition.
    pub fn all_active(&self) -> Vec<Arc<Item>> {
        self.all(&self.active())
    }

    /// Names of the partitions created so far, sorted.
    pub fn partitions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .partitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Evict all entries from every partition.
    pub fn clear(&self) {
        for partition in self
            .partitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            partition.invalidate_all();
        }
    }

    /// Fetch a partition, creating it on first use.
    ///
    /// moka caches are cheap handles onto shared state, so the returned
    /// clone reads and writes the same store.
    fn partition(&self, resource_type: &str) -> Partition {
        if let Some(partition) = self
            .partitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource_type)
        {
            return partition.clone();
        }

        self.partitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(resource_type.to_string())
            .or_insert_with(|| {
                Cache::builder()
                    .max_capacity(self.config.max_entries)
                    .time_to_live(self.config.ttl)
                    .build()
            })
            .clone()
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("config", &self.config)
            .field("partitions", &self.partitions())
            .field("active", &self.active())
            .finish()
    }
}
