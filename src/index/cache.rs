//! Bounded in-memory cache of loaded barrels.
//!
//! Backed by an LRU map: a query for terms spread over more shards than the
//! capacity still completes, it just re-reads evicted shards. Every entry is
//! either clean (matches disk) or has been written back before the public
//! API returns; the writer enforces that by checking barrels out of the
//! cache, mutating them privately, and committing them back through
//! [`BarrelCache::commit`].

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::error::{Result, ScoutError};
use crate::index::barrel::{Barrel, BarrelStore};

/// Default number of resident barrels.
pub const DEFAULT_CAPACITY: usize = 10;

pub struct BarrelCache {
    store: BarrelStore,
    cache: LruCache<String, Barrel>,
}

impl std::fmt::Debug for BarrelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarrelCache")
            .field("capacity", &self.cache.cap())
            .field("resident", &self.cache.len())
            .finish()
    }
}

impl BarrelCache {
    pub fn new(store: BarrelStore, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        BarrelCache {
            store,
            cache: LruCache::new(capacity),
        }
    }

    /// Query-path read: return the resident barrel, loading it on a miss.
    ///
    /// A missing file here means the routing table points at a barrel that
    /// does not exist, which is a corrupt-barrel condition.
    pub fn shard(&mut self, name: &str) -> Result<&Barrel> {
        if !self.cache.contains(name) {
            let barrel = self
                .store
                .read(name)?
                .ok_or_else(|| ScoutError::corrupt_barrel(name, "barrel file missing"))?;
            self.cache.put(name.to_string(), barrel);
        }
        self.cache
            .get(name)
            .ok_or_else(|| ScoutError::index("barrel evicted during load"))
    }

    /// Write-path read: take the barrel out of the cache (or off disk),
    /// scaffolding an empty one when the file does not exist yet.
    ///
    /// Removing it from the cache keeps in-flight mutations out of the read
    /// path until [`commit`](Self::commit) persists them.
    pub fn checkout(&mut self, name: &str) -> Result<Barrel> {
        if let Some(barrel) = self.cache.pop(name) {
            return Ok(barrel);
        }
        Ok(self.store.read(name)?.unwrap_or_else(|| Barrel::empty(name)))
    }

    /// Persist a mutated barrel and re-insert it into the cache.
    pub fn commit(&mut self, barrel: Barrel) -> Result<()> {
        self.store.write(&barrel)?;
        self.cache.put(barrel.name().to_string(), barrel);
        Ok(())
    }

    /// Number of resident barrels.
    pub fn resident(&self) -> usize {
        self.cache.len()
    }

    pub fn store(&self) -> &BarrelStore {
        &self.store
    }
}
