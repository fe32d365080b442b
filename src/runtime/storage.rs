use async_trait::async_trait;
use crate::runtime::package::GeneratedPackage;
use anyhow::Result;
use dashmap::DashMap;
use std::time::{Duration, Instant};

// --- Interfaces ---

/// Package cache keyed by [`crate::dsl::WorkflowRequest::cache_key`].
///
/// No locking across calls: two identical concurrent requests may both miss
/// and both regenerate.
#[async_trait]
pub trait PackageCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<GeneratedPackage>>;
    async fn put(&self, key: &str, package: &GeneratedPackage, ttl: Duration) -> Result<()>;
}

/// Longest TTL a cache honours. Longer TTLs are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// --- In-Memory Implementation ---

pub struct InMemoryPackageCache {
    entries: DashMap<String, (Instant, GeneratedPackage)>,
}

impl InMemoryPackageCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryPackageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageCache for InMemoryPackageCache {
    async fn get(&self, key: &str) -> Result<Option<GeneratedPackage>> {
        // The read guard must be gone before `remove`, or the shard deadlocks.
        let hit = self
            .entries
            .get(key)
            .map(|entry| (entry.0, entry.1.clone()));

        match hit {
            Some((expires_at, package)) if Instant::now() < expires_at => Ok(Some(package)),
            Some(_) => {
                self.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Also sweeps every expired entry, so keys that are never read again
    /// do not accumulate.
    async fn put(&self, key: &str, package: &GeneratedPackage, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        self.entries.retain(|_, (expires_at, _)| *expires_at > now);

        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);
        self.entries
            .insert(key.to_string(), (expires_at, package.clone()));
        Ok(())
    }
}
