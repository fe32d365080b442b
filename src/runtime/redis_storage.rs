use async_trait::async_trait;
use crate::runtime::package::GeneratedPackage;
use crate::runtime::storage::{MAX_TTL, PackageCache};
use anyhow::Result;
use redis::AsyncCommands;
use std::time::Duration;

/// Packages stored as JSON strings with a Redis-side expiry.
pub struct RedisPackageCache {
    client: redis::Client,
}

impl RedisPackageCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PackageCache for RedisPackageCache {
    async fn get(&self, key: &str) -> Result<Option<GeneratedPackage>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;

        if let Some(s) = raw {
            let package: GeneratedPackage = serde_json::from_str(&s)?;
            Ok(Some(package))
        } else {
            Ok(None)
        }
    }

    async fn put(&self, key: &str, package: &GeneratedPackage, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let serialized = serde_json::to_string(package)?;
        // SETEX rejects a zero expiry.
        let seconds = ttl.min(MAX_TTL).as_secs().max(1);
        let _: () = conn.set_ex(key, serialized, seconds).await?;
        Ok(())
    }
}
