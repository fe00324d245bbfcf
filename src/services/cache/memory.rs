use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::services::cache::client::{CacheClient, CacheResult};

/// Writes between two sweeps of expired entries.
const SWEEP_EVERY: u32 = 256;

/// In-process cache backend.
///
/// Expired entries are dropped on read, and swept from the whole map every
/// `SWEEP_EVERY` writes so keys that are never read again do not accumulate.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, (Vec<u8>, Instant)>,
    writes_since_sweep: u32,
}

impl Entries {
    fn sweep(&mut self, now: Instant) {
        self.map.retain(|_, (_, deadline)| *deadline > now);
        self.writes_since_sweep = 0;
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of `key`, if present and not expired.
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().await;
        let (_, deadline) = entries.map.get(key)?;
        deadline.checked_duration_since(Instant::now())
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .map
            .values()
            .filter(|(_, deadline)| *deadline > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().await;
        match entries.map.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_bytes_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.writes_since_sweep += 1;
        if entries.writes_since_sweep >= SWEEP_EVERY {
            entries.sweep(now);
        }
        entries
            .map
            .insert(key.to_string(), (value.to_vec(), now + ttl));
        Ok(())
    }
}
