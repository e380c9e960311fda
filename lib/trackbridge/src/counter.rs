use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::CounterError;
use crate::CounterStore;

pub const SEARCHES_KEY: &str = "searches";

/// Process-local store, used when no Redis is configured and in tests.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, Arc<AtomicI64>>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        let counters = self.counters.lock().ok()?;
        counters.get(key).map(|c| c.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str) -> Result<i64, CounterError> {
        let counter = {
            let mut counters = self
                .counters
                .lock()
                .map_err(|e| CounterError(e.to_string()))?;
            Arc::clone(counters.entry(key.to_string()).or_default())
        };
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Counts reconciled lookups. The value is only ever logged.
#[derive(Clone)]
pub struct SearchCounter {
    store: Arc<dyn CounterStore>,
    key: String,
}

impl SearchCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            key: SEARCHES_KEY.to_string(),
        }
    }

    /// Bumps the counter once. Store failures are logged, never returned.
    pub async fn record(&self) -> Option<i64> {
        match self.store.increment(&self.key).await {
            Ok(count) => {
                info!("Number of searches so far: {}", count);
                Some(count)
            }
            Err(e) => {
                warn!("Could not increment '{}': {}", self.key, e);
                None
            }
        }
    }
}
