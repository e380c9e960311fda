use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::info;
use trackbridge::{CounterError, CounterStore};

/// Counter store shared by every instance of the service. `INCR` creates
/// a missing key at 1.
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis counter store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str) -> Result<i64, CounterError> {
        let mut conn = self.conn.clone();
        conn.incr(key, 1)
            .await
            .map_err(|e| CounterError(e.to_string()))
    }
}
