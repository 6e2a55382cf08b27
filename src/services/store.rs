//! Blob storage for record collections.
//!
//! Orders and notification recipients are kept as one JSON blob per
//! collection under a fixed key. Provides:
//! - A Redis-backed store for deployments
//! - An in-memory store for tests and local runs
//! - Best-effort typed loading (corrupt or missing blobs read as empty)

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, instrument, warn};

/// Keyed storage for opaque blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, blob: String) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}

/// Redis store with connection pooling.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis store connected");

        Ok(Self { conn })
    }
}

#[async_trait]
impl BlobStore for RedisStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .context("Failed to read blob")
    }

    async fn save(&self, key: &str, blob: String) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, blob)
            .await
            .context("Failed to write blob")
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

/// Process-local store.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, blob: String) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), blob);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Blob keys
pub mod keys {
    pub const ORDERS: &str = "orders";
    pub const EMPLOYEES: &str = "employees";
}

fn decode_list<T: DeserializeOwned>(key: &str, blob: Option<String>) -> Vec<T> {
    match blob {
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = key, error = %e, "Stored blob is corrupt, treating as empty");
                Vec::new()
            }
        },
        None => {
            debug!(key = key, "No stored blob");
            Vec::new()
        }
    }
}

/// Load a JSON list for display. Missing, unreadable or corrupt blobs
/// read as empty.
#[instrument(skip(store))]
pub async fn load_list<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Vec<T> {
    match store.load(key).await {
        Ok(blob) => decode_list(key, blob),
        Err(e) => {
            error!(key = key, error = %e, "Blob read failed, treating as empty");
            Vec::new()
        }
    }
}

/// Load a JSON list that is about to be changed and saved back.
///
/// A failed read is an error: saving over a blob that was never read
/// would drop every stored record.
#[instrument(skip(store))]
pub async fn load_list_for_update<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Vec<T>> {
    let blob = store
        .load(key)
        .await
        .with_context(|| format!("Failed to read `{key}` for update"))?;
    Ok(decode_list(key, blob))
}

/// Serialize and store a JSON list.
#[instrument(skip(store, items), fields(count = items.len()))]
pub async fn save_list<T: Serialize>(store: &dyn BlobStore, key: &str, items: &[T]) -> Result<()> {
    let blob = serde_json::to_string(items).context("Failed to serialize records")?;
    store.save(key, blob).await?;
    debug!(key = key, "Saved records");
    Ok(())
}
