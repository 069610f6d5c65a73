use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::repositories::geocoding::LocationQuery;

#[derive(Debug)]
pub(crate) enum CacheError {
    Backend(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "cache backend error: {msg}"),
        }
    }
}

impl From<tokio_postgres::Error> for CacheError {
    fn from(err: tokio_postgres::Error) -> Self {
        let msg = if let Some(db_err) = err.as_db_error() {
            format!(
                "{}: {} (code: {})",
                db_err.severity(),
                db_err.message(),
                db_err.code().code()
            )
        } else {
            err.to_string()
        };
        Self::Backend(msg)
    }
}

impl From<deadpool_postgres::PoolError> for CacheError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Cache key for a terrain request.
///
/// Coordinates are rounded to 4 decimals (~11 m) so repeated queries for the
/// same spot share an entry. Text queries are keyed by their normalised text
/// because the lookup happens before geocoding.
pub fn cache_key(query: LocationQuery<'_>, size_km: f64, grid: u32) -> String {
    match query {
        LocationQuery::Text(text) => {
            format!("terrain:q:{}:{size_km}:{grid}", text.trim().to_lowercase())
        }
        LocationQuery::Coordinates { lat, lon } => {
            format!("terrain:{:.4}:{:.4}:{size_km}:{grid}", round4(lat), round4(lon))
        }
    }
}

/// Round to 4 decimals; `+ 0.0` folds -0.0 into 0.0 so both print the same.
#[inline]
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0 + 0.0
}

/// Key-value store for serialized terrain results.
///
/// Entries are write-once: a `put` for a key that still holds a live entry
/// leaves the existing value in place.
#[async_trait]
pub(crate) trait TerrainCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), CacheError>;
}

pub(crate) struct PgTerrainCache {
    pool: Pool,
}

impl PgTerrainCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), CacheError> {
        let client = self.pool.get().await?;
        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS terrain_cache (
                    key        TEXT PRIMARY KEY,
                    body       TEXT NOT NULL,
                    expires_at TIMESTAMPTZ NOT NULL
                );
                CREATE INDEX IF NOT EXISTS terrain_cache_expires_at ON terrain_cache (expires_at);
                "#,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TerrainCache for PgTerrainCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT body FROM terrain_cache WHERE key = $1 AND expires_at > now()",
                &[&key],
            )
            .await?;
        Ok(row.map(|r| r.get(0)))
    }

    async fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), CacheError> {
        let client = self.pool.get().await?;
        // Replace only rows that have already expired.
        let sql = r#"
            INSERT INTO terrain_cache (key, body, expires_at)
            VALUES ($1, $2, now() + make_interval(secs => $3))
            ON CONFLICT (key) DO UPDATE
                SET body = EXCLUDED.body, expires_at = EXCLUDED.expires_at
                WHERE terrain_cache.expires_at <= now()
        "#;
        client
            .execute(sql, &[&key, &body, &ttl.as_secs_f64()])
            .await?;
        Ok(())
    }
}

/// Process-local store used when no database is configured.
#[derive(Default)]
pub(crate) struct MemoryTerrainCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryTerrainCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Backend("memory cache lock poisoned".into()))
    }
}

#[async_trait]
impl TerrainCache for MemoryTerrainCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some((body, expires_at)) if *expires_at > Instant::now() => Ok(Some(body.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries
            .entry(key.to_string())
            .or_insert_with(|| (body.to_string(), now + ttl));
        Ok(())
    }
}
