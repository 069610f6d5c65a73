use std::env;
use std::time::Duration;

pub(crate) const DEFAULT_SIZE_KM: f64 = 10.0;
pub(crate) const DEFAULT_GRID: u32 = 20;
/// Per-call coordinate bound enforced by OpenTopoData.
pub(crate) const MAX_ELEVATION_BATCH: usize = 100;

pub(crate) struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub pool_size: usize,
    pub cache_ttl: Duration,
    pub cache_disabled: bool,
    pub geocoder_url: String,
    pub elevation_url: String,
    pub elevation_dataset: String,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub default_grid: u32,
    pub user_agent: String,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_var("API_PORT").unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            pool_size: parse_var("POOL_SIZE").filter(|&s: &usize| s > 0).unwrap_or(16),
            cache_ttl: Duration::from_secs(
                parse_var("CACHE_TTL_SECS").filter(|&s: &u64| s > 0).unwrap_or(86_400),
            ),
            cache_disabled: env::var("CACHE_DISABLED")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into()),
            elevation_url: env::var("ELEVATION_URL")
                .unwrap_or_else(|_| "https://api.opentopodata.org".into()),
            elevation_dataset: env::var("ELEVATION_DATASET").unwrap_or_else(|_| "srtm90m".into()),
            batch_size: parse_var("ELEVATION_BATCH_SIZE")
                .filter(|&s: &usize| (1..=MAX_ELEVATION_BATCH).contains(&s))
                .unwrap_or(MAX_ELEVATION_BATCH),
            batch_delay: Duration::from_millis(parse_var("ELEVATION_BATCH_DELAY_MS").unwrap_or(1000)),
            default_grid: parse_var("DEFAULT_GRID")
                .filter(|&g: &u32| crate::validation::validate_grid(g).is_ok())
                .unwrap_or(DEFAULT_GRID),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| format!("terrain-api/{}", env!("CARGO_PKG_VERSION"))),
            upstream_timeout: Duration::from_secs(
                parse_var("UPSTREAM_TIMEOUT_SECS").filter(|&s: &u64| s > 0).unwrap_or(30),
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
