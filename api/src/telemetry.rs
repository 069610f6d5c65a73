use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CacheLookup,
    Resolve,
    Grid,
    Fetch,
    Aggregate,
    CacheStore,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CacheLookup => "cache_lookup",
            Self::Resolve => "resolve",
            Self::Grid => "grid",
            Self::Fetch => "fetch",
            Self::Aggregate => "aggregate",
            Self::CacheStore => "cache_store",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side-channel notified after each pipeline stage completes.
///
/// Observers cannot influence the request: nothing they do is returned or
/// propagated.
pub trait PipelineObserver: Send + Sync {
    fn stage_completed(&self, stage: Stage, elapsed: Duration);
}

/// Writes stage timings to the `log` facade at debug level.
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn stage_completed(&self, stage: Stage, elapsed: Duration) {
        log::debug!("stage {stage} finished in {}ms", elapsed.as_millis());
    }
}
