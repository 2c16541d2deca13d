use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

/// Uniform range the assistant "types" for before a reply lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelay {
    min: Duration,
    max: Duration,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self::from_millis(800, 1_800)
    }
}

impl ReplyDelay {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

#[derive(Clone)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
    pub reply_delay: ReplyDelay,
    pub update_stage_delay: Duration,
    pub now_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl EngineConfig {
    pub fn default_with_dirs(data_dir: PathBuf, download_dir: PathBuf) -> Self {
        Self {
            data_dir,
            download_dir,
            reply_delay: ReplyDelay::default(),
            update_stage_delay: Duration::from_millis(1_200),
            now_utc: Arc::new(Utc::now),
        }
    }
}
