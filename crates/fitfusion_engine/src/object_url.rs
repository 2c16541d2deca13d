//! In-memory blobs addressed by object URLs.
//!
//! A URL is live from `acquire`/`load` until `revoke`. The widget state decides
//! when that happens; the registry only enforces that a revoked URL no longer
//! resolves.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use fit_logging::{fit_debug, fit_trace};
use fitfusion_core::ObjectUrl;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectUrlError {
    #[error("object url {0} is not live")]
    NotLive(ObjectUrl),
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("object url registry lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    blobs: Arc<Mutex<HashMap<ObjectUrl, Bytes>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` under `url`, replacing any previous blob.
    pub fn acquire(&self, url: ObjectUrl, bytes: Bytes) -> Result<(), ObjectUrlError> {
        fit_trace!("Acquire {} ({} bytes)", url, bytes.len());
        self.lock()?.insert(url, bytes);
        Ok(())
    }

    /// Reads `path` and registers its contents. Returns the byte count.
    pub fn load(&self, url: ObjectUrl, path: &Path) -> Result<u64, ObjectUrlError> {
        let data = fs::read(path).map_err(|source| ObjectUrlError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let len = data.len() as u64;
        self.acquire(url, Bytes::from(data))?;
        Ok(len)
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Result<Bytes, ObjectUrlError> {
        self.lock()?
            .get(url)
            .cloned()
            .ok_or_else(|| ObjectUrlError::NotLive(url.clone()))
    }

    /// Returns whether the URL was live.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        match self.lock() {
            Ok(mut blobs) => blobs.remove(url).is_some(),
            Err(_) => false,
        }
    }

    pub fn revoke_all(&self) -> usize {
        match self.lock() {
            Ok(mut blobs) => {
                let count = blobs.len();
                blobs.clear();
                fit_debug!("Revoked {} object url(s)", count);
                count
            }
            Err(_) => 0,
        }
    }

    pub fn live_count(&self) -> usize {
        self.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ObjectUrl, Bytes>>, ObjectUrlError> {
        self.blobs.lock().map_err(|_| ObjectUrlError::Poisoned)
    }
}
