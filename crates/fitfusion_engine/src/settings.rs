//! Process-wide settings store.
//!
//! Every key has exactly one writer. Reads are open to everyone, and every
//! successful write is published to all subscribers. When backed by a
//! directory the store is written through to `settings.ron` on each change.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use fit_logging::{fit_debug, fit_info, fit_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{read_optional, AtomicFileWriter, PersistError};

pub const SETTINGS_FILENAME: &str = "settings.ron";

/// Component allowed to write a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Writer {
    Assistant,
    UpdateManager,
}

/// Typed handle to one setting.
#[derive(Debug)]
pub struct SettingKey<T> {
    name: &'static str,
    owner: Writer,
    _value: PhantomData<fn() -> T>,
}

impl<T> SettingKey<T> {
    pub const fn new(name: &'static str, owner: Writer) -> Self {
        Self {
            name,
            owner,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    pub show_suggestions: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay_min_ms: 800,
            reply_delay_max_ms: 1_800,
            show_suggestions: true,
        }
    }
}

pub const APP_VERSION: SettingKey<String> = SettingKey::new("app.version", Writer::UpdateManager);
pub const CHAT_SETTINGS: SettingKey<ChatSettings> =
    SettingKey::new("chat.settings", Writer::Assistant);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub key: String,
    /// RON text of the new value.
    pub value: String,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{writer:?} may not write {key} (owned by {owner:?})")]
    NotOwner {
        key: String,
        writer: Writer,
        owner: Writer,
    },
    #[error("failed to encode {key}: {message}")]
    Encode { key: String, message: String },
    #[error("failed to decode {key}: {message}")]
    Decode { key: String, message: String },
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("settings lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSettings {
    values: BTreeMap<String, String>,
}

#[derive(Default)]
struct Inner {
    dir: Option<PathBuf>,
    values: BTreeMap<String, String>,
    owners: HashMap<&'static str, Writer>,
    subscribers: Vec<mpsc::Sender<SettingChange>>,
}

#[derive(Clone, Default)]
pub struct SettingsStore {
    inner: Arc<Mutex<Inner>>,
}

impl SettingsStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store persisted in `dir`. A missing or unreadable file
    /// starts an empty store.
    pub fn load(dir: &Path) -> Result<Self, SettingsError> {
        let path = dir.join(SETTINGS_FILENAME);
        let values = match read_optional(&path)? {
            Some(text) => match ron::from_str::<PersistedSettings>(&text) {
                Ok(persisted) => {
                    fit_info!("Loaded {} setting(s) from {:?}", persisted.values.len(), path);
                    persisted.values
                }
                Err(err) => {
                    fit_warn!("Ignoring unreadable settings at {:?}: {}", path, err);
                    BTreeMap::new()
                }
            },
            None => BTreeMap::new(),
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir: Some(dir.to_path_buf()),
                values,
                ..Inner::default()
            })),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &SettingKey<T>) -> Result<Option<T>, SettingsError> {
        let inner = self.lock()?;
        let Some(text) = inner.values.get(key.name) else {
            return Ok(None);
        };
        ron::from_str(text)
            .map(Some)
            .map_err(|err| SettingsError::Decode {
                key: key.name.to_string(),
                message: err.to_string(),
            })
    }

    pub fn set<T: Serialize>(
        &self,
        writer: Writer,
        key: &SettingKey<T>,
        value: &T,
    ) -> Result<(), SettingsError> {
        let mut inner = self.lock()?;
        let owner = *inner.owners.get(key.name).unwrap_or(&key.owner);
        if writer != owner || writer != key.owner {
            return Err(SettingsError::NotOwner {
                key: key.name.to_string(),
                writer,
                owner,
            });
        }

        let text = ron::to_string(value).map_err(|err| SettingsError::Encode {
            key: key.name.to_string(),
            message: err.to_string(),
        })?;
        // Nothing changes unless the file write succeeds.
        let mut values = inner.values.clone();
        values.insert(key.name.to_string(), text.clone());
        if let Some(dir) = &inner.dir {
            persist(dir, &values)?;
        }
        inner.values = values;
        inner.owners.insert(key.name, writer);

        let change = SettingChange {
            key: key.name.to_string(),
            value: text,
        };
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
        fit_debug!("Setting {} written by {:?}", key.name, writer);
        Ok(())
    }

    /// Writes the current values to `settings.ron`. A no-op for an in-memory
    /// store; `set` already writes through, so this is only needed after
    /// `load` to normalize the file.
    pub fn save(&self) -> Result<(), SettingsError> {
        let inner = self.lock()?;
        match &inner.dir {
            Some(dir) => persist(dir, &inner.values),
            None => Ok(()),
        }
    }

    /// Receives every change made after this call.
    pub fn subscribe(&self) -> mpsc::Receiver<SettingChange> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut inner) = self.lock() {
            inner.subscribers.push(tx);
        }
        rx
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, SettingsError> {
        self.inner.lock().map_err(|_| SettingsError::Poisoned)
    }
}

fn persist(dir: &Path, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
    let persisted = PersistedSettings {
        values: values.clone(),
    };
    let content = ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new()).map_err(
        |err| SettingsError::Encode {
            key: SETTINGS_FILENAME.to_string(),
            message: err.to_string(),
        },
    )?;
    AtomicFileWriter::new(dir.to_path_buf()).write(SETTINGS_FILENAME, content)?;
    Ok(())
}
