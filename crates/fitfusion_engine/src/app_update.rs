//! Simulated app update as a staged, cancellable task.

use std::cmp::Ordering;
use std::time::Duration;

use fit_logging::{fit_info, fit_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::settings::{SettingsError, SettingsStore, Writer, APP_VERSION};
use crate::{EngineEvent, EventSink};

pub const LATEST_VERSION: &str = "2.4.0";
pub const DEFAULT_CURRENT_VERSION: &str = "2.3.1";

const STAGES: [UpdateStage; 3] = [
    UpdateStage::Downloading,
    UpdateStage::Verifying,
    UpdateStage::Installing,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Downloading,
    Verifying,
    Installing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate { version: String },
    Available { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    Progress { stage: UpdateStage, percent: u8 },
    Installed { version: String },
    UpToDate { version: String },
    Cancelled,
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update cancelled")]
    Cancelled,
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Compares dotted numeric versions; missing or non-numeric parts count as 0.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let ordering = a.get(i).unwrap_or(&0).cmp(b.get(i).unwrap_or(&0));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

pub fn check(current: &str) -> UpdateStatus {
    match compare_versions(current, LATEST_VERSION) {
        Ordering::Less => UpdateStatus::Available {
            from: current.to_string(),
            to: LATEST_VERSION.to_string(),
        },
        Ordering::Equal | Ordering::Greater => UpdateStatus::UpToDate {
            version: current.to_string(),
        },
    }
}

#[derive(Clone)]
pub struct UpdateManager {
    settings: SettingsStore,
    stage_delay: Duration,
}

impl UpdateManager {
    pub fn new(settings: SettingsStore, stage_delay: Duration) -> Self {
        Self {
            settings,
            stage_delay,
        }
    }

    pub fn current_version(&self) -> String {
        match self.settings.get(&APP_VERSION) {
            Ok(Some(version)) => version,
            Ok(None) => DEFAULT_CURRENT_VERSION.to_string(),
            Err(err) => {
                fit_warn!("Stored app version unreadable: {}", err);
                DEFAULT_CURRENT_VERSION.to_string()
            }
        }
    }

    pub fn status(&self) -> UpdateStatus {
        check(&self.current_version())
    }

    /// Runs every stage, then records the new version. Cancelling `token`
    /// at any point leaves the stored version untouched.
    pub async fn install(
        &self,
        token: &CancellationToken,
        sink: &dyn EventSink,
    ) -> Result<String, UpdateError> {
        let target = match self.status() {
            UpdateStatus::UpToDate { version } => {
                sink.emit(EngineEvent::Update(UpdateEvent::UpToDate {
                    version: version.clone(),
                }));
                return Ok(version);
            }
            UpdateStatus::Available { from, to } => {
                fit_info!("Updating {} -> {}", from, to);
                to
            }
        };

        for (index, stage) in STAGES.iter().enumerate() {
            let percent = (index * 100 / STAGES.len()) as u8;
            sink.emit(EngineEvent::Update(UpdateEvent::Progress {
                stage: *stage,
                percent,
            }));
            tokio::select! {
                _ = token.cancelled() => {
                    fit_info!("Update cancelled during {:?}", stage);
                    sink.emit(EngineEvent::Update(UpdateEvent::Cancelled));
                    return Err(UpdateError::Cancelled);
                }
                _ = tokio::time::sleep(self.stage_delay) => {}
            }
        }

        self.settings
            .set(Writer::UpdateManager, &APP_VERSION, &target)?;
        sink.emit(EngineEvent::Update(UpdateEvent::Installed {
            version: target.clone(),
        }));
        Ok(target)
    }
}
