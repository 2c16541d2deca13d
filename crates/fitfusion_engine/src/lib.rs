//! FitFusion engine: runs the effects the core asks for.
//!
//! Reply timers, object-URL blobs, downloads, transcript export, the settings
//! store and the simulated app update all live here.
pub mod app_update;
mod config;
mod download;
mod engine;
mod export;
mod object_url;
mod persist;
mod scheduler;
pub mod settings;
mod types;

pub use app_update::{UpdateEvent, UpdateManager, UpdateStage, UpdateStatus};
pub use config::{EngineConfig, ReplyDelay};
pub use download::{sanitize_file_name, save_download, DownloadError};
pub use engine::EngineHandle;
pub use export::{export_transcript, transcript_filename, ExportError, TranscriptSummary};
pub use object_url::{ObjectUrlError, ObjectUrlRegistry};
pub use persist::{ensure_dir, read_optional, AtomicFileWriter, PersistError};
pub use scheduler::ReplyScheduler;
pub use settings::{ChatSettings, SettingChange, SettingsError, SettingsStore, Writer};
pub use types::{ChannelEventSink, EngineEvent, EventSink};
