use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use fit_logging::{fit_debug, fit_info, fit_warn};
use fitfusion_core::{ExchangeId, Message, ObjectUrl, Responder};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app_update::{UpdateError, UpdateManager};
use crate::download::save_download;
use crate::export::export_transcript;
use crate::object_url::ObjectUrlRegistry;
use crate::persist::AtomicFileWriter;
use crate::scheduler::ReplyScheduler;
use crate::settings::SettingsStore;
use crate::{ChannelEventSink, EngineConfig, EngineEvent, EventSink};

enum EngineCommand {
    ScheduleReply { exchange: ExchangeId, prompt: String },
    CancelReply { exchange: ExchangeId },
    AcquireObjectUrl { url: ObjectUrl, source: PathBuf },
    ReleaseObjectUrls { urls: Vec<ObjectUrl> },
    Download { url: ObjectUrl, file_name: String },
    ExportTranscript { messages: Vec<Message> },
    StartUpdate,
    CancelUpdate,
    Shutdown,
}

/// Owns the engine thread. Commands are processed in the order they are
/// sent; dropping the handle cancels everything still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    registry: ObjectUrlRegistry,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, settings: SettingsStore) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let registry = ObjectUrlRegistry::new();
        let worker_registry = registry.clone();

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let enter_guard = runtime.enter();
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut worker = Worker::new(config, settings, worker_registry, sink);
            while let Ok(command) = cmd_rx.recv() {
                if !worker.handle(command) {
                    break;
                }
            }
            worker.shutdown();
            drop(enter_guard);
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Self {
            cmd_tx,
            event_rx,
            registry,
            worker: Some(worker),
        }
    }

    pub fn schedule_reply(&self, exchange: ExchangeId, prompt: impl Into<String>) {
        self.send(EngineCommand::ScheduleReply {
            exchange,
            prompt: prompt.into(),
        });
    }

    pub fn cancel_reply(&self, exchange: ExchangeId) {
        self.send(EngineCommand::CancelReply { exchange });
    }

    pub fn acquire_object_url(&self, url: ObjectUrl, source: PathBuf) {
        self.send(EngineCommand::AcquireObjectUrl { url, source });
    }

    pub fn release_object_urls(&self, urls: Vec<ObjectUrl>) {
        self.send(EngineCommand::ReleaseObjectUrls { urls });
    }

    pub fn download(&self, url: ObjectUrl, file_name: impl Into<String>) {
        self.send(EngineCommand::Download {
            url,
            file_name: file_name.into(),
        });
    }

    pub fn export_transcript(&self, messages: Vec<Message>) {
        self.send(EngineCommand::ExportTranscript { messages });
    }

    pub fn start_update(&self) {
        self.send(EngineCommand::StartUpdate);
    }

    pub fn cancel_update(&self) {
        self.send(EngineCommand::CancelUpdate);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            fit_warn!("Engine thread is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct Worker {
    config: EngineConfig,
    scheduler: ReplyScheduler,
    registry: ObjectUrlRegistry,
    updates: UpdateManager,
    update_task: Option<(CancellationToken, JoinHandle<()>)>,
    sink: Arc<dyn EventSink>,
}

impl Worker {
    fn new(
        config: EngineConfig,
        settings: SettingsStore,
        registry: ObjectUrlRegistry,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let scheduler = ReplyScheduler::new(Responder::default(), config.reply_delay);
        let updates = UpdateManager::new(settings, config.update_stage_delay);
        Self {
            config,
            scheduler,
            registry,
            updates,
            update_task: None,
            sink,
        }
    }

    /// Returns false once the engine should stop.
    fn handle(&mut self, command: EngineCommand) -> bool {
        match command {
            EngineCommand::ScheduleReply { exchange, prompt } => {
                self.scheduler.schedule(exchange, prompt, Arc::clone(&self.sink));
            }
            EngineCommand::CancelReply { exchange } => {
                if !self.scheduler.cancel(exchange) {
                    fit_debug!("No pending reply for exchange {}", exchange);
                }
            }
            EngineCommand::AcquireObjectUrl { url, source } => {
                // Loaded inline so a later release of the same URL cannot
                // overtake the acquire.
                match self.registry.load(url.clone(), &source) {
                    Ok(len) => fit_debug!("Acquired {} from {:?} ({} bytes)", url, source, len),
                    Err(err) => {
                        fit_warn!("Acquire {} failed: {}", url, err);
                        self.sink.emit(EngineEvent::ObjectUrlFailed {
                            url,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            EngineCommand::ReleaseObjectUrls { urls } => {
                let released = urls.iter().filter(|url| self.registry.revoke(url)).count();
                fit_debug!("Released {}/{} object url(s)", released, urls.len());
            }
            EngineCommand::Download { url, file_name } => self.download(url, file_name),
            EngineCommand::ExportTranscript { messages } => self.export(messages),
            EngineCommand::StartUpdate => self.start_update(),
            EngineCommand::CancelUpdate => match &self.update_task {
                Some((token, _)) => token.cancel(),
                None => fit_debug!("No update to cancel"),
            },
            EngineCommand::Shutdown => return false,
        }
        true
    }

    /// Runs inline so it observes every earlier acquire and release.
    fn download(&self, url: ObjectUrl, file_name: String) {
        let writer = AtomicFileWriter::new(self.config.download_dir.clone());
        match save_download(&self.registry, &writer, &url, &file_name) {
            Ok(path) => {
                fit_info!("Saved {} to {:?}", url, path);
                self.sink.emit(EngineEvent::Downloaded { file_name, path });
            }
            Err(err) => {
                fit_warn!("Download of {} failed: {}", url, err);
                self.sink.emit(EngineEvent::Failed {
                    operation: "download",
                    message: err.to_string(),
                });
            }
        }
    }

    fn export(&self, messages: Vec<Message>) {
        let writer = AtomicFileWriter::new(self.config.download_dir.clone());
        let exported_at = (self.config.now_utc)();
        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || {
            match export_transcript(&writer, &messages, exported_at) {
                Ok(summary) => sink.emit(EngineEvent::TranscriptExported {
                    path: summary.path,
                    message_count: summary.message_count,
                }),
                Err(err) => sink.emit(EngineEvent::Failed {
                    operation: "export",
                    message: err.to_string(),
                }),
            }
        });
    }

    fn start_update(&mut self) {
        if let Some((_, task)) = &self.update_task {
            if !task.is_finished() {
                self.sink.emit(EngineEvent::Failed {
                    operation: "update",
                    message: "an update is already running".to_string(),
                });
                return;
            }
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let updates = self.updates.clone();
        let sink = Arc::clone(&self.sink);
        let task = tokio::spawn(async move {
            match updates.install(&task_token, sink.as_ref()).await {
                Ok(version) => fit_info!("App version is {}", version),
                Err(UpdateError::Cancelled) => fit_info!("Update cancelled"),
                Err(err) => sink.emit(EngineEvent::Failed {
                    operation: "update",
                    message: err.to_string(),
                }),
            }
        });
        self.update_task = Some((token, task));
    }

    fn shutdown(&mut self) {
        self.scheduler.shutdown();
        if let Some((token, _)) = self.update_task.take() {
            token.cancel();
        }
        let revoked = self.registry.revoke_all();
        fit_info!("Engine stopped; {} object url(s) revoked", revoked);
    }
}
