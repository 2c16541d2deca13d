use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use fit_logging::{fit_debug, fit_info, fit_warn};
use fitfusion_core::{update, AppState, Msg, Notification, SelectedFile, Timestamp};
use fitfusion_engine::{ensure_dir, EngineHandle, SettingChange, SettingsStore};

use super::cli::Cli;
use super::commands::{self, Command, HELP};
use super::config;
use super::effects::{EffectRunner, Outcome};
use super::logging;
use super::render::{notice_line, TerminalRenderer};

const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    ensure_dir(&cli.data_dir)
        .with_context(|| format!("failed to create data dir {:?}", cli.data_dir))?;
    logging::initialize(cli.log, &cli.data_dir);

    let store = SettingsStore::load(&cli.data_dir).context("failed to open settings")?;
    let chat_settings = config::load_chat_settings(&store);
    let engine = EngineHandle::new(config::engine_config(&cli, &chat_settings), store.clone());
    let settings_rx = store.subscribe();

    let mut app = App {
        state: AppState::with_config(config::chat_config(&chat_settings), now()),
        runner: EffectRunner::new(engine),
        renderer: TerminalRenderer::new(),
    };
    fit_info!("FitFusion assistant started");
    println!("Type /help for commands.");
    app.dispatch(Msg::WidgetToggled);

    let input_rx = spawn_stdin_reader();
    loop {
        match input_rx.recv_timeout(TICK) {
            Ok(line) => {
                if app.handle_line(&line) == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        app.poll_engine();
        for change in settings_rx.try_iter() {
            log_setting_change(&change);
        }
        app.dispatch(Msg::Tick);
    }

    app.teardown();
    fit_info!("FitFusion assistant stopped");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer,
}

impl App {
    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                println!("{err}");
                return Flow::Continue;
            }
        };

        match command {
            Command::Send(text) => {
                if !self.state.is_open() {
                    println!("The assistant is minimized; /open to chat.");
                    return Flow::Continue;
                }
                self.dispatch(Msg::InputChanged(text));
                self.dispatch(Msg::SendClicked { now: now() });
            }
            Command::Open => {
                if !self.state.is_open() {
                    self.dispatch(Msg::WidgetToggled);
                }
            }
            Command::Close => self.dispatch(Msg::WidgetClosed),
            Command::Attach(paths) => match paths
                .iter()
                .map(|path| commands::describe_file(path).map_err(|err| (path, err)))
                .collect::<Result<Vec<SelectedFile>, _>>()
            {
                Ok(files) => self.dispatch(Msg::FilesSelected(files)),
                Err((path, err)) => self.notify(&Notification::error(
                    "Cannot attach",
                    format!("{}: {}", path.display(), err),
                )),
            },
            Command::Unstage(id) => self.dispatch(Msg::StagedFileRemoved(id)),
            Command::Suggest(index) => self.dispatch(Msg::SuggestionClicked { index, now: now() }),
            Command::View { message, media } => {
                self.dispatch(Msg::AttachmentClicked { message, media })
            }
            Command::CloseViewer => self.dispatch(Msg::ViewerClosed),
            Command::Download { message, media } => {
                self.dispatch(Msg::DownloadClicked { message, media })
            }
            Command::Export => self
                .runner
                .export_transcript(self.state.conversation().transcript()),
            Command::Update => self.runner.start_update(),
            Command::CancelUpdate => self.runner.cancel_update(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for notice in self.runner.run(effects) {
            self.notify(&notice);
        }
        if was_dirty {
            for line in self.renderer.render(&self.state.view()) {
                println!("{line}");
            }
        }
    }

    fn poll_engine(&mut self) {
        for outcome in self.runner.poll(now()) {
            match outcome {
                Outcome::Dispatch(msg) => self.dispatch(msg),
                Outcome::Notify(notice) => self.notify(&notice),
            }
        }
    }

    fn notify(&self, notice: &Notification) {
        println!("{}", notice_line(notice));
    }

    /// Cancels the pending reply and releases every object URL before the
    /// engine goes away.
    fn teardown(mut self) {
        self.dispatch(Msg::Teardown { now: now() });
        self.poll_engine();
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    fit_warn!("stdin closed: {}", err);
                    break;
                }
            }
        }
        fit_debug!("stdin reader finished");
    });
    rx
}

fn log_setting_change(change: &SettingChange) {
    fit_info!("Setting {} is now {}", change.key, change.value);
}

fn now() -> Timestamp {
    Utc::now().timestamp_millis()
}
