//! Parsing of the lines typed at the prompt.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fitfusion_core::{MediaId, MessageId, SelectedFile};
use thiserror::Error;

pub const HELP: &str = "\
Type a message and press Enter to send it. Commands:
  /open  /close                 show or hide the assistant
  /attach <path>...             stage files for the next message
  /unstage <id>                 remove a staged file
  /suggest <n>                  send suggested question n
  /view <msg> <media>           open an image attachment
  /close-viewer                 close the image viewer
  /download <msg> <media>       save an attachment
  /export                       write the conversation to JSON
  /update  /cancel-update       install the latest app version
  /help  /quit
Start a message with // to send text beginning with a slash.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Open,
    Close,
    Attach(Vec<PathBuf>),
    Unstage(MediaId),
    /// Zero-based index into the suggestion list.
    Suggest(usize),
    View { message: MessageId, media: MediaId },
    CloseViewer,
    Download { message: MessageId, media: MediaId },
    Export,
    Update,
    CancelUpdate,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command /{0}; try /help")]
    Unknown(String),
    #[error("/{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("/{command}: `{value}` is not a valid number")]
    InvalidNumber { command: &'static str, value: String },
}

/// Returns `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    if let Some(escaped) = line.strip_prefix("//") {
        return Ok(Some(Command::Send(format!("/{escaped}"))));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Send(line.to_string())));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let command = match name {
        "open" => Command::Open,
        "close" => Command::Close,
        "attach" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "attach",
                    expected: "at least one path",
                });
            }
            Command::Attach(args.iter().map(PathBuf::from).collect())
        }
        "unstage" => Command::Unstage(number("unstage", "a file id", args.first())?),
        "suggest" => {
            let n: usize = number("suggest", "a suggestion number", args.first())?;
            match n.checked_sub(1) {
                Some(index) => Command::Suggest(index),
                None => {
                    return Err(CommandError::InvalidNumber {
                        command: "suggest",
                        value: n.to_string(),
                    })
                }
            }
        }
        "view" => {
            let (message, media) = pair("view", &args)?;
            Command::View { message, media }
        }
        "close-viewer" => Command::CloseViewer,
        "download" => {
            let (message, media) = pair("download", &args)?;
            Command::Download { message, media }
        }
        "export" => Command::Export,
        "update" => Command::Update,
        "cancel-update" => Command::CancelUpdate,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(
    command: &'static str,
    expected: &'static str,
    arg: Option<&&str>,
) -> Result<T, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument { command, expected })?;
    arg.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        value: arg.to_string(),
    })
}

fn pair(command: &'static str, args: &[&str]) -> Result<(u64, u64), CommandError> {
    const EXPECTED: &str = "a message id and a media id";
    if args.len() < 2 {
        return Err(CommandError::MissingArgument {
            command,
            expected: EXPECTED,
        });
    }
    Ok((
        number(command, EXPECTED, args.first())?,
        number(command, EXPECTED, args.get(1))?,
    ))
}

/// Reads what the file picker would report for `path`.
pub fn describe_file(path: &Path) -> io::Result<SelectedFile> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        ));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(SelectedFile {
        name,
        size: metadata.len(),
        mime,
        source: path.to_path_buf(),
    })
}
