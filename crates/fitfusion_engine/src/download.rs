use std::path::{Path, PathBuf};

use fitfusion_core::ObjectUrl;
use thiserror::Error;

use crate::object_url::{ObjectUrlError, ObjectUrlRegistry};
use crate::persist::{AtomicFileWriter, PersistError};

const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    ObjectUrl(#[from] ObjectUrlError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Saves the blob behind `url` as `file_name` inside the writer's directory.
pub fn save_download(
    registry: &ObjectUrlRegistry,
    writer: &AtomicFileWriter,
    url: &ObjectUrl,
    file_name: &str,
) -> Result<PathBuf, DownloadError> {
    let bytes = registry.resolve(url)?;
    let name = available_file_name(writer.dir(), &sanitize_file_name(file_name));
    let path = writer.write(&name, &bytes)?;
    Ok(path)
}

/// `name` if it is free in `dir`, otherwise `stem--N.ext` with the first
/// free `N`.
fn available_file_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let mut n = 1u32;
    loop {
        let candidate = format!("{stem}--{n}{ext}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Filesystem-safe version of a user-supplied file name. Keeps the extension.
pub fn sanitize_file_name(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(&['_', ' ', '.'][..]);

    let mut compacted = String::with_capacity(trimmed.len());
    let mut prev_underscore = false;
    for c in trimmed.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    if compacted.is_empty() {
        return "download".to_string();
    }
    if compacted.len() > MAX_NAME_LEN {
        let mut end = MAX_NAME_LEN;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    let stem_len = compacted.find('.').unwrap_or(compacted.len());
    if is_reserved_windows_name(&compacted[..stem_len]) {
        compacted.insert(stem_len, '_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
