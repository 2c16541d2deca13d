use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

#[derive(Parser, Debug, Clone)]
#[command(name = "fitfusion", version, about = "FitFusion assistant in your terminal")]
pub struct Cli {
    /// Directory for settings and the log file.
    #[arg(long, default_value = ".fitfusion")]
    pub data_dir: PathBuf,

    /// Where downloads and transcript exports are saved. Defaults to
    /// `<data-dir>/downloads`.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Typing delay range in milliseconds, e.g. `800..1800`.
    #[arg(long, value_parser = parse_range::<u64>)]
    pub reply_delay_ms: Option<(u64, u64)>,
}

impl Cli {
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("downloads"))
    }
}

fn parse_range<T>(s: &str) -> Result<(T, T), Box<dyn std::error::Error + Send + Sync + 'static>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let pos = s
        .find("..")
        .ok_or_else(|| format!("expected MIN..MAX, no `..` found in `{s}`"))?;
    Ok((s[..pos].trim().parse()?, s[pos + 2..].trim().parse()?))
}
