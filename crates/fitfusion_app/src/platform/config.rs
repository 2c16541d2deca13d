//! Startup configuration: stored chat settings, then CLI overrides.

use fit_logging::{fit_info, fit_warn};
use fitfusion_core::ChatConfig;
use fitfusion_engine::settings::CHAT_SETTINGS;
use fitfusion_engine::{ChatSettings, EngineConfig, ReplyDelay, SettingsStore, Writer};

use super::cli::Cli;

/// Reads the stored chat settings. A missing entry is seeded with the
/// defaults so the settings file lists every knob.
pub fn load_chat_settings(store: &SettingsStore) -> ChatSettings {
    match store.get(&CHAT_SETTINGS) {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            let settings = ChatSettings::default();
            if let Err(err) = store.set(Writer::Assistant, &CHAT_SETTINGS, &settings) {
                fit_warn!("Could not store default {}: {}", CHAT_SETTINGS.name(), err);
            }
            settings
        }
        Err(err) => {
            fit_warn!("Stored chat settings unreadable, using defaults: {}", err);
            ChatSettings::default()
        }
    }
}

pub fn chat_config(settings: &ChatSettings) -> ChatConfig {
    let mut config = ChatConfig::default();
    if !settings.show_suggestions {
        config.suggestions.clear();
    }
    config
}

pub fn engine_config(cli: &Cli, settings: &ChatSettings) -> EngineConfig {
    let mut config = EngineConfig::default_with_dirs(cli.data_dir.clone(), cli.download_dir());
    let (min, max) = cli
        .reply_delay_ms
        .unwrap_or((settings.reply_delay_min_ms, settings.reply_delay_max_ms));
    config.reply_delay = ReplyDelay::from_millis(min, max);
    fit_info!(
        "Reply delay {:?}..{:?}, downloads in {:?}",
        config.reply_delay.min(),
        config.reply_delay.max(),
        config.download_dir
    );
    config
}
