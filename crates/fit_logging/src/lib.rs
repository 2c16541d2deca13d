#![deny(missing_docs)]
//! Shared logging utilities for the FitFusion workspace.
//!
//! This crate provides the `fit_*` logging macros used by the core, engine and
//! app crates, plus a test initializer for the global logger.

/// Target used by all `fit_*` macros so the assistant's output can be filtered
/// independently of dependency noise.
pub const LOG_TARGET: &str = "fitfusion";

/// Logs a trace-level message under the FitFusion target.
#[macro_export]
macro_rules! fit_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the FitFusion target.
#[macro_export]
macro_rules! fit_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the FitFusion target.
#[macro_export]
macro_rules! fit_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the FitFusion target.
#[macro_export]
macro_rules! fit_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the FitFusion target.
#[macro_export]
macro_rules! fit_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for use in tests.
///
/// Safe to call from every test: if a logger is already installed the call is
/// a no-op.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str(LOG_TARGET)
        .build();

    // Another test may have won the race; that logger is just as good.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
