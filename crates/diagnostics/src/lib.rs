//! Diagnostics for the benchviz workspace
//!
//! Provides lightweight, configurable logging across all crates.
//!
//! Usage:
//! - Set BENCHVIZ_LOG=off (default) - no logs
//! - Set BENCHVIZ_LOG=info - resolved workbooks and written charts
//! - Set BENCHVIZ_LOG=debug - column resolution and aggregation details

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "BENCHVIZ_LOG";

static INIT: Once = Once::new();

/// Parsed value of `BENCHVIZ_LOG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    fn emit_level(self) -> Option<emit::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(emit::Level::Error),
            LogLevel::Warn => Some(emit::Level::Warn),
            LogLevel::Info => Some(emit::Level::Info),
            LogLevel::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Initialize diagnostics based on the BENCHVIZ_LOG environment variable
///
/// Call once at startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());
        let (level, unknown) = match LogLevel::parse(&raw) {
            Some(level) => (level, false),
            None => (LogLevel::Info, true),
        };

        let Some(min) = level.emit_level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        if unknown {
            emit::warn!("Unknown {var} value '{raw}', using 'info'", var: LOG_ENV);
        }

        // The runtime must outlive every emitter; the process owns it.
        std::mem::forget(rt);
    });
}

/// Log basic operations (resolved files, written charts)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (column lookups, row counts, statistics)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable conditions (skipped queries, fallbacks)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures surfaced to the user
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Short alias of [`log_info!`]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Short alias of [`log_debug!`]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Short alias of [`log_warn!`]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Short alias of [`log_error!`]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!(LogLevel::parse("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse(" DEBUG "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::Off.emit_level(), None);
    }

    #[test]
    fn test_macros_compile() {
        let size = "1GB";
        log_info!("Resolved workbook for {size}", size: size);
        log_debug!("Loaded {rows} rows", rows: 23);
        log_warn!("Skipping query");
        log_error!("Missing column");
        info!("Chart written");
        debug!("Column index {index}", index: 3);
        warn!("Query out of range");
        error!("Render failed");
    }

    #[test]
    fn test_macros_take_owned_locals() {
        init_diagnostics();
        let display = std::path::Path::new("/tmp/bar.html").display().to_string();
        let bytes: usize = 2048;
        let message = format!("Column '{}' not found", "MINIO_Total");
        info!("Wrote {display} ({bytes} bytes)", display: display, bytes: bytes);
        debug!("Resolved workbook {display}", display: display);
        warn!("Generation failed: {message}", message: message);
        error!("{message}", message: message);
        log_info!("Loaded {display}: {rows} rows", display: display, rows: bytes);
        log_warn!("{message}", message: message);
    }
}
