//=========================================================================
// Logging
//=========================================================================
//
// One-time `env_logger` setup for hosts that have no logger of their own.
// The engine itself only talks to the `log` facade.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::LevelFilter;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax (e.g. `"info"` or
/// `"runner_engine::core::tasks=trace"`). When unset, `RUST_LOG` is used,
/// then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger once; later calls are ignored.
///
/// If the host already installed another logger, that one is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
