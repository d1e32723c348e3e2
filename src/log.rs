//! Logging setup for the `pertplan` binary.
//!
//! Library code only emits `tracing` events; this module installs the
//! subscriber that writes them to `~/.pertplan/pertplan.log`.
//!
//! Levels as used across the crate:
//! - ERROR: a failed CLI command
//! - WARN: tolerated anomalies that change the shape of the result (cycles)
//! - INFO: finished estimates, config writes
//! - DEBUG: every absorbed anomaly (missing fields, dangling ids, unmapped roles)
//! - TRACE: per-node details of the critical path computation
//!
//! Debug mode can be enabled with `--debug` or `PERTPLAN_DEBUG=1`.
//! `RUST_LOG` takes precedence over both when set.

use std::fs::File;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Environment variable that turns on debug logging.
pub const DEBUG_ENV: &str = "PERTPLAN_DEBUG";

/// Initialize logging with explicit debug mode setting.
pub fn init_with_debug(debug: bool) {
    let level = level_for(debug || env_debug());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pertplan={}", level.as_str().to_lowercase())));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // Truncate on startup, like a fresh session log.
    let file = Config::log_path().ok().and_then(|path| {
        std::fs::create_dir_all(path.parent()?).ok()?;
        File::create(path).ok()
    });

    let _ = match file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}

fn env_debug() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn level_for(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}
