//! This module provides observability hooks for the codec.
//!
//! The `log_metric!` macro emits one structured key-value line per call at
//! `debug` level through the `log` facade. Nothing is formatted unless a logger
//! has debug output enabled, so the hooks cost a single level check otherwise.
//! `enable_verbose_logging` installs an `env_logger` backend once per process.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::Result;

/// Logs a structured key-value metric string at `debug` level.
///
/// ```ignore
/// log_metric!("event" = "compress", "mode" = "reversible", "bytes" = &written);
/// ```
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("FLOATZIP_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs a process-wide logger printing `[LEVEL] message` lines.
///
/// Output goes to stderr, or is appended to `log_file` when one is given.
/// Only the first call installs anything; later calls are no-ops, as is the
/// first call when another logger is already registered.
///
/// # Errors
/// Returns `FloatzipError::Io` if `log_file` cannot be opened for appending.
pub fn enable_verbose_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
