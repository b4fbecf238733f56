//! Logger initialization.
//!
//! `env_logger` with two output formats: colored plain text for operators at
//! a terminal, and one JSON object per line for log shippers.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

/// Dependencies whose debug output drowns out sweep logs.
const NOISY_MODULES: [&str; 4] = ["sqlx", "reqwest", "hyper", "wiremock"];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first so per-module filters keep working, then `level`
/// overrides the global and crate-level filter.
///
/// ```bash
/// RUST_LOG=mirror_bouncer::sentry=debug mirror_bouncer sentry
/// mirror_bouncer --log-level warn --log-format json serve
/// ```
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for module in NOISY_MODULES {
        builder.filter_module(module, level.min(LevelFilter::Info));
    }
    builder.filter_module("mirror_bouncer", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    // try_init: tests may initialize more than once per process
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.to_string();
    match level {
        Level::Error => text.red().bold(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.purple(),
    }
}

/// One JSON log line: `{"ts":..,"level":..,"target":..,"msg":..}`.
fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_is_valid_json() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "mirror_bouncer::sentry",
            "Mirror HEAD failed: \"quoted\"\nsecond line",
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["ts"], 1_700_000_000_000i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "mirror_bouncer::sentry");
        assert_eq!(value["msg"], "Mirror HEAD failed: \"quoted\"\nsecond line");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_colored_level_keeps_level_text() {
        colored::control::set_override(false);
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            assert_eq!(colored_level(level).to_string(), level.to_string());
        }
    }

    #[test]
    fn test_second_initialization_fails_gracefully() {
        let _ = env_logger::builder().is_test(true).try_init();
        // A logger is installed by now, so this must return an error, not panic
        let result = init_logger_with(LevelFilter::Info, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
