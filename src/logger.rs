use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;

use crate::domain::workload::group::GroupKind;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "flowsim.log";

/// Initializes the global logger.
///
/// Should be called once at the start of `main`. Log level is controlled by
/// `RUST_LOG` (defaults to `info`). Logs go to the console (colored) and to
/// `logs/flowsim.log`.
pub fn init() {
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("Failed to create log directory at '{}': {}", LOG_DIR, e);
    }

    let log_file_path = format!("{}/{}", LOG_DIR, LOG_FILE);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level_filter = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let base_config = Dispatch::new().level(log_level_filter).level_for("serde", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = fern::colors::ColoredLevelConfig::new()
                .error(fern::colors::Color::Red)
                .warn(fern::colors::Color::Yellow)
                .info(fern::colors::Color::Green)
                .debug(fern::colors::Color::Blue)
                .trace(fern::colors::Color::BrightBlack);

            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let file_config = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
        })
        .chain(fern::log_file(&log_file_path).unwrap_or_else(|e| {
            eprintln!("Failed to open log file '{}': {}", log_file_path, e);
            fern::log_file("/dev/stderr").expect("Failed to open stderr as fallback")
        }));

    base_config.chain(console_config).chain(file_config).apply().unwrap_or_else(|e| {
        eprintln!("Failed to apply logger configuration: {}", e);
    });

    log::info!("Logger initialized. Logging to console and '{}'.", log_file_path);
}

/// Logs one round of the engine's event loop: how many events the fixed
/// point consumed and how far the clock jumped afterward. Emitted at debug
/// level since a long-running scenario can go through thousands of rounds.
pub fn log_round(round: usize, events_consumed: usize, global_time: f64, dt: f64) {
    log::debug!(
        target: "flowsim::engine",
        "round {round}: consumed {events_consumed} events, advancing {dt:.6}s to t={global_time:.6}"
    );
}

/// Logs a collective finishing: which group kind, which microbatch, and how
/// many ranks it fanned its completion events out to.
pub fn log_collective_complete(kind: GroupKind, microbatch: i64, fanout: usize) {
    log::info!(
        target: "flowsim::collective",
        "{kind:?} collective for microbatch {microbatch} complete, notifying {fanout} rank(s)"
    );
}
