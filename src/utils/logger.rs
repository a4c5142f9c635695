use colored::Colorize;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};
use std::io::Write;

/// Environment variable that overrides the log filter (same syntax as `RUST_LOG`).
pub const LOG_ENV: &str = "CAPSFLOW_LOG";

/// Init the global logger: warnings from dependencies, info (debug when `verbose`) for this
/// crate. Safe to call more than once; later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .parse_env(Env::new().filter(LOG_ENV))
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    format!("[{} {}] {}", name.cyan(), level_str, record.args())
                }
                Level::Debug | Level::Trace => format!(
                    "[{} {}] {}",
                    name.cyan(),
                    record.target().dimmed(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
