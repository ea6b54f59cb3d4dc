use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `mindmuscle_core=trace`).
pub const LOG_ENV: &str = "MINDMUSCLE_LOG";

/// Log to stderr so stdout stays clean for `--json` output.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
