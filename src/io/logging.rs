use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Set up tracing to append to `<data_dir>/taskmate.log`. Stdout belongs
/// to the TUI, so nothing is ever logged there. Filter comes from
/// `RUST_LOG`, defaulting to `info`.
///
/// Failures are non-fatal: running without a log file beats refusing to
/// start over one.
pub fn init(data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("taskmate.log"))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}
