use std::path::PathBuf;

/// Environment override for the data directory; used by tests and scripts.
pub const DATA_DIR_ENV: &str = "TASKMATE_DIR";

/// Resolve the data directory holding config.toml, the device id, and the
/// log file. `--data-dir` wins, then `$TASKMATE_DIR`, then the platform
/// data dir.
pub fn data_dir(cli_override: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_override {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskmate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins() {
        let dir = data_dir(Some("/tmp/custom"));
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn default_ends_with_app_dir() {
        // Without an override the platform dir gets a taskmate/ suffix;
        // only check the suffix to stay platform-neutral. The env override
        // is exercised end-to-end by the CLI integration tests.
        let dir = data_dir(None);
        if std::env::var(DATA_DIR_ENV).is_err() {
            assert!(dir.ends_with("taskmate"));
        }
    }
}
