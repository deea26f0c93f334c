use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::AppConfig;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read config.toml from the data directory. A missing file means
/// defaults (local backing); a malformed file is an error rather than a
/// silent fallback.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join("config.toml");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(ConfigError::Read { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Backing;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.store.backing, Backing::Local);
    }

    #[test]
    fn reads_config_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[store]\nbacking = \"remote\"\n\n[store.remote]\nbase_url = \"http://localhost:9090\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.store.backing, Backing::Remote);
        assert_eq!(config.store.remote.base_url, "http://localhost:9090");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "not toml {{{").unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
