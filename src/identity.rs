//! Per-installation identity.
//!
//! The remote store partitions its collection by an anonymous device id: a
//! UUID generated on first use and persisted under the data directory. The
//! file is created with a no-clobber rename, so two racing first-run
//! callers converge on a single stored value.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

const DEVICE_ID_FILE: &str = "device_id";

/// Error type for identity bootstrap
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("failed to read device id: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to persist device id: {0}")]
    Persist(#[source] std::io::Error),
}

/// Return the stable device identifier, creating and persisting one on
/// first use.
pub fn device_id(data_dir: &Path) -> Result<String, IdentityError> {
    let path = data_dir.join(DEVICE_ID_FILE);

    if let Some(existing) = read_existing(&path)? {
        return Ok(existing);
    }

    fs::create_dir_all(data_dir).map_err(IdentityError::Persist)?;

    let fresh = uuid::Uuid::new_v4().to_string();
    let mut tmp = tempfile::NamedTempFile::new_in(data_dir).map_err(IdentityError::Persist)?;
    tmp.write_all(fresh.as_bytes())
        .map_err(IdentityError::Persist)?;

    match tmp.persist_noclobber(&path) {
        Ok(_) => {
            info!(id = %fresh, "created device identity");
            Ok(fresh)
        }
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            match read_existing(&path)? {
                // Another first-run caller won the race; adopt its value.
                Some(existing) => {
                    debug!("device identity created concurrently, adopting existing");
                    Ok(existing)
                }
                // The file exists but holds nothing usable; replace it.
                None => {
                    e.file
                        .persist(&path)
                        .map_err(|e| IdentityError::Persist(e.error))?;
                    info!(id = %fresh, "created device identity");
                    Ok(fresh)
                }
            }
        }
        Err(e) => Err(IdentityError::Persist(e.error)),
    }
}

fn read_existing(path: &Path) -> Result<Option<String>, IdentityError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let id = contents.trim().to_string();
            if id.is_empty() {
                Ok(None)
            } else {
                Ok(Some(id))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IdentityError::Read(e)),
    }
}
