//! Per-install device identifier
//!
//! A random UUID minted on first launch and kept forever. It partitions
//! favorites on the remote store; no server coordination is needed.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

use super::FavoritesError;
use crate::content::atomic_write;

const DEVICE_ID_FILE: &str = "device_id";

/// Stable identifier of this install.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Loads the stored identifier, creating and persisting one if absent.
    ///
    /// A stored value is never replaced. Only a missing or blank file leads
    /// to a new identifier; any other read error is returned.
    pub fn load_or_create(storage_path: &Path) -> Result<Self, FavoritesError> {
        fs::create_dir_all(storage_path)?;
        let path = storage_path.join(DEVICE_ID_FILE);

        match fs::read_to_string(&path) {
            Ok(stored) if !stored.trim().is_empty() => {
                return Ok(DeviceId(stored.trim().to_string()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let id = Uuid::new_v4().to_string();
        atomic_write(&path, id.as_bytes())?;
        info!("Created device identifier {}", id);
        Ok(DeviceId(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
