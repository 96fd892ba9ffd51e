//! On-disk snapshots of the price table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::domain::PriceTable;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "AgroMetrics";
const APP_NAME: &str = "AgroMetrics";
const SNAPSHOT_FILENAME: &str = "prices.json";

/// Price table captured at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    pub prices: PriceTable,
}

impl PriceSnapshot {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            saved_at: OffsetDateTime::now_utc(),
            prices,
        }
    }

    pub fn age(&self) -> Duration {
        let elapsed = OffsetDateTime::now_utc() - self.saved_at;
        Duration::from_secs(elapsed.whole_seconds().max(0) as u64)
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

/// Default snapshot location in the platform data directory.
pub fn default_snapshot_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_local_dir().join(SNAPSHOT_FILENAME))
}

pub fn load_price_snapshot(path: &Path) -> Result<PriceSnapshot, PersistError> {
    let data = fs::read_to_string(path)?;
    let snapshot: PriceSnapshot = serde_json::from_str(&data)?;
    info!(
        path = %path.display(),
        entries = snapshot.prices.len(),
        age = %snapshot.age_string(),
        "loaded price snapshot"
    );
    Ok(snapshot)
}

/// Loads the snapshot if there is one. A missing file is not an error; an
/// unreadable one is logged and ignored.
pub fn load_price_snapshot_if_present(path: &Path) -> Option<PriceSnapshot> {
    if !path.exists() {
        return None;
    }
    match load_price_snapshot(path) {
        Ok(snapshot) => Some(snapshot),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable price snapshot");
            None
        }
    }
}

pub fn save_price_snapshot(path: &Path, snapshot: &PriceSnapshot) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    info!(
        path = %path.display(),
        entries = snapshot.prices.len(),
        "saved price snapshot"
    );
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
