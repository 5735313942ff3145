//! Last-connected wallet marker.
//!
//! Remembers which backend was used so the next session can reconnect
//! without asking. Persistence is best-effort: I/O errors are logged and
//! never fail a connect or disconnect.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Key under which the marker is stored.
pub const LAST_WALLET_KEY: &str = "anonex_last_wallet";

#[derive(Debug, Serialize, Deserialize)]
struct Marker {
    #[serde(rename = "anonex_last_wallet")]
    backend: String,
}

#[derive(Debug, Clone, Default)]
pub struct LastWalletStore {
    path: Option<PathBuf>,
}

impl LastWalletStore {
    /// Create a store backed by `path`; `None` disables persistence.
    pub fn new(path: Option<impl Into<PathBuf>>) -> Self {
        Self {
            path: path.map(Into::into),
        }
    }

    /// The remembered backend name, if any.
    pub fn load(&self) -> Option<String> {
        let path = self.path.as_deref()?;
        if !path.exists() {
            return None;
        }
        match read_marker(path) {
            Ok(marker) => Some(marker.backend),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable wallet marker");
                None
            }
        }
    }

    pub fn save(&self, backend: &str) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let marker = Marker {
            backend: backend.to_string(),
        };
        let result = File::create(path).and_then(|file| {
            serde_json::to_writer(BufWriter::new(file), &marker).map_err(std::io::Error::from)
        });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save wallet marker");
        }
    }

    pub fn clear(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to clear wallet marker");
            }
        }
    }
}

fn read_marker(path: &Path) -> std::io::Result<Marker> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
