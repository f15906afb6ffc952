//! JSON export of generated NPCs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::npc_gen::NpcRecord;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| ExportError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_npc(path: impl AsRef<Path>, npc: &NpcRecord) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_json(path, npc)?;
    log::info!("Exported {} to {}", npc.npc_id, path.display());
    Ok(())
}
