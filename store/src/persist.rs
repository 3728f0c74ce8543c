//! Snapshot persistence for the repository index.
//!
//! The whole index lives in a single JSON file. Every save replaces the file
//! in full (write to a tmp file with mode 0600, then rename over the
//! original), so readers never observe a partial snapshot.
//!
//! There is no cross-process locking: two processes that reload, mutate and
//! save concurrently can each start from the same snapshot, and the later
//! rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use a3s_tag_core::error::{Result, TagError};

use crate::index::RepositoryIndex;

/// Read the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist, so callers can bootstrap
/// an empty index.
pub fn load(path: &Path) -> Result<Option<RepositoryIndex>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(TagError::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to read index {}: {}", path.display(), e),
            )))
        }
    };

    let index = serde_json::from_slice(&data).map_err(|e| TagError::CorruptData {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(index))
}

/// Replace the snapshot at `path` with `index` (atomic write).
pub fn save(path: &Path, index: &RepositoryIndex) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            io_context(e, format!("failed to create directory {}", parent.display()))
        })?;
    }

    let json = serde_json::to_vec(index)?;

    let tmp_path = tmp_path(path);
    write_private(&tmp_path, &json)
        .map_err(|e| io_context(e, format!("failed to write tmp file {}", tmp_path.display())))?;

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        io_context(
            e,
            format!(
                "failed to rename {} -> {}",
                tmp_path.display(),
                path.display()
            ),
        )
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "Saved repository index");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `data` to a fresh file readable and writable by the owner only.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; a leftover tmp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(data)?;
    file.sync_all()
}

fn io_context(e: std::io::Error, context: String) -> TagError {
    TagError::IoError(std::io::Error::new(e.kind(), format!("{}: {}", context, e)))
}
