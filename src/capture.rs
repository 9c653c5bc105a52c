use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::Local;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config;
use crate::error::ChainError;
use crate::models::{CaptureFailure, CaptureSet, RawChainDocument, Snapshot};

/// All capture files directly inside `dir`, ascending by file creation
/// time. Captures are written sequentially during the session, so creation
/// order is capture order.
///
/// Filesystems without birth-time support fall back to modification time;
/// ties break by path so the order stays total.
pub fn list_capture_files(dir: &Path) -> Result<Vec<PathBuf>, ChainError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ChainError::CaptureRead(format!("{}: {}", dir.display(), e)))?;

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChainError::CaptureRead(format!("{}: {}", dir.display(), e)))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        files.push((birth_time(&path), path));
    }

    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn birth_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Load one capture file. The capture label is the file name with the
/// extension stripped; it is treated as opaque, never parsed.
pub async fn load_capture(path: &Path) -> Result<Snapshot, ChainError> {
    let captured_at = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            ChainError::CaptureRead(format!("{}: file name is not valid UTF-8", path.display()))
        })?;

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ChainError::CaptureRead(format!("{}: {}", path.display(), e)))?;

    let doc: RawChainDocument = serde_json::from_str(&text)
        .map_err(|e| ChainError::CaptureRead(format!("{}: {}", path.display(), e)))?;

    Ok(Snapshot { captured_at, doc })
}

/// Load every capture in `dir` on a worker pool bounded by
/// `max_concurrent` permits.
///
/// Results are reassembled in listing order, not completion order, so the
/// returned set is chronological no matter how the reads interleave. A file
/// that fails to load is recorded and skipped; the remaining captures still
/// load.
pub async fn load_all_captures(dir: &Path, max_concurrent: usize) -> Result<CaptureSet, ChainError> {
    let files = list_capture_files(dir)?;
    debug!(dir = %dir.display(), files = files.len(), "loading captures");

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles: Vec<(PathBuf, JoinHandle<Result<Snapshot, ChainError>>)> =
        Vec::with_capacity(files.len());

    for path in files {
        let sem = Arc::clone(&semaphore);
        let task_path = path.clone();
        let handle = tokio::spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| ChainError::CaptureRead(format!("{}: {}", task_path.display(), e)))?;
            load_capture(&task_path).await
        });
        handles.push((path, handle));
    }

    let mut set = CaptureSet::default();
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ChainError::CaptureRead(format!(
                "{}: load task failed: {}",
                path.display(),
                e
            ))),
        };
        match result {
            Ok(snapshot) => set.snapshots.push(snapshot),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping capture");
                set.failures.push(CaptureFailure { path, error });
            }
        }
    }

    Ok(set)
}

/// Persist one document to `dir`, stamped with the local time. The written
/// file is loadable by `load_capture`.
pub fn save_capture(dir: &Path, doc: &RawChainDocument) -> Result<PathBuf, ChainError> {
    let stamp = Local::now().format(config::CAPTURE_TIME_FORMAT);
    let path = dir.join(format!("{}.json", stamp));

    let text = serde_json::to_string_pretty(doc)
        .map_err(|e| ChainError::CaptureWrite(format!("{}: {}", path.display(), e)))?;
    std::fs::write(&path, text)
        .map_err(|e| ChainError::CaptureWrite(format!("{}: {}", path.display(), e)))?;

    Ok(path)
}
