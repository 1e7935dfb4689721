//! JSON file helpers
//!
//! Repository files are rewritten whole on every change. Writes go to a
//! sibling temp file that is renamed over the target, so a crash leaves
//! either the old or the new contents, never a torn file. Read-modify-write
//! cycles run under an exclusive lock on a sibling `.lock` file, which other
//! `leads` processes honor too.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::LeadsError;

fn storage_error(action: &str, path: &Path, err: impl Display) -> LeadsError {
    LeadsError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Temp file next to `path`, unique per process
fn temp_path_for(path: &Path) -> PathBuf {
    sibling(path, &format!(".{}.tmp", std::process::id()))
}

/// Run `f` while holding the exclusive lock for `path`
///
/// The lock lives in `<path>.lock` rather than on `path` itself, because the
/// atomic rename swaps out the data file underneath any open handle. It is
/// released when `f` returns, whether or not `f` succeeded.
pub fn with_exclusive_lock<T, P, F>(path: P, f: F) -> Result<T, LeadsError>
where
    P: AsRef<Path>,
    F: FnOnce() -> Result<T, LeadsError>,
{
    let lock_path = sibling(path.as_ref(), ".lock");
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .map_err(|e| storage_error("open", &lock_path, e))?;
    FileExt::lock_exclusive(&lock_file).map_err(|e| storage_error("lock", &lock_path, e))?;

    let result = f();
    let _ = FileExt::unlock(&lock_file);
    result
}

/// Load a JSON document; a missing file reads as `T::default()`
pub fn read_json<T, P>(path: P) -> Result<T, LeadsError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Replace `path` with the pretty-printed JSON of `data`
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LeadsError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_synced(&temp_path, data)
        .and_then(|_| fs::rename(&temp_path, path).map_err(|e| storage_error("replace", path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<T: Serialize>(path: &Path, data: &T) -> Result<(), LeadsError> {
    let file = File::create(path).map_err(|e| storage_error("create", path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer.flush().map_err(|e| storage_error("flush", path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Doc {
        name: String,
        value: i32,
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let doc: Doc = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(doc, Doc::default());
    }

    #[test]
    fn test_write_then_read_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        let doc = Doc {
            name: "leads".to_string(),
            value: 7,
        };

        write_json_atomic(&path, &doc).unwrap();
        assert_eq!(read_json::<Doc, _>(&path).unwrap(), doc);

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("doc.json");
        write_json_atomic(&path, &Doc::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_lock_serializes_read_modify_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || {
                    with_exclusive_lock(&path, || {
                        let mut doc: Doc = read_json(&path)?;
                        doc.value += 1;
                        write_json_atomic(&path, &doc)
                    })
                    .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_json::<Doc, _>(&path).unwrap().value, 8);
        assert!(temp_dir.path().join("counter.json.lock").exists());
    }

    #[test]
    fn test_lock_is_released_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");

        let failed: Result<(), LeadsError> =
            with_exclusive_lock(&path, || Err(LeadsError::Storage("boom".into())));
        assert!(failed.is_err());

        let value = with_exclusive_lock(&path, || Ok(5)).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<Doc, _>(&path).unwrap_err();
        assert!(matches!(err, LeadsError::Storage(_)));
    }
}
