use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

/// Error that occurs when opening a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to open file `{path}`: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Error that occurs when creating a directory or writing a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to write `{path}`: {source}")]
pub struct FileWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns a [`FileOpenError`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use creo_inventory::fsutil;
/// let reader = fsutil::open_file_reader("/some/file.txt")?;
/// # Ok::<(), fsutil::FileOpenError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileOpenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileOpenError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Creates `path` and all missing parents.
///
/// # Errors
///
/// Returns a [`FileWriteError`] if the directory cannot be created.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<(), FileWriteError> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|source| FileWriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replaces the contents of `path` with `contents`.
///
/// The data is written to a temporary file in the same directory, flushed to disk and
/// renamed over `path`, so readers only ever observe the old or the new file.
///
/// # Errors
///
/// Returns a [`FileWriteError`] if the parent directory is missing or any step fails.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<(), FileWriteError> {
    let path = path.as_ref();
    let wrap = |source: io::Error| FileWriteError {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".creo-inventory")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(wrap)?;
    tmp.write_all(contents).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|err| wrap(err.error))?;

    if let Ok(dir) = File::open(parent) {
        // best effort, not every platform supports syncing directories
        let _ = dir.sync_all();
    }
    Ok(())
}
