//! File-based save backend.

use crate::backend::{validate_name, SaveBackend};
use crate::error::StorageResult;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default extension for save files.
pub const DEFAULT_EXTENSION: &str = ".sav";

/// A save backend that keeps one file per slot in a directory.
///
/// Slot `name` lives at `root/{name}{extension}`. The directory is created
/// on first write.
///
/// # Durability
///
/// `write` goes to a temporary sibling file that is synced with
/// `File::sync_all()` and then renamed over the target, so a crash leaves
/// either the old or the new payload. A failed write removes the temporary
/// file.
///
/// # Example
///
/// ```no_run
/// use savekv_storage::{SaveBackend, FileBackend};
///
/// let mut backend = FileBackend::new("saves");
/// backend.write("game", b"payload").unwrap();
/// assert!(backend.exists("game").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
    extension: String,
}

impl FileBackend {
    /// Creates a backend rooted at `root` using [`DEFAULT_EXTENSION`].
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, DEFAULT_EXTENSION)
    }

    /// Creates a backend rooted at `root` with a custom file extension.
    ///
    /// The extension is appended verbatim, so include the leading dot.
    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Returns the save directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the file path for a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid.
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}{}", self.extension)))
    }

    fn temp_path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}{}.tmp", self.extension))
    }
}

impl SaveBackend for FileBackend {
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.path_for(name)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root)?;

        let temp = self.temp_path_for(name);
        let result = write_synced(&temp, data).and_then(|()| fs::rename(&temp, &path));
        if result.is_err() {
            // Best effort; the write error is what gets reported.
            let _ = fs::remove_file(&temp);
        }
        result.map_err(Into::into)
    }

    fn remove(&mut self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            if let Some(name) = file_name.strip_suffix(self.extension.as_str()) {
                if validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use tempfile::tempdir;

    #[test]
    fn file_missing_slot_reads_none() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        assert_eq!(backend.read("game").unwrap(), None);
        assert!(!backend.exists("game").unwrap());
    }

    #[test]
    fn file_write_and_read() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());

        backend.write("game", b"hello world").unwrap();
        assert_eq!(backend.read("game").unwrap(), Some(b"hello world".to_vec()));
        assert!(dir.path().join("game.sav").is_file());
    }

    #[test]
    fn file_write_replaces_payload() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());

        backend.write("game", b"a much longer first payload").unwrap();
        backend.write("game", b"short").unwrap();
        assert_eq!(backend.read("game").unwrap(), Some(b"short".to_vec()));
    }

    #[test]
    fn file_write_creates_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("saves");
        let mut backend = FileBackend::new(&root);

        backend.write("game", b"x").unwrap();
        assert!(root.join("game.sav").is_file());
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();

        {
            let mut backend = FileBackend::new(dir.path());
            backend.write("game", b"persistent data").unwrap();
        }

        let backend = FileBackend::new(dir.path());
        assert_eq!(
            backend.read("game").unwrap(),
            Some(b"persistent data".to_vec())
        );
    }

    #[test]
    fn file_remove() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());

        backend.write("game", b"x").unwrap();
        assert!(backend.remove("game").unwrap());
        assert!(!backend.remove("game").unwrap());
        assert!(!dir.path().join("game.sav").exists());
    }

    #[test]
    fn file_list_filters_by_extension() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::with_extension(dir.path(), ".txt");

        backend.write("b", b"").unwrap();
        backend.write("a", b"").unwrap();
        fs::write(dir.path().join("notes.md"), b"").unwrap();
        fs::create_dir(dir.path().join("folder.txt")).unwrap();

        assert_eq!(backend.list().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn file_list_of_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("never-created"));
        assert!(backend.list().unwrap().is_empty());
    }

    #[test]
    fn file_failed_write_removes_temp_file() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());

        // A non-empty directory cannot be replaced by a rename.
        let target = dir.path().join("game.sav");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupant"), b"").unwrap();

        assert!(matches!(
            backend.write("game", b"x"),
            Err(StorageError::Io(_))
        ));
        assert!(!dir.path().join(".game.sav.tmp").exists());
        assert!(target.join("occupant").exists());
    }

    #[test]
    fn file_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());
        assert!(matches!(
            backend.write("../outside", b"x"),
            Err(StorageError::InvalidName { .. })
        ));
    }

    #[test]
    fn file_custom_extension() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::with_extension(dir.path(), ".prefs");
        assert_eq!(backend.extension(), ".prefs");
        assert_eq!(
            backend.path_for("game").unwrap(),
            dir.path().join("game.prefs")
        );
    }
}
