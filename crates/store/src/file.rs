use crate::{Result, StorageBackend, StoreError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const VALUE_EXTENSION: &str = "json";

/// Durable storage: one `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));
        std::fs::write(&tmp, value)?;
        if let Err(err) = std::fs::rename(&tmp, &path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                log::debug!("store: could not remove {}: {cleanup}", tmp.display());
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_a_new_backend_instance() {
        let dir = tempdir().unwrap();
        FileBackend::new(dir.path())
            .set_item("u5_checklist_completion", r#"{"u1-s1":true}"#)
            .unwrap();

        let reopened = FileBackend::new(dir.path());
        assert_eq!(
            reopened.get_item("u5_checklist_completion").unwrap().as_deref(),
            Some(r#"{"u1-s1":true}"#)
        );
        assert!(!dir.path().join("u5_checklist_completion.json.tmp").exists());
    }

    #[test]
    fn missing_directory_reads_as_empty() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("not-created-yet"));
        assert_eq!(backend.get_item("site-theme").unwrap(), None);
        backend.remove_item("site-theme").unwrap();
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        for key in ["", "../secret", ".hidden", "a/b", "a b"] {
            assert!(
                matches!(backend.set_item(key, "1"), Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.set_item("u5_contact_draft", "{}").unwrap();
        backend.remove_item("u5_contact_draft").unwrap();
        assert!(!dir.path().join("u5_contact_draft.json").exists());
        assert_eq!(backend.get_item("u5_contact_draft").unwrap(), None);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        // a non-empty directory where the value file should go makes the rename fail
        let blocker = dir.path().join("site-theme.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let backend = FileBackend::new(dir.path());
        assert!(matches!(
            backend.set_item("site-theme", "\"dark\""),
            Err(StoreError::IoError(_))
        ));
        assert!(!dir.path().join("site-theme.json.tmp").exists());
        assert!(blocker.join("keep").exists());
    }
}
