use crate::error::AppError;
use crate::storage::KeyValueStore;
use std::path::{Path, PathBuf};

const DATA_DIR_ENV_VAR: &str = "BOARD_DATA_DIR";
const APP_DIR_NAME: &str = "taskboard";
const BLOB_EXTENSION: &str = "json";

/// Resolves the blob directory: `BOARD_DATA_DIR`, then the configured
/// directory, then the per-user default.
pub fn data_dir(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(DATA_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME).join("data"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join("data"))
    }
}

/// One `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(AppError::invalid_input(format!("invalid storage key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

impl KeyValueStore for JsonDirStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.blob_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.blob_path(key)?;
        std::fs::create_dir_all(&self.root).map_err(|err| AppError::io(err.to_string()))?;
        std::fs::write(&path, value)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.blob_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::io(format!("{}: {}", path.display(), err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonDirStore, data_dir};
    use crate::storage::KeyValueStore;

    #[test]
    fn write_read_and_remove_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path().join("nested"));

        store.write("task-storage", "{\"a\":1}").unwrap();
        assert!(dir.path().join("nested").join("task-storage.json").exists());
        assert_eq!(
            store.read("task-storage").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove("task-storage").unwrap();
        assert_eq!(store.read("task-storage").unwrap(), None);
    }

    #[test]
    fn remove_missing_blob_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        store.remove("activity-storage").unwrap();
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());

        let err = store.write("../outside", "{}").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(store.blob_path("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn blobs_are_private_to_the_user() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        store.write("auth-storage", "{}").unwrap();

        let mode = std::fs::metadata(dir.path().join("auth-storage.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn data_dir_prefers_configured_path_over_default() {
        if std::env::var("BOARD_DATA_DIR").is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let resolved = data_dir(Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path());
    }
}
