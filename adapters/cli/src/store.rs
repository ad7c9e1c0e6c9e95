use std::{fs, path::PathBuf};

use geocoin_system_persistence::{KeyValueStore, StoreError};

/// Key-value store that keeps each key as a file inside one directory.
#[derive(Debug)]
pub(crate) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the provided directory.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.root.join(key)).ok()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|error| StoreError::new(error.to_string()))?;
        fs::write(self.root.join(key), value).map_err(|error| StoreError::new(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use geocoin_system_persistence::KeyValueStore;

    #[test]
    fn values_round_trip_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileStore::new(dir.path().to_path_buf());

        store
            .set("geocoin.save", "{\"payload\":true}".to_owned())
            .expect("write succeeds");
        assert_eq!(
            store.get("geocoin.save"),
            Some("{\"payload\":true}".to_owned())
        );
    }

    #[test]
    fn missing_keys_read_as_absent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.get("geocoin.save"), None);
    }
}
