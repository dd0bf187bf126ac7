use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use snafu::ResultExt;

use super::PreferenceStore;
use super::error::{
    CreateDirSnafu, RenameTempFileSnafu, SerializePreferencesSnafu, StorageResult, WriteFileSnafu,
};

pub const PREFERENCES_DIRECTORY_NAME: &str = "parley";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

type PreferenceMap = BTreeMap<String, String>;

/// Flat key-value preferences persisted as one JSON object.
pub struct JsonPreferenceStore {
    values: Arc<ArcSwap<PreferenceMap>>,
    path: PathBuf,
    // Serializes read-modify-write cycles; readers go through the snapshot.
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(PREFERENCES_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".parley"))
    }

    pub fn default_path() -> PathBuf {
        Self::default_dir().join(PREFERENCES_FILE_NAME)
    }

    pub fn open(path: PathBuf) -> Self {
        let values = Self::load_from_disk(&path);
        Self {
            values: Arc::new(ArcSwap::from_pointee(values)),
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> PreferenceMap {
        if !path.exists() {
            tracing::info!("preferences file not found at {:?}, using defaults", path);
            return PreferenceMap::new();
        }

        let figment =
            Figment::from(Serialized::defaults(PreferenceMap::new())).merge(Json::file(path));

        match figment.extract::<PreferenceMap>() {
            Ok(values) => values,
            Err(error) => {
                tracing::warn!(
                    "failed to parse preferences from {:?}: {}. using defaults",
                    path,
                    error
                );
                PreferenceMap::new()
            }
        }
    }

    fn persist(&self, values: &PreferenceMap) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-preferences-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(values).context(SerializePreferencesSnafu {
            stage: "serialize-preferences-json",
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-preferences-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.path).context(RenameTempFileSnafu {
            stage: "rename-temporary-preferences-file",
            from: temp_path,
            to: self.path.clone(),
        })?;

        tracing::debug!("saved preferences to {:?}", self.path);
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.load().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = PreferenceMap::clone(&self.values.load());
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        self.values.store(Arc::new(next));
        Ok(())
    }
}

/// Volatile preference store for tests and headless runs.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: ArcSwap<PreferenceMap>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.load().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values.rcu(|current| {
            let mut next = PreferenceMap::clone(current);
            next.insert(key.to_string(), value.to_string());
            next
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);

        let store = JsonPreferenceStore::open(path.clone());
        assert_eq!(store.get("themeMode").unwrap(), None);
        store.set("themeMode", "dark").unwrap();

        let reopened = JsonPreferenceStore::open(path.clone());
        assert_eq!(reopened.get("themeMode").unwrap().as_deref(), Some("dark"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonPreferenceStore::open(path);
        assert_eq!(store.get("themeMode").unwrap(), None);
    }

    #[test]
    fn memory_store_overwrites_values() {
        let store = MemoryPreferenceStore::new();
        store.set("themeMode", "light").unwrap();
        store.set("themeMode", "system").unwrap();
        assert_eq!(store.get("themeMode").unwrap().as_deref(), Some("system"));
    }
}
