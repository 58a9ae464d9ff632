//! Whole-plan persistence in a single named slot.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::StorageError;
use crate::io::file::parse_plan;
use crate::model::Plan;

/// Name of the only slot a store keeps.
pub const PLAN_SLOT: &str = "main";

/// Backend holding the current plan. Every save overwrites the slot.
pub trait PlanStore {
    /// Prepare the backend. Failing here makes the caller fall back.
    fn init(&mut self) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<Plan>, StorageError>;
    fn save(&mut self, plan: &Plan) -> Result<(), StorageError>;
    /// Keep a copy of a slot that could not be loaded, so the next save does
    /// not destroy it. Returns where the copy went, if anywhere.
    fn preserve_unreadable(&mut self) -> Result<Option<PathBuf>, StorageError> {
        Ok(None)
    }
    /// Short description for the status bar.
    fn describe(&self) -> String;
}

/// Stores the plan as `<dir>/main.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", PLAN_SLOT))
    }

    pub fn backup_path(&self) -> PathBuf {
        self.slot_path().with_extension("json.bak")
    }
}

impl PlanStore for FileStore {
    fn init(&mut self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        // The directory must be writable.
        let check = self.dir.join(".write-check");
        std::fs::write(&check, b"").map_err(|e| StorageError::io(&check, e))?;
        let _ = std::fs::remove_file(&check);
        Ok(())
    }

    fn load(&self) -> Result<Option<Plan>, StorageError> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(Some(parse_plan(&json)?))
    }

    fn save(&mut self, plan: &Plan) -> Result<(), StorageError> {
        let path = self.slot_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(plan)?;
        std::fs::write(&tmp, json).map_err(|e| StorageError::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;
        debug!("Saved plan to {:?}", path);
        Ok(())
    }

    fn preserve_unreadable(&mut self) -> Result<Option<PathBuf>, StorageError> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let backup = self.backup_path();
        std::fs::copy(&path, &backup).map_err(|e| StorageError::io(&backup, e))?;
        warn!("Kept unreadable plan as {:?}", backup);
        Ok(Some(backup))
    }

    fn describe(&self) -> String {
        self.slot_path().display().to_string()
    }
}

/// Keeps the serialized plan in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryStore {
    fn init(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn load(&self) -> Result<Option<Plan>, StorageError> {
        match &self.slot {
            Some(json) => Ok(Some(parse_plan(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, plan: &Plan) -> Result<(), StorageError> {
        self.slot = Some(serde_json::to_string(plan)?);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (not persisted)".to_string()
    }
}

/// Open the file store in `dir`, falling back to memory when no directory
/// is available or it cannot be initialised.
pub fn open_store(dir: Option<PathBuf>) -> Box<dyn PlanStore> {
    let Some(dir) = dir else {
        warn!("No data directory available, plans will not be persisted");
        return Box::new(MemoryStore::new());
    };
    let mut store = FileStore::new(dir);
    match store.init() {
        Ok(()) => {
            info!("Using plan store at {}", store.describe());
            Box::new(store)
        }
        Err(e) => {
            warn!("File store unavailable, falling back to memory: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_overwrites_the_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));
        store.init().unwrap();
        assert_eq!(store.load().unwrap(), None);

        let mut plan = Plan::default();
        plan.project_name = "first".into();
        store.save(&plan).unwrap();
        plan.project_name = "second".into();
        store.save(&plan).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.project_name, "second");
        assert!(store.slot_path().ends_with("main.json"));
    }

    #[test]
    fn unreadable_slot_is_copied_aside() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.init().unwrap();
        assert_eq!(store.preserve_unreadable().unwrap(), None);

        std::fs::write(store.slot_path(), "not json").unwrap();
        assert!(store.load().is_err());
        let backup = store.preserve_unreadable().unwrap().unwrap();
        assert_eq!(backup, store.backup_path());
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "not json");
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        store.init().unwrap();
        assert_eq!(store.load().unwrap(), None);
        let plan = Plan::default();
        store.save(&plan).unwrap();
        assert_eq!(store.load().unwrap(), Some(plan));
    }

    #[test]
    fn unusable_directory_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = open_store(Some(blocker.join("nested")));
        assert_eq!(store.describe(), "memory (not persisted)");

        let store = open_store(None);
        assert_eq!(store.describe(), "memory (not persisted)");
    }
}
