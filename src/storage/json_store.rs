use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{EntryUpdate, LogEntry, NewEntry};
use crate::error::{Result, WeeklogError};

/// On-disk layout: a single JSON document with a top-level `logs` array.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    logs: Vec<LogEntry>,
}

/// Flat-file store for log entries.
///
/// Every mutation reads the whole document, changes it in memory, and
/// rewrites the file. Mutations are serialized through one in-process lock;
/// cross-process writers still race at the OS file level.
pub struct JsonStore {
    doc: Mutex<Document>,
    path: PathBuf,
}

impl JsonStore {
    /// Create a fresh, empty log database at `path`.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(WeeklogError::AlreadyInitialized(path.display().to_string()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            doc: Mutex::new(Document::default()),
            path: path.to_path_buf(),
        };
        store.save()?;

        Ok(store)
    }

    /// Open an existing log database.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WeeklogError::NotInitialized);
        }

        let bytes = fs::read(path)?;
        let doc: Document = serde_json::from_slice(&bytes)?;

        Ok(Self {
            doc: Mutex::new(doc),
            path: path.to_path_buf(),
        })
    }

    /// Rewrite the whole document to disk.
    fn save(&self) -> Result<()> {
        let doc = self.lock()?;
        let json = serde_json::to_string_pretty(&*doc)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Document>> {
        self.doc
            .lock()
            .map_err(|_| WeeklogError::Storage("store lock poisoned".to_string()))
    }

    /// All entries in insertion order.
    pub fn list(&self) -> Result<Vec<LogEntry>> {
        Ok(self.lock()?.logs.clone())
    }

    /// Look up a single entry by id.
    pub fn get(&self, id: &Uuid) -> Result<Option<LogEntry>> {
        Ok(self.lock()?.logs.iter().find(|e| e.id == *id).cloned())
    }

    /// Validate and append a new entry, assigning `id` and `timestamp`.
    pub fn create(&self, new: NewEntry) -> Result<LogEntry> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(WeeklogError::InvalidEntry("title is required".to_string()));
        }

        let entry = LogEntry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: new.description,
            image_url: new.image_url.filter(|u| !u.is_empty()),
            tags: new.tags,
            timestamp: Some(Utc::now()),
        };

        self.lock()?.logs.push(entry.clone());
        self.save()?;

        Ok(entry)
    }

    /// Replace an entry's mutable fields, preserving `id` and `timestamp`.
    pub fn update(&self, id: &Uuid, update: EntryUpdate) -> Result<LogEntry> {
        let title = update.title.trim();
        if title.is_empty() {
            return Err(WeeklogError::InvalidEntry("title is required".to_string()));
        }

        let updated = {
            let mut doc = self.lock()?;
            let entry = doc
                .logs
                .iter_mut()
                .find(|e| e.id == *id)
                .ok_or_else(|| WeeklogError::EntryNotFound(id.to_string()))?;

            entry.title = title.to_string();
            entry.description = update.description;
            entry.image_url = update.image_url.filter(|u| !u.is_empty());
            entry.tags = update.tags;
            entry.clone()
        };
        self.save()?;

        Ok(updated)
    }

    /// Remove an entry by id.
    pub fn delete(&self, id: &Uuid) -> Result<()> {
        {
            let mut doc = self.lock()?;
            let before = doc.logs.len();
            doc.logs.retain(|e| e.id != *id);
            if doc.logs.len() == before {
                return Err(WeeklogError::EntryNotFound(id.to_string()));
            }
        }
        self.save()?;

        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
