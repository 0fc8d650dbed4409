//! Persisted layout records and their storage backends.
//!
//! One JSON document per device class holds every edited container, keyed by
//! scene name, parent class name and the `"index,ClassName"` slot key. The
//! document is loaded once at startup and rewritten whole on every persisted
//! change; it stays readable in any structured-data editor.

use crate::config::DeviceClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Persisted snapshot of one container's editable attributes.
///
/// Position is always present; the remaining fields only apply to
/// window-like containers and are omitted from the document when unset.
/// The formula-valued fields keep the entered expression text so it can be
/// re-evaluated on display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_opacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_face: Option<String>,
}

/// Composite child key: sibling index plus class name.
///
/// This is a structural key, not an identity: reordering same-class children
/// of one parent silently re-attributes their records.
pub fn slot_key(index: usize, class_name: &str) -> String {
    format!("{index},{class_name}")
}

/// The whole persisted document: scene → parent class → slot key → record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutDocument(pub BTreeMap<String, BTreeMap<String, BTreeMap<String, LayoutRecord>>>);

impl LayoutDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scene: &str, parent: &str, key: &str) -> Option<&LayoutRecord> {
        self.0.get(scene)?.get(parent)?.get(key)
    }

    pub fn insert(&mut self, scene: &str, parent: &str, key: String, record: LayoutRecord) {
        self.0
            .entry(scene.to_string())
            .or_default()
            .entry(parent.to_string())
            .or_default()
            .insert(key, record);
    }

    /// Drop every record persisted for a scene.
    pub fn clear_scene(&mut self, scene: &str) {
        self.0.remove(scene);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trait for layout document storage backends.
///
/// Deliberately synchronous: the documents are small, writes are infrequent,
/// and the frame that triggered a write is not done until the write is.
pub trait Storage: Send + Sync {
    /// Save a document under the given file name.
    fn save(&self, name: &str, document: &LayoutDocument) -> StorageResult<()>;

    /// Load a document by file name.
    fn load(&self, name: &str) -> StorageResult<LayoutDocument>;

    /// Check whether a document exists.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}

/// File-based storage: documents as JSON files in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory if
    /// it does not exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location,
    /// `<local data dir>/designmode/data/`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("could not determine home directory".to_string()))?;
        Self::new(base.join("designmode").join("data"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl Storage for FileStorage {
    fn save(&self, name: &str, document: &LayoutDocument) -> StorageResult<()> {
        let path = self.document_path(name);
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("failed to write {}: {e}", path.display())))
    }

    fn load(&self, name: &str) -> StorageResult<LayoutDocument> {
        let path = self.document_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("failed to parse {}: {e}", path.display()))
        })
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.document_path(name).exists())
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryStorage {
    documents: std::sync::Mutex<std::collections::HashMap<String, LayoutDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, document: &LayoutDocument) -> StorageResult<()> {
        self.documents
            .lock()
            .expect("storage poisoned")
            .insert(name.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> StorageResult<LayoutDocument> {
        self.documents
            .lock()
            .expect("storage poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self
            .documents
            .lock()
            .expect("storage poisoned")
            .contains_key(name))
    }
}

/// Write-through layout store owned by a session.
///
/// Holds the in-memory document for one device class; `save_container`
/// overwrites a single key and, with autosave on, serializes the whole
/// document through the backend.
pub struct LayoutStore<S: Storage> {
    storage: S,
    document: LayoutDocument,
    document_name: String,
    auto_save: bool,
}

impl<S: Storage> LayoutStore<S> {
    /// Load the document for `device` from `storage`.
    ///
    /// A missing or corrupt document degrades to an empty one; the editor
    /// must come up regardless.
    pub fn open(storage: S, device: DeviceClass, auto_save: bool) -> Self {
        let document_name = device.document_name().to_string();
        let document = match storage.load(&document_name) {
            Ok(document) => document,
            Err(StorageError::NotFound(_)) => {
                log::warn!("{document_name} was not found, starting with an empty layout");
                LayoutDocument::new()
            }
            Err(e) => {
                log::warn!("failed to load {document_name}: {e}, starting with an empty layout");
                LayoutDocument::new()
            }
        };
        Self {
            storage,
            document,
            document_name,
            auto_save,
        }
    }

    /// Look up the record persisted for a container slot.
    pub fn lookup(
        &self,
        scene: &str,
        parent: &str,
        index: usize,
        class_name: &str,
    ) -> Option<&LayoutRecord> {
        self.document.get(scene, parent, &slot_key(index, class_name))
    }

    /// Overwrite a container's record and write through when autosaving.
    pub fn save_container(
        &mut self,
        scene: &str,
        parent: &str,
        index: usize,
        class_name: &str,
        record: LayoutRecord,
    ) -> StorageResult<()> {
        self.document
            .insert(scene, parent, slot_key(index, class_name), record);
        if self.auto_save {
            self.write()
        } else {
            Ok(())
        }
    }

    /// Serialize the whole document to the backend.
    pub fn write(&self) -> StorageResult<()> {
        self.storage.save(&self.document_name, &self.document)
    }

    /// Drop every record for `scene` and write the document out.
    pub fn clear_scene(&mut self, scene: &str) -> StorageResult<()> {
        self.document.clear_scene(scene);
        self.write()
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record() -> LayoutRecord {
        LayoutRecord {
            x: 120.0,
            y: 48.0,
            width: Some(320.0),
            height: Some(144.0),
            opacity: Some(255),
            hidden: Some(false),
            line_height: Some("36".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = LayoutDocument::new();
        doc.insert(
            "MenuScene",
            "WindowLayer",
            slot_key(0, "GoldWindow"),
            sample_record(),
        );

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: LayoutDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
        assert!(parsed.get("MenuScene", "WindowLayer", "0,GoldWindow").is_some());
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let record = LayoutRecord {
            x: 10.0,
            y: 20.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("width"));
        assert!(!json.contains("font_face"));
    }

    #[test]
    fn test_clear_scene() {
        let mut doc = LayoutDocument::new();
        doc.insert("A", "WindowLayer", slot_key(0, "W"), sample_record());
        doc.insert("B", "WindowLayer", slot_key(0, "W"), sample_record());
        doc.clear_scene("A");
        assert!(doc.get("A", "WindowLayer", "0,W").is_none());
        assert!(doc.get("B", "WindowLayer", "0,W").is_some());
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let mut doc = LayoutDocument::new();
        doc.insert("S", "WindowLayer", slot_key(1, "W"), sample_record());

        storage.save("ContainerProperties.json", &doc).unwrap();
        let loaded = storage.load("ContainerProperties.json").unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let result = storage.load("nope.json");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_open_degrades_to_empty_on_missing_document() {
        let store = LayoutStore::open(MemoryStorage::new(), DeviceClass::Desktop, false);
        assert!(store.document().is_empty());
    }

    #[test]
    fn test_open_degrades_to_empty_on_corrupt_document() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("ContainerProperties.json"), "{oops").unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let store = LayoutStore::open(storage, DeviceClass::Desktop, false);
        assert!(store.document().is_empty());
    }

    #[test]
    fn test_autosave_writes_through() {
        let mut store = LayoutStore::open(MemoryStorage::new(), DeviceClass::Desktop, true);
        store
            .save_container("S", "WindowLayer", 0, "W", sample_record())
            .unwrap();

        let persisted = store
            .storage
            .load(DeviceClass::Desktop.document_name())
            .unwrap();
        assert!(persisted.get("S", "WindowLayer", "0,W").is_some());
    }

    #[test]
    fn test_manual_save_defers_write() {
        let mut store = LayoutStore::open(MemoryStorage::new(), DeviceClass::Desktop, false);
        store
            .save_container("S", "WindowLayer", 0, "W", sample_record())
            .unwrap();
        assert!(matches!(
            store.storage.load(DeviceClass::Desktop.document_name()),
            Err(StorageError::NotFound(_))
        ));

        store.write().unwrap();
        assert!(store
            .storage
            .load(DeviceClass::Desktop.document_name())
            .is_ok());
    }

    #[test]
    fn test_mobile_device_uses_its_own_document() {
        let mut store = LayoutStore::open(MemoryStorage::new(), DeviceClass::Mobile, true);
        store
            .save_container("S", "WindowLayer", 0, "W", sample_record())
            .unwrap();
        assert!(store
            .storage
            .load(DeviceClass::Mobile.document_name())
            .is_ok());
        assert!(matches!(
            store.storage.load(DeviceClass::Desktop.document_name()),
            Err(StorageError::NotFound(_))
        ));
    }
}
