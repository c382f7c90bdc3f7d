use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::info;
use uuid::Uuid;

use crate::domain::InvestigationSnapshot;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "LandedCostAnalyzer";
const APP_NAME: &str = "LandedCostAnalyzer";

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Receives finished investigations. Implemented by whatever store the host
/// application uses.
pub trait SnapshotSink {
    fn save(&self, snapshot: &InvestigationSnapshot) -> Result<(), PersistSaveError>;
}

/// Writes one pretty-printed JSON file per snapshot into a directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self, PersistSaveError> {
        project_dirs()
            .map(|dirs| Self::new(dirs.data_dir().join("investigations")))
            .ok_or(PersistSaveError::StorageUnavailable)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    pub fn load(&self, id: &Uuid) -> Result<InvestigationSnapshot, PersistSaveError> {
        let data = fs::read_to_string(self.snapshot_path(id))?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Every readable snapshot for a product, oldest first.
    pub fn list_for_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<InvestigationSnapshot>, PersistSaveError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Ok(data) = fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(snapshot) = serde_json::from_str::<InvestigationSnapshot>(&data) {
                if snapshot.product_id == product_id {
                    snapshots.push(snapshot);
                }
            }
        }
        snapshots.sort_by_key(|s| s.updated_at);
        Ok(snapshots)
    }
}

impl SnapshotSink for JsonFileStore {
    fn save(&self, snapshot: &InvestigationSnapshot) -> Result<(), PersistSaveError> {
        fs::create_dir_all(&self.root)?;
        let path = self.snapshot_path(&snapshot.id);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        info!(
            product = %snapshot.product_id,
            snapshot = %snapshot.id,
            path = %path.display(),
            "saved investigation snapshot"
        );
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AuditContext, CompetitorQuote, Investigation, ProductConfig, SupplierQuote,
    };

    fn snapshot(product: &str) -> InvestigationSnapshot {
        let mut inv = Investigation::new(product, ProductConfig::default(), 3.7).unwrap();
        inv.add_supplier(SupplierQuote::new("S", 9.0, 0.0)).unwrap();
        inv.add_competitor(CompetitorQuote::new("C", 50.0)).unwrap();
        inv.snapshot(&AuditContext::now("tester"), 30).unwrap()
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("snapshots"));

        let saved = snapshot("sku-1");
        store.save(&saved).unwrap();
        assert_eq!(store.load(&saved.id).unwrap(), saved);
    }

    #[test]
    fn test_list_filters_by_product() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.save(&snapshot("sku-1")).unwrap();
        store.save(&snapshot("sku-2")).unwrap();
        store.save(&snapshot("sku-1")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_for_product("sku-1").unwrap().len(), 2);
        assert_eq!(store.list_for_product("sku-3").unwrap().len(), 0);
    }

    #[test]
    fn test_missing_snapshot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load(&Uuid::new_v4()),
            Err(PersistSaveError::Io(_))
        ));
        let empty = JsonFileStore::new(dir.path().join("never-created"));
        assert!(empty.list_for_product("sku-1").unwrap().is_empty());
    }
}
