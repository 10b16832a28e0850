//! Flat JSON document store for saved designs.
//!
//! One `<id>.json` file per design under a root directory. Contents are not
//! validated here; the store is a load/save target only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagram::Diagram;
use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub diagram: Diagram,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry, without the diagram body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&DesignRecord> for DesignSummary {
    fn from(record: &DesignRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DesignStore {
    root: PathBuf,
}

impl DesignStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under `~/.sysdesign/designs/`.
    pub fn open_default() -> Self {
        Self::new(crate::data_dir().join("designs"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    /// All saved designs, sorted by name then id.
    pub fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable design");
                    continue;
                }
            };
            match serde_json::from_str::<DesignRecord>(&raw) {
                Ok(record) => summaries.push(DesignSummary::from(&record)),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable design"),
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    pub fn load(&self, id: &str) -> Result<DesignRecord, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Create a new record with a fresh id.
    pub fn create(&self, name: &str, diagram: Diagram) -> Result<DesignRecord, StoreError> {
        let record = DesignRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            diagram,
            updated_at: Utc::now(),
        };
        self.save(record)
    }

    /// Write a record, stamping `updated_at`.
    ///
    /// Uses temp file + rename so readers never observe a half-written file.
    pub fn save(&self, mut record: DesignRecord) -> Result<DesignRecord, StoreError> {
        let path = self.path_for(&record.id)?;
        record.updated_at = Utc::now();
        fs::create_dir_all(&self.root)?;
        let tmp = self.root.join(format!(".{}.json.tmp", record.id));
        let json = serde_json::to_string_pretty(&record)?;
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(id = %record.id, name = %record.name, "saved design");
        Ok(record)
    }

    /// Delete a design. Deleting a missing design is not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(id, "deleted design");
        }
        Ok(())
    }
}
