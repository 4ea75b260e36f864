// ============================================================
// CATALOG SNAPSHOT FILE
// ============================================================
// Load and save the content store and translation records as JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::memory::{ContentSnapshot, MemoryStore};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::translations::{
    MemoryLinker, NoopLinker, TranslationLinker, TranslationSnapshot,
};

/// On-disk catalog. A file without a `translations` section describes a
/// store that has no translation-linking capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub content: ContentSnapshot,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<TranslationSnapshot>,
}

/// Translation linker chosen from what the snapshot provides
pub enum Linker {
    Available(MemoryLinker),
    Absent(NoopLinker),
}

impl Linker {
    pub fn as_dyn_mut(&mut self) -> &mut dyn TranslationLinker {
        match self {
            Linker::Available(linker) => linker,
            Linker::Absent(linker) => linker,
        }
    }

    fn into_snapshot(self) -> Option<TranslationSnapshot> {
        match self {
            Linker::Available(linker) => Some(linker.into_snapshot()),
            Linker::Absent(_) => None,
        }
    }
}

impl CatalogSnapshot {
    /// Read the snapshot at `path`. A missing file means there is no content
    /// store to work against.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::HostUnavailable(format!(
                "content store snapshot not found: {}",
                path.display()
            )));
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::StoreError(format!("Invalid snapshot {}: {}", path.display(), e))
        })
    }

    /// Write the snapshot through a temporary sibling file and rename it in
    /// place, so an interrupted save never leaves a truncated catalog.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Split into a live store and linker
    pub fn into_parts(self) -> (MemoryStore, Linker) {
        let linker = match self.translations {
            Some(translations) => Linker::Available(MemoryLinker::from_snapshot(translations)),
            None => Linker::Absent(NoopLinker),
        };
        (MemoryStore::from_snapshot(self.content), linker)
    }

    /// Reassemble a snapshot from a live store and linker
    pub fn from_parts(store: MemoryStore, linker: Linker) -> Self {
        Self {
            content: store.into_snapshot(),
            translations: linker.into_snapshot(),
        }
    }
}
