// ============================================================
// IN-MEMORY TRANSLATION LINKER
// ============================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TranslationLinker;
use crate::domain::catalog::{EntityId, ObjectKind, TranslationGroup};
use crate::domain::error::{AppError, Result};

/// Serializable state of the translation linker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSnapshot {
    /// Registered language codes; empty accepts any code
    pub languages: Vec<String>,
    pub term_languages: BTreeMap<EntityId, String>,
    pub post_languages: BTreeMap<EntityId, String>,
    pub term_groups: Vec<TranslationGroup>,
    pub post_groups: Vec<TranslationGroup>,
}

#[derive(Debug, Default)]
pub struct MemoryLinker {
    data: TranslationSnapshot,
}

impl MemoryLinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: TranslationSnapshot) -> Self {
        Self { data }
    }

    pub fn snapshot(&self) -> &TranslationSnapshot {
        &self.data
    }

    pub fn into_snapshot(self) -> TranslationSnapshot {
        self.data
    }

    fn languages(&self, kind: ObjectKind) -> &BTreeMap<EntityId, String> {
        match kind {
            ObjectKind::Term => &self.data.term_languages,
            ObjectKind::Post => &self.data.post_languages,
        }
    }

    fn groups(&self, kind: ObjectKind) -> &Vec<TranslationGroup> {
        match kind {
            ObjectKind::Term => &self.data.term_groups,
            ObjectKind::Post => &self.data.post_groups,
        }
    }

    fn groups_mut(&mut self, kind: ObjectKind) -> &mut Vec<TranslationGroup> {
        match kind {
            ObjectKind::Term => &mut self.data.term_groups,
            ObjectKind::Post => &mut self.data.post_groups,
        }
    }

    fn is_registered(&self, lang: &str) -> bool {
        self.data.languages.is_empty() || self.data.languages.iter().any(|l| l == lang)
    }
}

impl TranslationLinker for MemoryLinker {
    fn language_of(&self, kind: ObjectKind, id: EntityId) -> Result<Option<String>> {
        Ok(self.languages(kind).get(&id).cloned())
    }

    fn set_language(&mut self, kind: ObjectKind, id: EntityId, lang: &str) -> Result<()> {
        if !self.is_registered(lang) {
            return Err(AppError::NotFound(format!("language '{}' is not registered", lang)));
        }
        let table = match kind {
            ObjectKind::Term => &mut self.data.term_languages,
            ObjectKind::Post => &mut self.data.post_languages,
        };
        table.insert(id, lang.to_string());
        Ok(())
    }

    fn translations(&self, kind: ObjectKind, id: EntityId) -> Result<TranslationGroup> {
        Ok(self
            .groups(kind)
            .iter()
            .find(|group| group.contains(id))
            .cloned()
            .unwrap_or_default())
    }

    fn save_translations(&mut self, kind: ObjectKind, group: &TranslationGroup) -> Result<()> {
        let members: Vec<EntityId> = group.ids().collect();
        let groups = self.groups_mut(kind);
        for existing in groups.iter_mut() {
            for id in &members {
                existing.remove_entity(*id);
            }
        }
        groups.retain(|g| g.len() > 1);
        if group.len() > 1 {
            groups.push(group.clone());
        }
        Ok(())
    }
}
