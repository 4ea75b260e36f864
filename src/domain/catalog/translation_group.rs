// ============================================================
// TRANSLATION GROUP
// ============================================================
// Per-language entity ids considered translations of one another

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::EntityId;

/// Set of `{language: entity_id}` pairs; at most one entity per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationGroup(BTreeMap<String, EntityId>);

impl TranslationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity registered for `lang`
    pub fn get(&self, lang: &str) -> Option<EntityId> {
        self.0.get(lang).copied()
    }

    /// Register `id` for `lang`, replacing any previous entry for that language
    pub fn insert(&mut self, lang: &str, id: EntityId) {
        self.0.insert(lang.to_string(), id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.0.values().any(|&member| member == id)
    }

    /// Drop whatever language entry points at `id`
    pub fn remove_entity(&mut self, id: EntityId) {
        self.0.retain(|_, member| *member != id);
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.values().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, EntityId)> for TranslationGroup {
    fn from_iter<I: IntoIterator<Item = (L, EntityId)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, id)| (l.into(), id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_entity_per_language() {
        let mut group = TranslationGroup::new();
        group.insert("bg", 10);
        group.insert("en", 11);
        group.insert("en", 12);

        assert_eq!(group.len(), 2);
        assert_eq!(group.get("en"), Some(12));
        assert!(!group.contains(11));
    }
}
