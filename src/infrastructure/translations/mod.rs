// ============================================================
// TRANSLATION LINKING
// ============================================================
// Language tags and translation groups of terms and posts

pub mod memory;

use crate::domain::catalog::{EntityId, ObjectKind, TranslationGroup};
use crate::domain::error::Result;

pub use memory::{MemoryLinker, TranslationSnapshot};

pub trait TranslationLinker {
    /// Whether translation linking is present at all. When it is not, every
    /// entity stands in as its own translation.
    fn is_available(&self) -> bool {
        true
    }

    fn language_of(&self, kind: ObjectKind, id: EntityId) -> Result<Option<String>>;
    fn set_language(&mut self, kind: ObjectKind, id: EntityId, lang: &str) -> Result<()>;

    /// Translation group containing `id`; empty when it has none
    fn translations(&self, kind: ObjectKind, id: EntityId) -> Result<TranslationGroup>;

    /// Persist `group` for every entity in it, detaching its members from
    /// any group they belonged to before.
    fn save_translations(&mut self, kind: ObjectKind, group: &TranslationGroup) -> Result<()>;
}

/// Linker used when the content store has no translation capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLinker;

impl TranslationLinker for NoopLinker {
    fn is_available(&self) -> bool {
        false
    }

    fn language_of(&self, _kind: ObjectKind, _id: EntityId) -> Result<Option<String>> {
        Ok(None)
    }

    fn set_language(&mut self, _kind: ObjectKind, _id: EntityId, _lang: &str) -> Result<()> {
        Ok(())
    }

    fn translations(&self, _kind: ObjectKind, _id: EntityId) -> Result<TranslationGroup> {
        Ok(TranslationGroup::new())
    }

    fn save_translations(&mut self, _kind: ObjectKind, _group: &TranslationGroup) -> Result<()> {
        Ok(())
    }
}
