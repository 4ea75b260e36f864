// ============================================================
// HIERARCHY SYNCHRONIZER
// ============================================================
// Re-parent translated terms to mirror the canonical term tree

use crate::domain::catalog::{EntityId, ObjectKind, TermUpdate, NO_PARENT};
use crate::domain::error::Result;
use crate::infrastructure::store::ContentStore;
use crate::infrastructure::translations::TranslationLinker;

/// A canonical term and the translation recorded for it during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyPair {
    pub canonical: EntityId,
    pub translation: EntityId,
}

/// Single flat pass over `pairs`: each translation gets the `lang`
/// translation of its canonical term's parent as parent, or no parent when
/// that parent is not translated yet.
///
/// Parents must be linked before their children (earlier in the file or in
/// a previous run); deeper trees may need a second run. Failures are logged
/// per pair. Returns how many terms were re-parented.
pub fn sync_hierarchy(
    store: &mut dyn ContentStore,
    linker: &dyn TranslationLinker,
    pairs: &[HierarchyPair],
    lang: &str,
) -> usize {
    let mut reparented = 0;
    for pair in pairs {
        match sync_pair(store, linker, *pair, lang) {
            Ok(Some(parent)) => {
                tracing::info!(
                    "Updated parent for Term ID {} -> Parent ID {}",
                    pair.translation,
                    parent
                );
                reparented += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(
                canonical = pair.canonical,
                translation = pair.translation,
                "Parent not synced: {}",
                e
            ),
        }
    }
    reparented
}

/// New parent of the translation when it had to change
fn sync_pair(
    store: &mut dyn ContentStore,
    linker: &dyn TranslationLinker,
    pair: HierarchyPair,
    lang: &str,
) -> Result<Option<EntityId>> {
    // Without linking the canonical term is its own translation
    if pair.canonical == pair.translation {
        return Ok(None);
    }
    let Some(canonical) = store.term(pair.canonical)? else {
        return Ok(None);
    };
    let Some(translation) = store.term(pair.translation)? else {
        return Ok(None);
    };

    let parent = if canonical.parent == NO_PARENT {
        NO_PARENT
    } else {
        linker
            .translations(ObjectKind::Term, canonical.parent)?
            .get(lang)
            .unwrap_or(NO_PARENT)
    };

    if translation.parent == parent {
        return Ok(None);
    }
    store.update_term(
        pair.translation,
        TermUpdate {
            parent: Some(parent),
            ..Default::default()
        },
    )?;
    Ok(Some(parent))
}
