// ============================================================
// ENTITY LOCATOR
// ============================================================
// Find the canonical entity a CSV row refers to

use crate::domain::catalog::{EntityId, ObjectKind, PRODUCT_POST_TYPES};
use crate::domain::error::Result;
use crate::infrastructure::store::ContentStore;
use crate::infrastructure::translations::TranslationLinker;

/// Canonical term matched by an external identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub id: EntityId,

    /// How many terms carried the identifier; the lowest id is used
    pub candidates: usize,
}

/// Which attribute identified a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductMatch {
    Sku(EntityId),
    Fallback(EntityId),
}

/// Strip the `id.` marker and leading `!` from an exported group identifier
/// (`id.291608440944460608` -> `291608440944460608`).
pub fn clean_group_id(raw: &str) -> String {
    raw.trim()
        .replace("id.", "")
        .trim_start_matches('!')
        .to_string()
}

/// Canonical term of `taxonomy` whose `key` attribute equals `group_id`.
///
/// Translations carry the identifier too, so terms already tagged with
/// `dest_lang` are passed over. Several remaining matches are not an
/// error: the first one is taken.
pub fn locate_term(
    store: &dyn ContentStore,
    linker: &dyn TranslationLinker,
    taxonomy: &str,
    key: &str,
    group_id: &str,
    dest_lang: &str,
) -> Result<Option<TermMatch>> {
    if group_id.is_empty() {
        return Ok(None);
    }

    let mut ids = Vec::new();
    for id in store.find_terms_by_attribute(taxonomy, key, group_id)? {
        if linker.language_of(ObjectKind::Term, id)?.as_deref() != Some(dest_lang) {
            ids.push(id);
        }
    }
    Ok(ids.first().map(|&id| TermMatch {
        id,
        candidates: ids.len(),
    }))
}

/// Product or variation whose `sku_key` equals `code`, falling back to
/// `fallback_key` (e.g. a barcode) when no SKU matches.
///
/// Copied attributes make translations match as well; products tagged with
/// a language other than `source_lang` are passed over.
pub fn locate_product(
    store: &dyn ContentStore,
    linker: &dyn TranslationLinker,
    sku_key: &str,
    fallback_key: Option<&str>,
    code: &str,
    source_lang: &str,
) -> Result<Option<ProductMatch>> {
    if code.is_empty() {
        return Ok(None);
    }
    let first_canonical = |key: &str| -> Result<Option<EntityId>> {
        for id in store.find_posts_by_attribute(key, code, PRODUCT_POST_TYPES)? {
            match linker.language_of(ObjectKind::Post, id)? {
                Some(lang) if lang != source_lang => continue,
                _ => return Ok(Some(id)),
            }
        }
        Ok(None)
    };

    if let Some(id) = first_canonical(sku_key)? {
        return Ok(Some(ProductMatch::Sku(id)));
    }
    let Some(fallback_key) = fallback_key.filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    Ok(first_canonical(fallback_key)?.map(ProductMatch::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CreateOutcome, NewPost, NewTerm};
    use crate::infrastructure::store::MemoryStore;
    use crate::infrastructure::translations::{MemoryLinker, NoopLinker};
    use serde_json::json;

    fn add_term(store: &mut MemoryStore, slug: &str, group_id: &str) -> EntityId {
        let CreateOutcome::Created(id) = store.create_term(NewTerm {
            taxonomy: "product_cat".to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            parent: 0,
        }) else {
            panic!("term not created");
        };
        store
            .add_attribute(ObjectKind::Term, id, "bizzio_group_id", json!(group_id))
            .unwrap();
        id
    }

    fn add_post(store: &mut MemoryStore, post_type: &str, slug: &str) -> EntityId {
        let CreateOutcome::Created(id) = store.create_post(NewPost {
            post_type: post_type.to_string(),
            status: "publish".to_string(),
            author: 1,
            parent: 0,
            menu_order: 0,
            title: slug.to_string(),
            slug: slug.to_string(),
        }) else {
            panic!("post not created");
        };
        id
    }

    #[test]
    fn test_clean_group_id() {
        assert_eq!(clean_group_id("id.291608440944460608"), "291608440944460608");
        assert_eq!(clean_group_id("!!id.42"), "42");
        assert_eq!(clean_group_id("id.!7"), "7");
        assert_eq!(clean_group_id(" 123 "), "123");
    }

    #[test]
    fn test_locate_term_takes_first_of_many() {
        let mut store = MemoryStore::new();
        let first = add_term(&mut store, "a", "123");
        add_term(&mut store, "b", "123");

        let found = locate_term(&store, &NoopLinker, "product_cat", "bizzio_group_id", "123", "en")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first);
        assert_eq!(found.candidates, 2);
    }

    #[test]
    fn test_locate_term_passes_over_translations() {
        let mut store = MemoryStore::new();
        let mut linker = MemoryLinker::new();
        let translation = add_term(&mut store, "chairs", "123");
        let canonical = add_term(&mut store, "stolove", "123");
        linker.set_language(ObjectKind::Term, translation, "en").unwrap();
        linker.set_language(ObjectKind::Term, canonical, "bg").unwrap();

        let found = locate_term(&store, &linker, "product_cat", "bizzio_group_id", "123", "en")
            .unwrap()
            .unwrap();
        assert_eq!(found, TermMatch { id: canonical, candidates: 1 });
    }

    #[test]
    fn test_locate_term_missing() {
        let store = MemoryStore::new();
        let found = locate_term(&store, &NoopLinker, "product_cat", "bizzio_group_id", "123", "en");
        assert_eq!(found.unwrap(), None);
    }

    #[test]
    fn test_locate_product_by_sku_then_barcode() {
        let mut store = MemoryStore::new();
        let chair = add_post(&mut store, "product", "chair");
        let variation = add_post(&mut store, "product_variation", "chair-red");
        let page = add_post(&mut store, "page", "about");
        store.add_attribute(ObjectKind::Post, chair, "_sku", json!("CH-1")).unwrap();
        store.add_attribute(ObjectKind::Post, variation, "_barcode", json!("3800001")).unwrap();
        store.add_attribute(ObjectKind::Post, page, "_barcode", json!("CH-9")).unwrap();

        let locate = |code: &str, fallback: Option<&str>| {
            locate_product(&store, &NoopLinker, "_sku", fallback, code, "bg").unwrap()
        };
        assert_eq!(locate("CH-1", Some("_barcode")), Some(ProductMatch::Sku(chair)));
        assert_eq!(locate("3800001", Some("_barcode")), Some(ProductMatch::Fallback(variation)));
        assert_eq!(locate("3800001", None), None);
        // Pages never match
        assert_eq!(locate("CH-9", Some("_barcode")), None);
    }

    #[test]
    fn test_locate_product_passes_over_translations() {
        let mut store = MemoryStore::new();
        let mut linker = MemoryLinker::new();
        let english = add_post(&mut store, "product", "chair-en");
        let canonical = add_post(&mut store, "product", "stol");
        store.add_attribute(ObjectKind::Post, english, "_sku", json!("CH-1")).unwrap();
        store.add_attribute(ObjectKind::Post, canonical, "_sku", json!("CH-1")).unwrap();
        linker.set_language(ObjectKind::Post, english, "en").unwrap();

        let found = locate_product(&store, &linker, "_sku", None, "CH-1", "bg").unwrap();
        assert_eq!(found, Some(ProductMatch::Sku(canonical)));
    }
}
