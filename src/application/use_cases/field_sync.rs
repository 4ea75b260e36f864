// ============================================================
// FIELD SYNCHRONIZER
// ============================================================
// Copy custom attributes, display fields and taxonomy terms from a
// canonical entity onto its translation

use serde_json::Value;

use super::translation_resolver::TranslationResolver;
use crate::domain::catalog::{
    EntityId, ObjectKind, PostUpdate, TermUpdate, PRODUCT_CATEGORY_TAXONOMY, PRODUCT_TAG_TAXONOMY,
    PRODUCT_TYPE_TAXONOMY,
};
use crate::domain::error::Result;
use crate::infrastructure::store::ContentStore;
use crate::infrastructure::translations::TranslationLinker;

/// Keys owned by the translation-linking subsystem
const LINKER_KEY_PREFIX: &str = "_pll_";

const TERM_EXCLUDED_KEYS: &[&str] = &["_pll_string_translations"];

/// Editor bookkeeping, duplicator markers and display fields written separately
const POST_EXCLUDED_KEYS: &[&str] = &[
    "_edit_lock",
    "_edit_last",
    "post_title",
    "post_content",
    "post_excerpt",
    "pll_sync_post",
    "_dp_original",
    "_icl_lang_duplicate_of",
];

/// SEO title is written under both plugin conventions
pub const SEO_TITLE_KEYS: [&str; 2] = ["_yoast_wpseo_title", "rank_math_title"];
pub const SEO_DESCRIPTION_KEYS: [&str; 2] = ["_yoast_wpseo_metadesc", "rank_math_description"];

/// Whether `key` must never be copied between entities of `kind`
pub fn is_excluded(kind: ObjectKind, key: &str) -> bool {
    if key.starts_with(LINKER_KEY_PREFIX) {
        return true;
    }
    match kind {
        ObjectKind::Term => TERM_EXCLUDED_KEYS.contains(&key),
        ObjectKind::Post => POST_EXCLUDED_KEYS.contains(&key),
    }
}

/// Mirror every non-excluded attribute of `source` onto `target`.
///
/// Each copied key is deleted on the target first and then re-added value
/// by value, so repeated runs never accumulate values. Keys present only on
/// the target are left alone. Returns the number of keys copied.
pub fn copy_attributes(
    store: &mut dyn ContentStore,
    kind: ObjectKind,
    source: EntityId,
    target: EntityId,
) -> Result<usize> {
    if source == target {
        return Ok(0);
    }

    let attributes = store.attributes(kind, source)?;
    let mut copied = 0;
    for (key, values) in attributes.iter() {
        if is_excluded(kind, key) {
            continue;
        }
        store.delete_attribute(kind, target, key)?;
        for value in values {
            store.add_attribute(kind, target, key, value.clone())?;
        }
        copied += 1;
    }

    tracing::debug!(kind = kind.as_str(), source, target, copied, "copied attributes");
    Ok(copied)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Overwrite name and description of term `id`; empty values are ignored.
/// Returns whether anything was written.
pub fn apply_term_display(
    store: &mut dyn ContentStore,
    id: EntityId,
    name: &str,
    description: &str,
) -> Result<bool> {
    let update = TermUpdate {
        name: non_empty(name),
        description: non_empty(description),
        parent: None,
    };
    if update.is_empty() {
        return Ok(false);
    }
    store.update_term(id, update)?;
    Ok(true)
}

/// Overwrite title, content and excerpt of post `id`; empty values are
/// ignored. Returns whether anything was written.
pub fn apply_post_display(
    store: &mut dyn ContentStore,
    id: EntityId,
    title: &str,
    content: &str,
    excerpt: &str,
) -> Result<bool> {
    let update = PostUpdate {
        title: non_empty(title),
        content: non_empty(content),
        excerpt: non_empty(excerpt),
    };
    if update.is_empty() {
        return Ok(false);
    }
    store.update_post(id, update)?;
    Ok(true)
}

/// Write non-empty SEO title and description onto term `id`
pub fn apply_seo(
    store: &mut dyn ContentStore,
    id: EntityId,
    title: &str,
    description: &str,
) -> Result<()> {
    for (keys, value) in [(SEO_TITLE_KEYS, title), (SEO_DESCRIPTION_KEYS, description)] {
        let Some(value) = non_empty(value) else {
            continue;
        };
        for key in keys {
            store.set_attribute(ObjectKind::Term, id, key, Value::String(value.clone()))?;
        }
    }
    Ok(())
}

/// Give `target` the same product type (simple, variable, ...) as `source`
pub fn sync_product_type(
    store: &mut dyn ContentStore,
    source: EntityId,
    target: EntityId,
) -> Result<()> {
    if source == target {
        return Ok(());
    }
    if let Some(&product_type) = store.object_terms(source, PRODUCT_TYPE_TAXONOMY)?.first() {
        store.set_object_terms(target, PRODUCT_TYPE_TAXONOMY, &[product_type])?;
    }
    Ok(())
}

/// Taxonomies whose terms follow a product into its translations:
/// categories, tags and every product-attribute taxonomy.
pub fn synced_taxonomies(store: &dyn ContentStore) -> Result<Vec<String>> {
    let mut taxonomies = vec![
        PRODUCT_CATEGORY_TAXONOMY.to_string(),
        PRODUCT_TAG_TAXONOMY.to_string(),
    ];
    for taxonomy in store.attribute_taxonomies()? {
        if !taxonomies.contains(&taxonomy) {
            taxonomies.push(taxonomy);
        }
    }
    Ok(taxonomies)
}

/// Attach to `target` the `lang` translations of the terms attached to
/// `source`, replacing the previous set per taxonomy.
///
/// A term that cannot be translated is logged and left out; a taxonomy
/// where nothing could be translated is left untouched.
pub fn sync_terms_to_lang(
    store: &mut dyn ContentStore,
    linker: &mut dyn TranslationLinker,
    resolver: &TranslationResolver,
    source: EntityId,
    target: EntityId,
    lang: &str,
) -> Result<()> {
    for taxonomy in synced_taxonomies(&*store)? {
        let source_terms = store.object_terms(source, &taxonomy)?;
        if source_terms.is_empty() {
            continue;
        }

        let mut translated = Vec::with_capacity(source_terms.len());
        for term_id in source_terms {
            match resolver.ensure_term_translation(store, linker, term_id, lang, None) {
                Ok(resolution) => translated.push(resolution.id()),
                Err(e) => {
                    tracing::warn!(
                        term_id,
                        taxonomy = %taxonomy,
                        lang,
                        "Term not translated: {}",
                        e
                    )
                }
            }
        }

        if !translated.is_empty() {
            store.set_object_terms(target, &taxonomy, &translated)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CreateOutcome, NewPost, NewTerm};
    use crate::domain::sync_config::SyncConfig;
    use crate::infrastructure::store::memory::ContentSnapshot;
    use crate::infrastructure::store::MemoryStore;
    use crate::infrastructure::translations::MemoryLinker;
    use serde_json::json;

    fn add_term(store: &mut MemoryStore, taxonomy: &str, name: &str, slug: &str) -> EntityId {
        let CreateOutcome::Created(id) = store.create_term(NewTerm {
            taxonomy: taxonomy.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            parent: 0,
        }) else {
            panic!("term not created");
        };
        id
    }

    fn add_product(store: &mut MemoryStore, slug: &str) -> EntityId {
        let CreateOutcome::Created(id) = store.create_post(NewPost {
            post_type: "product".to_string(),
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
    fn test_exclusions() {
        assert!(is_excluded(ObjectKind::Term, "_pll_string_translations"));
        assert!(is_excluded(ObjectKind::Post, "_pll_anything"));
        assert!(is_excluded(ObjectKind::Post, "_edit_lock"));
        assert!(!is_excluded(ObjectKind::Term, "_edit_lock"));
        assert!(!is_excluded(ObjectKind::Term, "thumbnail_id"));
    }

    #[test]
    fn test_copy_replaces_without_accumulating() {
        let mut store = MemoryStore::new();
        let source = add_term(&mut store, "product_cat", "Столове", "stolove");
        let target = add_term(&mut store, "product_cat", "Chairs", "chairs");
        store.add_attribute(ObjectKind::Term, source, "color", json!("red")).unwrap();
        store.add_attribute(ObjectKind::Term, source, "color", json!("blue")).unwrap();
        store
            .add_attribute(ObjectKind::Term, source, "gallery", json!({"ids": [4, 5]}))
            .unwrap();
        store
            .add_attribute(ObjectKind::Term, source, "_pll_string_translations", json!("x"))
            .unwrap();
        store.add_attribute(ObjectKind::Term, target, "color", json!("green")).unwrap();
        store.add_attribute(ObjectKind::Term, target, "own", json!("kept")).unwrap();

        copy_attributes(&mut store, ObjectKind::Term, source, target).unwrap();
        let copied = copy_attributes(&mut store, ObjectKind::Term, source, target).unwrap();

        let attrs = store.attributes(ObjectKind::Term, target).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(attrs.values("color"), &[json!("red"), json!("blue")]);
        assert_eq!(attrs.values("gallery"), &[json!({"ids": [4, 5]})]);
        assert!(attrs.values("_pll_string_translations").is_empty());
        assert_eq!(attrs.values("own"), &[json!("kept")]);
    }

    #[test]
    fn test_empty_display_values_never_blank_fields() {
        let mut store = MemoryStore::new();
        let term = add_term(&mut store, "product_cat", "Chairs", "chairs");
        store
            .update_term(
                term,
                TermUpdate {
                    description: Some("Seating".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!apply_term_display(&mut store, term, "", "  ").unwrap());
        assert!(apply_term_display(&mut store, term, "Armchairs", "").unwrap());

        let term = store.term(term).unwrap().unwrap();
        assert_eq!(term.name, "Armchairs");
        assert_eq!(term.description, "Seating");
    }

    #[test]
    fn test_post_display_fields() {
        let mut store = MemoryStore::new();
        let post = add_product(&mut store, "chair");

        apply_post_display(&mut store, post, "Chair", "Long text", "").unwrap();
        apply_post_display(&mut store, post, "", "", "Short").unwrap();

        let post = store.post(post).unwrap().unwrap();
        assert_eq!(post.title, "Chair");
        assert_eq!(post.content, "Long text");
        assert_eq!(post.excerpt, "Short");
    }

    #[test]
    fn test_seo_written_under_both_conventions() {
        let mut store = MemoryStore::new();
        let term = add_term(&mut store, "product_cat", "Chairs", "chairs");

        apply_seo(&mut store, term, "Buy chairs", "").unwrap();

        let attrs = store.attributes(ObjectKind::Term, term).unwrap();
        assert!(attrs.matches("_yoast_wpseo_title", "Buy chairs"));
        assert!(attrs.matches("rank_math_title", "Buy chairs"));
        assert!(attrs.values("_yoast_wpseo_metadesc").is_empty());
    }

    #[test]
    fn test_terms_follow_product_into_language() {
        let mut store = MemoryStore::from_snapshot(ContentSnapshot {
            attribute_taxonomies: vec!["pa_color".to_string()],
            ..Default::default()
        });
        let mut linker = MemoryLinker::new();
        let resolver = TranslationResolver::new(&SyncConfig::default());

        let source = add_product(&mut store, "stol");
        let target = add_product(&mut store, "stol-en");
        let category = add_term(&mut store, "product_cat", "Столове", "stolove");
        let color = add_term(&mut store, "pa_color", "Червен", "cherven");
        let simple = add_term(&mut store, "product_type", "simple", "simple");
        store.set_object_terms(source, "product_cat", &[category]).unwrap();
        store.set_object_terms(source, "pa_color", &[color]).unwrap();
        store.set_object_terms(source, "product_type", &[simple]).unwrap();

        sync_product_type(&mut store, source, target).unwrap();
        sync_terms_to_lang(&mut store, &mut linker, &resolver, source, target, "en").unwrap();

        let category_en = linker.translations(ObjectKind::Term, category).unwrap().get("en");
        let color_en = linker.translations(ObjectKind::Term, color).unwrap().get("en");
        assert!(category_en.is_some());
        assert_eq!(store.object_terms(target, "product_cat").unwrap(), vec![category_en.unwrap()]);
        assert_eq!(store.object_terms(target, "pa_color").unwrap(), vec![color_en.unwrap()]);
        assert_eq!(store.object_terms(target, "product_type").unwrap(), vec![simple]);
        assert!(store.object_terms(target, "product_tag").unwrap().is_empty());

        // Second pass reuses the translated terms
        let terms_before = store.snapshot().terms.len();
        sync_terms_to_lang(&mut store, &mut linker, &resolver, source, target, "en").unwrap();
        assert_eq!(store.snapshot().terms.len(), terms_before);
    }
}
