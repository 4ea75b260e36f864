// ============================================================
// IN-MEMORY CONTENT STORE
// ============================================================
// Content store over a snapshot held in memory, with a lookup cache
// for attribute queries

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ContentStore;
use crate::domain::catalog::{
    AttributeSet, CreateOutcome, EntityId, NewPost, NewTerm, ObjectKind, Post, PostUpdate, Term,
    TermUpdate,
};
use crate::domain::error::{AppError, Result};

/// Serializable state of the content store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSnapshot {
    pub terms: BTreeMap<EntityId, Term>,
    pub posts: BTreeMap<EntityId, Post>,
    pub term_attributes: BTreeMap<EntityId, AttributeSet>,
    pub post_attributes: BTreeMap<EntityId, AttributeSet>,

    /// post id -> taxonomy -> attached term ids
    pub relationships: BTreeMap<EntityId, BTreeMap<String, Vec<EntityId>>>,

    /// Product-attribute taxonomies (`pa_color`, `pa_size`, ...)
    pub attribute_taxonomies: Vec<String>,
}

type LookupKey = (ObjectKind, String, String);

pub struct MemoryStore {
    data: ContentSnapshot,
    next_id: EntityId,

    /// (kind, key, value) -> ids carrying that attribute value, ascending
    lookups: RefCell<HashMap<LookupKey, Vec<EntityId>>>,
    invalidation_suspended: bool,
    pending_invalidations: HashSet<(ObjectKind, String)>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_snapshot(ContentSnapshot::default())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: ContentSnapshot) -> Self {
        let max_id = data
            .terms
            .keys()
            .chain(data.posts.keys())
            .copied()
            .max()
            .unwrap_or(0);
        Self {
            data,
            next_id: max_id + 1,
            lookups: RefCell::new(HashMap::new()),
            invalidation_suspended: false,
            pending_invalidations: HashSet::new(),
        }
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.data
    }

    pub fn into_snapshot(self) -> ContentSnapshot {
        self.data
    }

    /// Number of cached attribute lookups
    #[cfg(test)]
    pub(crate) fn cached_lookups(&self) -> usize {
        self.lookups.borrow().len()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn attribute_table(&self, kind: ObjectKind) -> &BTreeMap<EntityId, AttributeSet> {
        match kind {
            ObjectKind::Term => &self.data.term_attributes,
            ObjectKind::Post => &self.data.post_attributes,
        }
    }

    fn exists(&self, kind: ObjectKind, id: EntityId) -> bool {
        match kind {
            ObjectKind::Term => self.data.terms.contains_key(&id),
            ObjectKind::Post => self.data.posts.contains_key(&id),
        }
    }

    fn attributes_mut(&mut self, kind: ObjectKind, id: EntityId) -> Result<&mut AttributeSet> {
        if !self.exists(kind, id) {
            return Err(AppError::NotFound(format!("{} {}", kind.as_str(), id)));
        }
        let table = match kind {
            ObjectKind::Term => &mut self.data.term_attributes,
            ObjectKind::Post => &mut self.data.post_attributes,
        };
        Ok(table.entry(id).or_default())
    }

    /// Ids whose attribute `key` reads as `value`, served from the cache
    fn lookup(&self, kind: ObjectKind, key: &str, value: &str) -> Vec<EntityId> {
        let cache_key = (kind, key.to_string(), value.to_string());
        if let Some(ids) = self.lookups.borrow().get(&cache_key) {
            return ids.clone();
        }

        let ids: Vec<EntityId> = self
            .attribute_table(kind)
            .iter()
            .filter(|(_, attrs)| attrs.matches(key, value))
            .map(|(id, _)| *id)
            .collect();
        self.lookups.borrow_mut().insert(cache_key, ids.clone());
        ids
    }

    fn invalidate(&mut self, kind: ObjectKind, key: &str) {
        if self.invalidation_suspended {
            self.pending_invalidations.insert((kind, key.to_string()));
            return;
        }
        self.lookups
            .borrow_mut()
            .retain(|(k, attr, _), _| !(*k == kind && attr == key));
    }

    fn slug_taken(&self, taxonomy: &str, slug: &str) -> Option<EntityId> {
        self.data
            .terms
            .values()
            .find(|t| t.taxonomy == taxonomy && t.slug == slug)
            .map(|t| t.id)
    }

    fn require_post(&self, id: EntityId) -> Result<()> {
        if self.data.posts.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("post {}", id)))
        }
    }
}

/// Append `-2`, `-3`, ... to `slug` until `taken` rejects it
fn suffix_until_free(slug: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(slug) {
        return slug.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", slug, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| slug.to_string())
}

impl ContentStore for MemoryStore {
    fn term(&self, id: EntityId) -> Result<Option<Term>> {
        Ok(self.data.terms.get(&id).cloned())
    }

    fn find_terms_by_attribute(
        &self,
        taxonomy: &str,
        key: &str,
        value: &str,
    ) -> Result<Vec<EntityId>> {
        Ok(self
            .lookup(ObjectKind::Term, key, value)
            .into_iter()
            .filter(|id| {
                self.data
                    .terms
                    .get(id)
                    .map(|t| t.taxonomy == taxonomy)
                    .unwrap_or(false)
            })
            .collect())
    }

    fn find_terms_by_name(&self, taxonomy: &str, name: &str) -> Result<Vec<EntityId>> {
        Ok(self
            .data
            .terms
            .values()
            .filter(|t| t.taxonomy == taxonomy && t.name == name)
            .map(|t| t.id)
            .collect())
    }

    fn create_term(&mut self, term: NewTerm) -> CreateOutcome {
        let name = term.name.trim();
        if name.is_empty() {
            return CreateOutcome::Failed("A name is required for this term".to_string());
        }
        if term.parent != 0 && !self.data.terms.contains_key(&term.parent) {
            return CreateOutcome::Failed(format!("Parent term {} does not exist", term.parent));
        }
        if let Some(existing) = self.slug_taken(&term.taxonomy, &term.slug) {
            return CreateOutcome::AlreadyExists(existing);
        }

        let id = self.allocate_id();
        self.data.terms.insert(
            id,
            Term {
                id,
                taxonomy: term.taxonomy,
                name: name.to_string(),
                slug: term.slug,
                description: term.description,
                parent: term.parent,
            },
        );
        CreateOutcome::Created(id)
    }

    fn update_term(&mut self, id: EntityId, update: TermUpdate) -> Result<()> {
        if let Some(parent) = update.parent {
            if parent == id {
                return Err(AppError::Conflict(format!("term {} cannot be its own parent", id)));
            }
            if parent != 0 && !self.data.terms.contains_key(&parent) {
                return Err(AppError::NotFound(format!("parent term {}", parent)));
            }
        }
        let term = self
            .data
            .terms
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("term {}", id)))?;
        if let Some(name) = update.name {
            term.name = name;
        }
        if let Some(description) = update.description {
            term.description = description;
        }
        if let Some(parent) = update.parent {
            term.parent = parent;
        }
        Ok(())
    }

    fn unique_term_slug(&self, taxonomy: &str, slug: &str) -> Result<String> {
        Ok(suffix_until_free(slug, |candidate| {
            self.slug_taken(taxonomy, candidate).is_some()
        }))
    }

    fn post(&self, id: EntityId) -> Result<Option<Post>> {
        Ok(self.data.posts.get(&id).cloned())
    }

    fn find_posts_by_attribute(
        &self,
        key: &str,
        value: &str,
        post_types: &[&str],
    ) -> Result<Vec<EntityId>> {
        Ok(self
            .lookup(ObjectKind::Post, key, value)
            .into_iter()
            .filter(|id| {
                self.data
                    .posts
                    .get(id)
                    .map(|p| post_types.contains(&p.post_type.as_str()))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn create_post(&mut self, post: NewPost) -> CreateOutcome {
        if post.post_type.is_empty() {
            return CreateOutcome::Failed("A post type is required".to_string());
        }
        if let Some(existing) = self
            .data
            .posts
            .values()
            .find(|p| p.post_type == post.post_type && p.slug == post.slug)
        {
            return CreateOutcome::AlreadyExists(existing.id);
        }

        let id = self.allocate_id();
        self.data.posts.insert(
            id,
            Post {
                id,
                post_type: post.post_type,
                status: post.status,
                author: post.author,
                parent: post.parent,
                menu_order: post.menu_order,
                title: post.title,
                slug: post.slug,
                content: String::new(),
                excerpt: String::new(),
                created_at: Some(Utc::now()),
            },
        );
        CreateOutcome::Created(id)
    }

    fn update_post(&mut self, id: EntityId, update: PostUpdate) -> Result<()> {
        let post = self
            .data
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;
        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        if let Some(excerpt) = update.excerpt {
            post.excerpt = excerpt;
        }
        Ok(())
    }

    fn unique_post_slug(&self, post_type: &str, slug: &str) -> Result<String> {
        Ok(suffix_until_free(slug, |candidate| {
            self.data
                .posts
                .values()
                .any(|p| p.post_type == post_type && p.slug == candidate)
        }))
    }

    fn attributes(&self, kind: ObjectKind, id: EntityId) -> Result<AttributeSet> {
        if !self.exists(kind, id) {
            return Err(AppError::NotFound(format!("{} {}", kind.as_str(), id)));
        }
        Ok(self.attribute_table(kind).get(&id).cloned().unwrap_or_default())
    }

    fn delete_attribute(&mut self, kind: ObjectKind, id: EntityId, key: &str) -> Result<()> {
        self.attributes_mut(kind, id)?.remove(key);
        self.invalidate(kind, key);
        Ok(())
    }

    fn add_attribute(
        &mut self,
        kind: ObjectKind,
        id: EntityId,
        key: &str,
        value: Value,
    ) -> Result<()> {
        self.attributes_mut(kind, id)?.add(key, value);
        self.invalidate(kind, key);
        Ok(())
    }

    fn set_attribute(
        &mut self,
        kind: ObjectKind,
        id: EntityId,
        key: &str,
        value: Value,
    ) -> Result<()> {
        self.attributes_mut(kind, id)?.set(key, value);
        self.invalidate(kind, key);
        Ok(())
    }

    fn object_terms(&self, post_id: EntityId, taxonomy: &str) -> Result<Vec<EntityId>> {
        self.require_post(post_id)?;
        Ok(self
            .data
            .relationships
            .get(&post_id)
            .and_then(|by_taxonomy| by_taxonomy.get(taxonomy))
            .cloned()
            .unwrap_or_default())
    }

    fn set_object_terms(
        &mut self,
        post_id: EntityId,
        taxonomy: &str,
        terms: &[EntityId],
    ) -> Result<()> {
        self.require_post(post_id)?;
        if let Some(missing) = terms.iter().find(|id| {
            self.data
                .terms
                .get(*id)
                .map(|t| t.taxonomy != taxonomy)
                .unwrap_or(true)
        }) {
            return Err(AppError::NotFound(format!(
                "term {} in taxonomy {}",
                missing, taxonomy
            )));
        }

        let mut unique: Vec<EntityId> = Vec::with_capacity(terms.len());
        for id in terms {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        self.data
            .relationships
            .entry(post_id)
            .or_default()
            .insert(taxonomy.to_string(), unique);
        Ok(())
    }

    fn attribute_taxonomies(&self) -> Result<Vec<String>> {
        Ok(self.data.attribute_taxonomies.clone())
    }

    fn suspend_cache_invalidation(&mut self, suspend: bool) {
        self.invalidation_suspended = suspend;
        if !suspend {
            let pending = std::mem::take(&mut self.pending_invalidations);
            if !pending.is_empty() {
                self.lookups
                    .borrow_mut()
                    .retain(|(kind, key, _), _| !pending.contains(&(*kind, key.clone())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::BulkWrite;
    use serde_json::json;

    fn term(taxonomy: &str, name: &str, slug: &str) -> NewTerm {
        NewTerm {
            taxonomy: taxonomy.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            parent: 0,
        }
    }

    fn created(outcome: CreateOutcome) -> EntityId {
        match outcome {
            CreateOutcome::Created(id) => id,
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[test]
    fn test_create_term_reports_existing_slug() {
        let mut store = MemoryStore::new();
        let id = created(store.create_term(term("product_cat", "Chairs", "chairs")));

        assert_eq!(
            store.create_term(term("product_cat", "Chairs 2", "chairs")),
            CreateOutcome::AlreadyExists(id)
        );
        // Same slug in another taxonomy is fine
        assert!(matches!(
            store.create_term(term("product_tag", "Chairs", "chairs")),
            CreateOutcome::Created(_)
        ));
    }

    #[test]
    fn test_create_term_requires_name() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.create_term(term("product_cat", "  ", "blank")),
            CreateOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_unique_term_slug() {
        let mut store = MemoryStore::new();
        created(store.create_term(term("product_cat", "Chairs", "chairs-en")));
        created(store.create_term(term("product_cat", "Chairs", "chairs-en-2")));

        assert_eq!(store.unique_term_slug("product_cat", "chairs-en").unwrap(), "chairs-en-3");
        assert_eq!(store.unique_term_slug("product_cat", "tables").unwrap(), "tables");
    }

    #[test]
    fn test_find_terms_by_attribute_sees_writes() {
        let mut store = MemoryStore::new();
        let a = created(store.create_term(term("product_cat", "A", "a")));
        let b = created(store.create_term(term("product_cat", "B", "b")));
        store.add_attribute(ObjectKind::Term, a, "bizzio_group_id", json!("123")).unwrap();

        assert_eq!(
            store.find_terms_by_attribute("product_cat", "bizzio_group_id", "123").unwrap(),
            vec![a]
        );

        store.add_attribute(ObjectKind::Term, b, "bizzio_group_id", json!(123)).unwrap();
        assert_eq!(
            store.find_terms_by_attribute("product_cat", "bizzio_group_id", "123").unwrap(),
            vec![a, b]
        );
        assert!(store
            .find_terms_by_attribute("product_tag", "bizzio_group_id", "123")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bulk_write_defers_invalidation_until_drop() {
        let mut store = MemoryStore::new();
        let a = created(store.create_term(term("product_cat", "A", "a")));
        let b = created(store.create_term(term("product_cat", "B", "b")));
        store.add_attribute(ObjectKind::Term, a, "gid", json!("1")).unwrap();

        {
            let mut bulk = BulkWrite::begin(&mut store);
            assert_eq!(bulk.find_terms_by_attribute("product_cat", "gid", "1").unwrap(), vec![a]);
            bulk.add_attribute(ObjectKind::Term, b, "gid", json!("1")).unwrap();
            // Cached result is served while invalidation is suspended
            assert_eq!(bulk.find_terms_by_attribute("product_cat", "gid", "1").unwrap(), vec![a]);
        }

        assert_eq!(store.cached_lookups(), 0);
        assert_eq!(store.find_terms_by_attribute("product_cat", "gid", "1").unwrap(), vec![a, b]);
    }

    #[test]
    fn test_set_object_terms_replaces_and_validates_taxonomy() {
        let mut store = MemoryStore::new();
        let post = created(store.create_post(NewPost {
            post_type: "product".to_string(),
            status: "publish".to_string(),
            author: 1,
            parent: 0,
            menu_order: 0,
            title: "Chair".to_string(),
            slug: "chair".to_string(),
        }));
        let cat = created(store.create_term(term("product_cat", "Chairs", "chairs")));
        let tag = created(store.create_term(term("product_tag", "Sale", "sale")));

        store.set_object_terms(post, "product_cat", &[cat, cat]).unwrap();
        assert_eq!(store.object_terms(post, "product_cat").unwrap(), vec![cat]);
        assert!(store.set_object_terms(post, "product_cat", &[tag]).is_err());
        store.set_object_terms(post, "product_cat", &[]).unwrap();
        assert!(store.object_terms(post, "product_cat").unwrap().is_empty());
    }

    #[test]
    fn test_ids_continue_after_snapshot() {
        let mut snapshot = ContentSnapshot::default();
        snapshot.terms.insert(
            41,
            Term {
                id: 41,
                taxonomy: "product_cat".to_string(),
                name: "Old".to_string(),
                slug: "old".to_string(),
                description: String::new(),
                parent: 0,
            },
        );
        let mut store = MemoryStore::from_snapshot(snapshot);

        assert_eq!(created(store.create_term(term("product_cat", "New", "new"))), 42);
    }

    #[test]
    fn test_update_term_rejects_self_parent() {
        let mut store = MemoryStore::new();
        let id = created(store.create_term(term("product_cat", "A", "a")));
        let update = TermUpdate {
            parent: Some(id),
            ..Default::default()
        };
        assert!(matches!(store.update_term(id, update), Err(AppError::Conflict(_))));
    }
}
