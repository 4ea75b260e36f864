// ============================================================
// CONTENT STORE
// ============================================================
// Entity, attribute and taxonomy access behind one interface

pub mod memory;
pub mod snapshot;

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::domain::catalog::{
    AttributeSet, CreateOutcome, EntityId, NewPost, NewTerm, ObjectKind, Post, PostUpdate, Term,
    TermUpdate,
};
use crate::domain::error::Result;

pub use memory::MemoryStore;

pub trait ContentStore {
    // Terms
    fn term(&self, id: EntityId) -> Result<Option<Term>>;
    fn find_terms_by_attribute(&self, taxonomy: &str, key: &str, value: &str)
        -> Result<Vec<EntityId>>;
    fn find_terms_by_name(&self, taxonomy: &str, name: &str) -> Result<Vec<EntityId>>;
    fn create_term(&mut self, term: NewTerm) -> CreateOutcome;
    fn update_term(&mut self, id: EntityId, update: TermUpdate) -> Result<()>;
    fn unique_term_slug(&self, taxonomy: &str, slug: &str) -> Result<String>;

    // Posts
    fn post(&self, id: EntityId) -> Result<Option<Post>>;
    fn find_posts_by_attribute(&self, key: &str, value: &str, post_types: &[&str])
        -> Result<Vec<EntityId>>;
    fn create_post(&mut self, post: NewPost) -> CreateOutcome;
    fn update_post(&mut self, id: EntityId, update: PostUpdate) -> Result<()>;
    fn unique_post_slug(&self, post_type: &str, slug: &str) -> Result<String>;

    // Custom attributes
    fn attributes(&self, kind: ObjectKind, id: EntityId) -> Result<AttributeSet>;
    fn delete_attribute(&mut self, kind: ObjectKind, id: EntityId, key: &str) -> Result<()>;
    fn add_attribute(&mut self, kind: ObjectKind, id: EntityId, key: &str, value: Value)
        -> Result<()>;
    fn set_attribute(&mut self, kind: ObjectKind, id: EntityId, key: &str, value: Value)
        -> Result<()>;

    // Term relationships of posts
    fn object_terms(&self, post_id: EntityId, taxonomy: &str) -> Result<Vec<EntityId>>;
    fn set_object_terms(&mut self, post_id: EntityId, taxonomy: &str, terms: &[EntityId])
        -> Result<()>;
    fn attribute_taxonomies(&self) -> Result<Vec<String>>;

    /// Suspend (`true`) or resume (`false`) lookup-cache invalidation.
    /// Resuming flushes every invalidation queued while suspended.
    fn suspend_cache_invalidation(&mut self, suspend: bool);
}

/// Bulk-write mode: cache invalidation stays suspended while the guard
/// lives and is resumed on drop, including early returns and panics.
pub struct BulkWrite<'a> {
    store: &'a mut dyn ContentStore,
}

impl<'a> BulkWrite<'a> {
    pub fn begin(store: &'a mut dyn ContentStore) -> Self {
        store.suspend_cache_invalidation(true);
        tracing::debug!("bulk-write mode on");
        Self { store }
    }
}

impl<'a> Deref for BulkWrite<'a> {
    type Target = dyn ContentStore + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.store
    }
}

impl<'a> DerefMut for BulkWrite<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.store
    }
}

impl Drop for BulkWrite<'_> {
    fn drop(&mut self) {
        self.store.suspend_cache_invalidation(false);
        tracing::debug!("bulk-write mode off, cache invalidations flushed");
    }
}
