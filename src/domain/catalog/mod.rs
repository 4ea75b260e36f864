// ============================================================
// CATALOG DOMAIN LAYER
// ============================================================
// Content entities, custom attributes and translation groups
// No I/O, no external services

mod attributes;
mod entity;
mod slug;
mod translation_group;

pub use attributes::{value_as_text, AttributeSet};
pub use entity::{
    CreateOutcome, EntityId, NewPost, NewTerm, ObjectKind, Post, PostUpdate, Term, TermUpdate,
    NO_PARENT,
};
pub use slug::slugify;
pub use translation_group::TranslationGroup;

/// Taxonomy holding product categories.
pub const PRODUCT_CATEGORY_TAXONOMY: &str = "product_cat";

/// Taxonomy holding product tags.
pub const PRODUCT_TAG_TAXONOMY: &str = "product_tag";

/// Taxonomy classifying products as simple, variable, grouped, ...
pub const PRODUCT_TYPE_TAXONOMY: &str = "product_type";

/// Post types that can carry a product code.
pub const PRODUCT_POST_TYPES: &[&str] = &["product", "product_variation"];
