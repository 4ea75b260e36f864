// ============================================================
// CONTENT ENTITIES
// ============================================================
// Taxonomy terms and posts as seen through the content store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the content store. `0` never names an entity.
pub type EntityId = u64;

/// Parent id of a root term or post.
pub const NO_PARENT: EntityId = 0;

/// Which family of content an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Term,
    Post,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Term => "term",
            ObjectKind::Post => "post",
        }
    }
}

/// A taxonomy term (category, tag or attribute value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: EntityId,

    /// Taxonomy this term belongs to (e.g. `product_cat`)
    pub taxonomy: String,

    pub name: String,

    /// URL slug, unique within the taxonomy
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// Parent term id, `NO_PARENT` for root terms
    #[serde(default)]
    pub parent: EntityId,
}

/// A post-like content item (product, product variation, page, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,

    pub post_type: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub author: u64,

    #[serde(default)]
    pub parent: EntityId,

    #[serde(default)]
    pub menu_order: i64,

    pub title: String,

    pub slug: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub excerpt: String,

    /// Creation timestamp, absent for entities imported without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "publish".to_string()
}

/// Minimal fields needed to create a term
#[derive(Debug, Clone, PartialEq)]
pub struct NewTerm {
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent: EntityId,
}

/// Minimal fields needed to create a post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub post_type: String,
    pub status: String,
    pub author: u64,
    pub parent: EntityId,
    pub menu_order: i64,
    pub title: String,
    pub slug: String,
}

/// Partial term update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<EntityId>,
}

impl TermUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent.is_none()
    }
}

/// Partial post update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.excerpt.is_none()
    }
}

/// Result of asking the store to create an entity
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(EntityId),

    /// An entity with the same slug already exists and was not touched
    AlreadyExists(EntityId),

    Failed(String),
}
