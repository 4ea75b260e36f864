pub mod category_import;
pub mod column_resolver;
pub mod entity_locator;
pub mod field_sync;
pub mod hierarchy_sync;
pub mod product_import;
pub mod translation_resolver;
