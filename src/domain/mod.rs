pub mod catalog;
pub mod error;
pub mod import_summary;
pub mod sync_config;

// CSV row and column types
pub mod csv;
