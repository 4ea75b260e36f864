// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Rows and column positions of a catalog export
// No I/O, no external dependencies

mod catalog_row;
mod column_map;

pub use catalog_row::CatalogRow;
pub use column_map::ColumnMap;
