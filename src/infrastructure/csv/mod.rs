// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV reading and encoding detection

mod csv_parser;
pub mod encoding;

pub use csv_parser::{CatalogCsv, CsvParser};
