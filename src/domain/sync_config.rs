// ============================================================
// SYNC CONFIGURATION
// ============================================================
// Settings shared by the category and product import jobs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a synchronization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// JSON snapshot of the content store (default: catalog.json)
    pub store_path: PathBuf,

    /// Language of the canonical entities (default: bg)
    pub source_lang: String,

    /// Destination language of the category job (default: en)
    pub dest_lang: String,

    /// Taxonomy the category job imports into (default: product_cat)
    pub taxonomy: String,

    /// CSV field delimiter (default: ';')
    pub delimiter: char,

    /// Attribute carrying the external category identifier
    pub group_id_key: String,

    /// Attribute holding the product code
    pub sku_key: String,

    /// Attribute tried when no product has the code as SKU
    pub barcode_key: String,

    /// Resolve and log only; write nothing
    pub dry_run: bool,

    /// CSV used by the category job when no path is given
    pub default_category_csv: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("catalog.json"),
            source_lang: "bg".to_string(),
            dest_lang: "en".to_string(),
            taxonomy: "product_cat".to_string(),
            delimiter: ';',
            group_id_key: "bizzio_group_id".to_string(),
            sku_key: "_sku".to_string(),
            barcode_key: "_barcode".to_string(),
            dry_run: false,
            default_category_csv: PathBuf::from("keter_sitegroup.csv"),
        }
    }
}

impl SyncConfig {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter_byte().is_none() {
            return Err(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ));
        }
        if self.source_lang.trim().is_empty() {
            return Err("source_lang must not be empty".to_string());
        }
        if self.dest_lang.trim().is_empty() {
            return Err("dest_lang must not be empty".to_string());
        }
        if self.source_lang.eq_ignore_ascii_case(&self.dest_lang) {
            return Err("source_lang and dest_lang must differ".to_string());
        }
        if self.taxonomy.trim().is_empty() {
            return Err("taxonomy must not be empty".to_string());
        }
        if self.group_id_key.is_empty() || self.sku_key.is_empty() {
            return Err("group_id_key and sku_key must not be empty".to_string());
        }
        Ok(())
    }
}
