// ============================================================
// PRODUCT IMPORT USE CASE
// ============================================================
// Create or update per-language product translations from a product
// export keyed by product code

use std::path::Path;

use super::column_resolver::{discover_languages, localized, resolve_exact};
use super::entity_locator::{locate_product, ProductMatch};
use super::field_sync::{
    apply_post_display, copy_attributes, sync_product_type, sync_terms_to_lang,
};
use super::translation_resolver::{Resolution, TranslationResolver};
use crate::domain::catalog::{EntityId, ObjectKind};
use crate::domain::csv::{CatalogRow, ColumnMap};
use crate::domain::error::{AppError, Result};
use crate::domain::import_summary::ImportSummary;
use crate::domain::sync_config::SyncConfig;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::store::{BulkWrite, ContentStore};
use crate::infrastructure::translations::TranslationLinker;

const CODE: &str = "code";

const CODE_CANDIDATES: &[&str] = &["Код", "Code", "SKU"];

const TITLE_PATTERNS: &[&str] = &[
    "Web име ({lang})",
    "Web name ({lang})",
    "Артикул ({lang})",
    "Article ({lang})",
    "Title ({lang})",
];

const CONTENT_PATTERNS: &[&str] = &[
    "Web описание ({lang})",
    "Web description ({lang})",
    "Описание ({lang})",
    "Description ({lang})",
];

const EXCERPT_PATTERNS: &[&str] = &[
    "Кратко описание ({lang})",
    "Short description ({lang})",
    "Excerpt ({lang})",
];

fn title_field(lang: &str) -> String {
    format!("title_{}", lang)
}

fn content_field(lang: &str) -> String {
    format!("content_{}", lang)
}

fn excerpt_field(lang: &str) -> String {
    format!("excerpt_{}", lang)
}

/// What one product/language pair amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairOutcome {
    Skipped,
    Created,
    Updated,
}

/// Product translation import
pub struct ProductImportUseCase {
    config: SyncConfig,
}

impl ProductImportUseCase {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Code column plus title/content/excerpt columns of every language,
    /// matched by exact header name
    pub fn resolve_columns(header: &[String], languages: &[String]) -> ColumnMap {
        let mut columns = ColumnMap::new();
        columns.insert(CODE, resolve_exact(header, CODE_CANDIDATES));
        for lang in languages {
            columns.insert(
                title_field(lang),
                resolve_exact(header, &localized(TITLE_PATTERNS, lang)),
            );
            columns.insert(
                content_field(lang),
                resolve_exact(header, &localized(CONTENT_PATTERNS, lang)),
            );
            columns.insert(
                excerpt_field(lang),
                resolve_exact(header, &localized(EXCERPT_PATTERNS, lang)),
            );
        }
        columns
    }

    /// Run the import of `csv_path` against `store`.
    ///
    /// Every row is processed once per language discovered in the header.
    /// Setup problems are fatal; row and language problems are logged with
    /// their line number and counted as skipped.
    pub fn execute(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        csv_path: &Path,
    ) -> Result<ImportSummary> {
        let delimiter = self.config.delimiter_byte().ok_or_else(|| {
            AppError::ConfigError(format!("Unsupported delimiter {:?}", self.config.delimiter))
        })?;

        tracing::info!("Reading CSV: {}", csv_path.display());
        let csv = CsvParser::new().with_delimiter(delimiter).open(csv_path)?;

        let languages = discover_languages(csv.header());
        if languages.is_empty() {
            tracing::warn!("No language columns found in CSV header (e.g. 'Web name (en)').");
        } else {
            tracing::info!("Detected languages: {}", languages.join(", "));
        }

        let columns = Self::resolve_columns(csv.header(), &languages);
        if !columns.is_present(CODE) {
            return Err(AppError::MissingColumn(format!(
                "Missing required column: {}",
                CODE_CANDIDATES
                    .iter()
                    .map(|c| format!("'{}'", c))
                    .collect::<Vec<_>>()
                    .join(" / ")
            )));
        }

        let resolver = TranslationResolver::new(&self.config);
        let mut summary = ImportSummary::new(self.config.dry_run);

        {
            let mut bulk = BulkWrite::begin(&mut *store);
            for row in csv {
                let row = match row {
                    Ok(row) => row,
                    Err(e) => {
                        tracing::warn!("Malformed CSV row skipped: {}", e);
                        summary.skipped += 1;
                        continue;
                    }
                };

                let code = row.value(columns.get(CODE));
                if code.is_empty() {
                    summary.skipped += 1;
                    continue;
                }

                let product = match locate_product(
                    &*bulk,
                    &*linker,
                    &self.config.sku_key,
                    Some(self.config.barcode_key.as_str()),
                    code,
                    &self.config.source_lang,
                ) {
                    Ok(Some(ProductMatch::Sku(id))) => id,
                    Ok(Some(ProductMatch::Fallback(id))) => {
                        tracing::info!(
                            "Line {}: code={} matched product {} by {}",
                            row.line,
                            code,
                            id,
                            self.config.barcode_key
                        );
                        id
                    }
                    Ok(None) => {
                        tracing::warn!(
                            "Line {}: {} product not found for code={}",
                            row.line,
                            self.config.source_lang.to_uppercase(),
                            code
                        );
                        summary.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!("Line {}: lookup failed for code={}: {}", row.line, code, e);
                        summary.skipped += 1;
                        continue;
                    }
                };

                for lang in &languages {
                    let outcome = self.process_language(
                        &mut *bulk,
                        &mut *linker,
                        &resolver,
                        &columns,
                        &row,
                        product,
                        lang,
                    );
                    match outcome {
                        Ok(PairOutcome::Skipped) => summary.skipped += 1,
                        Ok(PairOutcome::Created) => summary.created += 1,
                        Ok(PairOutcome::Updated) => summary.updated += 1,
                        Err(e) => {
                            tracing::warn!(
                                "Line {}: code={} lang={} skipped: {}",
                                row.line,
                                code,
                                lang,
                                e
                            );
                            summary.skipped += 1;
                        }
                    }
                }
            }
        }

        tracing::info!("Done. {}", summary);
        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    fn process_language(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        resolver: &TranslationResolver,
        columns: &ColumnMap,
        row: &CatalogRow,
        product: EntityId,
        lang: &str,
    ) -> Result<PairOutcome> {
        let code = row.value(columns.get(CODE));
        let title = row.value(columns.get(&title_field(lang)));
        let content = row.value(columns.get(&content_field(lang)));
        let excerpt = row.value(columns.get(&excerpt_field(lang)));

        if title.is_empty() {
            tracing::info!("Skipping lang '{}' for code={}: empty title.", lang, code);
            return Ok(PairOutcome::Skipped);
        }

        let resolution = resolver.ensure_post_translation(store, linker, product, lang)?;
        let lang_upper = lang.to_uppercase();

        if self.config.dry_run {
            tracing::info!(
                "[dry-run] code={} -> {} {}",
                code,
                lang_upper,
                match resolution {
                    Resolution::Planned(_) => "new translation".to_string(),
                    other => format!("ID {}", other.id()),
                }
            );
            return Ok(if matches!(resolution, Resolution::Planned(_)) {
                PairOutcome::Created
            } else {
                PairOutcome::Updated
            });
        }

        let target = resolution.id();
        copy_attributes(store, ObjectKind::Post, product, target)?;
        sync_product_type(store, product, target)?;
        apply_post_display(store, target, title, content, excerpt)?;
        sync_terms_to_lang(store, linker, resolver, product, target, lang)?;

        tracing::info!("code={} -> {} ID {}", code, lang_upper, target);
        Ok(if resolution.is_new() {
            PairOutcome::Created
        } else {
            PairOutcome::Updated
        })
    }
}
