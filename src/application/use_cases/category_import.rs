// ============================================================
// CATEGORY IMPORT USE CASE
// ============================================================
// Create or update destination-language translations of product
// categories from a category export

use std::path::Path;

use super::column_resolver::{localized, resolve};
use super::entity_locator::{clean_group_id, locate_term};
use super::field_sync::{apply_seo, apply_term_display, copy_attributes};
use super::hierarchy_sync::{sync_hierarchy, HierarchyPair};
use super::translation_resolver::{Resolution, TermSeed, TranslationResolver};
use crate::domain::catalog::ObjectKind;
use crate::domain::csv::{CatalogRow, ColumnMap};
use crate::domain::error::{AppError, Result};
use crate::domain::import_summary::ImportSummary;
use crate::domain::sync_config::SyncConfig;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::store::{BulkWrite, ContentStore};
use crate::infrastructure::translations::TranslationLinker;

const ID: &str = "id";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const META_TITLE: &str = "meta_title";
const META_DESCRIPTION: &str = "meta_description";

/// What a single row amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    /// No identifier; not counted
    Ignored,
    Skipped,
    Created,
    Updated,
}

/// Category translation import
pub struct CategoryImportUseCase {
    config: SyncConfig,
}

impl CategoryImportUseCase {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Header columns of the category export, resolved flexibly
    pub fn resolve_columns(header: &[String], lang: &str) -> ColumnMap {
        let mut columns = ColumnMap::new();
        columns.insert(ID, resolve(header, &["id", "(id)"]));
        columns.insert(
            NAME,
            resolve(header, &localized(&["Артикулна група ({lang})", "Name ({lang})"], lang)),
        );
        columns.insert(
            DESCRIPTION,
            resolve(header, &localized(&["Бележка ({lang})", "Description ({lang})"], lang)),
        );
        columns.insert(
            META_TITLE,
            resolve(header, &localized(&["Meta име ({lang})", "Meta Title ({lang})"], lang)),
        );
        columns.insert(
            META_DESCRIPTION,
            resolve(
                header,
                &localized(&["Meta описание ({lang})", "Meta Description ({lang})"], lang),
            ),
        );
        columns
    }

    /// Run the import of `csv_path` against `store`.
    ///
    /// Fails only on setup problems (file, header, id column); every row
    /// problem is logged and counted as skipped.
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

        let columns = Self::resolve_columns(csv.header(), &self.config.dest_lang);
        if !columns.is_present(ID) {
            tracing::info!("Detected Header Columns: {}", csv.header().join(" | "));
            return Err(AppError::MissingColumn(
                "Required ID column not found in CSV.".to_string(),
            ));
        }
        for field in columns.missing() {
            tracing::debug!(field, "optional column not present");
        }
        if !linker.is_available() {
            tracing::warn!("Translation linking unavailable; canonical terms are updated in place");
        }

        let resolver = TranslationResolver::new(&self.config);
        let mut summary = ImportSummary::new(self.config.dry_run);
        let mut pairs: Vec<HierarchyPair> = Vec::new();

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
                let outcome = self.process_row(
                    &mut *bulk,
                    &mut *linker,
                    &resolver,
                    &columns,
                    &row,
                    &mut pairs,
                );
                match outcome {
                    Ok(RowOutcome::Ignored) => {}
                    Ok(RowOutcome::Skipped) => summary.skipped += 1,
                    Ok(RowOutcome::Created) => summary.created += 1,
                    Ok(RowOutcome::Updated) => summary.updated += 1,
                    Err(e) => {
                        tracing::warn!(line = row.line, "Row skipped: {}", e);
                        summary.skipped += 1;
                    }
                }
            }
        }

        if !self.config.dry_run {
            tracing::info!("Syncing category hierarchy...");
            sync_hierarchy(store, &*linker, &pairs, &self.config.dest_lang);
        }

        tracing::info!("Import complete. {}", summary);
        Ok(summary)
    }

    fn process_row(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        resolver: &TranslationResolver,
        columns: &ColumnMap,
        row: &CatalogRow,
        pairs: &mut Vec<HierarchyPair>,
    ) -> Result<RowOutcome> {
        let raw_id = row.value(columns.get(ID));
        if raw_id.is_empty() {
            return Ok(RowOutcome::Ignored);
        }
        let group_id = clean_group_id(raw_id);
        let lang = self.config.dest_lang.as_str();
        let lang_upper = lang.to_uppercase();

        let Some(found) = locate_term(
            &*store,
            &*linker,
            &self.config.taxonomy,
            &self.config.group_id_key,
            &group_id,
            lang,
        )?
        else {
            tracing::warn!(
                line = row.line,
                "Original term not found for bizzio_id: {} (original: {})",
                group_id,
                raw_id
            );
            return Ok(RowOutcome::Skipped);
        };
        if found.candidates > 1 {
            tracing::warn!(
                line = row.line,
                "{} terms carry group id {}; using term {}",
                found.candidates,
                group_id,
                found.id
            );
        }

        let name = row.value(columns.get(NAME));
        let description = row.value(columns.get(DESCRIPTION));
        if name.is_empty() {
            tracing::info!("Skipping ID {}: Empty {} name.", raw_id, lang_upper);
            return Ok(RowOutcome::Skipped);
        }

        let seed = TermSeed { name, description };
        let resolution =
            resolver.ensure_term_translation(store, linker, found.id, lang, Some(seed))?;

        if self.config.dry_run {
            return Ok(match resolution {
                Resolution::Planned(_) => {
                    tracing::info!(
                        "[dry-run] Would create {} term '{}' for {}",
                        lang_upper,
                        name,
                        raw_id
                    );
                    RowOutcome::Created
                }
                other => {
                    tracing::info!("[dry-run] Would update {} term ID {}", lang_upper, other.id());
                    RowOutcome::Updated
                }
            });
        }

        let target = resolution.id();
        if !resolution.is_new() {
            apply_term_display(store, target, name, description)?;
        }
        copy_attributes(store, ObjectKind::Term, found.id, target)?;
        apply_seo(
            store,
            target,
            row.value(columns.get(META_TITLE)),
            row.value(columns.get(META_DESCRIPTION)),
        )?;

        tracing::info!(
            "Processed: {} -> {} Term ID: {}{}",
            raw_id,
            lang_upper,
            target,
            if resolution.is_new() { " [NEW]" } else { "" }
        );
        pairs.push(HierarchyPair {
            canonical: found.id,
            translation: target,
        });

        Ok(if resolution.is_new() {
            RowOutcome::Created
        } else {
            RowOutcome::Updated
        })
    }
}
