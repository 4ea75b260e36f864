// ============================================================
// TRANSLATION RESOLVER
// ============================================================
// Find or create the destination-language counterpart of a canonical
// entity and link both into one translation group

use crate::domain::catalog::{
    slugify, value_as_text, CreateOutcome, EntityId, NewPost, NewTerm, ObjectKind, Term, NO_PARENT,
};
use crate::domain::error::{AppError, Result};
use crate::domain::sync_config::SyncConfig;
use crate::infrastructure::store::ContentStore;
use crate::infrastructure::translations::TranslationLinker;

/// How the translation of a canonical entity was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Already linked under the language
    Existing(EntityId),

    /// Newly created and linked
    Created(EntityId),

    /// A pre-existing entity that was not linked yet, now linked
    Linked(EntityId),

    /// No translation linking available; the canonical entity stands in
    Canonical(EntityId),

    /// Dry run; the translation would have been created. Carries the
    /// canonical id.
    Planned(EntityId),
}

impl Resolution {
    pub fn id(&self) -> EntityId {
        match self {
            Resolution::Existing(id)
            | Resolution::Created(id)
            | Resolution::Linked(id)
            | Resolution::Canonical(id)
            | Resolution::Planned(id) => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Display values to create a term translation with, instead of the
/// canonical term's own name
#[derive(Debug, Clone, Copy)]
pub struct TermSeed<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

pub struct TranslationResolver {
    source_lang: String,
    group_id_key: String,
    dry_run: bool,
}

impl TranslationResolver {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            source_lang: config.source_lang.clone(),
            group_id_key: config.group_id_key.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Translation of post `canonical_id` in `lang`, created if missing.
    ///
    /// A new post copies type, author, parent and menu order from the
    /// canonical post and gets a provisional title and slug until the real
    /// values are written.
    pub fn ensure_post_translation(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        canonical_id: EntityId,
        lang: &str,
    ) -> Result<Resolution> {
        if let Some(found) = self.lookup(linker, ObjectKind::Post, canonical_id, lang)? {
            return Ok(found);
        }
        if self.dry_run {
            return Ok(Resolution::Planned(canonical_id));
        }

        let source = store
            .post(canonical_id)?
            .ok_or_else(|| AppError::NotFound(format!("post {}", canonical_id)))?;
        let slug = store.unique_post_slug(
            &source.post_type,
            &format!("{}-{}", source.slug, slugify(lang)),
        )?;

        let new_id = match store.create_post(NewPost {
            post_type: source.post_type.clone(),
            status: "publish".to_string(),
            author: source.author,
            parent: source.parent,
            menu_order: source.menu_order,
            title: format!("{} ({})", source.title, lang),
            slug,
        }) {
            CreateOutcome::Created(id) => id,
            CreateOutcome::AlreadyExists(id) => {
                return Err(AppError::Conflict(format!(
                    "post slug for {} translation of {} is taken by {}",
                    lang, canonical_id, id
                )))
            }
            CreateOutcome::Failed(reason) => {
                return Err(AppError::StoreError(format!(
                    "Failed to create {} translation of post {}: {}",
                    lang, canonical_id, reason
                )))
            }
        };

        linker.set_language(ObjectKind::Post, new_id, lang)?;
        self.link(linker, ObjectKind::Post, canonical_id, lang, new_id)?;
        tracing::debug!(canonical_id, new_id, lang, "created post translation");
        Ok(Resolution::Created(new_id))
    }

    /// Translation of term `canonical_id` in `lang`, created if missing.
    ///
    /// Before creating, a term with the same name already tagged with `lang`
    /// is linked instead, unless it is the translation of another term. A
    /// slug clash with an untagged or ungrouped term links that term; any
    /// other clash retries with a language-suffixed slug.
    pub fn ensure_term_translation(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        canonical_id: EntityId,
        lang: &str,
        seed: Option<TermSeed<'_>>,
    ) -> Result<Resolution> {
        if let Some(found) = self.lookup(linker, ObjectKind::Term, canonical_id, lang)? {
            return Ok(found);
        }

        let source = store
            .term(canonical_id)?
            .ok_or_else(|| AppError::NotFound(format!("term {}", canonical_id)))?;
        let name = seed.map(|s| s.name).unwrap_or(source.name.as_str());

        for candidate in store.find_terms_by_name(&source.taxonomy, name)? {
            if candidate != canonical_id
                && linker.language_of(ObjectKind::Term, candidate)?.as_deref() == Some(lang)
                && is_claimable(&*linker, ObjectKind::Term, candidate, canonical_id)?
            {
                if self.dry_run {
                    return Ok(Resolution::Planned(canonical_id));
                }
                self.link(linker, ObjectKind::Term, canonical_id, lang, candidate)?;
                tracing::info!(
                    term_id = candidate,
                    lang,
                    "Linked existing {} term '{}'",
                    lang,
                    name
                );
                return Ok(Resolution::Linked(candidate));
            }
        }

        if self.dry_run {
            return Ok(Resolution::Planned(canonical_id));
        }

        let slug = match seed.map(|s| slugify(s.name)).filter(|s| !s.is_empty()) {
            Some(slug) => slug,
            None => language_slug(&*store, &source.taxonomy, &source.slug, lang)?,
        };
        let new_term = |slug: String| NewTerm {
            taxonomy: source.taxonomy.clone(),
            name: name.to_string(),
            slug,
            description: seed.map(|s| s.description.to_string()).unwrap_or_default(),
            parent: NO_PARENT,
        };

        match store.create_term(new_term(slug.clone())) {
            CreateOutcome::Created(id) => {
                self.finish_created_term(store, linker, &source, lang, id)
            }
            CreateOutcome::AlreadyExists(existing) => {
                let existing_lang = linker.language_of(ObjectKind::Term, existing)?;
                let owned_elsewhere = existing == canonical_id
                    || existing_lang.as_deref().map(|l| l != lang).unwrap_or(false)
                    || !is_claimable(&*linker, ObjectKind::Term, existing, canonical_id)?;

                if !owned_elsewhere {
                    tracing::info!(term_id = existing, "Term already exists (unlinked): {}", name);
                    linker.set_language(ObjectKind::Term, existing, lang)?;
                    self.link(linker, ObjectKind::Term, canonical_id, lang, existing)?;
                    return Ok(Resolution::Linked(existing));
                }

                let retry_slug = language_slug(&*store, &source.taxonomy, &slug, lang)?;
                match store.create_term(new_term(retry_slug)) {
                    CreateOutcome::Created(id) => {
                        self.finish_created_term(store, linker, &source, lang, id)
                    }
                    CreateOutcome::AlreadyExists(id) => Err(AppError::Conflict(format!(
                        "Failed to create term '{}': slug taken by term {}",
                        name, id
                    ))),
                    CreateOutcome::Failed(reason) => Err(AppError::StoreError(format!(
                        "Failed to create term '{}': {}",
                        name, reason
                    ))),
                }
            }
            CreateOutcome::Failed(reason) => Err(AppError::StoreError(format!(
                "Failed to create term '{}': {}",
                name, reason
            ))),
        }
    }

    /// Answers that need no new entity: no linking capability, a canonical
    /// entity already in `lang`, or an existing group entry.
    fn lookup(
        &self,
        linker: &dyn TranslationLinker,
        kind: ObjectKind,
        canonical_id: EntityId,
        lang: &str,
    ) -> Result<Option<Resolution>> {
        if !linker.is_available() {
            return Ok(Some(Resolution::Canonical(canonical_id)));
        }
        if linker.language_of(kind, canonical_id)?.as_deref() == Some(lang) {
            return Ok(Some(Resolution::Existing(canonical_id)));
        }
        Ok(linker
            .translations(kind, canonical_id)?
            .get(lang)
            .map(Resolution::Existing))
    }

    fn finish_created_term(
        &self,
        store: &mut dyn ContentStore,
        linker: &mut dyn TranslationLinker,
        source: &Term,
        lang: &str,
        new_id: EntityId,
    ) -> Result<Resolution> {
        linker.set_language(ObjectKind::Term, new_id, lang)?;
        self.link(linker, ObjectKind::Term, source.id, lang, new_id)?;

        // Carry the external identifier so later runs find the term by it
        let attrs = store.attributes(ObjectKind::Term, source.id)?;
        if let Some(group_id) = attrs.values(&self.group_id_key).first() {
            if value_as_text(group_id).map(|t| !t.is_empty()).unwrap_or(true) {
                store.set_attribute(
                    ObjectKind::Term,
                    new_id,
                    &self.group_id_key,
                    group_id.clone(),
                )?;
            }
        }

        tracing::debug!(canonical_id = source.id, new_id, lang, "created term translation");
        Ok(Resolution::Created(new_id))
    }

    /// Add `{lang: translation_id}` to the canonical entity's group, make sure
    /// the canonical entity's own language entry is present, and persist the
    /// group for all its members.
    fn link(
        &self,
        linker: &mut dyn TranslationLinker,
        kind: ObjectKind,
        canonical_id: EntityId,
        lang: &str,
        translation_id: EntityId,
    ) -> Result<()> {
        let mut group = linker.translations(kind, canonical_id)?;
        group.insert(lang, translation_id);

        let source_lang = match linker.language_of(kind, canonical_id)? {
            Some(existing) => existing,
            None => {
                linker.set_language(kind, canonical_id, &self.source_lang)?;
                self.source_lang.clone()
            }
        };
        group.insert(&source_lang, canonical_id);

        linker.save_translations(kind, &group)
    }
}

/// Whether `candidate` may join the group of `canonical_id`: it has no
/// group yet, or it is already in that one
fn is_claimable(
    linker: &dyn TranslationLinker,
    kind: ObjectKind,
    candidate: EntityId,
    canonical_id: EntityId,
) -> Result<bool> {
    let group = linker.translations(kind, candidate)?;
    Ok(group.is_empty() || group.contains(canonical_id))
}

/// Free `{base}-{lang}` slug in `taxonomy`
fn language_slug(
    store: &dyn ContentStore,
    taxonomy: &str,
    base: &str,
    lang: &str,
) -> Result<String> {
    store.unique_term_slug(taxonomy, &format!("{}-{}", base, slugify(lang)))
}
