pub mod use_cases;

pub use use_cases::category_import::CategoryImportUseCase;
pub use use_cases::product_import::ProductImportUseCase;
pub use use_cases::translation_resolver::{Resolution, TranslationResolver};
