//! Listing and import workflows

mod import;
mod ordering;
mod pagination;
mod validation;

pub use import::{upload_form_resource, upload_translations, ImportJob, TranslationBatch};
pub use ordering::{order_forms, InvalidVersion};
pub use pagination::collect_all;
pub use validation::validate_form_name;
