//! Workflow-level failures

use crate::api::ApiError;
use std::fmt;
use thiserror::Error;

/// Rejection message shown for an invalid form name
pub const INVALID_FORM_NAME_MESSAGE: &str = "Leading or trailing spaces and ^/-. are not allowed";

/// Local precondition failure; never reaches the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", INVALID_FORM_NAME_MESSAGE)]
pub struct ValidationError;

/// A page fetch failed and the whole listing was abandoned
#[derive(Debug, Error)]
#[error("Failed to fetch page {page} of the form listing: {source}")]
pub struct AggregationError {
    pub page: usize,
    #[source]
    pub source: ApiError,
}

/// Step of the import workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    FormResource,
    Translations,
    NameTranslations,
}

impl fmt::Display for ImportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FormResource => "form resource upload",
            Self::Translations => "translations upload",
            Self::NameTranslations => "form name translations upload",
        })
    }
}

/// A remote write of the import workflow failed
#[derive(Debug, Error)]
#[error("Import failed during {step}: {source}")]
pub struct ImportError {
    pub step: ImportStep,
    #[source]
    pub source: ApiError,
}

impl ImportError {
    pub fn new(step: ImportStep, source: ApiError) -> Self {
        Self { step, source }
    }
}
