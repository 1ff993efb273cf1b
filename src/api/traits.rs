//! Trait abstraction for the form API to enable mocking in tests

use crate::state::{CreatedForm, FormDraft, FormResourceResponse, FormTranslation, PageEnvelope};
use async_trait::async_trait;
use serde_json::Value;

use super::ApiError;

/// Remote operations the controller depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormApi: Send + Sync {
    /// Fetch one page of the form listing
    async fn fetch_page(&self, url: &str) -> Result<PageEnvelope, ApiError>;

    /// Fetch the server's default locale as plain text
    async fn fetch_default_locale(&self) -> Result<String, ApiError>;

    /// Create a new, empty form
    async fn create_form(&self, draft: &FormDraft) -> Result<CreatedForm, ApiError>;

    /// Upload an exported form definition as a new form resource
    async fn create_form_resource(&self, form_json: &Value)
        -> Result<FormResourceResponse, ApiError>;

    /// Upload form translations
    async fn save_translations(&self, translations: &[FormTranslation]) -> Result<(), ApiError>;

    /// Upload translations of the form name, optionally bound to a form
    async fn save_form_name_translations(
        &self,
        name_translations: &Value,
        form_uuid: Option<String>,
    ) -> Result<(), ApiError>;
}
