//! Form builder controller
//!
//! Owns the listing state and drives the listing, default locale, form
//! creation and import workflows against a [`FormApi`]. Every user-visible
//! outcome goes through a single notification slot and is forwarded to the
//! [`NotificationBridge`].

use crate::api::{ApiError, FormApi};
use crate::config::ResolvedConfig;
use crate::error::ValidationError;
use crate::locale::{self, LocalStore, DEFAULT_LOCALE_KEY};
use crate::notify::NotificationBridge;
use crate::services::{
    collect_all, order_forms, upload_form_resource, upload_translations, validate_form_name,
    ImportJob, InvalidVersion, TranslationBatch,
};
use crate::state::{
    form_route, ControllerState, FormDraft, FormListView, FormTranslation, Notification, Severity,
};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const IMPORTING_FORM: &str = "Importing Form...";
pub const FORM_IMPORT_FAILED: &str = "Error Importing Form";
pub const IMPORTING_TRANSLATIONS: &str = "Importing Translations...";
pub const TRANSLATIONS_IMPORT_FAILED: &str = "Error Importing Translations";
pub const IMPORT_SUCCEEDED: &str = "Imported Successfully";

/// Tunables the controller reads from configuration
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub listing_url: String,
    pub data_limit: usize,
    pub toast_timeout: Duration,
}

impl From<&ResolvedConfig> for ControllerSettings {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            listing_url: config.endpoints.listing_url(),
            data_limit: config.data_limit,
            toast_timeout: config.toast_timeout,
        }
    }
}

pub struct FormBuilderController {
    pub state: ControllerState,
    api: Box<dyn FormApi>,
    notifier: Box<dyn NotificationBridge>,
    store: Box<dyn LocalStore>,
    settings: ControllerSettings,
    name_validator: fn(&str) -> bool,
}

impl FormBuilderController {
    pub fn new(
        api: Box<dyn FormApi>,
        notifier: Box<dyn NotificationBridge>,
        store: Box<dyn LocalStore>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            state: ControllerState::default(),
            api,
            notifier,
            store,
            settings,
            name_validator: validate_form_name,
        }
    }

    /// Replace the form name check used by [`Self::save_form`]
    #[cfg(test)]
    pub fn with_name_validator(mut self, validator: fn(&str) -> bool) -> Self {
        self.name_validator = validator;
        self
    }

    pub fn view(&self) -> FormListView<'_> {
        self.state.view()
    }

    /// Initial activation: load the listing, then the default locale
    pub async fn mount(&mut self) {
        self.load().await;
        self.fetch_default_locale().await;
    }

    /// Fetch every listing page and publish the ordered result
    pub async fn load(&mut self) {
        self.state.loading = true;

        let result = collect_all(
            self.api.as_ref(),
            &self.settings.listing_url,
            self.settings.data_limit,
        )
        .await;

        match result {
            Ok(forms) => {
                let ordered = order_forms(forms);
                info!("Loaded {} forms", ordered.forms.len());
                self.report_invalid_versions(&ordered.invalid_versions);
                self.state.finish_loading(ordered.forms);
            }
            Err(err) => {
                warn!("{}", err);
                self.show_errors(&err.source);
                self.state.fail_loading();
            }
        }
    }

    /// Fetch the server's default locale and persist it
    pub async fn fetch_default_locale(&mut self) {
        match self.api.fetch_default_locale().await {
            Ok(default_locale) => {
                info!("Default locale is {}", default_locale);
                locale::set_default_locale(&default_locale);
                if let Err(e) = self.store.set(DEFAULT_LOCALE_KEY, &default_locale) {
                    warn!("Failed to persist default locale: {:#}", e);
                }
                self.state.default_locale = Some(default_locale);
            }
            Err(err) => {
                warn!("Failed to fetch default locale: {}", err);
                self.show_errors(&err);
            }
        }
        self.state.loading = false;
    }

    /// Default locale persisted by an earlier fetch
    pub fn cached_default_locale(&self) -> Option<String> {
        match self.store.get(DEFAULT_LOCALE_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read cached default locale: {:#}", e);
                None
            }
        }
    }

    /// Surface a validation message raised by an input form
    pub fn on_validation_error(&mut self, message: &str) {
        self.set_message(message, Severity::Error);
    }

    /// Create an empty form and return the route of its editor
    pub async fn save_form(&mut self, name: &str) -> Option<String> {
        if !(self.name_validator)(name) {
            debug!("Rejected form name {:?}", name);
            self.set_message(ValidationError.to_string(), Severity::Error);
            return None;
        }

        match self.api.create_form(&FormDraft::new(name)).await {
            Ok(created) => {
                info!("Created form {} ({})", name, created.uuid);
                Some(form_route(&created.uuid))
            }
            Err(err) => {
                warn!("Failed to create form {}: {}", name, err);
                self.show_errors(&err);
                None
            }
        }
    }

    /// Upload translations and refresh the listing on success
    pub async fn save_translations(&mut self, batch: TranslationBatch) {
        self.set_message(IMPORTING_TRANSLATIONS, Severity::Success);

        match upload_translations(self.api.as_ref(), &batch).await {
            Ok(()) => {
                self.load().await;
                self.set_message(IMPORT_SUCCEEDED, Severity::Success);
            }
            Err(err) => {
                warn!("{}", err);
                self.set_message(TRANSLATIONS_IMPORT_FAILED, Severity::Error);
            }
        }
    }

    /// Import a form definition, then its translations
    pub async fn save_form_resource(
        &mut self,
        form_json: Value,
        translations: Vec<FormTranslation>,
        name_translations: Option<Value>,
    ) {
        self.set_message(IMPORTING_FORM, Severity::Success);

        let job = ImportJob::new(form_json, translations, name_translations);
        let job_id = job.id;

        match upload_form_resource(self.api.as_ref(), job).await {
            Ok(batch) => self.save_translations(batch).await,
            Err(err) => {
                warn!("[import {}] {}", job_id, err);
                self.set_message(FORM_IMPORT_FAILED, Severity::Error);
            }
        }
    }

    /// Show a notification and arm its clear deadline
    pub fn set_message(&mut self, message: impl Into<String>, severity: Severity) {
        let notification = Notification::new(message, severity);
        debug!(
            "Notification ({}): {}",
            severity.label(),
            notification.message
        );
        self.notifier
            .notify(&notification, self.settings.toast_timeout);
        self.state
            .notification
            .set(notification, Instant::now(), self.settings.toast_timeout);
    }

    /// Show the server's message for a failed request, or a generic one
    pub fn show_errors(&mut self, err: &ApiError) {
        self.set_message(err.user_message(), Severity::Error);
    }

    /// Fire due notification deadlines. Returns true if a message was cleared.
    pub fn tick(&mut self) -> bool {
        self.state.notification.expire(Instant::now())
    }

    fn report_invalid_versions(&mut self, invalid: &[InvalidVersion]) {
        let Some(first) = invalid.first() else {
            return;
        };
        let mut message = format!(
            "Form '{}' has a non-numeric version '{}'",
            first.name, first.raw
        );
        if invalid.len() > 1 {
            message.push_str(&format!(" (and {} more)", invalid.len() - 1));
        }
        self.set_message(message, Severity::Error);
    }
}
