//! Two-phase import: form resource first, then its translations

use crate::api::FormApi;
use crate::error::{ImportError, ImportStep};
use crate::state::{CreatedForm, FormTranslation};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// One import run, consumed by [`upload_form_resource`]
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub id: Uuid,
    pub form_resource: Value,
    pub form_translations: Vec<FormTranslation>,
    pub form_name_translations: Option<Value>,
}

impl ImportJob {
    pub fn new(
        form_resource: Value,
        form_translations: Vec<FormTranslation>,
        form_name_translations: Option<Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_resource,
            form_translations,
            form_name_translations,
        }
    }
}

/// Translations ready to be uploaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationBatch {
    pub translations: Vec<FormTranslation>,
    pub form_name_translations: Option<Value>,
}

/// Create the form resource and bind the job's translations to the created form
pub async fn upload_form_resource<A>(api: &A, job: ImportJob) -> Result<TranslationBatch, ImportError>
where
    A: FormApi + ?Sized,
{
    info!("[import {}] Uploading form resource", job.id);

    let response = api
        .create_form_resource(&job.form_resource)
        .await
        .map_err(|source| ImportError::new(ImportStep::FormResource, source))?;

    info!(
        "[import {}] Created form {} (version {})",
        job.id,
        response.form.uuid,
        response
            .form
            .version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    );

    Ok(TranslationBatch {
        translations: annotate_translations(&response.form, job.form_translations),
        form_name_translations: job.form_name_translations,
    })
}

/// Point every translation at the created form.
///
/// `formUuid` is always replaced. `version` is replaced only when the created
/// form reports one; otherwise the translation keeps its own.
pub fn annotate_translations(
    form: &CreatedForm,
    translations: Vec<FormTranslation>,
) -> Vec<FormTranslation> {
    let reported_version = form.version.as_ref().filter(|v| v.is_reported());

    translations
        .into_iter()
        .map(|mut translation| {
            if let Some(version) = reported_version {
                translation.version = Some(version.clone());
            }
            translation.form_uuid = Some(form.uuid.clone());
            translation
        })
        .collect()
}

/// Upload translations and, if present, form name translations concurrently.
///
/// Both requests always run to completion; the first failure (translations
/// before name translations) is reported.
pub async fn upload_translations<A>(api: &A, batch: &TranslationBatch) -> Result<(), ImportError>
where
    A: FormApi + ?Sized,
{
    debug!(
        "Uploading {} translations (name translations: {})",
        batch.translations.len(),
        batch.form_name_translations.is_some()
    );

    let translations = async {
        api.save_translations(&batch.translations)
            .await
            .map_err(|source| ImportError::new(ImportStep::Translations, source))
    };
    let name_translations = async {
        match &batch.form_name_translations {
            Some(names) => api
                .save_form_name_translations(names, None)
                .await
                .map_err(|source| ImportError::new(ImportStep::NameTranslations, source)),
            None => Ok(()),
        }
    };

    let (translations, name_translations) = tokio::join!(translations, name_translations);
    translations.and(name_translations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockFormApi};
    use crate::state::{FormResourceResponse, VersionValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn translation(locale: &str, version: Option<&str>) -> FormTranslation {
        serde_json::from_value(json!({
            "locale": locale,
            "formName": "Vitals",
            "version": version,
        }))
        .unwrap()
    }

    fn created(uuid: &str, version: Option<VersionValue>) -> CreatedForm {
        CreatedForm {
            uuid: uuid.to_string(),
            name: Some("Vitals".to_string()),
            version,
        }
    }

    mod annotate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reported_version_overrides_every_translation() {
            let annotated = annotate_translations(
                &created("X", Some(VersionValue::Number(3))),
                vec![translation("en", Some("1")), translation("fr", None)],
            );

            for t in &annotated {
                assert_eq!(t.version, Some(VersionValue::Number(3)));
                assert_eq!(t.form_uuid.as_deref(), Some("X"));
            }
        }

        #[test]
        fn test_missing_version_keeps_translation_version() {
            let annotated =
                annotate_translations(&created("X", None), vec![translation("en", Some("2"))]);

            assert_eq!(
                annotated[0].version,
                Some(VersionValue::Text("2".to_string()))
            );
            assert_eq!(annotated[0].form_uuid.as_deref(), Some("X"));
        }

        #[test]
        fn test_zero_version_does_not_override() {
            let annotated = annotate_translations(
                &created("X", Some(VersionValue::Number(0))),
                vec![translation("en", Some("4"))],
            );
            assert_eq!(
                annotated[0].version,
                Some(VersionValue::Text("4".to_string()))
            );
        }

        #[test]
        fn test_other_fields_untouched() {
            let annotated = annotate_translations(
                &created("X", Some(VersionValue::Number(3))),
                vec![translation("fr", Some("1"))],
            );
            assert_eq!(annotated[0].extra.get("locale"), Some(&json!("fr")));
            assert_eq!(annotated[0].extra.get("formName"), Some(&json!("Vitals")));
        }
    }

    mod form_resource {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_success_returns_annotated_batch() {
            let mut api = MockFormApi::new();
            api.expect_create_form_resource()
                .withf(|body| body == &json!({"form": {"name": "Vitals"}}))
                .times(1)
                .returning(|_| {
                    Ok(FormResourceResponse {
                        form: created("X", Some(VersionValue::Number(3))),
                        uuid: Some("resource-uuid".to_string()),
                        value_reference: None,
                    })
                });

            let job = ImportJob::new(
                json!({"form": {"name": "Vitals"}}),
                vec![translation("en", Some("1"))],
                Some(json!({"en": "Vitals"})),
            );
            let batch = assert_ok!(upload_form_resource(&api, job).await);

            assert_eq!(batch.translations[0].form_uuid.as_deref(), Some("X"));
            assert_eq!(batch.translations[0].version, Some(VersionValue::Number(3)));
            assert_eq!(batch.form_name_translations, Some(json!({"en": "Vitals"})));
        }

        #[tokio::test]
        async fn test_failure_reports_form_resource_step() {
            let mut api = MockFormApi::new();
            api.expect_create_form_resource()
                .times(1)
                .returning(|_| Err(ApiError::from_response(500, "Internal Server Error", "")));
            api.expect_save_translations().times(0);
            api.expect_save_form_name_translations().times(0);

            let job = ImportJob::new(json!({}), vec![translation("en", None)], None);
            let err = assert_err!(upload_form_resource(&api, job).await);
            assert_eq!(err.step, ImportStep::FormResource);
        }
    }

    mod translations {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_uploads_both_when_name_translations_present() {
            let mut api = MockFormApi::new();
            api.expect_save_translations()
                .withf(|translations| translations.len() == 2)
                .times(1)
                .returning(|_| Ok(()));
            api.expect_save_form_name_translations()
                .withf(|names, form_uuid| names == &json!({"en": "Vitals"}) && form_uuid.is_none())
                .times(1)
                .returning(|_, _| Ok(()));

            let batch = TranslationBatch {
                translations: vec![translation("en", None), translation("fr", None)],
                form_name_translations: Some(json!({"en": "Vitals"})),
            };
            assert_ok!(upload_translations(&api, &batch).await);
        }

        #[tokio::test]
        async fn test_empty_translations_are_still_uploaded() {
            let mut api = MockFormApi::new();
            api.expect_save_translations()
                .withf(|translations| translations.is_empty())
                .times(1)
                .returning(|_| Ok(()));
            api.expect_save_form_name_translations().times(0);

            assert_ok!(upload_translations(&api, &TranslationBatch::default()).await);
        }

        #[tokio::test]
        async fn test_name_translation_failure_fails_the_batch() {
            let mut api = MockFormApi::new();
            api.expect_save_translations().times(1).returning(|_| Ok(()));
            api.expect_save_form_name_translations()
                .times(1)
                .returning(|_, _| Err(ApiError::Network("Request timeout".to_string())));

            let batch = TranslationBatch {
                translations: vec![translation("en", None)],
                form_name_translations: Some(json!({"en": "Vitals"})),
            };
            let err = assert_err!(upload_translations(&api, &batch).await);
            assert_eq!(err.step, ImportStep::NameTranslations);
        }

        #[tokio::test]
        async fn test_both_requests_complete_when_one_fails() {
            let mut api = MockFormApi::new();
            api.expect_save_translations()
                .times(1)
                .returning(|_| Err(ApiError::from_response(400, "Bad Request", "")));
            api.expect_save_form_name_translations()
                .times(1)
                .returning(|_, _| Ok(()));

            let batch = TranslationBatch {
                translations: vec![translation("en", None)],
                form_name_translations: Some(json!({"en": "Vitals"})),
            };
            let err = assert_err!(upload_translations(&api, &batch).await);
            assert_eq!(err.step, ImportStep::Translations);
        }
    }
}
