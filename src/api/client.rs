//! HTTP client for the form REST API
//!
//! Thin reqwest wrapper: resolves endpoint paths against the configured
//! server, applies basic auth, and turns non-2xx responses into
//! [`ApiError::Http`] carrying the server's structured message when present.

use crate::config::{ApiEndpoints, ResolvedConfig};
use crate::state::{CreatedForm, FormDraft, FormResourceResponse, FormTranslation, PageEnvelope};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::debug;

use super::{ApiError, FormApi};

/// Client for the form REST API
pub struct HttpFormClient {
    client: Client,
    base_url: Url,
    endpoints: ApiEndpoints,
    credentials: Option<(String, Option<String>)>,
}

impl HttpFormClient {
    /// Create a new client from resolved configuration
    pub fn new(config: &ResolvedConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.server_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.server_url)))?;

        let client = Client::builder()
            .user_agent(concat!("form-builder-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            endpoints: config.endpoints.clone(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    /// Resolve a path or absolute URL against the server address
    fn url(&self, target: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(target)
            .map_err(|e| ApiError::InvalidUrl(format!("{target}: {e}")))
    }

    fn request(&self, method: Method, target: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(target)?;
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        Ok(match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_ref()),
            None => builder,
        })
    }

    /// Send a request, failing on any non-2xx status
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Request failed");
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), reason, &body))
    }
}

#[async_trait]
impl FormApi for HttpFormClient {
    async fn fetch_page(&self, url: &str) -> Result<PageEnvelope, ApiError> {
        let request = self.request(Method::GET, url)?;
        let response = self.execute(request).await?;
        Ok(response.json::<PageEnvelope>().await?)
    }

    async fn fetch_default_locale(&self) -> Result<String, ApiError> {
        let request = self.request(Method::GET, &self.endpoints.default_locale)?;
        let response = self.execute(request).await?;
        let text = response.text().await?;
        Ok(text.trim().to_string())
    }

    async fn create_form(&self, draft: &FormDraft) -> Result<CreatedForm, ApiError> {
        let request = self.request(Method::POST, &self.endpoints.form)?.json(draft);
        let response = self.execute(request).await?;
        Ok(response.json::<CreatedForm>().await?)
    }

    async fn create_form_resource(
        &self,
        form_json: &Value,
    ) -> Result<FormResourceResponse, ApiError> {
        let request = self
            .request(Method::POST, &self.endpoints.form_resource)?
            .json(form_json);
        let response = self.execute(request).await?;
        Ok(response.json::<FormResourceResponse>().await?)
    }

    async fn save_translations(&self, translations: &[FormTranslation]) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, &self.endpoints.translations)?
            .json(translations);
        self.execute(request).await?;
        Ok(())
    }

    async fn save_form_name_translations(
        &self,
        name_translations: &Value,
        form_uuid: Option<String>,
    ) -> Result<(), ApiError> {
        let mut request = self
            .request(Method::POST, &self.endpoints.name_translations)?
            .json(name_translations);
        if let Some(uuid) = form_uuid {
            request = request.query(&[("formUuid", uuid)]);
        }
        self.execute(request).await?;
        Ok(())
    }
}
