//! Configuration handling for the client

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default server address
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
/// Listing size at which aggregation stops
pub const DEFAULT_DATA_LIMIT: usize = 100;
/// How long a notification stays up
pub const DEFAULT_TOAST_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_FORM_PATH: &str = "/openmrs/ws/rest/v1/form";
pub const DEFAULT_FORM_RESOURCE_PATH: &str = "/openmrs/ws/rest/v1/bahmniie/form/saveFormResource";
pub const DEFAULT_TRANSLATIONS_PATH: &str = "/openmrs/ws/rest/v1/bahmniie/form/saveTranslation";
pub const DEFAULT_NAME_TRANSLATIONS_PATH: &str =
    "/openmrs/ws/rest/v1/bahmniie/form/saveFormNameTranslation";
pub const DEFAULT_LOCALE_PATH: &str =
    "/openmrs/ws/rest/v1/bahmnicore/sql/globalproperty?property=default_locale";

/// Fields requested for each form in the listing
const LISTING_REPRESENTATION: &str = "custom:(id,uuid,name,version,published,auditInfo)";

/// User configuration, every field optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Server address
    pub server_url: Option<String>,
    /// Basic auth user
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Listing size cap
    pub data_limit: Option<usize>,
    /// Notification timeout in milliseconds
    pub toast_timeout_ms: Option<u64>,
    pub form_path: Option<String>,
    pub form_resource_path: Option<String>,
    pub translations_path: Option<String>,
    pub name_translations_path: Option<String>,
    pub default_locale_path: Option<String>,
}

/// Endpoint paths, relative to the server address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub form: String,
    pub form_resource: String,
    pub translations: String,
    pub name_translations: String,
    pub default_locale: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            form: DEFAULT_FORM_PATH.to_string(),
            form_resource: DEFAULT_FORM_RESOURCE_PATH.to_string(),
            translations: DEFAULT_TRANSLATIONS_PATH.to_string(),
            name_translations: DEFAULT_NAME_TRANSLATIONS_PATH.to_string(),
            default_locale: DEFAULT_LOCALE_PATH.to_string(),
        }
    }
}

impl ApiEndpoints {
    /// URL of the first listing page
    pub fn listing_url(&self) -> String {
        format!("{}?v={}", self.form, LISTING_REPRESENTATION)
    }
}

/// Configuration with defaults and environment overrides applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub data_limit: usize,
    pub toast_timeout: Duration,
    pub endpoints: ApiEndpoints,
}

impl ClientConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "bahmni", "form-builder-cli")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ClientConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(Some(path))
    }

    /// Apply `FORM_BUILDER_*` environment variables and defaults
    pub fn resolve(self) -> ResolvedConfig {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    pub(crate) fn resolve_with(self, env: impl Fn(&str) -> Option<String>) -> ResolvedConfig {
        let defaults = ApiEndpoints::default();

        ResolvedConfig {
            server_url: env("FORM_BUILDER_SERVER_URL")
                .or(self.server_url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            username: env("FORM_BUILDER_USERNAME").or(self.username),
            password: env("FORM_BUILDER_PASSWORD").or(self.password),
            data_limit: self.data_limit.unwrap_or(DEFAULT_DATA_LIMIT),
            toast_timeout: Duration::from_millis(
                self.toast_timeout_ms.unwrap_or(DEFAULT_TOAST_TIMEOUT_MS),
            ),
            endpoints: ApiEndpoints {
                form: self.form_path.unwrap_or(defaults.form),
                form_resource: self.form_resource_path.unwrap_or(defaults.form_resource),
                translations: self.translations_path.unwrap_or(defaults.translations),
                name_translations: self
                    .name_translations_path
                    .unwrap_or(defaults.name_translations),
                default_locale: self.default_locale_path.unwrap_or(defaults.default_locale),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.server_url.is_none());
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.data_limit.is_none());
        assert!(config.toast_timeout_ms.is_none());
        assert!(config.form_path.is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = ClientConfig::default().resolve_with(no_env);
        assert_eq!(resolved.server_url, DEFAULT_SERVER_URL);
        assert_eq!(resolved.data_limit, DEFAULT_DATA_LIMIT);
        assert_eq!(resolved.toast_timeout, Duration::from_millis(5000));
        assert_eq!(resolved.endpoints, ApiEndpoints::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = ClientConfig {
            server_url: Some("http://from-file:8080".to_string()),
            username: Some("file-user".to_string()),
            ..Default::default()
        };
        let resolved = config.resolve_with(|key| match key {
            "FORM_BUILDER_SERVER_URL" => Some("https://from-env".to_string()),
            _ => None,
        });
        assert_eq!(resolved.server_url, "https://from-env");
        assert_eq!(resolved.username.as_deref(), Some("file-user"));
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = ClientConfig {
            form_path: Some("/api/form".to_string()),
            data_limit: Some(50),
            ..Default::default()
        };
        let resolved = config.resolve_with(no_env);
        assert_eq!(resolved.endpoints.form, "/api/form");
        assert_eq!(resolved.endpoints.translations, DEFAULT_TRANSLATIONS_PATH);
        assert_eq!(resolved.data_limit, 50);
    }

    #[test]
    fn test_listing_url() {
        let endpoints = ApiEndpoints::default();
        assert_eq!(
            endpoints.listing_url(),
            "/openmrs/ws/rest/v1/form?v=custom:(id,uuid,name,version,published,auditInfo)"
        );
    }

    #[test]
    fn test_serialization() {
        let config = ClientConfig {
            server_url: Some("https://demo.mybahmni.org".to_string()),
            data_limit: Some(250),
            toast_timeout_ms: Some(3000),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.server_url,
            Some("https://demo.mybahmni.org".to_string())
        );
        assert_eq!(parsed.data_limit, Some(250));
        assert_eq!(parsed.toast_timeout_ms, Some(3000));
        assert!(parsed.username.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown fields are ignored
        let json = r#"{"server_url": "http://host", "theme": "dark"}"#;
        let parsed: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.server_url, Some("http://host".to_string()));
    }

    #[test]
    fn test_load_returns_ok() {
        // Falls back to defaults when no config file exists
        let result = ClientConfig::load();
        assert!(result.is_ok());
    }
}
