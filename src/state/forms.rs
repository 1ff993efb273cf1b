//! Form resources as exchanged with the form REST API

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A version as the server reports it.
///
/// Integers and text are the usual shapes. Anything else (floats, numbers
/// beyond `i64`, booleans, objects) lands in `Other` so a single odd entry
/// never fails the decode of a whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionValue {
    Number(i64),
    Text(String),
    Other(Value),
}

/// Result of coercing a [`VersionValue`] to an integer for ordering.
///
/// `Invalid` is the sentinel for text that is not a base-10 integer. It
/// orders after every numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParsedVersion {
    Number(i64),
    Invalid,
}

impl VersionValue {
    /// Coerce to an integer (base 10, surrounding whitespace ignored)
    pub fn parse(&self) -> ParsedVersion {
        match self {
            Self::Number(n) => ParsedVersion::Number(*n),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(ParsedVersion::Number)
                .unwrap_or(ParsedVersion::Invalid),
            // Finite numbers in range are truncated toward zero
            Self::Other(value) => value
                .as_f64()
                .filter(|f| f.is_finite() && (i64::MIN as f64..=i64::MAX as f64).contains(f))
                .map(|f| ParsedVersion::Number(f.trunc() as i64))
                .unwrap_or(ParsedVersion::Invalid),
        }
    }

    /// Whether the value counts as a reported version.
    /// Zero, the empty string, `false` and `null` do not.
    pub fn is_reported(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
            Self::Other(Value::Null) => false,
            Self::Other(Value::Bool(b)) => *b,
            Self::Other(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::Other(_) => true,
        }
    }
}

impl fmt::Display for VersionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// User reference inside audit info
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditUser {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}

/// Audit information attached to a form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    #[serde(default)]
    pub creator: Option<AuditUser>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub changed_by: Option<AuditUser>,
    #[serde(default)]
    pub date_changed: Option<String>,
}

impl AuditInfo {
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date_created.as_deref().and_then(parse_timestamp)
    }

    /// Last change time, falling back to creation time for untouched forms
    pub fn last_changed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date_changed
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at())
    }
}

/// One entry of the form listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    #[serde(default)]
    pub id: Option<Value>,
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<VersionValue>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub audit_info: Option<AuditInfo>,
}

impl FormDescriptor {
    pub fn parsed_version(&self) -> ParsedVersion {
        self.version
            .as_ref()
            .map(VersionValue::parse)
            .unwrap_or(ParsedVersion::Invalid)
    }

    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// Continuation link of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub uri: String,
}

impl Link {
    pub fn is_next(&self) -> bool {
        self.rel == "next"
    }
}

/// One page of the form listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub results: Vec<FormDescriptor>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl PageEnvelope {
    /// URI of the next page, if the server announced one
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.is_next())
            .map(|link| link.uri.as_str())
    }
}

/// Body posted to create a new, empty form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub name: String,
    pub version: String,
    pub published: bool,
}

impl FormDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1".to_string(),
            published: false,
        }
    }
}

/// Form as returned by the create endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedForm {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<VersionValue>,
}

/// Response of the create-form-resource endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResourceResponse {
    pub form: CreatedForm,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub value_reference: Option<String>,
}

/// Translation document of a form.
///
/// Only `version` and `formUuid` are interpreted; the rest of the document
/// (locale, labels, concepts) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTranslation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_uuid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Route the editor lives at for a given form
pub fn form_route(uuid: &str) -> String {
    format!("/form-builder/{uuid}")
}

/// Parse the server's timestamps, which may lack the colon in the offset
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}
