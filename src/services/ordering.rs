//! Ordering of the aggregated listing

use crate::state::{FormDescriptor, ParsedVersion, VersionValue};
use tracing::warn;

/// A form whose version could not be read as an integer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion {
    pub name: String,
    pub uuid: String,
    pub raw: String,
}

/// Ordered listing plus the forms with unreadable versions
#[derive(Debug, Clone, Default)]
pub struct OrderedForms {
    pub forms: Vec<FormDescriptor>,
    pub invalid_versions: Vec<InvalidVersion>,
}

/// Sort forms by name, then by numeric version, both ascending.
///
/// Numeric versions (including numeric text) are normalized to numbers.
/// Anything else keeps its raw value, sorts after every numeric version of
/// the same name, and is reported in `invalid_versions`. The sort is stable.
pub fn order_forms(forms: Vec<FormDescriptor>) -> OrderedForms {
    let mut invalid_versions = Vec::new();

    let mut keyed: Vec<(ParsedVersion, FormDescriptor)> = forms
        .into_iter()
        .map(|mut form| {
            let parsed = form.parsed_version();
            match parsed {
                ParsedVersion::Number(n) => form.version = Some(VersionValue::Number(n)),
                ParsedVersion::Invalid => {
                    warn!(
                        "Form '{}' ({}) has a non-numeric version '{}'",
                        form.name,
                        form.uuid,
                        form.version_label()
                    );
                    invalid_versions.push(InvalidVersion {
                        name: form.name.clone(),
                        uuid: form.uuid.clone(),
                        raw: form.version_label(),
                    });
                }
            }
            (parsed, form)
        })
        .collect();

    keyed.sort_by(|(va, a), (vb, b)| a.name.cmp(&b.name).then(va.cmp(vb)));

    OrderedForms {
        forms: keyed.into_iter().map(|(_, form)| form).collect(),
        invalid_versions,
    }
}
