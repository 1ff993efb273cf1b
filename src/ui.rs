//! Plain-text rendering of the form listing

use crate::state::{FormDescriptor, FormListView};

const HEADERS: [&str; 6] = ["NAME", "VERSION", "PUBLISHED", "LAST CHANGED", "CHANGED BY", "UUID"];
const COLUMN_SPACING: usize = 2;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the listing as an aligned table
pub fn render_listing(view: &FormListView<'_>) -> String {
    if view.loading {
        return "Loading...\n".to_string();
    }
    if view.forms.is_empty() {
        return "No forms found\n".to_string();
    }

    let rows: Vec<[String; 6]> = view.forms.iter().map(row).collect();

    // Column widths from header and cell lengths
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(String::from);
    let mut out = String::new();
    for cells in std::iter::once(&header).chain(rows.iter()) {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(&" ".repeat(COLUMN_SPACING));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn row(form: &FormDescriptor) -> [String; 6] {
    let audit = form.audit_info.as_ref();
    let last_changed = audit
        .and_then(|a| a.last_changed_at())
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let changed_by = audit
        .and_then(|a| a.changed_by.as_ref().or(a.creator.as_ref()))
        .and_then(|user| user.display.clone())
        .unwrap_or_else(|| "-".to_string());

    [
        form.name.clone(),
        form.version_label(),
        if form.published { "yes" } else { "no" }.to_string(),
        last_changed,
        changed_by,
        form.uuid.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AuditInfo, AuditUser, VersionValue};
    use pretty_assertions::assert_eq;

    fn form(name: &str, version: i64, published: bool) -> FormDescriptor {
        FormDescriptor {
            id: None,
            uuid: format!("{name}-{version}"),
            name: name.to_string(),
            version: Some(VersionValue::Number(version)),
            published,
            audit_info: None,
        }
    }

    fn view(forms: &[FormDescriptor], loading: bool) -> FormListView<'_> {
        FormListView {
            forms,
            loading,
            notification: None,
        }
    }

    #[test]
    fn test_loading_placeholder() {
        assert_eq!(render_listing(&view(&[], true)), "Loading...\n");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(render_listing(&view(&[], false)), "No forms found\n");
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut vitals = form("Vitals", 2, true);
        vitals.audit_info = Some(AuditInfo {
            creator: Some(AuditUser {
                uuid: None,
                display: Some("admin".to_string()),
            }),
            date_created: Some("2024-03-01T09:30:00.000+0000".to_string()),
            changed_by: None,
            date_changed: None,
        });
        let forms = vec![form("BP", 10, false), vitals];

        let expected = "\
NAME    VERSION  PUBLISHED  LAST CHANGED      CHANGED BY  UUID
BP      10       no         -                 -           BP-10
Vitals  2        yes        2024-03-01 09:30  admin       Vitals-2
";
        assert_eq!(render_listing(&view(&forms, false)), expected);
    }
}
