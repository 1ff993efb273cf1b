//! Aggregation of the paged form listing

use crate::api::FormApi;
use crate::error::AggregationError;
use crate::state::FormDescriptor;
use tracing::{debug, info};

/// Fetch every page of the listing starting at `initial_url`.
///
/// Pages are fetched one after another, following each page's `next` link.
/// Aggregation stops when a page has no `next` link, or as soon as the
/// accumulated count equals `hard_cap` exactly. Any failed fetch discards
/// what was collected so far.
pub async fn collect_all<A>(
    api: &A,
    initial_url: &str,
    hard_cap: usize,
) -> Result<Vec<FormDescriptor>, AggregationError>
where
    A: FormApi + ?Sized,
{
    let mut forms: Vec<FormDescriptor> = Vec::new();
    let mut next_url = Some(initial_url.to_string());
    let mut page = 0;

    while let Some(url) = next_url.take() {
        page += 1;

        let envelope = api
            .fetch_page(&url)
            .await
            .map_err(|source| AggregationError { page, source })?;

        let next = envelope.next_link().map(str::to_string);
        debug!(
            "Page {} fetched ({} forms, has_next={})",
            page,
            envelope.results.len(),
            next.is_some()
        );

        forms.extend(envelope.results);

        if forms.len() == hard_cap {
            info!("Listing reached the cap of {} forms, stopping", hard_cap);
            break;
        }

        next_url = next;
    }

    info!("Collected {} forms across {} pages", forms.len(), page);
    Ok(forms)
}
