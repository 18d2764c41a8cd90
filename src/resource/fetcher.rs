//! Resource Fetcher
//!
//! Follows `nextPageToken` across the pages of a list method.

use super::args::Arg;
use crate::api::service::Service;
use anyhow::Result;
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;

/// Stream every page returned by a generated method.
///
/// The first request is sent exactly as `call` would send it. Each following
/// request carries the previous page's `nextPageToken` as `pageToken`.
pub fn paginate<'a>(
    service: &'a Service,
    method: &str,
    args: &[Arg],
) -> Result<impl Stream<Item = Result<Value>> + 'a> {
    let request = service.prepare(method, args)?;

    // `None` once the last page has been seen; `Some(None)` for the first page
    let start: Option<Option<String>> = Some(None);

    Ok(stream::try_unfold(start, move |cursor| {
        let mut request = request.clone();
        async move {
            let Some(page_token) = cursor else {
                return Ok(None);
            };

            if let Some(token) = page_token {
                tracing::debug!("Fetching next page");
                request.set_query("pageToken", token);
            }

            let page = service.send(&request).await?;
            let next = next_page_token(&page);
            Ok::<_, anyhow::Error>(Some((page, next.map(Some))))
        }
    }))
}

/// Fetch all pages and collect their `items` arrays
pub async fn list_all(service: &Service, method: &str, args: &[Arg]) -> Result<Vec<Value>> {
    let pages = paginate(service, method, args)?;
    futures::pin_mut!(pages);

    let mut all_items = Vec::new();
    while let Some(page) = pages.try_next().await? {
        if let Some(items) = page.get("items").and_then(|v| v.as_array()) {
            all_items.extend(items.iter().cloned());
        }
    }

    Ok(all_items)
}

fn next_page_token(page: &Value) -> Option<String> {
    page.get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
