//! Draining paginated listings.

use crate::api::{ApiError, ListPage};
use std::future::Future;

/// Everything collected from a listing, plus the error that stopped it early.
#[derive(Debug)]
pub struct Drained<T> {
    /// Items accumulated before the listing ended or failed.
    pub items: Vec<T>,
    /// The page failure that aborted pagination, if any.
    pub error: Option<ApiError>,
}

/// Requests pages 1, 2, ... until the provider reports no further page.
///
/// A failed page ends pagination for this listing only; items from
/// earlier pages are kept.
pub async fn drain_pages<T, F, Fut>(mut fetch: F) -> Drained<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ListPage<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        match fetch(page).await {
            Ok(list) => {
                items.extend(list.items);
                if !list.has_next {
                    return Drained { items, error: None };
                }
                page += 1;
            }
            Err(error) => {
                return Drained {
                    items,
                    error: Some(error),
                }
            }
        }
    }
}
