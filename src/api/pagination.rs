// src/api/pagination.rs
//! Cursor-driven pagination over async closures.

use super::types::{PaginatedResponse, PaginationResult};
use crate::error::AppError;
use crate::types::PageSize;

/// Drains a cursor-paginated listing.
///
/// `fetch_fn` receives the page size and the cursor to resume from (`None`
/// for the first request). Requests are strictly sequential; batches are
/// appended in arrival order. Any error aborts the drain and discards what
/// was collected so far.
pub async fn fetch_all_pages<T, F, Fut>(
    page_size: PageSize,
    mut fetch_fn: F,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(PageSize, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut requests = 0u32;

    loop {
        let response = fetch_fn(page_size, cursor.take()).await?;
        requests += 1;

        log::debug!(
            "Page {} returned {} items (has_more: {})",
            requests,
            response.results.len(),
            response.has_more
        );
        all_items.extend(response.results);

        if !response.has_more {
            break;
        }

        match response.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(AppError::MalformedResponse(format!(
                    "page {} reported has_more without a next_cursor",
                    requests
                )))
            }
        }
    }

    Ok(PaginationResult {
        items: all_items,
        requests,
    })
}
