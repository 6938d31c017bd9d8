//! Total-count resolution for offset pages.
//!
//! `Simple` always runs the count query. `Optimized` first checks whether the
//! fetched content already pins the total down and runs the count query only
//! when it does not. Both must report the same total for the same snapshot.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PageRequest;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
    /// Always issue the count query.
    Simple,
    /// Skip the count query when the first page came back short.
    #[default]
    Optimized,
}

/// The total implied by the content alone, if any.
///
/// A first page holding fewer rows than requested means nothing was skipped
/// and nothing is left, so the row count is the total.
pub fn derived_total(request: PageRequest, content_len: usize) -> Option<u64> {
    let len = content_len as u64;
    (request.offset() == 0 && len < request.limit()).then_some(len)
}

/// Resolve the total number of matching rows for a fetched page.
///
/// `count` is only awaited when the strategy requires it; its error is
/// returned as-is.
pub async fn resolve_total<F, Fut, E>(
    strategy: CountStrategy,
    request: PageRequest,
    content_len: usize,
    count: F,
) -> Result<u64, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, E>>,
{
    if strategy == CountStrategy::Optimized {
        if let Some(total) = derived_total(request, content_len) {
            debug!(total, "count query skipped, total derived from content");
            return Ok(total);
        }
    }
    debug!(?strategy, "issuing count query");
    count().await
}
