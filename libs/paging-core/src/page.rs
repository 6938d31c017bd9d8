use serde::{Deserialize, Serialize};

use crate::{PageError, PageRequest};

/// One window of results plus the total number of matching rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    /// Combine fetched content with its resolved total.
    ///
    /// A total smaller than the content length cannot come from any valid
    /// count and is rejected instead of being clamped.
    pub fn assemble(content: Vec<T>, total: u64, request: PageRequest) -> Result<Self, PageError> {
        if total < content.len() as u64 {
            return Err(PageError::InconsistentTotal {
                total,
                content_len: content.len(),
            });
        }
        Ok(Self {
            content,
            total,
            offset: request.offset(),
            limit: request.limit(),
        })
    }

    /// An empty page for the given window with nothing matching.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            content: Vec::new(),
            total: 0,
            offset: request.offset(),
            limit: request.limit(),
        }
    }

    pub fn page_number(&self) -> u64 {
        self.offset / self.limit.max(1)
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.offset + (self.content.len() as u64) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }

    /// Map items while preserving the paging metadata (row → DTO conversion).
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}
