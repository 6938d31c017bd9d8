use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),

    #[error("limit must be positive, got {0}")]
    NonPositiveLimit(i64),

    #[error("page number must not be negative, got {0}")]
    NegativePageNumber(i64),

    #[error("offset overflow for page {page} of size {size}")]
    OffsetOverflow { page: u64, size: u64 },

    #[error("total {total} is smaller than the {content_len} rows of content")]
    InconsistentTotal { total: u64, content_len: usize },
}
