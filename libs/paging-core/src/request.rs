use serde::{Deserialize, Serialize};

use crate::PageError;

/// A validated offset/limit window.
///
/// Fields are private so every instance has passed validation: `limit` is at
/// least one and `offset` is never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    offset: u64,
    limit: u64,
}

impl PageRequest {
    /// Validate a raw window coming from an untyped edge (query string, CLI, JSON).
    pub fn new(offset: i64, limit: i64) -> Result<Self, PageError> {
        if offset < 0 {
            return Err(PageError::NegativeOffset(offset));
        }
        if limit <= 0 {
            return Err(PageError::NonPositiveLimit(limit));
        }
        Ok(Self {
            offset: offset as u64,
            limit: limit as u64,
        })
    }

    /// Page-number addressing: page `n` of `size` rows starts at `n * size`.
    pub fn of(page_number: i64, page_size: i64) -> Result<Self, PageError> {
        if page_number < 0 {
            return Err(PageError::NegativePageNumber(page_number));
        }
        if page_size <= 0 {
            return Err(PageError::NonPositiveLimit(page_size));
        }
        let (page, size) = (page_number as u64, page_size as u64);
        let offset = page
            .checked_mul(size)
            .ok_or(PageError::OffsetOverflow { page, size })?;
        Ok(Self {
            offset,
            limit: size,
        })
    }

    /// First page of the given size.
    pub fn first(limit: i64) -> Result<Self, PageError> {
        Self::new(0, limit)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn page_number(&self) -> u64 {
        self.offset / self.limit
    }

    /// Same offset with the limit capped at `max`. A `max` of zero leaves the request unchanged.
    pub fn clamp_limit(self, max: u64) -> Self {
        if max == 0 || self.limit <= max {
            return self;
        }
        Self {
            offset: self.offset,
            limit: max,
        }
    }

    /// The window directly after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawPageRequest {
    offset: i64,
    limit: i64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        PageRequest::new(raw.offset, raw.limit)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(req: PageRequest) -> Self {
        Self {
            offset: i64::try_from(req.offset).unwrap_or(i64::MAX),
            limit: i64::try_from(req.limit).unwrap_or(i64::MAX),
        }
    }
}
