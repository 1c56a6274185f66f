use serde::{Deserialize, Serialize};

/// Largest page a caller may ask for
pub const MAX_PAGE_SIZE: usize = 100;

/// Largest offset storage can address (a signed 64-bit `OFFSET`)
pub const MAX_OFFSET: usize = i64::MAX as usize;

/// Offset-based pagination parameters
///
/// # Example
/// ```
/// use lifeblood_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::new(20, 0);
/// let second = PageRequest::for_page(20, 2);
/// assert_eq!(second.offset, 20);
/// assert_eq!(second.page_number(), 2);
/// # let _ = first;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of items to skip
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Page request for a 1-based page number
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        let page_number = page_number.max(1);
        Self {
            limit: page_size,
            offset: (page_number - 1) * page_size,
        }
    }

    /// Same request with the limit forced into `1..=MAX_PAGE_SIZE` and the
    /// offset capped at [`MAX_OFFSET`]
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.min(MAX_OFFSET),
        }
    }

    /// 1-based page number of this request
    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// One page of items together with the total across all pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Converts every item, keeping the paging metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}
