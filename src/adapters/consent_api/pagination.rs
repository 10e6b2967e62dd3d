//! Page cursor shared by the paginated listings
//!
//! Pages are requested from 1 upwards. After each response the cursor looks
//! at the last page number reported by that response: once the fetched page
//! reaches it, the listing is complete. Empty pages do not stop pagination.

/// Position in a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    next_page: Option<u32>,
    last_page: Option<u32>,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    /// Cursor positioned before page 1
    pub fn new() -> Self {
        Self {
            next_page: Some(1),
            last_page: None,
        }
    }

    /// Page to request next, `None` once the listing is exhausted
    pub fn next_page(&self) -> Option<u32> {
        self.next_page
    }

    /// Last page reported by the most recent response
    pub fn last_page(&self) -> Option<u32> {
        self.last_page
    }

    /// Record that `fetched` was received with `last_page` in its header
    pub fn advance(&mut self, fetched: u32, last_page: u32) {
        self.last_page = Some(last_page);
        // `>=` also ends listings whose servers report 0 pages for no results
        self.next_page = if fetched >= last_page {
            None
        } else {
            Some(fetched + 1)
        };
    }
}
