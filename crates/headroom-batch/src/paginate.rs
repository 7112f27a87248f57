//! Sequential pagination with partial-result recovery.
//!
//! Cursorless APIs hand out results page by page; the [`Paginator`] walks
//! the pages for you and keeps whatever it already collected when a fetch
//! fails or the caller cancels, so a hiccup on page 40 does not throw away
//! the first 39.

use std::future::Future;

use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::BoxError;

/// One page of results as the fetch callback reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Whether the API says another page exists after this one.
    pub has_more: bool,
}

/// Why pagination stopped early.
#[derive(Debug, thiserror::Error)]
pub enum PaginateError {
    /// A page fetch failed. Earlier pages are still in the result.
    #[error("failed to fetch page {page}: {source}")]
    Fetch {
        page: u32,
        #[source]
        source: BoxError,
    },
    /// The caller's token fired before this page was requested.
    #[error("pagination cancelled before page {page}")]
    Cancelled { page: u32 },
}

/// Everything a pagination run produced, complete or not.
#[derive(Debug)]
pub struct PaginatedResult<T> {
    /// Items from every successfully fetched page, in page order.
    pub items: Vec<T>,
    /// How many pages were fetched successfully.
    pub pages_fetched: u32,
    /// Why the run stopped early, if it did. `None` means the final page
    /// was reached or the page cap kicked in.
    pub error: Option<PaginateError>,
}

impl<T> PaginatedResult<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Walks numbered pages until the API reports no more.
#[derive(Debug, Clone)]
pub struct Paginator {
    name: String,
    page_size: u32,
    max_pages: u32,
}

impl Paginator {
    /// Creates a paginator with a page size of 100 and no page cap.
    pub fn new(name: impl Into<String>) -> Self {
        Paginator {
            name: name.into(),
            page_size: 100,
            max_pages: 0,
        }
    }

    /// Sets how many items to request per page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Caps how many pages a single run may fetch. 0 means unlimited.
    /// Hitting the cap is a normal stop, not an error.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches pages starting from 1 until `has_more` is false, a short
    /// page arrives, the page cap is reached, a fetch fails, or the token
    /// fires. A page with fewer items than the requested page size is
    /// taken as the end of the listing even when the API claims more.
    ///
    /// The callback receives the page number and the configured page size.
    /// On early stop the result still carries every item collected so far.
    pub async fn fetch_all<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut fetch_page: F,
    ) -> PaginatedResult<T>
    where
        F: FnMut(u32, u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, BoxError>>,
    {
        let mut items = Vec::new();
        let mut pages_fetched = 0;
        let mut page = 1u32;

        loop {
            if cancel.is_cancelled() {
                #[cfg(feature = "tracing")]
                debug!(paginator = %self.name, page, "Pagination cancelled");
                return PaginatedResult {
                    items,
                    pages_fetched,
                    error: Some(PaginateError::Cancelled { page }),
                };
            }

            match fetch_page(page, self.page_size).await {
                Ok(mut fetched) => {
                    pages_fetched = page;
                    #[cfg(feature = "tracing")]
                    debug!(
                        paginator = %self.name,
                        page,
                        items = fetched.items.len(),
                        has_more = fetched.has_more,
                        "Page fetched"
                    );
                    let count = fetched.items.len();
                    items.append(&mut fetched.items);
                    if !fetched.has_more || count < self.page_size as usize {
                        break;
                    }
                    if self.max_pages != 0 && page >= self.max_pages {
                        #[cfg(feature = "tracing")]
                        debug!(paginator = %self.name, max_pages = self.max_pages, "Page cap reached");
                        break;
                    }
                    page += 1;
                }
                Err(source) => {
                    return PaginatedResult {
                        items,
                        pages_fetched,
                        error: Some(PaginateError::Fetch { page, source }),
                    };
                }
            }
        }

        PaginatedResult {
            items,
            pages_fetched,
            error: None,
        }
    }
}
