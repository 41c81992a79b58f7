//! Lazy multi-page listing streams.

use async_trait::async_trait;
use futures_util::Stream;
use futures_util::stream;
use tracing::{error, info};

use super::client::{SearchClient, SearchQuery};
use crate::extract::{PageBatcher, total_page_count};
use crate::listing::Listing;

/// Anything that can produce search result markup.
///
/// Implemented by [`SearchClient`]; tests and offline runs can supply canned
/// pages instead.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the markup of page `page` (1-indexed) for `query`, or `None`
    /// when the page could not be obtained.
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Option<String>;
}

#[async_trait]
impl PageSource for SearchClient {
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Option<String> {
        SearchClient::fetch_page(self, query, page).await
    }
}

struct SweepState<'a, S: ?Sized> {
    source: &'a S,
    query: SearchQuery,
    max_pages: u32,
    /// Next page to fetch; 1 until the first page has been handled.
    next_page: u32,
    last_page: u32,
    done: bool,
    batcher: PageBatcher,
}

impl<S: PageSource + ?Sized> SweepState<'_, S> {
    async fn advance(&mut self) {
        if self.next_page == 1 {
            self.start().await;
            return;
        }
        if self.next_page > self.last_page {
            self.done = true;
            return;
        }

        let page = self.next_page;
        info!(page, total = self.last_page, keyword = %self.query.keyword, "scraping page");
        let markup = self.source.fetch_page(&self.query, page).await;
        self.batcher.push_page(markup.as_deref());
        self.next_page += 1;
    }

    /// Fetches page 1 once, both to size the sweep and as its first page.
    async fn start(&mut self) {
        if self.max_pages == 0 {
            self.done = true;
            return;
        }
        let Some(markup) = self.source.fetch_page(&self.query, 1).await else {
            error!(keyword = %self.query.keyword, "failed to get initial page");
            self.done = true;
            return;
        };

        self.last_page = total_page_count(&markup).min(self.max_pages);
        info!(page = 1, total = self.last_page, keyword = %self.query.keyword, "scraping page");
        self.batcher.push_page(Some(&markup));
        self.next_page = 2;
    }
}

/// Streams deduplicated listing batches for one keyword sweep.
///
/// Page 1 is fetched first to read the advertised page count; the sweep
/// covers `min(page count, max_pages)` pages, reusing page 1's markup.
/// Pages that cannot be fetched are skipped. If page 1 itself cannot be
/// fetched the stream is empty. Nothing is fetched until the stream is
/// polled, and dropping it stops the sweep.
pub fn listing_stream<'a, S>(
    source: &'a S,
    query: SearchQuery,
    max_pages: u32,
    batch_size: usize,
) -> impl Stream<Item = Vec<Listing>> + Send + 'a
where
    S: PageSource + ?Sized,
{
    let state = SweepState {
        source,
        query,
        max_pages,
        next_page: 1,
        last_page: 0,
        done: false,
        batcher: PageBatcher::new(batch_size),
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(batch) = state.batcher.pop_ready() {
                return Some((batch, state));
            }
            if state.done {
                return state.batcher.finish().map(|batch| (batch, state));
            }
            state.advance().await;
        }
    })
}
