//! Cross-page deduplication and batching.

use std::collections::{HashSet, VecDeque};
use std::iter::Fuse;

use tracing::{debug, warn};

use super::page::extract_page;
use crate::listing::Listing;

/// Listings per emitted batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Accumulates listings from successive pages, dropping `(title, link)`
/// pairs already seen in this run and cutting them into fixed-size batches.
///
/// One batcher belongs to one run; it is never shared.
#[derive(Debug)]
pub struct PageBatcher {
    batch_size: usize,
    seen: HashSet<(String, String)>,
    current: Vec<Listing>,
    ready: VecDeque<Vec<Listing>>,
}

impl PageBatcher {
    /// Creates a batcher emitting batches of `batch_size` (minimum 1).
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            seen: HashSet::new(),
            current: Vec::with_capacity(batch_size),
            ready: VecDeque::new(),
        }
    }

    /// Extracts a page and queues its unseen listings. `None` is a page that
    /// could not be fetched; it is skipped. Returns the number of new listings.
    pub fn push_page(&mut self, markup: Option<&str>) -> usize {
        match markup {
            Some(markup) => self.push_listings(extract_page(markup)),
            None => {
                warn!("page unavailable, skipping");
                0
            }
        }
    }

    /// Queues listings whose `(title, link)` has not been seen in this run.
    /// Returns how many were new.
    pub fn push_listings(&mut self, listings: impl IntoIterator<Item = Listing>) -> usize {
        let mut added = 0;
        for listing in listings {
            if !self.seen.insert(listing.key()) {
                debug!(title = %listing.title, "duplicate listing skipped");
                continue;
            }
            added += 1;
            self.current.push(listing);
            if self.current.len() >= self.batch_size {
                let full = std::mem::replace(&mut self.current, Vec::with_capacity(self.batch_size));
                self.ready.push_back(full);
            }
        }
        added
    }

    /// Takes the oldest full batch, if any.
    pub fn pop_ready(&mut self) -> Option<Vec<Listing>> {
        self.ready.pop_front()
    }

    /// Takes whatever remains: queued full batches first, then the partial
    /// batch. Returns `None` once everything has been drained.
    pub fn finish(&mut self) -> Option<Vec<Listing>> {
        if let Some(batch) = self.ready.pop_front() {
            return Some(batch);
        }
        if self.current.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current))
        }
    }

    /// Distinct listings accepted so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Pull-based iterator of listing batches over a sequence of pages.
///
/// Pages are consumed lazily: the next page is only extracted when no batch
/// is ready. Dropping the iterator stops the run.
#[derive(Debug)]
pub struct ListingBatches<I: Iterator> {
    pages: Fuse<I>,
    batcher: PageBatcher,
}

impl<I> ListingBatches<I>
where
    I: Iterator<Item = Option<String>>,
{
    /// Wraps a page sequence. `None` items are missing pages.
    pub fn new(pages: impl IntoIterator<IntoIter = I>, batch_size: usize) -> Self {
        Self {
            pages: pages.into_iter().fuse(),
            batcher: PageBatcher::new(batch_size),
        }
    }
}

impl<I> Iterator for ListingBatches<I>
where
    I: Iterator<Item = Option<String>>,
{
    type Item = Vec<Listing>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(batch) = self.batcher.pop_ready() {
                return Some(batch);
            }
            match self.pages.next() {
                Some(page) => {
                    self.batcher.push_page(page.as_deref());
                }
                None => return self.batcher.finish(),
            }
        }
    }
}

/// Batches listings across `pages` in discovery order.
///
/// # Examples
///
/// ```
/// use scout_core::extract::listing_batches;
///
/// let pages = vec![None, Some("<p>empty</p>".to_string())];
/// assert_eq!(listing_batches(pages, 10).count(), 0);
/// ```
pub fn listing_batches<P>(pages: P, batch_size: usize) -> ListingBatches<P::IntoIter>
where
    P: IntoIterator<Item = Option<String>>,
{
    ListingBatches::new(pages, batch_size)
}
