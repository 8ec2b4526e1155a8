//! # Paginated Track Listing
//!
//! An album's tracks arrive in pages linked by `previous` / `next` URLs.
//! [`TrackList`] turns that chain into a zero-based, randomly indexable
//! sequence:
//!
//! - construction walks backward from the starting page to offset 0, so the
//!   cache always covers a contiguous range starting at the first track;
//! - [`TrackList::get`] answers from the cache or walks forward one page at a
//!   time, appending every page it fetches;
//! - pages are never evicted or fetched twice.
//!
//! [`TrackList::count`] reflects the `total` of the most recently consulted
//! page.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::{Stream, TryStreamExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::album::Album;
use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::models::TrackPageResource;
use crate::track::Track;

/// One fetched segment of a remote list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Position of the first item in the whole list.
    pub offset: usize,
    /// Size of the whole list.
    pub total: usize,
    pub limit: Option<usize>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// One past the last index held by this page.
    pub fn end(&self) -> usize {
        self.offset + self.items.len()
    }

    pub fn covers(&self, index: usize) -> bool {
        index >= self.offset && index < self.end()
    }

    /// Item at list position `index`, if this page holds it.
    pub fn get(&self, index: usize) -> Option<&T> {
        index
            .checked_sub(self.offset)
            .and_then(|local| self.items.get(local))
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> std::result::Result<U, E>) -> std::result::Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<std::result::Result<_, _>>()?,
            offset: self.offset,
            total: self.total,
            limit: self.limit,
            next: self.next,
            previous: self.previous,
        })
    }
}

impl Page<Track> {
    fn from_resource(resource: TrackPageResource, album: &Album) -> Result<Self> {
        let total = resource.total.ok_or(CatalogError::Decode {
            what: "track page",
            message: "missing total".to_string(),
        })?;

        let page = Page {
            items: resource.items,
            offset: resource.offset.unwrap_or(0) as usize,
            total: total as usize,
            limit: resource.limit.map(|limit| limit as usize),
            next: resource.next,
            previous: resource.previous,
        };

        page.try_map(|item| Track::from_partial_in_album(item, album))
    }
}

/// Lazily paged track listing of one album.
pub struct TrackList {
    album: Album,
    client: Arc<CatalogClient>,
    pages: Mutex<VecDeque<Page<Track>>>,
    count: AtomicUsize,
}

impl TrackList {
    /// Build the list from any page of the chain, fetching every earlier page.
    pub async fn new(start: TrackPageResource, album: Album) -> Result<Self> {
        let client = album.client().clone();
        let first = Page::from_resource(start, &album)?;
        let mut count = first.total;
        let mut pages = VecDeque::from([first]);

        while let Some(head) = pages.front().filter(|page| page.offset > 0) {
            let url = head.previous.clone().ok_or(CatalogError::BrokenPageChain {
                offset: head.offset,
                reason: "missing previous link",
            })?;
            let head_offset = head.offset;

            debug!(album = %album.uri(), offset = head_offset, "Walking back to previous page");
            let page = Page::from_resource(client.fetch_page(&url).await?, &album)?;

            if page.items.is_empty() || page.end() != head_offset {
                return Err(CatalogError::BrokenPageChain {
                    offset: head_offset,
                    reason: "previous page does not end where the next one starts",
                });
            }

            count = page.total;
            pages.push_front(page);
        }

        Ok(Self {
            album,
            client,
            pages: Mutex::new(pages),
            count: AtomicUsize::new(count),
        })
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    /// Number of tracks, per the most recently consulted page.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Number of pages held in the cache.
    pub async fn cached_pages(&self) -> usize {
        self.pages.lock().await.len()
    }

    /// Track at `index`, fetching forward pages as needed.
    pub async fn get(&self, index: i64) -> Result<Track> {
        let count = self.count();
        let position = usize::try_from(index)
            .ok()
            .filter(|position| *position < count)
            .ok_or(CatalogError::OutOfRange { index, count })?;

        let mut pages = self.pages.lock().await;

        if let Some(page) = pages.iter().find(|page| page.covers(position)) {
            self.count.store(page.total, Ordering::Release);
            return item_at(page, position);
        }

        loop {
            let (url, expected_offset) = match pages.back() {
                Some(last) => (
                    last.next.clone().ok_or(CatalogError::BrokenPageChain {
                        offset: last.end(),
                        reason: "missing next link",
                    })?,
                    last.end(),
                ),
                None => {
                    return Err(CatalogError::BrokenPageChain {
                        offset: 0,
                        reason: "no cached pages",
                    })
                }
            };

            debug!(album = %self.album.uri(), offset = expected_offset, "Fetching next page");
            let page = Page::from_resource(self.client.fetch_page(&url).await?, &self.album)?;

            if page.items.is_empty() || page.offset != expected_offset {
                return Err(CatalogError::BrokenPageChain {
                    offset: expected_offset,
                    reason: "next page does not start where the previous one ends",
                });
            }

            self.count.store(page.total, Ordering::Release);
            let covers = page.covers(position);
            pages.push_back(page);

            if covers {
                if let Some(page) = pages.back() {
                    return item_at(page, position);
                }
            }
        }
    }

    /// Every track in order, from 0 to `count - 1`.
    ///
    /// The stream ends after the first error. Calling `iter` again starts over
    /// from the cached pages.
    pub fn iter(&self) -> impl Stream<Item = Result<Track>> + '_ {
        futures::stream::unfold(Some(0usize), move |state| async move {
            let index = state?;
            if index >= self.count() {
                return None;
            }

            match self.get(index as i64).await {
                Ok(track) => Some((Ok(track), Some(index + 1))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Fetch and return the whole listing.
    pub async fn collect_all(&self) -> Result<Vec<Track>> {
        self.iter().try_collect().await
    }
}

impl std::fmt::Debug for TrackList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackList")
            .field("album", self.album.uri())
            .field("count", &self.count())
            .finish()
    }
}

fn item_at(page: &Page<Track>, position: usize) -> Result<Track> {
    page.get(position)
        .cloned()
        .ok_or(CatalogError::OutOfRange {
            index: position as i64,
            count: page.total,
        })
}
