//! Pagination types and traits
//!
//! Response envelope of the social-graph API, pagination limits and the
//! per-call pagination state.

use crate::error::Result;
use crate::types::{Fid, UserRecord};
use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Default number of users requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default cap on page requests for a single list
pub const DEFAULT_MAX_PAGES: usize = 1000;

// ============================================================================
// Response Envelope
// ============================================================================

/// One page of the followers/following endpoints:
/// `{ result: { users: [...] }, next?: { cursor } }`
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    /// Page payload
    pub result: UsersResult,
    /// Continuation, absent on the last page
    #[serde(default)]
    pub next: Option<NextCursor>,
}

/// Payload of a users page
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResult {
    /// Users on this page, in server order
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Continuation block of a users page
#[derive(Debug, Clone, Deserialize)]
pub struct NextCursor {
    /// Opaque cursor for the following page
    #[serde(default)]
    pub cursor: Option<String>,
}

impl UsersPage {
    /// Cursor for the next page; `None` when pagination is finished.
    /// An empty cursor string also ends pagination.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next
            .as_ref()
            .and_then(|n| n.cursor.as_deref())
            .filter(|c| !c.is_empty())
    }
}

// ============================================================================
// Limits & State
// ============================================================================

/// Caps that keep a misbehaving cursor chain from looping forever
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    /// Users requested per page (sent as `limit=` unless the endpoint has one)
    pub page_size: u32,
    /// Maximum page requests per list
    pub max_pages: usize,
    /// Maximum accumulated users per list
    pub max_records: Option<usize>,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_records: None,
        }
    }
}

impl PaginationLimits {
    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page cap
    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the record cap
    #[must_use]
    pub fn max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// Tracks pagination progress within one `fetch_all` call
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far
    pub pages: usize,
    /// Cursor for the next request
    pub cursor: Option<String>,
    /// Total records fetched so far
    pub total_fetched: usize,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and where to continue from
    pub fn advance(&mut self, records: usize, next_cursor: Option<&str>) {
        self.pages += 1;
        self.total_fetched += records;
        match next_cursor {
            Some(cursor) => self.cursor = Some(cursor.to_string()),
            None => {
                self.cursor = None;
                self.done = true;
            }
        }
    }
}

// ============================================================================
// Follow Graph Seam
// ============================================================================

/// Which side of the follow graph to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowList {
    /// Accounts that follow the subject
    Followers,
    /// Accounts the subject follows
    Following,
}

impl FollowList {
    /// Endpoint path, with the subject fid embedded
    pub fn endpoint(self, fid: Fid) -> String {
        match self {
            FollowList::Followers => format!("v2/followers?fid={fid}"),
            FollowList::Following => format!("v2/following?fid={fid}"),
        }
    }
}

impl std::fmt::Display for FollowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowList::Followers => write!(f, "followers"),
            FollowList::Following => write!(f, "following"),
        }
    }
}

/// Source of complete follower/following lists
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Fetch every user in `list` for `fid`, in server order
    async fn fetch(
        &self,
        list: FollowList,
        fid: Fid,
        cancel: &CancellationToken,
    ) -> Result<Vec<UserRecord>>;
}
