//! Cursor-driven fetch of complete user lists

use super::types::{FollowGraph, FollowList, PaginationLimits, PaginationState, UsersPage};
use crate::error::{Error, LimitKind, Result};
use crate::http::HttpClient;
use crate::types::{Fid, UserRecord};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Follows `next.cursor` until the server stops returning one.
///
/// Requests are strictly sequential. Any failed page aborts the whole call;
/// nothing accumulated so far is returned.
#[derive(Debug)]
pub struct PagedFetcher {
    client: HttpClient,
    limits: PaginationLimits,
}

impl PagedFetcher {
    /// Create a fetcher with default limits
    pub fn new(client: HttpClient) -> Self {
        Self::with_limits(client, PaginationLimits::default())
    }

    /// Create a fetcher with custom limits
    pub fn with_limits(client: HttpClient, limits: PaginationLimits) -> Self {
        Self { client, limits }
    }

    /// Configured limits
    pub fn limits(&self) -> &PaginationLimits {
        &self.limits
    }

    /// Fetch every page behind `endpoint` and concatenate the users.
    ///
    /// `endpoint` already carries its required query parameters, e.g.
    /// `v2/followers?fid=123`. Cancellation is checked before each page and
    /// races the in-flight request, whose response is then dropped.
    pub async fn fetch_all(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<UserRecord>> {
        let mut users = Vec::new();
        let mut state = PaginationState::new();

        while !state.done {
            if cancel.is_cancelled() {
                debug!("Fetch of {endpoint} cancelled after {} pages", state.pages);
                return Err(Error::Cancelled);
            }
            if state.pages >= self.limits.max_pages {
                return Err(Error::PaginationLimitExceeded {
                    limit: self.limits.max_pages,
                    kind: LimitKind::Pages,
                });
            }

            let path = page_path(endpoint, self.limits.page_size, state.cursor.as_deref());
            let page: UsersPage = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Discarding in-flight page {} of {endpoint}", state.pages + 1);
                    return Err(Error::Cancelled);
                }
                page = self.client.get_json::<UsersPage>(&path) => page?,
            };

            let count = page.result.users.len();
            state.advance(count, page.next_cursor());
            users.extend(page.result.users);

            debug!(
                "Page {}: fetched {count} users from {endpoint} (more: {})",
                state.pages, !state.done
            );

            if let Some(max) = self.limits.max_records {
                if users.len() > max {
                    return Err(Error::PaginationLimitExceeded {
                        limit: max,
                        kind: LimitKind::Records,
                    });
                }
            }
        }

        info!(
            "Fetched {} users from {endpoint} in {} pages",
            users.len(),
            state.pages
        );
        Ok(users)
    }
}

#[async_trait]
impl FollowGraph for PagedFetcher {
    async fn fetch(
        &self,
        list: FollowList,
        fid: Fid,
        cancel: &CancellationToken,
    ) -> Result<Vec<UserRecord>> {
        self.fetch_all(&list.endpoint(fid), cancel).await
    }
}

/// Request path for one page: `limit` is added unless the caller set one,
/// `cursor` is added for every page after the first.
pub fn page_path(endpoint: &str, page_size: u32, cursor: Option<&str>) -> String {
    let mut path = endpoint.to_string();

    if !has_query_param(endpoint, "limit") {
        push_param(&mut path, "limit", &page_size.to_string());
    }
    if let Some(cursor) = cursor {
        push_param(&mut path, "cursor", cursor);
    }

    path
}

fn has_query_param(endpoint: &str, key: &str) -> bool {
    endpoint.split_once('?').is_some_and(|(_, query)| {
        url::form_urlencoded::parse(query.as_bytes()).any(|(k, _)| k == key)
    })
}

fn push_param(path: &mut String, key: &str, value: &str) {
    let separator = if path.contains('?') { '&' } else { '?' };
    let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    path.push(separator);
    path.push_str(key);
    path.push('=');
    path.push_str(&encoded);
}
