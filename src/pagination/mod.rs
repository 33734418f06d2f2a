//! Pagination module
//!
//! # Overview
//!
//! The followers and following endpoints are cursor paginated: each page
//! carries `next.cursor` until the last one. `PagedFetcher` walks that chain
//! and returns one ordered list, bounded by `PaginationLimits`.

mod fetcher;
mod types;

pub use fetcher::{page_path, PagedFetcher};
pub use types::{
    FollowGraph, FollowList, NextCursor, PaginationLimits, PaginationState, UsersPage,
    UsersResult, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
};
