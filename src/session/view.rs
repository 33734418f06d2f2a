//! Serializable snapshot of the session for presentation layers

use crate::types::{Fid, Mode, UserRecord};
use serde::Serialize;

/// Compose link opened by the share action
pub const SHARE_LINK: &str = "https://warpcast.com/~/compose?text=I%20just%20joined%20this%20waitlist%3A%0A%0ANEXT%20ON%20BASE&embeds[]=https%3A%2F%2Fyourdomain.com%2Fyourframe";

/// Shown for accounts without a profile picture
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/50";

/// Profile pages live under this host
pub const PROFILE_BASE_URL: &str = "https://warpcast.com";

/// Shown while an analysis runs
pub const LOADING_MESSAGE: &str = "Please wait, processing your data...";

/// Shown when a finished analysis matched nobody
pub const EMPTY_MESSAGE: &str = "No matching users found.";

/// Everything a presentation layer needs to draw the current view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub mode: Mode,
    /// Heading for the active view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub loading: bool,
    pub analysis_done: bool,
    /// 1-based page number
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub total_results: usize,
    /// Items on the current page
    pub items: Vec<ListItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    /// Status line: loading notice, error, or empty-result notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One row of the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub fid: Fid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Username, or `FID: <fid>` for accounts without one
    pub label: String,
    /// Link to the profile; only accounts with a username have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub avatar_url: String,
    pub follower_count: u64,
}

impl From<&UserRecord> for ListItem {
    fn from(user: &UserRecord) -> Self {
        Self {
            fid: user.fid,
            username: user.username.clone(),
            label: match &user.username {
                Some(name) => name.clone(),
                None => format!("FID: {}", user.fid),
            },
            profile_url: user
                .username
                .as_ref()
                .map(|name| format!("{PROFILE_BASE_URL}/{name}")),
            avatar_url: user
                .avatar_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string()),
            follower_count: user.follower_count,
        }
    }
}
