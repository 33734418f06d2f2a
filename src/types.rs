//! Common types used throughout the crate
//!
//! Records returned by the social-graph API, the view modes and the
//! follower-count threshold.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Farcaster user identifier
pub type Fid = u64;

/// Accounts at or above this many followers count as "large"
pub const FOLLOWER_THRESHOLD: u64 = 10_000;

// ============================================================================
// User Records
// ============================================================================

/// A single account as returned by the followers/following endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireUser", into = "WireUser")]
pub struct UserRecord {
    /// Unique account id; the only key used for membership tests
    pub fid: Fid,
    /// Handle, when the account has one
    pub username: Option<String>,
    /// Follower count as of the list snapshot that produced this record
    pub follower_count: u64,
    /// Profile picture URL
    pub avatar_url: Option<String>,
}

impl UserRecord {
    /// Create a record with only an id and a follower count
    pub fn new(fid: Fid, follower_count: u64) -> Self {
        Self {
            fid,
            username: None,
            follower_count,
            avatar_url: None,
        }
    }

    /// Set the username
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the avatar URL
    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Username if present, otherwise the fid
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => self.fid.to_string(),
        }
    }
}

/// Shape of a user on the wire: `{ fid, username?, followerCount, pfp?: { url } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    fid: Fid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default)]
    follower_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pfp: Option<WirePfp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WirePfp {
    #[serde(default)]
    url: Option<String>,
}

impl From<WireUser> for UserRecord {
    fn from(wire: WireUser) -> Self {
        Self {
            fid: wire.fid,
            username: wire.username.filter(|u| !u.is_empty()),
            follower_count: wire.follower_count,
            avatar_url: wire.pfp.and_then(|p| p.url).filter(|u| !u.is_empty()),
        }
    }
}

impl From<UserRecord> for WireUser {
    fn from(user: UserRecord) -> Self {
        Self {
            fid: user.fid,
            username: user.username,
            follower_count: user.follower_count,
            pfp: user.avatar_url.map(|url| WirePfp { url: Some(url) }),
        }
    }
}

// ============================================================================
// Threshold
// ============================================================================

/// Which side of the follower-count threshold an analysis keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Threshold {
    /// Accounts with fewer than 10k followers
    #[serde(rename = "under_10k", alias = "under")]
    Under10k,
    /// Accounts with 10k followers or more
    #[serde(rename = "above_10k", alias = "above")]
    Above10k,
}

impl Threshold {
    /// Whether an account with this many followers falls on our side
    pub fn matches(self, follower_count: u64) -> bool {
        match self {
            Threshold::Under10k => follower_count < FOLLOWER_THRESHOLD,
            Threshold::Above10k => follower_count >= FOLLOWER_THRESHOLD,
        }
    }

    /// The view mode that displays this analysis
    pub fn mode(self) -> Mode {
        match self {
            Threshold::Under10k => Mode::FollowBackUnder,
            Threshold::Above10k => Mode::FollowBackAbove,
        }
    }

    /// Heading shown over the result list
    pub fn title(self) -> &'static str {
        match self {
            Threshold::Under10k => "Follow Back Checker (Under 10k Followers)",
            Threshold::Above10k => "Follow Back Checker (10k+ Followers)",
        }
    }
}

// ============================================================================
// View Mode
// ============================================================================

/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Main menu
    #[default]
    None,
    /// Follow-back list, under 10k followers
    FollowBackUnder,
    /// Follow-back list, 10k+ followers
    FollowBackAbove,
    /// Share link
    Share,
}

impl Mode {
    /// The analysis threshold behind this mode, if it is an analysis view
    pub fn threshold(self) -> Option<Threshold> {
        match self {
            Mode::FollowBackUnder => Some(Threshold::Under10k),
            Mode::FollowBackAbove => Some(Threshold::Above10k),
            Mode::None | Mode::Share => None,
        }
    }
}
