//! Analyzer types
//!
//! Requests, outcomes and the phase machine published to subscribers.

use crate::types::{Fid, Threshold, UserRecord};
use serde::Serialize;

/// Inputs of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Which side of the follower threshold to keep
    pub threshold: Threshold,
    /// The user whose graph is inspected
    pub acting_fid: Fid,
    /// Account the acting user must follow before the analysis runs
    pub gate_fid: Fid,
}

impl AnalysisRequest {
    /// Create a new request
    pub fn new(threshold: Threshold, acting_fid: Fid, gate_fid: Fid) -> Self {
        Self {
            threshold,
            acting_fid,
            gate_fid,
        }
    }

    /// The acting user is the gate account and skips the gate check
    pub fn is_gate_exempt(&self) -> bool {
        self.acting_fid == self.gate_fid
    }
}

/// Accounts the acting user follows that do not follow back,
/// filtered by the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Threshold the users were filtered by
    pub threshold: Threshold,
    /// Matching users, in following-list order
    pub users: Vec<UserRecord>,
    /// Size of the follower list
    pub followers_total: usize,
    /// Size of the following list
    pub following_total: usize,
    /// Follow-back gaps before the threshold filter
    pub not_followed_back_total: usize,
}

impl AnalysisResult {
    /// Number of matching users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// No matching users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The run produced a result
    Completed(AnalysisResult),
    /// The run was cancelled; nothing was produced
    Cancelled,
}

impl AnalysisOutcome {
    /// Result if the run completed
    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Cancelled => None,
        }
    }

    /// Check if the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Phase of the analyzer.
///
/// ```text
/// Idle → GateChecking → FetchingFollowers → FetchingFollowing → Computing → Done
///            └──────────────┴───────────────────┴──────────────┴─→ Cancelled | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    /// Nothing running
    #[default]
    Idle,
    /// Checking the acting user follows the gate account
    GateChecking,
    /// Fetching the follower list
    FetchingFollowers,
    /// Fetching the following list
    FetchingFollowing,
    /// Computing the follow-back gaps
    Computing,
    /// Finished with a result
    Done,
    /// Stopped on request
    Cancelled,
    /// Stopped on an error
    Failed,
}

impl AnalysisPhase {
    /// Whether the run is over
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }

    /// Whether a run is in progress
    pub fn is_running(self) -> bool {
        !self.is_terminal() && self != Self::Idle
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::GateChecking => "gate_checking",
            Self::FetchingFollowers => "fetching_followers",
            Self::FetchingFollowing => "fetching_following",
            Self::Computing => "computing",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
