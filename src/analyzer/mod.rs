//! Follow-back analysis
//!
//! Orchestrates the gate check and the two list fetches, then derives the
//! accounts the acting user follows that do not follow back.
//!
//! # Overview
//!
//! - `FollowBackAnalyzer` - runs one analysis at a time and publishes phases
//! - `not_followed_back` - the set difference, keyed by fid
//! - `AnalysisOutcome` - completed with a result, or cancelled

mod types;

pub use types::{AnalysisOutcome, AnalysisPhase, AnalysisRequest, AnalysisResult};

use crate::error::{Error, Result};
use crate::pagination::{FollowGraph, FollowList};
use crate::types::UserRecord;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Runs follow-back analyses against a follow graph
pub struct FollowBackAnalyzer {
    graph: Arc<dyn FollowGraph>,
    phase: watch::Sender<AnalysisPhase>,
}

impl FollowBackAnalyzer {
    /// Create an analyzer over a follow graph
    pub fn new(graph: Arc<dyn FollowGraph>) -> Self {
        let (phase, _) = watch::channel(AnalysisPhase::Idle);
        Self { graph, phase }
    }

    /// Current phase
    pub fn phase(&self) -> AnalysisPhase {
        *self.phase.borrow()
    }

    /// Subscribe to phase transitions
    pub fn subscribe(&self) -> watch::Receiver<AnalysisPhase> {
        self.phase.subscribe()
    }

    /// Run one analysis.
    ///
    /// Cancellation through `cancel` resolves to `AnalysisOutcome::Cancelled`
    /// rather than an error. Any fetch failure aborts the run with no partial
    /// result.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome> {
        match self.run(request, cancel).await {
            Ok(result) => {
                info!(
                    "Analysis for fid {} done: {} of {} gaps match {:?}",
                    request.acting_fid,
                    result.len(),
                    result.not_followed_back_total,
                    request.threshold
                );
                self.set_phase(AnalysisPhase::Done);
                Ok(AnalysisOutcome::Completed(result))
            }
            Err(Error::Cancelled) => {
                warn!("Analysis for fid {} cancelled", request.acting_fid);
                self.set_phase(AnalysisPhase::Cancelled);
                Ok(AnalysisOutcome::Cancelled)
            }
            Err(e) => {
                warn!("Analysis for fid {} failed: {e}", request.acting_fid);
                self.set_phase(AnalysisPhase::Failed);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult> {
        self.enter(AnalysisPhase::GateChecking, cancel)?;
        if request.is_gate_exempt() {
            info!("Fid {} is the gate account, skipping gate check", request.acting_fid);
        } else {
            let following = self
                .graph
                .fetch(FollowList::Following, request.acting_fid, cancel)
                .await?;
            if !following.iter().any(|u| u.fid == request.gate_fid) {
                return Err(Error::GateNotSatisfied {
                    required_fid: request.gate_fid,
                });
            }
        }

        self.enter(AnalysisPhase::FetchingFollowers, cancel)?;
        let followers = self
            .graph
            .fetch(FollowList::Followers, request.acting_fid, cancel)
            .await?;
        if followers.is_empty() {
            return Err(Error::NoFollowers {
                fid: request.acting_fid,
            });
        }

        self.enter(AnalysisPhase::FetchingFollowing, cancel)?;
        let following = self
            .graph
            .fetch(FollowList::Following, request.acting_fid, cancel)
            .await?;

        self.enter(AnalysisPhase::Computing, cancel)?;
        let following_total = following.len();
        let gaps = not_followed_back(&followers, following);
        let not_followed_back_total = gaps.len();
        let users = gaps
            .into_iter()
            .filter(|u| request.threshold.matches(u.follower_count))
            .collect();

        Ok(AnalysisResult {
            threshold: request.threshold,
            users,
            followers_total: followers.len(),
            following_total,
            not_followed_back_total,
        })
    }

    /// Move to `phase` unless cancellation was requested
    fn enter(&self, phase: AnalysisPhase, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.set_phase(phase);
        Ok(())
    }

    fn set_phase(&self, phase: AnalysisPhase) {
        self.phase.send_replace(phase);
    }
}

impl std::fmt::Debug for FollowBackAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FollowBackAnalyzer")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

/// Accounts in `following` whose fid is absent from `followers`.
///
/// Membership is by fid only; following-list order is preserved.
pub fn not_followed_back(followers: &[UserRecord], following: Vec<UserRecord>) -> Vec<UserRecord> {
    let follower_fids: HashSet<_> = followers.iter().map(|u| u.fid).collect();
    following
        .into_iter()
        .filter(|u| !follower_fids.contains(&u.fid))
        .collect()
}

#[cfg(test)]
mod tests;
