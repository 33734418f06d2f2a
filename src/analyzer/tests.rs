//! Tests for analyzer module

use super::*;
use crate::types::{Fid, Threshold};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Mutex;

const GATE: Fid = 389_830;
const ME: Fid = 1000;

/// In-memory follow graph that records every fetch
#[derive(Default)]
struct FakeGraph {
    followers: Vec<UserRecord>,
    following: Vec<UserRecord>,
    calls: Mutex<Vec<FollowList>>,
    fail_on: Option<FollowList>,
    /// Cancel this token while serving the given list
    cancel_during: Option<(FollowList, CancellationToken)>,
}

impl FakeGraph {
    fn new(followers: Vec<UserRecord>, following: Vec<UserRecord>) -> Self {
        Self {
            followers,
            following,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<FollowList> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FollowGraph for FakeGraph {
    async fn fetch(
        &self,
        list: FollowList,
        _fid: Fid,
        _cancel: &CancellationToken,
    ) -> Result<Vec<UserRecord>> {
        self.calls.lock().unwrap().push(list);

        if let Some((when, token)) = &self.cancel_during {
            if *when == list {
                token.cancel();
            }
        }
        if self.fail_on == Some(list) {
            return Err(Error::http_status(500, "graph unavailable"));
        }

        Ok(match list {
            FollowList::Followers => self.followers.clone(),
            FollowList::Following => self.following.clone(),
        })
    }
}

fn user(fid: Fid, follower_count: u64) -> UserRecord {
    UserRecord::new(fid, follower_count)
}

/// followers {1,2,3}; following {2,3,4,5} with 4 small and 5 large
fn sample_graph() -> FakeGraph {
    FakeGraph::new(
        vec![user(1, 10), user(2, 20), user(3, 30)],
        vec![user(2, 20), user(3, 30), user(4, 500), user(5, 20_000)],
    )
}

fn fids(result: &AnalysisResult) -> Vec<Fid> {
    result.users.iter().map(|u| u.fid).collect()
}

async fn run(graph: Arc<FakeGraph>, request: AnalysisRequest) -> Result<AnalysisOutcome> {
    let analyzer = FollowBackAnalyzer::new(graph);
    analyzer.analyze(&request, &CancellationToken::new()).await
}

// ============================================================================
// Set Difference Tests
// ============================================================================

#[test]
fn test_not_followed_back_keeps_following_order() {
    let followers = vec![user(3, 0), user(1, 0)];
    let following = vec![user(9, 0), user(1, 0), user(7, 0), user(3, 0), user(8, 0)];

    let gaps: Vec<Fid> = not_followed_back(&followers, following)
        .iter()
        .map(|u| u.fid)
        .collect();
    assert_eq!(gaps, vec![9, 7, 8]);
}

#[test]
fn test_not_followed_back_keys_on_fid_not_username() {
    let followers = vec![user(1, 0).with_username("same")];
    let following = vec![user(2, 0).with_username("same"), user(1, 0)];

    let gaps = not_followed_back(&followers, following);
    assert_eq!(gaps, vec![user(2, 0).with_username("same")]);
}

#[test]
fn test_not_followed_back_everyone_follows_back() {
    let followers = vec![user(1, 0), user(2, 0)];
    let following = vec![user(2, 0), user(1, 0)];
    assert!(not_followed_back(&followers, following).is_empty());
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_under_10k() {
    let graph = Arc::new(sample_graph());
    let outcome = run(graph, AnalysisRequest::new(Threshold::Under10k, GATE, GATE))
        .await
        .unwrap();

    let result = outcome.into_result().unwrap();
    assert_eq!(fids(&result), vec![4]);
    assert_eq!(result.threshold, Threshold::Under10k);
    assert_eq!(result.followers_total, 3);
    assert_eq!(result.following_total, 4);
    assert_eq!(result.not_followed_back_total, 2);
}

#[tokio::test]
async fn test_above_10k() {
    let graph = Arc::new(sample_graph());
    let outcome = run(graph, AnalysisRequest::new(Threshold::Above10k, GATE, GATE))
        .await
        .unwrap();

    assert_eq!(fids(&outcome.into_result().unwrap()), vec![5]);
}

#[tokio::test]
async fn test_gate_account_skips_gate_fetch() {
    let graph = Arc::new(sample_graph());
    run(graph.clone(), AnalysisRequest::new(Threshold::Under10k, GATE, GATE))
        .await
        .unwrap();

    assert_eq!(
        graph.calls(),
        vec![FollowList::Followers, FollowList::Following]
    );
}

#[tokio::test]
async fn test_gate_satisfied_runs_three_fetches() {
    let mut graph = sample_graph();
    graph.following.push(user(GATE, 80_000));
    let graph = Arc::new(graph);

    let outcome = run(graph.clone(), AnalysisRequest::new(Threshold::Above10k, ME, GATE))
        .await
        .unwrap();

    assert_eq!(
        graph.calls(),
        vec![
            FollowList::Following,
            FollowList::Followers,
            FollowList::Following
        ]
    );
    assert_eq!(fids(&outcome.into_result().unwrap()), vec![5, GATE]);
}

#[tokio::test]
async fn test_gate_not_satisfied_stops_pipeline() {
    let graph = Arc::new(sample_graph());
    let err = run(graph.clone(), AnalysisRequest::new(Threshold::Under10k, ME, GATE))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GateNotSatisfied { required_fid: GATE }));
    assert_eq!(graph.calls(), vec![FollowList::Following]);
}

#[tokio::test]
async fn test_no_followers_skips_following_fetch() {
    let graph = Arc::new(FakeGraph::new(vec![], vec![user(4, 1)]));
    let err = run(graph.clone(), AnalysisRequest::new(Threshold::Under10k, GATE, GATE))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoFollowers { fid: GATE }));
    assert_eq!(graph.calls(), vec![FollowList::Followers]);
}

#[tokio::test]
async fn test_fetch_failure_propagates() {
    let mut graph = sample_graph();
    graph.fail_on = Some(FollowList::Following);
    let graph = Arc::new(graph);

    let analyzer = FollowBackAnalyzer::new(graph);
    let err = analyzer
        .analyze(
            &AnalysisRequest::new(Threshold::Under10k, GATE, GATE),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(analyzer.phase(), AnalysisPhase::Failed);
}

#[tokio::test]
async fn test_gate_fetch_failure_stops_before_followers() {
    let mut graph = sample_graph();
    graph.fail_on = Some(FollowList::Following);
    let graph = Arc::new(graph);

    let analyzer = FollowBackAnalyzer::new(graph.clone());
    let err = analyzer
        .analyze(
            &AnalysisRequest::new(Threshold::Under10k, ME, GATE),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(graph.calls(), vec![FollowList::Following]);
    assert_eq!(analyzer.phase(), AnalysisPhase::Failed);
}

#[tokio::test]
async fn test_followers_failure_skips_following_fetch() {
    let mut graph = sample_graph();
    graph.following.push(user(GATE, 80_000));
    graph.fail_on = Some(FollowList::Followers);
    let graph = Arc::new(graph);

    let analyzer = FollowBackAnalyzer::new(graph.clone());
    let err = analyzer
        .analyze(
            &AnalysisRequest::new(Threshold::Under10k, ME, GATE),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
    assert_eq!(
        graph.calls(),
        vec![FollowList::Following, FollowList::Followers]
    );
    assert_eq!(analyzer.phase(), AnalysisPhase::Failed);
}

#[tokio::test]
async fn test_empty_gap_is_a_successful_empty_result() {
    let graph = Arc::new(FakeGraph::new(
        vec![user(1, 0), user(2, 0)],
        vec![user(1, 0), user(2, 0)],
    ));
    let outcome = run(graph, AnalysisRequest::new(Threshold::Under10k, GATE, GATE))
        .await
        .unwrap();

    assert!(outcome.into_result().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let graph = Arc::new(sample_graph());
    let analyzer = FollowBackAnalyzer::new(graph);
    let request = AnalysisRequest::new(Threshold::Under10k, GATE, GATE);

    let first = analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();
    let second = analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Cancellation & Phase Tests
// ============================================================================

#[tokio::test]
async fn test_cancel_during_following_fetch() {
    let cancel = CancellationToken::new();
    let mut graph = sample_graph();
    graph.cancel_during = Some((FollowList::Following, cancel.clone()));
    let graph = Arc::new(graph);

    let analyzer = FollowBackAnalyzer::new(graph.clone());
    let outcome = analyzer
        .analyze(&AnalysisRequest::new(Threshold::Under10k, GATE, GATE), &cancel)
        .await
        .unwrap();

    assert!(outcome.is_cancelled());
    assert!(outcome.into_result().is_none());
    assert_eq!(analyzer.phase(), AnalysisPhase::Cancelled);
}

#[tokio::test]
async fn test_cancel_before_start_fetches_nothing() {
    let graph = Arc::new(sample_graph());
    let analyzer = FollowBackAnalyzer::new(graph.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = analyzer
        .analyze(&AnalysisRequest::new(Threshold::Under10k, ME, GATE), &cancel)
        .await
        .unwrap();

    assert!(outcome.is_cancelled());
    assert!(graph.calls().is_empty());
}

#[tokio::test]
async fn test_analyzer_reusable_after_cancel() {
    let cancel = CancellationToken::new();
    let mut graph = sample_graph();
    graph.cancel_during = Some((FollowList::Followers, cancel.clone()));
    let graph = Arc::new(graph);

    let analyzer = FollowBackAnalyzer::new(graph);
    let request = AnalysisRequest::new(Threshold::Above10k, GATE, GATE);

    let outcome = analyzer.analyze(&request, &cancel).await.unwrap();
    assert!(outcome.is_cancelled());

    // A fresh token gives a fresh run
    let outcome = analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(fids(&outcome.into_result().unwrap()), vec![5]);
    assert_eq!(analyzer.phase(), AnalysisPhase::Done);
}

#[tokio::test]
async fn test_phase_subscription_sees_final_phase() {
    let graph = Arc::new(sample_graph());
    let analyzer = FollowBackAnalyzer::new(graph);
    let mut rx = analyzer.subscribe();
    assert_eq!(*rx.borrow(), AnalysisPhase::Idle);

    analyzer
        .analyze(
            &AnalysisRequest::new(Threshold::Under10k, GATE, GATE),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), AnalysisPhase::Done);
}

#[test]
fn test_phase_predicates() {
    assert!(!AnalysisPhase::Idle.is_running());
    assert!(!AnalysisPhase::Idle.is_terminal());
    assert!(AnalysisPhase::FetchingFollowers.is_running());
    assert!(AnalysisPhase::Done.is_terminal());
    assert!(AnalysisPhase::Cancelled.is_terminal());
    assert!(AnalysisPhase::Failed.is_terminal());
    assert_eq!(AnalysisPhase::GateChecking.to_string(), "gate_checking");
}

#[test]
fn test_request_gate_exempt() {
    assert!(AnalysisRequest::new(Threshold::Under10k, GATE, GATE).is_gate_exempt());
    assert!(!AnalysisRequest::new(Threshold::Under10k, ME, GATE).is_gate_exempt());
}
