//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config file → paged API requests → analysis → session view

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use warpcast_followback::session::Session;
use warpcast_followback::{
    AnalysisOutcome, AnalysisPhase, AnalysisRequest, AppConfig, Error, FollowBackAnalyzer,
    Threshold,
};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ME: u64 = 100;
const GATE: u64 = 389_830;

fn user(fid: u64, followers: u64, username: Option<&str>) -> Value {
    let mut user = json!({ "fid": fid, "followerCount": followers });
    if let Some(name) = username {
        user["username"] = json!(name);
        user["pfp"] = json!({ "url": format!("https://img.example/{name}.png") });
    }
    user
}

fn users_page(users: Vec<Value>, cursor: Option<&str>) -> Value {
    let mut body = json!({ "result": { "users": users } });
    if let Some(cursor) = cursor {
        body["next"] = json!({ "cursor": cursor });
    }
    body
}

/// Following spans two pages; only fid 12 follows back
async fn mount_graph(server: &MockServer, following_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v2/following"))
        .and(query_param("fid", "100"))
        .and(query_param("limit", "100"))
        .and(query_param_is_missing("cursor"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page(
            vec![
                user(10, 50, Some("alice")),
                user(GATE, 90_000, Some("0xbamse.eth")),
            ],
            Some("page-2"),
        )))
        .expect(following_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/following"))
        .and(query_param("fid", "100"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page(
            vec![user(11, 20_000, Some("big")), user(12, 3, None)],
            None,
        )))
        .expect(following_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/followers"))
        .and(query_param("fid", "100"))
        .and(query_param("limit", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_page(vec![user(12, 3, None)], Some(""))),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, required_fid: u64) -> AppConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("followback.yaml");
    std::fs::write(
        &path,
        format!(
            "base_url: {}\napi_key: test-key\nclient_fid: {ME}\nrequired_fid: {required_fid}\nmax_pages: 10\n",
            server.uri()
        ),
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    config.validate().unwrap();
    config
}

fn analyzer_for(config: &AppConfig) -> FollowBackAnalyzer {
    FollowBackAnalyzer::new(Arc::new(config.build_fetcher().unwrap()))
}

fn fids(outcome: AnalysisOutcome) -> Vec<u64> {
    outcome
        .into_result()
        .unwrap()
        .users
        .iter()
        .map(|u| u.fid)
        .collect()
}

// ============================================================================
// Analysis Flow Tests
// ============================================================================

#[tokio::test]
async fn test_gated_analysis_under_10k() {
    let server = MockServer::start().await;
    mount_graph(&server, 2).await;

    let config = config_for(&server, GATE);
    let analyzer = analyzer_for(&config);
    let request = AnalysisRequest::new(Threshold::Under10k, ME, GATE);

    let outcome = analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(fids(outcome), vec![10]);
    assert_eq!(analyzer.phase(), AnalysisPhase::Done);
}

#[tokio::test]
async fn test_gated_analysis_above_10k() {
    let server = MockServer::start().await;
    mount_graph(&server, 2).await;

    let config = config_for(&server, GATE);
    let request = AnalysisRequest::new(Threshold::Above10k, ME, GATE);

    let outcome = analyzer_for(&config)
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();

    // Following order is kept across pages
    assert_eq!(fids(outcome), vec![GATE, 11]);
}

#[tokio::test]
async fn test_exempt_user_skips_gate_fetch() {
    let server = MockServer::start().await;
    mount_graph(&server, 1).await;

    let config = config_for(&server, ME);
    let request = AnalysisRequest::new(Threshold::Under10k, ME, ME);

    let outcome = analyzer_for(&config)
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(fids(outcome), vec![10]);
}

#[tokio::test]
async fn test_gate_not_followed() {
    let server = MockServer::start().await;
    let config = config_for(&server, 777);
    let request = AnalysisRequest::new(Threshold::Under10k, ME, 777);

    // Followers are never requested once the gate fails
    Mock::given(method("GET"))
        .and(path("/v2/following"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(users_page(vec![user(10, 50, None)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = analyzer_for(&config)
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GateNotSatisfied { required_fid: 777 }));
    assert_eq!(
        err.user_message(),
        "Please follow fid 777 first to use this frame."
    );
}

#[tokio::test]
async fn test_unauthorized_surfaces_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, ME);
    let request = AnalysisRequest::new(Threshold::Under10k, ME, ME);
    let analyzer = analyzer_for(&config);

    let err = analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
    assert_eq!(
        err.user_message(),
        "An error occurred: Failed to fetch data: invalid token"
    );
    assert_eq!(analyzer.phase(), AnalysisPhase::Failed);
}

// ============================================================================
// Session Flow Tests
// ============================================================================

#[tokio::test]
async fn test_session_shows_first_page() {
    let server = MockServer::start().await;
    mount_graph(&server, 2).await;

    let config = config_for(&server, GATE);
    let analyzer = analyzer_for(&config);

    let mut session = Session::new();
    let ticket = session.begin_analysis(Threshold::Above10k);
    let request = AnalysisRequest::new(ticket.threshold, ME, GATE);
    let outcome = analyzer.analyze(&request, &ticket.cancel).await;

    assert!(session.finish_analysis(ticket.id, outcome));

    let view = session.snapshot();
    assert_eq!(view.title.as_deref(), Some("Follow Back Checker (10k+ Followers)"));
    assert_eq!(view.total_results, 2);
    assert_eq!(view.items[0].label, "0xbamse.eth");
    assert_eq!(
        view.items[1].profile_url.as_deref(),
        Some("https://warpcast.com/big")
    );
    assert_eq!(view.items[1].avatar_url, "https://img.example/big.png");
}

#[tokio::test]
async fn test_session_cancel_mid_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_page(vec![user(1, 1, None)], None))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server, ME);
    let analyzer = analyzer_for(&config);

    let mut session = Session::new();
    let ticket = session.begin_analysis(Threshold::Under10k);
    let request = AnalysisRequest::new(ticket.threshold, ME, ME);

    let cancel = ticket.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let outcome = analyzer.analyze(&request, &ticket.cancel).await.unwrap();
    assert!(outcome.is_cancelled());
    assert_eq!(analyzer.phase(), AnalysisPhase::Cancelled);

    session.finish_analysis(ticket.id, Ok(outcome));
    assert_eq!(session.message(), Some("Analysis cancelled."));
    assert!(!session.is_loading());
}
