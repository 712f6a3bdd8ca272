//! Contract tests for AdsClient against a mocked ads platform.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/v1/accounts/{account}/creatives` | `list_*` |
//! | GET    | `/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}` | `find_*` |
//! | POST   | `/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}:appeal` | `appeal_*` |

use appeals_client::{AdsApiConfig, AdsClient, ClientError};
use appeals_core::{
    AppealGateway, AppealTarget, Channel, CreativeId, CreativeSource, CreativeType, GroupId,
    PolicyTopic,
};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "1234567890";

fn test_config(mock_server: &MockServer) -> AdsApiConfig {
    let mut config = AdsApiConfig::new(mock_server.uri().parse().unwrap(), "test-token", ACCOUNT);
    config.page_size = 2;
    config.timeout_secs = 5;
    config.max_retries = 0;
    config
}

fn test_client(mock_server: &MockServer) -> AdsClient {
    AdsClient::new(&test_config(mock_server)).unwrap()
}

fn page(creatives: &[&str], next: &str) -> ResponseTemplate {
    let creatives: Vec<_> = creatives.iter().map(|id| creative_json(id, "SEARCH")).collect();
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "creatives": creatives,
        "nextPageToken": next
    }))
}

fn creative_json(id: &str, channel: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": "RESPONSIVE_SEARCH_AD",
        "channel": channel,
        "groupId": "G1",
        "campaignName": "Spring Sale",
        "groupName": "Shoes",
        "approvalStatus": "DISAPPROVED",
        "policyTopics": [
            {"topic": "MISLEADING_CLAIM", "appealable": true, "underReview": false}
        ]
    })
}

fn target() -> AppealTarget {
    AppealTarget {
        group_id: GroupId::new("G1").unwrap(),
        creative_id: CreativeId::new("A").unwrap(),
        resource_name: String::new(),
    }
}

// ── GET /creatives ───────────────────────────────────────────────────

#[tokio::test]
async fn list_follows_page_tokens_in_order() {
    let mock_server = MockServer::start().await;
    let listing = format!("/v1/accounts/{ACCOUNT}/creatives");

    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .and(query_param("status", "ENABLED"))
        .and(query_param("pageSize", "2"))
        .and(query_param_is_missing("pageToken"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "creatives": [creative_json("A", "SEARCH"), creative_json("B", "DISPLAY")],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "creatives": [creative_json("C", "PERFORMANCE_MAX")],
            "nextPageToken": ""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let creatives = test_client(&mock_server).fetch_creatives().await.unwrap();
    let ids: Vec<&str> = creatives.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(creatives[0].creative_type, CreativeType::ResponsiveSearchAd);
    assert_eq!(creatives[2].channel, Channel::PerformanceMax);
    assert_eq!(creatives[0].policy_topics.len(), 1);
    assert!(creatives[0].policy_topics[0].appealable);
}

#[tokio::test]
async fn list_stops_when_page_tokens_cycle() {
    let mock_server = MockServer::start().await;
    let listing = format!("/v1/accounts/{ACCOUNT}/creatives");

    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .and(query_param_is_missing("pageToken"))
        .respond_with(page(&["A"], "t1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .and(query_param("pageToken", "t1"))
        .respond_with(page(&["B"], "t2"))
        .expect(1)
        .mount(&mock_server)
        .await;
    // t2 points back at t1: the listing must end here rather than loop.
    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .and(query_param("pageToken", "t2"))
        .respond_with(page(&["C"], "t1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let creatives = test_client(&mock_server).fetch_creatives().await.unwrap();
    let ids: Vec<&str> = creatives.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn list_recovers_from_unavailable_page_within_budget() {
    let mock_server = MockServer::start().await;
    let listing = format!("/v1/accounts/{ACCOUNT}/creatives");

    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(listing.as_str()))
        .respond_with(page(&["A"], ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server);
    config.max_retries = 1;
    let creatives = AdsClient::new(&config).unwrap().fetch_creatives().await.unwrap();
    assert_eq!(creatives.len(), 1);
}

#[tokio::test]
async fn list_treats_missing_topics_as_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/creatives").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "creatives": [{
                "id": "D",
                "type": "VIDEO_AD",
                "channel": "VIDEO",
                "groupId": "G2",
                "approvalStatus": "APPROVED"
            }]
        })))
        .mount(&mock_server)
        .await;

    let creatives = test_client(&mock_server).fetch_creatives().await.unwrap();
    assert_eq!(creatives.len(), 1);
    assert!(!creatives[0].has_policy_data());
}

#[tokio::test]
async fn list_error_status_is_source_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/creatives").as_str()))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).fetch_creatives().await.unwrap_err();
    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn list_unknown_channel_is_deserialization_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/creatives").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "creatives": [creative_json("A", "SHOPPING")]
        })))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).fetch_creatives().await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialization { .. }));
}

// ── GET /groups/{groupId}/creatives/{creativeId} ─────────────────────

#[tokio::test]
async fn find_returns_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "groupId": "G1",
            "creativeId": "A",
            "resourceName": "accounts/1234567890/groups/G1/creatives/A"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let found = test_client(&mock_server)
        .find_creative(&GroupId::new("G1").unwrap(), &CreativeId::new("A").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.creative_id.as_str(), "A");
    assert_eq!(found.resource_name, "accounts/1234567890/groups/G1/creatives/A");
}

#[tokio::test]
async fn find_404_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A").as_str()))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let found = test_client(&mock_server)
        .find_creative(&GroupId::new("G1").unwrap(), &CreativeId::new("A").unwrap())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_500_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A").as_str()))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .find_creative(&GroupId::new("G1").unwrap(), &CreativeId::new("A").unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("backend down"));
}

// ── POST /groups/{groupId}/creatives/{creativeId}:appeal ─────────────

#[tokio::test]
async fn appeal_sends_justification_and_single_topic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A:appeal").as_str()))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(serde_json::json!({
            "justification": "CHANGES_MADE",
            "policyTopics": ["MISLEADING_CLAIM"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server)
        .appeal(&target(), "CHANGES_MADE", &[PolicyTopic::new("MISLEADING_CLAIM").unwrap()])
        .await
        .unwrap();
}

#[tokio::test]
async fn appeal_echoes_resolved_resource_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A:appeal").as_str()))
        .and(body_json(serde_json::json!({
            "resourceName": "accounts/1234567890/groups/G1/creatives/A",
            "justification": "CHANGES_MADE",
            "policyTopics": ["MISLEADING_CLAIM"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let target = AppealTarget {
        resource_name: "accounts/1234567890/groups/G1/creatives/A".into(),
        ..target()
    };
    test_client(&mock_server)
        .appeal(&target, "CHANGES_MADE", &[PolicyTopic::new("MISLEADING_CLAIM").unwrap()])
        .await
        .unwrap();
}

#[tokio::test]
async fn appeal_rejection_carries_platform_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A:appeal").as_str()))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("POLICY_FINDING_NOT_APPEALABLE"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .appeal(&target(), "CHANGES_MADE", &[PolicyTopic::new("MISLEADING_CLAIM").unwrap()])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("POLICY_FINDING_NOT_APPEALABLE"));
}

#[tokio::test]
async fn appeal_is_not_retried_on_error() {
    let mock_server = MockServer::start().await;

    // Reads would retry a 5xx under this budget; the appeal must not.
    // `expect(1)` fails the test on a second call.
    Mock::given(method("POST"))
        .and(path(format!("/v1/accounts/{ACCOUNT}/groups/G1/creatives/A:appeal").as_str()))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server);
    config.max_retries = 3;
    let result = AdsClient::new(&config)
        .unwrap()
        .appeal(&target(), "CHANGES_MADE", &[PolicyTopic::new("MISLEADING_CLAIM").unwrap()])
        .await;
    assert!(result.is_err());
}
