//! Unit tests for the OpenStreetMap API client and the pagination loop.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::Sequence;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::AccessToken;

use super::{
    ApiError, Changeset, ChangesetId, HttpGateway, MockOsmGateway, OsmGateway, PAGE_SIZE,
    list_all_changesets,
};

fn changeset_id(value: u64) -> ChangesetId {
    ChangesetId::new(value).expect("test id should be positive")
}

fn gateway_for(server: &MockServer) -> HttpGateway {
    let token = AccessToken::new("secret-token").expect("token should be accepted");
    HttpGateway::new(&server.uri(), Some(token)).expect("gateway should build")
}

#[tokio::test]
async fn user_details_sends_bearer_and_parses_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/user/details.json"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 99, "display_name": "mapper" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let user = gateway.user_details().await.expect("call should succeed");

    assert_eq!(user.id, 99, "user id mismatch");
    assert_eq!(user.display_name, "mapper", "display name mismatch");
}

#[tokio::test]
async fn changeset_without_discussion_yields_empty_comments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/changeset/418117.json"))
        .and(query_param("include_discussion", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "changeset": { "id": 418_117 } })),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let comments = gateway
        .changeset_comments(changeset_id(418_117))
        .await
        .expect("call should succeed");

    assert!(comments.is_empty(), "expected no comments, got {comments:?}");
}

#[tokio::test]
async fn changeset_comments_are_returned_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/changeset/7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changeset": {
                "comments": [
                    { "text": "first", "uid": 1 },
                    { "text": "second" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let comments = gateway
        .changeset_comments(changeset_id(7))
        .await
        .expect("call should succeed");

    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"], "comment order mismatch");
}

#[tokio::test]
async fn add_comment_posts_form_encoded_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/0.6/changeset/7/comment.json"))
        .and(header(
            "Content-Type",
            "application/x-www-form-urlencoded",
        ))
        .and(body_string("text=hello+world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway
        .add_comment(changeset_id(7), "hello world")
        .await
        .expect("posting should succeed");
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let result = gateway.changeset_comments(changeset_id(7)).await;

    assert_eq!(
        result,
        Err(ApiError::Status {
            status: 500,
            status_text: "Internal Server Error".to_owned(),
        }),
        "expected a status error"
    );
}

#[tokio::test]
async fn missing_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/user/details.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "display_name": "anon" }
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri(), None).expect("gateway should build");
    let user = gateway.user_details().await.expect("call should succeed");

    assert_eq!(user.id, 1, "user id mismatch");
    let requests = server
        .received_requests()
        .await
        .expect("requests should be recorded");
    assert!(
        requests
            .iter()
            .all(|request| !request.headers.contains_key("Authorization")),
        "no request should carry an Authorization header"
    );
}

fn page_starting_at(first_id: u64, start: DateTime<Utc>, len: usize) -> Vec<Changeset> {
    (0..len)
        .map(|offset| {
            let step = i64::try_from(offset).expect("offset should fit i64");
            Changeset {
                id: first_id - u64::try_from(offset).expect("offset should fit u64"),
                created_at: start - Duration::minutes(step),
                closed_at: Some(start - Duration::minutes(step)),
            }
        })
        .collect()
}

#[tokio::test]
async fn listing_follows_time_bound_until_short_page() {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("timestamp should be valid");
    let full_page = page_starting_at(1_000, start, PAGE_SIZE);
    let oldest = full_page.last().expect("page should be non-empty").created_at;
    let short_page = page_starting_at(500, oldest - Duration::minutes(1), 3);

    let mut gateway = MockOsmGateway::new();
    let mut order = Sequence::new();
    let first = full_page.clone();
    gateway
        .expect_changesets_page()
        .withf(|user, bound| *user == 42 && bound.is_none())
        .times(1)
        .in_sequence(&mut order)
        .returning(move |_, _| Ok(first.clone()));
    let second = short_page.clone();
    gateway
        .expect_changesets_page()
        .withf(move |user, bound| *user == 42 && *bound == Some(oldest))
        .times(1)
        .in_sequence(&mut order)
        .returning(move |_, _| Ok(second.clone()));

    let all = list_all_changesets(&gateway, 42)
        .await
        .expect("listing should succeed");

    assert_eq!(all.len(), PAGE_SIZE + 3, "total count mismatch");
    assert_eq!(
        all.first().map(|c| c.id),
        Some(1_000),
        "first id mismatch"
    );
}

#[tokio::test]
async fn listing_stops_after_single_short_page() {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("timestamp should be valid");
    let page = page_starting_at(10, start, 2);

    let mut gateway = MockOsmGateway::new();
    gateway
        .expect_changesets_page()
        .times(1)
        .returning(move |_, _| Ok(page.clone()));

    let all = list_all_changesets(&gateway, 7)
        .await
        .expect("listing should succeed");

    assert_eq!(all.len(), 2, "short page should end the listing");
}

#[tokio::test]
async fn listing_aborts_on_first_failure() {
    let mut gateway = MockOsmGateway::new();
    gateway
        .expect_changesets_page()
        .times(1)
        .returning(|_, _| {
            Err(ApiError::Status {
                status: 503,
                status_text: "Service Unavailable".to_owned(),
            })
        });

    let result = list_all_changesets(&gateway, 7).await;

    assert!(
        matches!(result, Err(ApiError::Status { status: 503, .. })),
        "expected the failure to propagate, got {result:?}"
    );
}

#[test]
fn listing_ids_sort_newest_closed_first() {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("timestamp should be valid");
    let changesets = vec![
        Changeset {
            id: 1,
            created_at: start,
            closed_at: Some(start - Duration::days(2)),
        },
        Changeset {
            id: 2,
            created_at: start,
            closed_at: None,
        },
        Changeset {
            id: 3,
            created_at: start,
            closed_at: Some(start),
        },
    ];

    assert_eq!(
        super::ids_newest_first(changesets),
        vec![3, 1, 2],
        "newest close time first, open changesets last"
    );
}

#[test]
fn changeset_id_rejects_zero() {
    let result = ChangesetId::new(0);
    assert!(
        matches!(result, Err(ApiError::InvalidUrl { .. })),
        "expected rejection of zero id, got {result:?}"
    );
}

#[test]
fn changeset_id_round_trips_through_json() {
    let ids: Vec<ChangesetId> =
        serde_json::from_str("[418117, 418116]").expect("array should parse");
    assert_eq!(
        serde_json::to_string(&ids).expect("array should serialize"),
        "[418117,418116]",
        "transparent numeric serialization expected"
    );
}
