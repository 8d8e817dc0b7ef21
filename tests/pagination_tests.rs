//! Pagination integration tests
//!
//! Pages are linked through `Link` headers served by an httpmock server

use httpmock::prelude::*;
use serde_json::{json, Value};
use sparkapi::models::Params;
use sparkapi::{PaginatorState, SparkError, Transport};
use tokio_stream::StreamExt;

fn transport(server: &MockServer) -> Transport {
    Transport::with_client(reqwest::Client::new(), &server.base_url(), "my_bot_token").unwrap()
}

fn next_link(server: &MockServer, path: &str) -> String {
    format!("<{}>; rel=\"next\"", server.url(path))
}

#[tokio::test]
async fn test_two_pages_yield_all_items_with_two_requests() {
    let server = MockServer::start_async().await;
    let link = next_link(&server, "/messages?page=2");

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/messages")
                .query_param("roomId", "R1")
                .header("Authorization", "Bearer my_bot_token");
            then.status(200)
                .header("link", link.as_str())
                .json_body(json!({"items": [{"id": "m1"}]}));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/messages")
                .query_param("page", "2")
                .header("Authorization", "Bearer my_bot_token");
            then.status(200).json_body(json!({"items": [{"id": "m2"}]}));
        })
        .await;

    let params = Params::new().with("roomId", "R1");
    let mut paginator = transport(&server).list("messages", Some(&params)).await.unwrap();

    assert_eq!(paginator.next().await.unwrap(), Some(json!({"id": "m1"})));
    // No read-ahead: the second page is only requested once the first is used up
    assert_eq!(second.hits_async().await, 0);
    assert_eq!(paginator.state(), PaginatorState::NeedsFetch);

    assert_eq!(paginator.next().await.unwrap(), Some(json!({"id": "m2"})));
    assert_eq!(paginator.next().await.unwrap(), None);
    assert_eq!(paginator.next().await.unwrap(), None);

    first.assert_hits_async(1).await;
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_single_page_makes_no_extra_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/webhooks");
            then.status(200)
                .json_body(json!({"items": [{"id": "w1"}, {"id": "w2"}, {"id": "w3"}]}));
        })
        .await;

    let paginator = transport(&server).list("webhooks", None).await.unwrap();
    let items = paginator.collect_all().await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[2], json!({"id": "w3"}));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_many_pages_keep_server_order() {
    let server = MockServer::start_async().await;
    let link2 = next_link(&server, "/people?cursor=2");
    let link3 = next_link(&server, "/people?cursor=3");

    server
        .mock_async(|when, then| {
            when.method(GET).path("/people").query_param("max", "2");
            then.status(200)
                .header("link", link2.as_str())
                .json_body(json!({"items": [{"id": "p1"}, {"id": "p2"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/people").query_param("cursor", "2");
            then.status(200)
                .header("link", link3.as_str())
                .json_body(json!({"items": [{"id": "p3"}, {"id": "p4"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/people").query_param("cursor", "3");
            then.status(200).json_body(json!({"items": [{"id": "p5"}]}));
        })
        .await;

    let params = Params::new().with("max", 2u32);
    let paginator = transport(&server).list("people", Some(&params)).await.unwrap();
    let ids: Vec<String> = paginator
        .into_stream()
        .map(|item| item.unwrap()["id"].as_str().unwrap().to_string())
        .collect()
        .await;

    assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);
}

#[tokio::test]
async fn test_failed_continuation_ends_iteration() {
    let server = MockServer::start_async().await;
    let link = next_link(&server, "/rooms?page=2");

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rooms").query_param_missing("page");
            then.status(200)
                .header("link", link.as_str())
                .json_body(json!({"items": [{"id": "r1"}]}));
        })
        .await;
    let failing = server
        .mock_async(|when, then| {
            when.method(GET).path("/rooms").query_param("page", "2");
            then.status(502).body("bad gateway");
        })
        .await;

    let mut paginator = transport(&server).list("rooms", None).await.unwrap();

    assert_eq!(paginator.next().await.unwrap(), Some(json!({"id": "r1"})));
    let err = paginator.next().await.unwrap_err();
    assert!(matches!(err, SparkError::ServerError { status: 502, .. }));
    assert_eq!(err.body(), Some(&Value::String("bad gateway".to_string())));

    assert_eq!(paginator.state(), PaginatorState::Exhausted);
    assert_eq!(paginator.next().await.unwrap(), None);
    failing.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_continuation_reuses_credential() {
    let server = MockServer::start_async().await;
    let link = format!("<{}>; rel=\"prev\", {}", server.url("/memberships?page=0"), next_link(&server, "/memberships?page=2"));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/memberships").query_param_missing("page");
            then.status(200)
                .header("link", link.as_str())
                .json_body(json!({"items": []}));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/memberships")
                .query_param("page", "2")
                .header("Authorization", "Bearer my_bot_token");
            then.status(200).json_body(json!({"items": [{"id": "ms1"}]}));
        })
        .await;

    let paginator = transport(&server).list("memberships", None).await.unwrap();
    let items = paginator.collect_all().await.unwrap();

    assert_eq!(items, vec![json!({"id": "ms1"})]);
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_next_link_in_separate_header_line() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rooms").query_param_missing("page");
            then.status(200)
                .header("link", format!("<{}>; rel=\"prev\"", server.url("/rooms?page=0")).as_str())
                .header("link", next_link(&server, "/rooms?page=2").as_str())
                .json_body(json!({"items": [{"id": "r1"}]}));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/rooms").query_param("page", "2");
            then.status(200).json_body(json!({"items": [{"id": "r2"}]}));
        })
        .await;

    let items = transport(&server).list("rooms", None).await.unwrap().collect_all().await.unwrap();

    assert_eq!(items, vec![json!({"id": "r1"}), json!({"id": "r2"})]);
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_self_linking_page_is_not_refetched() {
    let server = MockServer::start_async().await;
    let params = Params::new().with("roomId", "R9");
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/messages").query_param("roomId", "R9");
            then.status(200)
                .header("link", next_link(&server, "/messages?roomId=R9").as_str())
                .json_body(json!({"items": []}));
        })
        .await;

    let mut paginator = transport(&server).list("messages", Some(&params)).await.unwrap();

    assert_eq!(paginator.state(), PaginatorState::Exhausted);
    assert_eq!(paginator.next().await.unwrap(), None);
    page.assert_hits_async(1).await;
}
