//! End-to-end tests for short link creation, redirects with click telemetry,
//! listing, search and analytics.

mod common;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp, BASE_URL};

async fn create_link(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let response = app.server.post("/pvt").json(&body).await;
    (response.status_code(), response.json::<Value>())
}

#[tokio::test]
async fn create_link_with_generated_code() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (status, body) =
        create_link(&app, json!({ "longUrl": "example.com/some/page" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Short URL created successfully");

    let data = &body["data"];
    // scheme-less input got https
    assert_eq!(data["longUrl"], "https://example.com/some/page");
    assert_eq!(data["customCode"], false);

    let code = data["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(
        data["fullShortUrl"].as_str().unwrap(),
        format!("{BASE_URL}/s/{code}")
    );
    assert!(data["qrCode"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
}

#[tokio::test]
async fn create_link_with_custom_code() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (status, body) = create_link(
        &app,
        json!({ "longUrl": "https://example.com", "customUrl": "Promo2025" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["shortCode"], "promo2025");
    assert_eq!(body["data"]["customCode"], true);

    // taken, regardless of case
    let (status, body) = create_link(
        &app,
        json!({ "longUrl": "https://example.org", "customUrl": "PROMO2025" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This custom URL already exists");
}

#[tokio::test]
async fn create_link_validates_input() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (status, _) = create_link(
        &app,
        json!({ "longUrl": "https://example.com", "customUrl": "a!" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = create_link(&app, json!({ "longUrl": "javascript:alert(1)" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid URL");
}

#[tokio::test]
async fn create_link_requires_authentication() {
    let app = spawn_app();

    let response = app
        .server
        .post("/pvt")
        .json(&json!({ "longUrl": "https://example.com" }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn redirect_resolves_case_insensitively_and_counts_clicks() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (_, body) = create_link(
        &app,
        json!({ "longUrl": "https://example.com/landing", "customUrl": "campaign" }),
    )
    .await;
    let link_id = body["data"]["id"].as_i64().unwrap();

    let response = app.server.get("/s/CAMPAIGN").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        HeaderValue::from_static("https://example.com/landing")
    );

    assert_eq!(app.links.click_count(link_id), 1);
}

#[tokio::test]
async fn redirect_unknown_code_is_not_found() {
    let app = spawn_app();

    let response = app.server.get("/s/nope1234").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["message"], "Short URL not found");
}

#[tokio::test]
async fn analytics_aggregates_click_dimensions() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (_, body) = create_link(
        &app,
        json!({ "longUrl": "https://example.com", "customUrl": "stats" }),
    )
    .await;
    let link_id = body["data"]["id"].as_i64().unwrap();

    // one visit from a search engine, two direct
    app.server
        .get("/s/stats")
        .add_header(
            HeaderName::from_static("referer"),
            HeaderValue::from_static("https://google.com"),
        )
        .add_header(
            HeaderName::from_static("user-agent"),
            HeaderValue::from_static("Mozilla/5.0 Firefox"),
        )
        .await
        .assert_status(StatusCode::FOUND);
    for _ in 0..2 {
        app.server
            .get("/s/stats")
            .add_header(
                HeaderName::from_static("user-agent"),
                HeaderValue::from_static("Mozilla/5.0 Chrome"),
            )
            .await
            .assert_status(StatusCode::FOUND);
    }

    let response = app.server.get(&format!("/pvt/analytics/{link_id}")).await;
    response.assert_status_ok();

    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data["totalClicks"], 3);
    assert_eq!(data["referrers"]["Direct"], 2);
    assert_eq!(data["referrers"]["https://google.com"], 1);
    assert_eq!(data["browsers"]["Mozilla/5.0 Firefox"], 1);
    assert_eq!(data["browsers"]["Mozilla/5.0 Chrome"], 2);
    assert_eq!(data["countries"]["Unknown"], 3);

    // all three clicks land on today's UTC date bucket
    let by_date = data["clicksByDate"].as_object().unwrap();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date.values().next().unwrap(), 3);
}

#[tokio::test]
async fn analytics_is_scoped_to_the_owner() {
    let mut app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    let (_, body) = create_link(
        &app,
        json!({ "longUrl": "https://example.com", "customUrl": "owned" }),
    )
    .await;
    let link_id = body["data"]["id"].as_i64().unwrap();

    // another user cannot read it
    app.server.clear_cookies();
    app.signed_up_user("bob@x.com").await;

    let response = app.server.get(&format!("/pvt/analytics/{link_id}")).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn list_returns_own_links_newest_first() {
    let mut app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    create_link(&app, json!({ "longUrl": "https://example.com/first" })).await;
    create_link(&app, json!({ "longUrl": "https://example.com/second" })).await;

    // another user's link must not appear
    app.server.clear_cookies();
    app.signed_up_user("bob@x.com").await;
    create_link(&app, json!({ "longUrl": "https://example.com/other" })).await;

    app.server.clear_cookies();
    app.server
        .post("/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "secret1" }))
        .await
        .assert_status_ok();

    let response = app.server.get("/pvt").await;
    response.assert_status_ok();

    let items = response.json::<Value>()["data"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["longUrl"], "https://example.com/second");
    assert_eq!(items[1]["longUrl"], "https://example.com/first");
}

#[tokio::test]
async fn search_filters_by_substring() {
    let app = spawn_app();
    app.signed_up_user("ana@x.com").await;

    create_link(
        &app,
        json!({ "longUrl": "https://docs.rust-lang.org/book", "customUrl": "rustbook" }),
    )
    .await;
    create_link(&app, json!({ "longUrl": "https://example.com/cooking" })).await;

    let response = app.server.get("/pvt/search").add_query_param("query", "rust").await;
    response.assert_status_ok();

    let items = response.json::<Value>()["data"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["shortCode"], "rustbook");

    let response = app.server.get("/pvt/search").add_query_param("query", "  ").await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["message"], "Search query is required");
}
