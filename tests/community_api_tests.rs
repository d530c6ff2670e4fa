//! Router-level tests for the directory, profile and upload endpoints.

use axum::{
    body::Body,
    http::{Method, StatusCode, header},
};
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;

use test_utils::api::{multipart_body, request, test_app, test_app_with};

fn community_body(base_id: i32) -> serde_json::Value {
    json!({
        "name": "Test Farm",
        "location": "Tokyo",
        "base_id": base_id,
        "delivery_frequency": "月1回",
        "seasonal_products": [
            { "season": "3-5月", "products": "carrot" },
            { "season": "6-8月", "products": "" }
        ]
    })
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = test_app().await.unwrap();

    let root = app.get("/", None).await.unwrap();
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["service"], "csa-loop");

    let health = app.get("/healthz", None).await.unwrap();
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert!(health.headers.contains_key("x-request-id"));

    let docs = app.get("/openapi.json", None).await.unwrap();
    assert_eq!(docs.status, StatusCode::OK);
    assert!(docs.body["paths"]["/communities"].is_object());
}

#[tokio::test]
async fn empty_directory_lists_only_the_sentinel_area() {
    let app = test_app().await.unwrap();

    let response = app.get("/communities", None).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "farmers": [],
            "total": 0,
            "page": 1,
            "page_size": 9,
            "total_pages": 0,
            "areas": ["すべて"],
            "selected_area": "すべて"
        })
    );
}

#[tokio::test]
async fn bad_page_query_is_rejected() {
    let app = test_app().await.unwrap();

    let response = app.get("/communities?page=abc", None).await.unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn huge_page_is_a_validation_error() {
    let app = test_app().await.unwrap();

    let response = app
        .get("/communities?page=2000000000000000000", None)
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn created_community_is_public_and_owned() {
    let app = test_app().await.unwrap();
    let base_id = test_utils::insert_base(&app.db, "Nui.", Some("台東区エリア"))
        .await
        .unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let created = app
        .json(
            Method::POST,
            "/profile/communities/create",
            Some(&cookie),
            community_body(base_id),
        )
        .await
        .unwrap();
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["success"], true);
    let id = created.body["id"].as_i64().unwrap();

    let detail = app.get(&format!("/communities/{id}"), None).await.unwrap();
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["farmer"]["base_name"], "Nui.");
    assert_eq!(
        detail.body["farmer"]["seasonal_products"],
        json!([{ "season": "3-5月", "products": "carrot" }])
    );

    let listing = app
        .get("/communities?area=%E5%8F%B0%E6%9D%B1%E5%8C%BA%E3%82%A8%E3%83%AA%E3%82%A2", None)
        .await
        .unwrap();
    assert_eq!(listing.body["total"], 1);
    assert_eq!(listing.body["selected_area"], "台東区エリア");
    assert_eq!(listing.body["areas"], json!(["すべて", "台東区エリア"]));

    let owned = app.get("/profile/communities", Some(&cookie)).await.unwrap();
    assert_eq!(owned.body["farmers"][0]["id"], json!(id));

    let (_, stranger) = app.login_as("stranger@example.com").await.unwrap();
    let not_owned = app.get("/profile/communities", Some(&stranger)).await.unwrap();
    assert_eq!(not_owned.body["farmers"], json!([]));
}

#[tokio::test]
async fn profile_routes_require_login() {
    let app = test_app().await.unwrap();
    let base_id = test_utils::insert_base(&app.db, "Base", Some("Area"))
        .await
        .unwrap();

    let create = app
        .json(
            Method::POST,
            "/profile/communities/create",
            None,
            community_body(base_id),
        )
        .await
        .unwrap();
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    assert_eq!(
        app.get("/profile/communities", None).await.unwrap().status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get("/profile/communities/1", None).await.unwrap().status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get("/bases", None).await.unwrap().status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn create_requires_name_location_and_base() {
    let app = test_app().await.unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let no_location = app
        .json(
            Method::POST,
            "/profile/communities/create",
            Some(&cookie),
            json!({ "name": "Farm", "base_id": 1 }),
        )
        .await
        .unwrap();
    assert_eq!(no_location.status, StatusCode::BAD_REQUEST);

    let no_base = app
        .json(
            Method::POST,
            "/profile/communities/create",
            Some(&cookie),
            json!({ "name": "Farm", "location": "Tokyo", "custom_base": { "name": "Only a name" } }),
        )
        .await
        .unwrap();
    assert_eq!(no_base.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_custom_base_lists_the_new_base() {
    let app = test_app().await.unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let created = app
        .json(
            Method::POST,
            "/profile/communities/create",
            Some(&cookie),
            json!({
                "name": "Farm",
                "location": "Tokyo",
                "custom_base": { "name": "LOOP新拠点", "area": "墨田区エリア", "station": "両国駅" }
            }),
        )
        .await
        .unwrap();
    assert_eq!(created.status, StatusCode::OK);

    let bases = app.get("/bases", Some(&cookie)).await.unwrap();
    assert_eq!(bases.status, StatusCode::OK);
    assert_eq!(bases.body["bases"][0]["name"], "LOOP新拠点");
    assert_eq!(bases.body["bases"][0]["station"], "両国駅");
}

#[tokio::test]
async fn only_the_owner_can_update() {
    let app = test_app().await.unwrap();
    let base_id = test_utils::insert_base(&app.db, "Base", Some("Area"))
        .await
        .unwrap();
    let (_, owner) = app.login_as("owner@example.com").await.unwrap();
    let (_, stranger) = app.login_as("stranger@example.com").await.unwrap();

    let created = app
        .json(
            Method::POST,
            "/profile/communities/create",
            Some(&owner),
            community_body(base_id),
        )
        .await
        .unwrap();
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/profile/communities/{id}");

    let mut changed = community_body(base_id);
    changed["name"] = json!("Renamed");

    let denied = app
        .json(Method::PUT, &uri, Some(&stranger), changed.clone())
        .await
        .unwrap();
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.body["error"], "no edit permission");

    let updated = app
        .json(Method::PUT, &uri, Some(&owner), changed)
        .await
        .unwrap();
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body, json!({ "id": id, "success": true }));

    let detail = app.get(&uri, Some(&owner)).await.unwrap();
    assert_eq!(detail.body["farmer"]["name"], "Renamed");
}

#[tokio::test]
async fn unknown_community_is_not_found() {
    let app = test_app().await.unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let public = app.get("/communities/999", None).await.unwrap();
    assert_eq!(public.status, StatusCode::NOT_FOUND);
    assert_eq!(public.body["code"], "NOT_FOUND");

    let profile = app.get("/profile/communities/999", Some(&cookie)).await.unwrap();
    assert_eq!(profile.status, StatusCode::NOT_FOUND);
}

async fn upload(
    app: &test_utils::api::TestApp,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> test_utils::api::TestResponse {
    let (content_type, body) = multipart_body(fields, file);
    let mut req = request(Method::POST, "/upload", cookie, Body::from(body)).unwrap();
    req.headers_mut()
        .insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    app.send(req).await.unwrap()
}

const TARGET: [(&str, &str); 3] = [("folder", "farmers"), ("id", "1"), ("type", "representative")];

#[tokio::test]
async fn upload_stores_image_under_its_slot() {
    let app = test_app().await.unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let response = upload(
        &app,
        Some(&cookie),
        &TARGET,
        Some(("photo.png", "image/png", &b"\x89PNG fake"[..])),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["url"],
        "http://localhost:8080/uploads/farmers/1/representative.png"
    );
    let stored = std::fs::read(app.upload_dir.path().join("farmers/1/representative.png")).unwrap();
    assert_eq!(stored, b"\x89PNG fake");
}

#[tokio::test]
async fn upload_rejects_anonymous_wrong_type_and_missing_fields() {
    let app = test_app().await.unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();
    let png: Option<(&str, &str, &[u8])> = Some(("photo.png", "image/png", &b"png"[..]));

    let anonymous = upload(&app, None, &TARGET, png).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let gif = upload(&app, Some(&cookie), &TARGET, Some(("a.gif", "image/gif", &b"gif"[..]))).await;
    assert_eq!(gif.status, StatusCode::BAD_REQUEST);

    let no_file = upload(&app, Some(&cookie), &TARGET, None).await;
    assert_eq!(no_file.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_file.body["error"], "missing field 'file'");

    let bad_folder = upload(
        &app,
        Some(&cookie),
        &[("folder", "users"), ("id", "1"), ("type", "base")],
        png,
    )
    .await;
    assert_eq!(bad_folder.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_oversized_files() {
    let app = test_app_with(|config| config.upload_max_bytes = 8)
        .await
        .unwrap();
    let (_, cookie) = app.login_as("owner@example.com").await.unwrap();

    let response = upload(
        &app,
        Some(&cookie),
        &TARGET,
        Some(("big.jpg", "image/jpeg", &b"0123456789"[..])),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!app.upload_dir.path().join("farmers/1/representative.jpg").exists());
}
