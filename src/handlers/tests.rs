//! # Tests for Handlers
//!
//! Unit tests for handlers that can run without a database.

use crate::handlers::{auth::me, root};
use crate::models::ServiceInfo;
use axum::response::Json;
use serde_json::Value;

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "csa-loop");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_handler_returns_valid_json() {
    let Json(service_info) = root().await;

    let json_value: Value =
        serde_json::to_value(&service_info).expect("Failed to serialize ServiceInfo");

    assert_eq!(json_value["service"], "csa-loop");
    assert!(json_value.get("version").is_some());
}

#[test]
fn test_service_info_default() {
    let service_info = ServiceInfo::default();
    assert_eq!(service_info.service, "csa-loop");
}

#[tokio::test]
async fn test_me_without_session_is_null_user() {
    let Json(response) = me(crate::auth::MaybeUser(None)).await;

    let json_value = serde_json::to_value(&response).unwrap();
    assert_eq!(json_value, serde_json::json!({ "user": null }));
}

#[tokio::test]
async fn test_me_serializes_session_in_camel_case() {
    let session = crate::auth::Session {
        user_id: 3,
        name: "Hanako".to_string(),
        email: "hanako@example.com".to_string(),
    };
    let Json(response) = me(crate::auth::MaybeUser(Some(session))).await;

    let json_value = serde_json::to_value(&response).unwrap();
    assert_eq!(json_value["user"]["userId"], 3);
    assert_eq!(json_value["user"]["email"], "hanako@example.com");
}
