//! The admin user and admin role cannot be touched through the API

mod common;

use common::*;
use gate_server::auth::password::verify_password;
use gate_server::{ErrorCode, Store};
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Capability;

#[tokio::test]
async fn test_admin_user_is_immutable() {
    let store = seeded_store().await;
    let state = state(config(), store.clone());
    let app = app(&state);
    let token = token_for(&state, "admin");
    let before = store.get_user("admin").await.unwrap().unwrap();

    let create = json_request(
        Method::POST,
        "/api/v1/users",
        Some(&token),
        json!({ "username": "admin", "password": "x", "roles": ["admin"] }),
    );
    let (status, _, body) = send(&app, create).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::CannotModifyAdmin.code());

    let update = json_request(
        Method::PUT,
        "/api/v1/users/admin",
        Some(&token),
        json!({ "password": "taken-over" }),
    );
    let (status, _, body) = send(&app, update).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::CannotModifyAdmin.code());

    let rename = json_request(
        Method::PUT,
        "/api/v1/users/admin",
        Some(&token),
        json!({ "username": "root" }),
    );
    let (status, _, _) = send(&app, rename).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(&app, bearer(Method::DELETE, "/api/v1/users/admin", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::CannotDeleteAdmin.code());

    assert_eq!(store.get_user("admin").await.unwrap().unwrap(), before);
    assert!(store.get_user("root").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rename_to_admin_is_refused() {
    let store = seeded_store().await;
    let state = state(config(), store.clone());
    let token = token_for(&state, "admin");

    let rename = json_request(
        Method::PUT,
        "/api/v1/users/alice",
        Some(&token),
        json!({ "username": "admin" }),
    );
    let (status, _, body) = send(&app(&state), rename).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::CannotModifyAdmin.code());
    assert!(store.get_user("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_role_is_immutable() {
    let store = seeded_store().await;
    let state = state(config(), store.clone());
    let app = app(&state);
    let token = token_for(&state, "admin");

    let create = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&token),
        json!({ "id": "r-admin2", "name": "admin", "capability": 1 }),
    );
    let (status, _, body) = send(&app, create).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::CannotModifyAdminRole.code());

    let downgrade = json_request(
        Method::PUT,
        "/api/v1/roles/admin",
        Some(&token),
        json!({ "capability": 0 }),
    );
    let (status, _, _) = send(&app, downgrade).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let takeover = json_request(
        Method::PUT,
        "/api/v1/roles/r-weak",
        Some(&token),
        json!({ "name": "admin" }),
    );
    let (status, _, _) = send(&app, takeover).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(&app, bearer(Method::DELETE, "/api/v1/roles/admin", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = store.get_role("admin").await.unwrap().unwrap();
    assert_eq!(admin.capability, Capability::MAX);
    assert_eq!(store.get_role("r-weak").await.unwrap().unwrap().name, "weak");
    assert!(store.get_role("r-admin2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_capability_above_max_is_400() {
    let state = state(config(), seeded_store().await);
    let app = app(&state);
    let token = token_for(&state, "admin");

    let create = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&token),
        json!({ "id": "r-wide", "name": "wide", "capability": Capability::MAX.bits() + 1 }),
    );
    let (status, _, body) = send(&app, create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::CapabilityOutOfRange.code());

    let update = json_request(
        Method::PUT,
        "/api/v1/roles/r-ops",
        Some(&token),
        json!({ "capability": u32::MAX }),
    );
    let (status, _, _) = send(&app, update).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ordinary_user_and_role_lifecycle() {
    let store = seeded_store().await;
    let state = state(config(), store.clone());
    let app = app(&state);
    let token = token_for(&state, "admin");

    let role = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&token),
        json!({ "id": "r-audit", "name": "audit", "capability": 0b0101 }),
    );
    let (status, _, body) = send(&app, role).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capability"], 0b0101);

    let duplicate = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&token),
        json!({ "id": "r-audit2", "name": "audit", "capability": 1 }),
    );
    let (status, _, body) = send(&app, duplicate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::RoleNameExists.code());

    let user = json_request(
        Method::POST,
        "/api/v1/users",
        Some(&token),
        json!({ "username": "dave", "password": "dave-pass", "roles": ["r-audit"] }),
    );
    let (status, _, body) = send(&app, user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["password"], "");
    assert_eq!(body["roles"][0]["id"], "r-audit");

    let stored = store.get_user("dave").await.unwrap().unwrap();
    assert!(verify_password("dave-pass", &stored.password).unwrap());

    let unknown_role = json_request(
        Method::POST,
        "/api/v1/users",
        Some(&token),
        json!({ "username": "erin", "password": "p", "roles": ["r-missing"] }),
    );
    let (status, _, body) = send(&app, unknown_role).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::RoleNotFound.code());

    let rename = json_request(
        Method::PUT,
        "/api/v1/users/dave",
        Some(&token),
        json!({ "username": "david" }),
    );
    let (status, _, _) = send(&app, rename).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.get_user("dave").await.unwrap().is_none());
    assert!(store.get_user("david").await.unwrap().is_some());

    let (status, _, _) = send(&app, bearer(Method::DELETE, "/api/v1/users/david", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(&app, bearer(Method::DELETE, "/api/v1/users/david", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::UserNotFound.code());
}

#[tokio::test]
async fn test_write_needs_write_bit() {
    let state = state(config(), seeded_store().await);
    // bob holds only USER_WRITE: creating a role needs ROLE_WRITE
    let create = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&token_for(&state, "bob")),
        json!({ "id": "r-x", "name": "x", "capability": 1 }),
    );
    let (status, _, body) = send(&app(&state), create).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Permission denied: POST /api/v1/roles");
}
