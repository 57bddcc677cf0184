//! Request checks that must reject before any database work.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{bearer, json_request, multipart_body, offline_app, send};
use serde_json::json;

const NO_ANALYTICS: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _) = offline_app(NO_ANALYTICS);
    for uri in [
        "/api/users",
        "/api/clients",
        "/api/products",
        "/api/maps",
        "/api/field_product",
        "/api/productsmaps",
        "/api/seisms",
        "/api/analytics/stl",
        "/api/me",
    ] {
        let (status, body) = send(&app, json_request("GET", uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Missing Authorization header");
    }
}

#[tokio::test]
async fn malformed_or_forged_tokens_are_rejected() {
    let (app, _) = offline_app(NO_ANALYTICS);

    let (status, _) = send(
        &app,
        json_request("GET", "/api/me", Some("Basic abc"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the old dashboard token format: base64("email:timestamp")
    let (status, body) = send(
        &app,
        json_request(
            "GET",
            "/api/me",
            Some("Bearer YWRtaW5AZXhhbXBsZS5jb206MTcwMDAwMDAwMDAwMA=="),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let (status, body) = send(
        &app,
        json_request("POST", "/api/login", None, Some(json!({ "email": "a@b.c" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email and password are required");
}

#[tokio::test]
async fn create_user_without_password_is_rejected() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "email": "new@example.com", "first_name": "Ana" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");

    let (status, _) = send(
        &app,
        json_request("POST", "/api/users", None, Some(json!({ "password": "pw" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn multipart_user_without_email_writes_no_file() {
    let (app, config) = offline_app(NO_ANALYTICS);
    let boundary = "XBOUNDARYX";
    let body = multipart_body(
        boundary,
        &[("password", "secret"), ("username", "ana")],
        Some(("face.png", &b"\x89PNG-data"[..])),
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!config.upload_dir.exists());
}

#[tokio::test]
async fn user_body_must_be_json_or_multipart() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("email=a"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");
    for (method, uri) in [
        ("GET", "/api/users/abc"),
        ("DELETE", "/api/users/abc"),
        ("GET", "/api/clients/1x"),
        ("DELETE", "/api/clients/%20"),
        ("GET", "/api/products/12.5"),
        ("DELETE", "/api/products/widget"),
    ] {
        let (status, body) = send(&app, json_request(method, uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["error"], "Invalid ID");
    }
}

#[tokio::test]
async fn client_update_requires_date_inscription() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/clients/3",
            Some(&token),
            Some(json!({ "genre": "F", "age": 30 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "date_inscription is required");
}

#[tokio::test]
async fn product_create_requires_all_mandatory_fields() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");
    let full = json!({ "prix": 100, "stock": 5, "date_ajout": "2024-01-01", "nom": "Widget" });

    for missing in ["prix", "stock", "date_ajout", "nom"] {
        let mut body = full.clone();
        body.as_object_mut().unwrap().remove(missing);
        let (status, _) = send(
            &app,
            json_request("POST", "/api/products", Some(&token), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "without {missing}");
    }
}

#[tokio::test]
async fn product_update_rejects_blank_name() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");
    let (status, body) = send(
        &app,
        json_request("PUT", "/api/products/1", Some(&token), Some(json!({ "nom": "  " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "nom must not be empty");
}

#[tokio::test]
async fn mistyped_json_fields_are_json_400() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");
    let cases = [
        (
            "POST",
            "/api/products",
            json!({ "prix": "abc", "stock": 5, "date_ajout": "2024-01-01", "nom": "Widget" }),
        ),
        (
            "POST",
            "/api/products",
            json!({ "prix": 10, "stock": 5, "date_ajout": "not-a-date", "nom": "Widget" }),
        ),
        ("PUT", "/api/products/1", json!({ "stock": "many" })),
        ("POST", "/api/clients", json!({ "date_inscription": "2024-01-01", "age": "old" })),
        ("PUT", "/api/clients/1", json!({ "date_inscription": "2024-13-45" })),
        ("POST", "/api/login", json!({ "email": 5, "password": "pw" })),
    ];

    for (method, uri, body) in cases {
        let (status, reply) = send(&app, json_request(method, uri, Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(reply["message"], "Bad Request", "{method} {uri}");
        assert!(reply["error"].is_string(), "{method} {uri}");
    }
}

#[tokio::test]
async fn unparsable_body_and_query_are_json_400() {
    let (app, _) = offline_app(NO_ANALYTICS);
    let token = bearer(1, "admin@example.com");

    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"prix\": "))
        .unwrap();
    let (status, reply) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(reply["error"].is_string());

    let (status, reply) = send(
        &app,
        json_request("GET", "/api/clients?page=abc", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(reply["error"].is_string());
}
