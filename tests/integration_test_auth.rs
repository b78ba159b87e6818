mod common;

use cinema_booking::domain::models::auth::{Role, TOKEN_AUDIENCE};
use common::{parse_body, sign_token, TestApp, TEST_ISSUER};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let res = app.send("GET", "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let app = TestApp::new().await;

    let res = app.send("GET", "/api/v1/bookings/history", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(res).await["kind"], "unauthenticated");

    let res = app.send("GET", "/api/v1/theatres", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = TestApp::new().await;
    let token = app.token_for(&Uuid::new_v4().to_string(), Role::User);

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/bookings/history")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tokens_with_wrong_claims_are_rejected() {
    let app = TestApp::new().await;
    let user_id = Uuid::new_v4().to_string();

    let expired = sign_token(&user_id, Role::User, TEST_ISSUER, TOKEN_AUDIENCE, -3600);
    let wrong_issuer = sign_token(&user_id, Role::User, "https://evil.example", TOKEN_AUDIENCE, 3600);
    let wrong_audience = sign_token(&user_id, Role::User, TEST_ISSUER, "other-app", 3600);

    for token in [expired, wrong_issuer, wrong_audience, "not.a.jwt".to_string()] {
        let res = app.send("GET", "/api/v1/bookings/history", Some(&token), None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let user = app.token_for(&Uuid::new_v4().to_string(), Role::User);

    let res = app.send("GET", "/api/v1/bookings/movies/total-bookings", Some(&user), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["kind"], "forbidden");

    let res = app.send("GET", "/api/v1/theatres", Some(&user), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let movie_id = app.create_movie(&admin, "Role Play").await;
    let theatre = app.create_theatre(&admin, &movie_id, &["7:00 PM"], None).await;

    let res = app.book(&admin, &movie_id, theatre["id"].as_str().unwrap(), "7:00 PM", 1).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.available_seats(theatre["id"].as_str().unwrap()).await, 100);
}
