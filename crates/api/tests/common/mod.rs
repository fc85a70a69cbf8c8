#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use sitelog_api::auth::jwt::{generate_access_token, JwtConfig};
use sitelog_api::config::ServerConfig;
use sitelog_api::routes;
use sitelog_api::state::AppState;
use sitelog_core::roles::{ROLE_APPROVER, ROLE_FINAL_APPROVER, ROLE_REPORTER};
use sitelog_db::models::item_rate::CreateItemRate;
use sitelog_db::models::project::CreateProject;
use sitelog_db::models::project_member::AssignRole;
use sitelog_db::models::user::CreateUser;
use sitelog_db::repositories::{ItemRateRepo, ItemRepo, ProjectMemberRepo, ProjectRepo, UserRepo};

/// JWT settings shared by the test app and the tokens tests mint.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-do-not-use-in-production".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Mirrors the router construction in `main.rs` so integration tests exercise
/// the same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_jwt_config()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, user_id: i64) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    json_auth(app, Method::POST, uri, user_id, body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    json_auth(app, Method::PATCH, uri, user_id, body).await
}

pub async fn post_auth(app: Router, uri: &str, user_id: i64) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_project(pool: &PgPool, name: &str) -> i64 {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Assign `role_name` with the flags a member of that role normally carries:
/// reporters create and edit, reviewers view and edit, clients only view.
pub async fn seed_member(pool: &PgPool, project_id: i64, user_id: i64, role_name: &str) {
    let (create, edit) = match role_name {
        ROLE_REPORTER => (true, true),
        ROLE_APPROVER | ROLE_FINAL_APPROVER => (false, true),
        _ => (false, false),
    };
    ProjectMemberRepo::assign(
        pool,
        &AssignRole {
            project_id,
            user_id,
            role_name: role_name.to_string(),
            can_create_dpr: create,
            can_view_dpr: true,
            can_edit_dpr: edit,
        },
    )
    .await
    .unwrap();
}

/// Create an item with one rate effective an hour ago. Returns `(item_id, rate_id)`.
pub async fn seed_priced_item(pool: &PgPool, project_id: i64, name: &str, rate: f64) -> (i64, i64) {
    let item = ItemRepo::find_or_create(pool, project_id, name, "nos")
        .await
        .unwrap();
    let rate = ItemRateRepo::append(
        pool,
        item.id,
        &CreateItemRate {
            rate,
            effective_from: Some(Utc::now() - chrono::Duration::hours(1)),
            quantity: None,
        },
    )
    .await
    .unwrap();
    (item.id, rate.id)
}

/// Create an item with no rate at all.
pub async fn seed_unpriced_item(pool: &PgPool, project_id: i64, name: &str) -> i64 {
    ItemRepo::find_or_create(pool, project_id, name, "nos")
        .await
        .unwrap()
        .id
}
