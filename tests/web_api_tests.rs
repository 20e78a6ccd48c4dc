//! Handler-level tests over the full actix stack: routes, session
//! middleware, extractors, and the JSON error mapping, backed by an
//! in-memory SQLite database.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use shoplite::config::AppConfig;
use shoplite::db;
use shoplite::state::AppState;
use shoplite::web::configure_app_routes;

async fn test_pool() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("in-memory sqlite");
  db::ensure_schema(&pool).await.expect("schema");
  pool
}

fn app_state(pool: SqlitePool) -> AppState {
  let config = Arc::new(AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "sqlite::memory:".to_string(),
    session_secret: None,
    seed_db: false,
  });
  AppState::new(pool, config)
}

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
  SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
    .cookie_secure(false)
    .build()
}

fn register_payload(username: &str, email: &str, password: &str) -> Value {
  json!({
    "first_name": "Jan",
    "last_name": "Kowalski",
    "username": username,
    "email": email,
    "password": password,
  })
}

#[actix_rt::test]
async fn register_rejects_short_password() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("jan", "jan@example.com", "short"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
    .fetch_one(&pool)
    .await
    .unwrap();
  assert_eq!(count, 0);
}

#[actix_rt::test]
async fn register_rejects_incomplete_payload() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  // Whitespace-only fields count as missing.
  let mut payload = register_payload("jan", "jan@example.com", "password123");
  payload["first_name"] = json!("   ");
  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(payload)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn register_rejects_duplicate_username_and_email() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("jan", "jan@example.com", "password123"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("jan", "other@example.com", "password123"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("janek", "jan@example.com", "password123"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn cart_requires_a_signed_in_session() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::get().uri("/api/v1/cart").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn rejected_password_change_leaves_profile_untouched() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("jan", "jan@example.com", "password123"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/login")
    .set_json(json!({ "login_or_email": "jan", "password": "password123" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let session_cookie = resp
    .response()
    .cookies()
    .find(|c| c.name() == "id")
    .expect("session cookie")
    .into_owned();

  // Mismatched confirmation must abort the whole update, field changes
  // included.
  let req = test::TestRequest::put()
    .uri("/api/v1/profile")
    .cookie(session_cookie.clone())
    .set_json(json!({
      "first_name": "Jan",
      "last_name": "Kowalski",
      "username": "janek",
      "email": "janek@example.com",
      "new_password": "newpassword1",
      "new_password_confirmation": "different1",
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  // Same for a too-short new password.
  let req = test::TestRequest::put()
    .uri("/api/v1/profile")
    .cookie(session_cookie.clone())
    .set_json(json!({
      "first_name": "Jan",
      "last_name": "Kowalski",
      "username": "janek",
      "email": "janek@example.com",
      "new_password": "short",
      "new_password_confirmation": "short",
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::get()
    .uri("/api/v1/profile")
    .cookie(session_cookie.clone())
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["user"]["username"], "jan");
  assert_eq!(body["user"]["email"], "jan@example.com");
}

#[actix_rt::test]
async fn valid_profile_update_is_persisted() {
  let pool = test_pool().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(app_state(pool.clone())))
      .wrap(session_middleware())
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(register_payload("jan", "jan@example.com", "password123"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/login")
    .set_json(json!({ "login_or_email": "jan", "password": "password123" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let session_cookie = resp
    .response()
    .cookies()
    .find(|c| c.name() == "id")
    .expect("session cookie")
    .into_owned();

  let req = test::TestRequest::put()
    .uri("/api/v1/profile")
    .cookie(session_cookie.clone())
    .set_json(json!({
      "first_name": "Jan",
      "last_name": "Kowalski",
      "username": "janek",
      "email": "janek@example.com",
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = test::TestRequest::get()
    .uri("/api/v1/profile")
    .cookie(session_cookie)
    .to_request();
  let resp = test::call_service(&app, req).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["user"]["username"], "janek");
  assert_eq!(body["user"]["email"], "janek@example.com");
}
