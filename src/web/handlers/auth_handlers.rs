use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::session::USER_ID_SESSION_KEY;

const MIN_PASSWORD_CHARS: usize = 8;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub first_name: String,
  pub last_name: String,
  pub username: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub login_or_email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::register",
  skip(app_state, req_payload),
  fields(req_username = %req_payload.username, req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let first_name = payload.first_name.trim();
  let last_name = payload.last_name.trim();
  let username = payload.username.trim();
  let email = payload.email.trim();

  if first_name.is_empty() || last_name.is_empty() || username.is_empty() || email.is_empty() || payload.password.is_empty()
  {
    return Err(AppError::Validation("All fields are required.".to_string()));
  }
  if payload.password.chars().count() < MIN_PASSWORD_CHARS {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }

  let username_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
    .bind(username)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if username_taken.is_some() {
    return Err(AppError::Conflict("That username is already taken.".to_string()));
  }

  let email_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?1")
    .bind(email)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if email_taken.is_some() {
    return Err(AppError::Conflict("That e-mail is already registered.".to_string()));
  }

  let password_hash = auth_service::hash_password(&payload.password)?;

  let user_id: i64 = sqlx::query_scalar(
    "INSERT INTO users (first_name, last_name, username, email, password_hash)
     VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
  )
  .bind(first_name)
  .bind(last_name)
  .bind(username)
  .bind(email)
  .bind(&password_hash)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!("User '{}' registered with id {}.", username, user_id);

  Ok(HttpResponse::Created().json(json!({
    "message": "Account created. You can sign in now.",
    "userId": user_id,
  })))
}

#[instrument(
  name = "handler::login",
  skip(app_state, req_payload, session),
  fields(login_or_email = %req_payload.login_or_email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let login_or_email = req_payload.login_or_email.trim();
  if login_or_email.is_empty() || req_payload.password.is_empty() {
    return Err(AppError::Validation(
      "Provide your login or e-mail and password.".to_string(),
    ));
  }

  let user: Option<User> = sqlx::query_as(
    "SELECT id, first_name, last_name, email, username, password_hash
     FROM users WHERE username = ?1 OR email = ?1",
  )
  .bind(login_or_email)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let Some(user) = user else {
    warn!("Login failed: no account for '{}'.", login_or_email);
    return Err(AppError::Auth("Incorrect login/e-mail or password.".to_string()));
  };

  if !auth_service::verify_password(&user.password_hash, &req_payload.password)? {
    warn!("Login failed: wrong password for user {}.", user.id);
    return Err(AppError::Auth("Incorrect login/e-mail or password.".to_string()));
  }

  // Fresh session id on privilege change, then bind the user to it.
  session.renew();
  session
    .insert(USER_ID_SESSION_KEY, user.id)
    .map_err(|e| AppError::Session(e.to_string()))?;

  info!("User {} signed in.", user.id);

  Ok(HttpResponse::Ok().json(json!({
    "message": format!("Welcome, {}!", user.first_name),
    "user": user,
  })))
}

#[instrument(name = "handler::logout", skip(session))]
pub async fn logout_handler(session: Session) -> Result<HttpResponse, AppError> {
  session.purge();
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out." })))
}
