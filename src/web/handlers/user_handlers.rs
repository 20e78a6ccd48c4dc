use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::session::AuthenticatedUser;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequestPayload {
  pub first_name: String,
  pub last_name: String,
  pub username: String,
  pub email: String,
  // Optional password change; both fields must be present and equal.
  #[serde(default)]
  pub new_password: Option<String>,
  #[serde(default)]
  pub new_password_confirmation: Option<String>,
}

async fn fetch_user(app_state: &AppState, user_id: i64) -> Result<User, AppError> {
  let user: Option<User> = sqlx::query_as(
    "SELECT id, first_name, last_name, email, username, password_hash FROM users WHERE id = ?1",
  )
  .bind(user_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  // A session can outlive its user row; force a re-login in that case.
  user.ok_or_else(|| AppError::Auth("Your account no longer exists. Sign in again.".to_string()))
}

#[instrument(name = "handler::get_profile", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = fetch_user(&app_state, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[instrument(
  name = "handler::update_profile",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user_id)
)]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<UpdateProfileRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let user = fetch_user(&app_state, auth_user.user_id).await?;
  let payload = req_payload.into_inner();

  let first_name = payload.first_name.trim();
  let last_name = payload.last_name.trim();
  let username = payload.username.trim();
  let email = payload.email.trim();

  if first_name.is_empty() || last_name.is_empty() || username.is_empty() || email.is_empty() {
    return Err(AppError::Validation(
      "All fields except the password are required.".to_string(),
    ));
  }

  // Uniqueness checks skip the current user's own row.
  let username_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1 AND id != ?2")
    .bind(username)
    .bind(user.id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if username_taken.is_some() {
    return Err(AppError::Conflict("That username is already taken.".to_string()));
  }

  let email_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?1 AND id != ?2")
    .bind(email)
    .bind(user.id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if email_taken.is_some() {
    return Err(AppError::Conflict("That e-mail is already registered.".to_string()));
  }

  // Validate (and hash) the optional password change before touching the
  // row, so a rejected password leaves the whole profile unchanged.
  let new_password = payload.new_password.as_deref().unwrap_or("");
  let confirmation = payload.new_password_confirmation.as_deref().unwrap_or("");
  let password_hash = if !new_password.is_empty() || !confirmation.is_empty() {
    if new_password != confirmation {
      return Err(AppError::Validation("The passwords do not match.".to_string()));
    }
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
      return Err(AppError::Validation(
        "Password must be at least 8 characters long.".to_string(),
      ));
    }
    Some(auth_service::hash_password(new_password)?)
  } else {
    None
  };

  let mut tx = app_state.db_pool.begin().await?;
  sqlx::query("UPDATE users SET first_name = ?1, last_name = ?2, username = ?3, email = ?4 WHERE id = ?5")
    .bind(first_name)
    .bind(last_name)
    .bind(username)
    .bind(email)
    .bind(user.id)
    .execute(&mut *tx)
    .await?;
  if let Some(password_hash) = &password_hash {
    sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
      .bind(password_hash)
      .bind(user.id)
      .execute(&mut *tx)
      .await?;
  }
  tx.commit().await?;

  if password_hash.is_some() {
    info!("User {} changed their password.", user.id);
  }

  let updated = fetch_user(&app_state, user.id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Changes saved.",
    "user": updated,
  })))
}
