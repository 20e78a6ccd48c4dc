//! Cart endpoints: each request runs one read-modify-write cycle against
//! the session cart (no locking, last write wins — see the store docs).

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::session::{AuthenticatedUser, SessionCartStore};

#[instrument(name = "handler::view_cart", skip(app_state, auth_user, session), fields(user_id = %auth_user.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let store = SessionCartStore::new(session);
  let cart = store.get()?;
  let view = app_state.cart_service.view(&cart).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": view })))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, path, auth_user, session),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let store = SessionCartStore::new(session);

  let mut cart = store.get()?;
  let view = app_state.cart_service.add(&mut cart, product_id).await?;
  store.set(&cart)?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Added to cart.",
    "cart": view,
  })))
}

#[instrument(
  name = "handler::remove_one_from_cart",
  skip(app_state, path, auth_user, session),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn remove_one_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let store = SessionCartStore::new(session);

  let mut cart = store.get()?;
  let view = app_state.cart_service.remove_one(&mut cart, product_id).await?;
  store.set(&cart)?;

  Ok(HttpResponse::Ok().json(json!({ "cart": view })))
}

#[instrument(
  name = "handler::remove_all_from_cart",
  skip(app_state, path, auth_user, session),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn remove_all_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let store = SessionCartStore::new(session);

  let mut cart = store.get()?;
  let view = app_state.cart_service.remove_all(&mut cart, product_id).await?;
  store.set(&cart)?;

  Ok(HttpResponse::Ok().json(json!({ "cart": view })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user, session), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let store = SessionCartStore::new(session);

  let mut cart = store.get()?;
  app_state.cart_service.clear(&mut cart);
  store.set(&cart)?;

  let view = app_state.cart_service.view(&cart).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": view })))
}

#[instrument(name = "handler::checkout", skip(app_state, auth_user, session), fields(user_id = %auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let store = SessionCartStore::new(session);

  let mut cart = store.get()?;
  app_state.cart_service.checkout(&mut cart)?;
  store.set(&cart)?;

  info!("User {} checked out.", auth_user.user_id);

  Ok(HttpResponse::Ok().json(json!({
    "message": "Payment complete. Thank you!",
  })))
}
