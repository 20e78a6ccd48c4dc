//! Session-scoped state: the signed-in user and the cart store.

use crate::errors::AppError;
use crate::models::Cart;
use actix_session::Session;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

pub const USER_ID_SESSION_KEY: &str = "user_id";
pub const CART_SESSION_KEY: &str = "cart";

/// Identity of the signed-in user, read from the cookie session.
///
/// Extraction fails with `AppError::Auth` when nobody is signed in, so
/// handlers that take this extractor never run unauthenticated.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let session = match Session::from_request(req, payload).into_inner() {
      Ok(session) => session,
      Err(e) => return ready(Err(AppError::Session(e.to_string()))),
    };

    match session.get::<i64>(USER_ID_SESSION_KEY) {
      Ok(Some(user_id)) => ready(Ok(AuthenticatedUser { user_id })),
      Ok(None) => ready(Err(AppError::Auth("Sign in to continue.".to_string()))),
      Err(e) => {
        warn!(error = %e, "Failed to read user id from session.");
        ready(Err(AppError::Auth("Sign in to continue.".to_string())))
      }
    }
  }
}

/// Per-session cart persistence.
///
/// `get`/`set` are scoped to the calling session; there is no cross-session
/// visibility. A request reads the cart, mutates it, and writes it back —
/// concurrent requests from the same session race on that cycle and the
/// last write wins, which matches the documented contract of this store.
pub struct SessionCartStore {
  session: Session,
}

impl SessionCartStore {
  pub fn new(session: Session) -> Self {
    Self { session }
  }

  /// Returns the session's cart, initializing and persisting an empty one
  /// on first access. An unreadable stored value is reset the same way.
  pub fn get(&self) -> Result<Cart, AppError> {
    match self.session.get::<Cart>(CART_SESSION_KEY) {
      Ok(Some(mut cart)) => {
        cart.purge_invalid();
        Ok(cart)
      }
      Ok(None) => {
        let cart = Cart::new();
        self.set(&cart)?;
        Ok(cart)
      }
      Err(e) => {
        warn!(error = %e, "Stored cart was unreadable; resetting to empty.");
        let cart = Cart::new();
        self.set(&cart)?;
        Ok(cart)
      }
    }
  }

  /// Writes the cart back to the session.
  pub fn set(&self, cart: &Cart) -> Result<(), AppError> {
    self
      .session
      .insert(CART_SESSION_KEY, cart)
      .map_err(|e| AppError::Session(e.to_string()))
  }
}
