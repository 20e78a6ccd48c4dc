//! Cart business logic: add/remove/clear/checkout and the derived view.
//!
//! Every operation takes an explicit `&mut Cart` handle; where the cart
//! comes from (the cookie session, a test fixture) is the caller's
//! business. The service only talks to the catalog seam.

use crate::errors::{AppError, Result};
use crate::models::cart::Cart;
use crate::models::product::{format_minor_units, Product};
use crate::services::catalog_service::ProductCatalog;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One cart entry joined with its current catalog snapshot. Derived at
/// query time, never stored; catalog changes show up immediately.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
  pub product_id: i64,
  pub name: String,
  pub image_url: Option<String>,
  pub unit_price_cents: i64,
  pub unit_price_display: String,
  pub quantity: u32,
  pub subtotal_cents: i64,
  pub subtotal_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub lines: Vec<CartLine>,
  pub total_cents: i64,
  pub total_display: String,
}

pub struct CartService {
  catalog: Arc<dyn ProductCatalog>,
}

impl CartService {
  pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
    Self { catalog }
  }

  /// Adds exactly one unit of `product_id` to the cart. Fails with
  /// `NotFound` when no active product with that id exists.
  #[instrument(name = "cart_service::add", skip(self, cart))]
  pub async fn add(&self, cart: &mut Cart, product_id: i64) -> Result<CartView> {
    let product = self.catalog.find_active(product_id).await?.ok_or_else(|| {
      warn!("Add to cart rejected: product {} missing or inactive.", product_id);
      AppError::NotFound(format!("Product with ID {} is not available.", product_id))
    })?;

    let new_quantity = cart.add_one(product.id);
    info!(
      "Added product {} ('{}') to cart. New quantity: {}.",
      product.id, product.name, new_quantity
    );
    self.view(cart).await
  }

  /// Removes one unit; deletes the entry when the quantity reaches zero.
  /// A no-op (not an error) when the entry does not exist.
  #[instrument(name = "cart_service::remove_one", skip(self, cart))]
  pub async fn remove_one(&self, cart: &mut Cart, product_id: i64) -> Result<CartView> {
    cart.remove_one(product_id);
    self.view(cart).await
  }

  /// Deletes the entry outright regardless of quantity. A no-op when absent.
  #[instrument(name = "cart_service::remove_all", skip(self, cart))]
  pub async fn remove_all(&self, cart: &mut Cart, product_id: i64) -> Result<CartView> {
    cart.remove_all(product_id);
    self.view(cart).await
  }

  /// Empties the cart unconditionally.
  #[instrument(name = "cart_service::clear", skip(self, cart))]
  pub fn clear(&self, cart: &mut Cart) {
    cart.clear();
  }

  /// Placeholder checkout: fails with `EmptyCart` when there is nothing to
  /// buy, otherwise resets the cart. No order record, payment, or
  /// inventory change happens here.
  #[instrument(name = "cart_service::checkout", skip(self, cart))]
  pub fn checkout(&self, cart: &mut Cart) -> Result<()> {
    if cart.is_empty() {
      return Err(AppError::EmptyCart);
    }
    cart.clear();
    info!("Checkout completed; cart reset.");
    Ok(())
  }

  /// Joins each entry with its current catalog snapshot. Entries whose
  /// product no longer resolves (deleted or deactivated) are silently
  /// omitted from both lines and total; that is policy, not a defect.
  /// Lines are ordered by product id descending: newest product first, a
  /// stable re-derivable order rather than insertion order.
  #[instrument(name = "cart_service::view", skip(self, cart))]
  pub async fn view(&self, cart: &Cart) -> Result<CartView> {
    let ids = cart.product_ids();
    let products = self.catalog.active_by_ids(&ids).await?;
    let by_id: HashMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut lines = Vec::with_capacity(ids.len());
    let mut total_cents: i64 = 0;

    for (product_id, quantity) in cart.entries() {
      let Some(product) = by_id.get(&product_id) else {
        debug!("Skipping cart entry {}: product no longer resolves.", product_id);
        continue;
      };
      let subtotal_cents = product.price_cents * i64::from(quantity);
      total_cents += subtotal_cents;
      lines.push(CartLine {
        product_id: product.id,
        name: product.name.clone(),
        image_url: product.image_url.clone(),
        unit_price_cents: product.price_cents,
        unit_price_display: product.price_display(),
        quantity,
        subtotal_cents,
        subtotal_display: format_minor_units(subtotal_cents),
      });
    }

    lines.sort_by(|a, b| b.product_id.cmp(&a.product_id));

    Ok(CartView {
      lines,
      total_cents,
      total_display: format_minor_units(total_cents),
    })
  }
}
