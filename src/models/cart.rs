use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-session shopping cart: a typed mapping from product id to quantity.
///
/// Invariant: stored quantities are always >= 1. An entry that would reach
/// zero is deleted rather than kept at zero. Serializes transparently as a
/// JSON object; the textual keys are an implementation detail of the
/// session encoding, not a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
  entries: BTreeMap<i64, u32>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Current quantity for a product, 0 if there is no entry.
  pub fn quantity(&self, product_id: i64) -> u32 {
    self.entries.get(&product_id).copied().unwrap_or(0)
  }

  pub fn product_ids(&self) -> Vec<i64> {
    self.entries.keys().copied().collect()
  }

  pub fn entries(&self) -> impl Iterator<Item = (i64, u32)> + '_ {
    self.entries.iter().map(|(&id, &qty)| (id, qty))
  }

  /// Increments the quantity for `product_id` by one, creating the entry at
  /// quantity 1 if absent. Returns the new quantity.
  pub fn add_one(&mut self, product_id: i64) -> u32 {
    let qty = self.entries.entry(product_id).or_insert(0);
    *qty = qty.saturating_add(1);
    *qty
  }

  /// Decrements the quantity by one; the entry is deleted when it would
  /// drop below 1. A no-op when there is no entry.
  pub fn remove_one(&mut self, product_id: i64) {
    if let Some(qty) = self.entries.get_mut(&product_id) {
      if *qty <= 1 {
        self.entries.remove(&product_id);
      } else {
        *qty -= 1;
      }
    }
  }

  /// Deletes the entry outright regardless of quantity. A no-op when absent.
  pub fn remove_all(&mut self, product_id: i64) {
    self.entries.remove(&product_id);
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  /// Drops entries that violate the quantity invariant. Stored carts come
  /// back from an untrusted cookie, so zero quantities can appear on load.
  pub fn purge_invalid(&mut self) {
    self.entries.retain(|_, qty| *qty > 0);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn repeated_adds_accumulate_quantity() {
    let mut cart = Cart::new();
    for _ in 0..5 {
      cart.add_one(7);
    }
    assert_eq!(cart.quantity(7), 5);
  }

  #[test]
  fn add_one_creates_entry_at_one() {
    let mut cart = Cart::new();
    assert_eq!(cart.add_one(3), 1);
    assert_eq!(cart.add_one(3), 2);
  }

  #[test]
  fn remove_one_deletes_entry_at_quantity_one() {
    let mut cart = Cart::new();
    cart.add_one(3);
    cart.remove_one(3);
    assert_eq!(cart.quantity(3), 0);
    assert!(cart.is_empty());
  }

  #[test]
  fn remove_one_on_absent_entry_is_a_noop() {
    let mut cart = Cart::new();
    cart.add_one(3);
    cart.remove_one(99);
    assert_eq!(cart.quantity(3), 1);
  }

  #[test]
  fn remove_all_deletes_regardless_of_quantity() {
    let mut cart = Cart::new();
    cart.add_one(3);
    cart.add_one(3);
    cart.add_one(5);
    cart.remove_all(3);
    assert_eq!(cart.quantity(3), 0);
    assert_eq!(cart.quantity(5), 1);
  }

  #[test]
  fn clear_empties_the_cart() {
    let mut cart = Cart::new();
    cart.add_one(1);
    cart.add_one(2);
    cart.clear();
    assert!(cart.is_empty());
  }

  #[test]
  fn serializes_as_json_object_with_textual_keys() {
    let mut cart = Cart::new();
    cart.add_one(5);
    cart.add_one(5);
    let json = serde_json::to_string(&cart).unwrap();
    assert_eq!(json, r#"{"5":2}"#);

    let roundtripped: Cart = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtripped, cart);
  }

  #[test]
  fn purge_invalid_drops_zero_quantities() {
    let mut cart: Cart = serde_json::from_str(r#"{"5":0,"7":1}"#).unwrap();
    cart.purge_invalid();
    assert_eq!(cart.quantity(5), 0);
    assert_eq!(cart.quantity(7), 1);
    assert_eq!(cart.product_ids(), vec![7]);
  }
}
