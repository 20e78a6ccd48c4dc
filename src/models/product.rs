use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  // Unit price in integer minor-currency units, never floating point.
  pub price_cents: i64,
  pub image_url: Option<String>,
  pub is_active: bool,
}

impl Product {
  pub fn price_display(&self) -> String {
    format_minor_units(self.price_cents)
  }
}

/// Renders an amount of integer minor-currency units as a two-decimal
/// display string, e.g. 6999 -> "69.99". Amounts here are non-negative in
/// practice, but the sign is handled so a stray negative never renders as
/// garbage.
pub fn format_minor_units(amount_cents: i64) -> String {
  let sign = if amount_cents < 0 { "-" } else { "" };
  let abs = amount_cents.unsigned_abs();
  format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
