//! Data structures for users, products, and the session cart.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::Cart;
pub use product::Product;
pub use user::User;
