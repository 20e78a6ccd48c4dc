pub mod auth_handlers;
pub mod cart_handlers;
pub mod product_handlers;
pub mod user_handlers;
