//! shoplite: a small e-commerce demo with a session-backed shopping cart.
//!
//! The interesting part is the cart subsystem: a typed per-session mapping
//! from product id to quantity ([`models::cart::Cart`]), persisted in the
//! cookie session ([`web::session::SessionCartStore`]), and mutated by the
//! [`services::cart_service::CartService`] against the live product catalog.
//! Everything else (auth, catalog, seeding) exists so the cart has real
//! collaborators to talk to.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
