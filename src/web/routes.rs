use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route(
            "/register",
            web::post().to(crate::web::handlers::auth_handlers::register_handler),
          )
          .route(
            "/login",
            web::post().to(crate::web::handlers::auth_handlers::login_handler),
          )
          .route(
            "/logout",
            web::post().to(crate::web::handlers::auth_handlers::logout_handler),
          ),
      )
      .service(
        web::scope("/profile")
          .route(
            "",
            web::get().to(crate::web::handlers::user_handlers::get_profile_handler),
          )
          .route(
            "",
            web::put().to(crate::web::handlers::user_handlers::update_profile_handler),
          ),
      )
      .service(
        web::scope("/products")
          // `/news` must register before the `{product_id}` catch-all.
          .route(
            "/news",
            web::get().to(crate::web::handlers::product_handlers::newest_products_handler),
          )
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          )
          .route(
            "/{product_id}",
            web::get().to(crate::web::handlers::product_handlers::get_product_handler),
          ),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(crate::web::handlers::cart_handlers::view_cart_handler))
          .route(
            "/add/{product_id}",
            web::post().to(crate::web::handlers::cart_handlers::add_to_cart_handler),
          )
          .route(
            "/remove/{product_id}",
            web::post().to(crate::web::handlers::cart_handlers::remove_one_handler),
          )
          .route(
            "/remove_all/{product_id}",
            web::post().to(crate::web::handlers::cart_handlers::remove_all_handler),
          )
          .route(
            "/clear",
            web::post().to(crate::web::handlers::cart_handlers::clear_cart_handler),
          )
          .route(
            "/checkout",
            web::post().to(crate::web::handlers::cart_handlers::checkout_handler),
          ),
      ),
  );
}
