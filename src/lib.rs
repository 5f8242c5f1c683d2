use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod validation;

use auth::AuthService;
use db::ClubStore;

/// Shared handler state: the injectable storage handle plus the
/// credential service. No process-global registries.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClubStore>,
    pub auth: AuthService,
}

/// Build the full router. Club and member routes sit behind the bearer
/// token middleware; `/`, `/auth/register` and `/token` are public.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // Club endpoints
        .route("/clubs", get(routes::clubs::list_clubs).post(routes::clubs::create_club))
        .route(
            "/clubs/{clubId}",
            get(routes::clubs::get_club)
                .put(routes::clubs::update_club)
                .delete(routes::clubs::delete_club),
        )
        // Member endpoints
        .route(
            "/clubs/{clubId}/members",
            get(routes::members::list_members).post(routes::members::add_member),
        )
        .route(
            "/clubs/{clubId}/members/{memberId}",
            delete(routes::members::remove_member),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::require_auth,
        ));

    Router::new()
        // Root and auth
        .route("/", get(routes::root::welcome))
        .route("/auth/register", post(routes::auth::register))
        .route("/token", post(routes::auth::token))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
