use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;
use crate::config::Config;

pub fn create_router(state: AppState, config: &Config) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let board_routes = Router::new()
        .route(
            "/",
            get(handlers::boards::list_boards).post(handlers::boards::create_board),
        )
        .route(
            "/{id}",
            get(handlers::boards::get_board)
                .patch(handlers::boards::rename_board)
                .delete(handlers::boards::delete_board),
        )
        .route("/{id}/columns", post(handlers::boards::add_column))
        .route("/{id}/cards", post(handlers::boards::create_card));

    let card_routes = Router::new()
        .route(
            "/{id}",
            get(handlers::cards::get_card)
                .patch(handlers::cards::update_card)
                .delete(handlers::cards::delete_card),
        )
        .route("/{id}/move", post(handlers::cards::move_card))
        .route("/{id}/cancel", post(handlers::cards::cancel_card))
        .route("/{id}/block", post(handlers::cards::block_card))
        .route("/{id}/unblock", post(handlers::cards::unblock_card))
        .route("/{id}/blocks", get(handlers::cards::list_blocks));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::liveness))
        .route("/api/events", get(handlers::sse::sse_handler))
        .route("/api/columns/{id}", get(handlers::columns::get_column))
        .nest("/api/boards", board_routes)
        .nest("/api/cards", card_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
