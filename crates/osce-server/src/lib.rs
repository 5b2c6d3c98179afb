//! osce-server
//!
//! HTTP front end for practice sessions. Sessions live in memory; each one
//! gets a driver task that advances its clock in real time.

pub mod config;
pub mod driver;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Session routes need a bearer token and carry the caller's role.
    let protected = Router::new()
        .route("/session/start", post(routes::sessions::start_session))
        .route(
            "/session/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::close_session),
        )
        .route("/session/{id}/message", post(routes::sessions::send_message))
        .route("/session/{id}/examine", post(routes::sessions::examine))
        .route(
            "/session/{id}/checklist/{item}",
            post(routes::sessions::toggle_checklist_item),
        )
        .route(
            "/session/{id}/deteriorate",
            post(routes::sessions::trigger_deterioration),
        )
        .route("/session/{id}/advance", post(routes::sessions::advance))
        .route("/session/{id}/back", post(routes::sessions::return_to_history))
        .route("/session/{id}/evaluation", put(routes::evaluation::set_evaluation))
        .route("/session/{id}/rubric", put(routes::evaluation::record_rubric))
        .route(
            "/session/{id}/history-checklist",
            put(routes::evaluation::record_history_checklist),
        )
        .route("/session/{id}/finish", post(routes::evaluation::finish_session))
        .route("/session/{id}/return-now", post(routes::evaluation::return_now))
        .route_layer(axum_mw::from_fn(middleware::auth::require_auth));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        // Directory data (no auth, read-only)
        .route("/cases", get(routes::cases::list_cases))
        .route("/cases/{id}", get(routes::cases::get_case_detail))
        .route("/zones", get(routes::cases::list_zones))
        .route("/stations", get(routes::stations::list_stations))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::audit::audit_log)),
        )
        .with_state(state)
}
