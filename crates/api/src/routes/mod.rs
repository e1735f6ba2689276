//! API router configuration.
//!
//! Three trust zones: public (health, login), session-gated admin/actor
//! routes (bearer session token, role checks per handler), and
//! machine-credential routes for the reservation crawler and external cron
//! triggers (static bearer secrets, no session).

pub mod actors;
pub mod auth;
pub mod calendar;
pub mod casting;
pub mod cron;
pub mod reservations;
pub mod schedule;
pub mod unavailable;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::require_session;
use crate::context::AppContext;

/// Creates the main application router
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let session_routes = Router::new()
        .route("/api/schedule", get(schedule::get_schedule))
        .route("/api/performances", get(schedule::list_performances))
        .route("/api/casting", get(casting::list).post(casting::assign))
        .route("/api/casting/batch", post(casting::assign_batch))
        .route("/api/casting/notify", post(casting::notify))
        .route("/api/unavailable", get(unavailable::list).post(unavailable::set_unavailable))
        .route("/api/actors", get(actors::list).post(actors::create))
        .route("/api/actors/{id}", put(actors::update).delete(actors::remove))
        .route("/api/actors/{id}/link", post(actors::link))
        .route("/api/actors/calendars", post(actors::provision_calendars))
        .route("/api/actor-override", post(actors::toggle_override))
        .route("/api/calendar/sync", post(calendar::sync_all))
        .route("/api/reservations/trigger-sync", post(reservations::trigger_sync))
        .layer(middleware::from_fn_with_state(ctx.clone(), require_session));

    let machine_routes = Router::new()
        .route("/api/reservations/bookings", post(reservations::record_bookings))
        .route("/api/reservations/sync", post(reservations::sync_reservations))
        .route("/api/cron/cleanup-memos", get(cron::cleanup_memos))
        .route(
            "/api/cron/cleanup-future-descriptions",
            get(cron::cleanup_future_descriptions),
        );

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/login", post(auth::login))
        .merge(session_routes)
        .merge(machine_routes)
        .with_state(ctx)
}
