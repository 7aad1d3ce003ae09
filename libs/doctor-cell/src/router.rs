// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_database::BookingStore;

use crate::handlers;

pub fn doctor_routes(store: Arc<dyn BookingStore>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_doctor).get(handlers::list_doctors),
        )
        .route(
            "/{doctor_id}/slots",
            post(handlers::create_slot).get(handlers::list_open_slots),
        )
        .with_state(store)
}
