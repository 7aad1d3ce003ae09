// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_database::BookingStore;

use crate::handlers;

pub fn booking_routes(store: Arc<dyn BookingStore>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::book_appointment).get(handlers::list_appointments),
        )
        .route("/stats", get(handlers::get_booking_stats))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/{appointment_id}/confirm",
            post(handlers::confirm_appointment),
        )
        .route(
            "/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .with_state(store)
}
