use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::booking_routes;
use doctor_cell::router::doctor_routes;
use shared_database::BookingStore;

pub fn create_router(store: Arc<dyn BookingStore>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/doctors", doctor_routes(Arc::clone(&store)))
        .nest("/appointments", booking_routes(store))
}
