use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, crud};
use crate::models::{Artist, Booking, ContentItem, Customer, GalleryItem, Service, Testimonial};
use crate::services::crud::Resource;
use crate::state::AppState;

/// Collection and item routes for one admin resource.
fn admin_resource<R: Resource>(path: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            path,
            get(crud::list::<R>)
                .post(crud::create::<R>)
                .patch(crud::update_by_query::<R>)
                .delete(crud::delete_by_query::<R>),
        )
        .route(
            &format!("{path}/:id"),
            get(crud::get_one::<R>)
                .patch(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::submit))
        .route("/api/services", get(handlers::public::list::<Service>))
        .route("/api/artists", get(handlers::public::list::<Artist>))
        .route("/api/gallery", get(handlers::public::list::<GalleryItem>))
        .route("/api/testimonials", get(handlers::public::list::<Testimonial>))
        .route("/api/content", get(handlers::public::list::<ContentItem>))
        .route("/api/content/:key", get(handlers::public::content_by_key))
        .route("/api/admin/bookings/stats", get(handlers::bookings::stats))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(handlers::bookings::cancel),
        )
        .merge(admin_resource::<Booking>("/api/admin/bookings"))
        .merge(admin_resource::<Artist>("/api/admin/artists"))
        .merge(admin_resource::<Service>("/api/admin/services"))
        .merge(admin_resource::<Customer>("/api/admin/customers"))
        .merge(admin_resource::<GalleryItem>("/api/admin/gallery"))
        .merge(admin_resource::<Testimonial>("/api/admin/testimonials"))
        .merge(admin_resource::<ContentItem>("/api/admin/content"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
