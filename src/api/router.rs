use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, patch},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, booking, report, movie, theatre};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Bookings (user)
        .route("/api/v1/bookings/book/{movie_id}/{theatre_id}", post(booking::create_booking))
        .route("/api/v1/bookings/cancel/{booking_id}", put(booking::cancel_booking))
        .route("/api/v1/bookings/history", get(report::list_user_history))

        // Booking reports (admin)
        .route("/api/v1/bookings/movies/total-bookings", get(report::list_popular_movies))
        .route("/api/v1/bookings/theatres/{theatre_id}", get(report::list_theatre_bookings))

        // Catalog
        .route("/api/v1/movies", post(movie::create_movie).get(movie::list_movies))
        .route("/api/v1/movies/{movie_id}", get(movie::get_movie))

        // Slot registry (admin)
        .route("/api/v1/theatres", post(theatre::create_theatre).get(theatre::list_theatres))
        .route("/api/v1/theatres/{theatre_id}", get(theatre::get_theatre))
        .route("/api/v1/theatres/{theatre_id}/assign-movies", patch(theatre::assign_movies))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
