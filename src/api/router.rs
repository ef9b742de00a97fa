use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, health, room, user};
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

        // Auth
        .route("/auth/join", post(auth::join))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))

        // Admin
        .route("/users", get(user::list_users))

        // Rooms
        .route("/rooms", get(room::list_rooms).post(room::create_room))
        .route("/rooms/{room_id}", get(room::get_room))
        .route("/rooms/{room_id}/quote", get(room::quote))
        .route("/rooms/{room_id}/bookings", get(room::list_room_bookings))

        // Room lifecycle
        .route("/rooms/{room_id}/checkin", post(room::check_in))
        .route("/rooms/{room_id}/checkout", post(room::check_out))
        .route("/rooms/{room_id}/cancel", post(room::cancel))
        .route("/rooms/{room_id}/cleaning", post(room::start_cleaning).delete(room::complete_cleaning))

        // Bookings
        .route("/bookings", get(booking::list_my_bookings).post(booking::create_booking))
        .route("/bookings/{booking_id}", get(booking::get_booking))

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