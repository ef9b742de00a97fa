use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::dtos::responses::RoomView;
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::room_lifecycle::BookingRequest;
use std::sync::Arc;
use serde_json::json;
use tracing::warn;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, room) = state.lifecycle.book(BookingRequest {
        room_id: payload.room_id,
        customer_id: user.user_id,
        check_in: payload.check_in_date,
        check_out: payload.check_out_date,
        guest_details: payload.guest_details.into(),
    }).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Room booked successfully",
            "booking": booking,
            "room": RoomView::from(room),
        })),
    ))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.customer_id != user.user_id && !user.is_admin() {
        warn!("User {} tried to read booking {}", user.user_id, booking.id);
        return Err(AppError::Forbidden("Not your booking".into()));
    }

    Ok(Json(json!({ "booking": booking })))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_customer(&user.user_id).await?;
    Ok(Json(json!({ "bookings": bookings })))
}
