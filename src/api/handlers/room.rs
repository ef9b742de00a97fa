use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CreateRoomRequest, QuoteQuery};
use crate::api::dtos::responses::{QuoteView, RoomView};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::room::{NewRoomParams, Room};
use std::sync::Arc;
use serde_json::json;
use tracing::{debug, info};

async fn load_room(state: &AppState, room_id: &str) -> Result<Room, AppError> {
    state.room_repo.find_by_id(room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let room = Room::new(NewRoomParams {
        number: payload.number.trim().to_string(),
        room_type: payload.room_type.trim().to_string(),
        floor: payload.floor,
        guests: payload.guests,
        price: payload.price,
    });
    let created = state.room_repo.create(&room).await?;

    info!(admin_id = %admin.user_id, "Room created: {} ({})", created.number, created.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Room created successfully", "room": RoomView::from(created) })),
    ))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms: Vec<RoomView> = state.room_repo.list().await?
        .iter()
        .map(RoomView::from)
        .collect();

    Ok(Json(json!({ "rooms": rooms })))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = load_room(&state, &room_id).await?;
    Ok(Json(json!({ "room": RoomView::from(room) })))
}

/// Prices a prospective stay with the same date rules the booking path enforces.
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let room = load_room(&state, &room_id).await?;
    let stay = state.lifecycle.plan(&query.check_in, &query.check_out)?;

    Ok(Json(json!({ "quote": QuoteView::new(&room, &stay)? })))
}

pub async fn list_room_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    load_room(&state, &room_id).await?;
    let bookings = state.booking_repo.list_by_room(&room_id).await?;
    debug!(admin_id = %admin.user_id, room_id = %room_id, count = bookings.len(), "Listed room bookings");

    Ok(Json(json!({ "bookings": bookings })))
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.lifecycle.check_in(&room_id).await?;
    Ok(Json(json!({ "message": "Guest checked in", "room": RoomView::from(room) })))
}

pub async fn check_out(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.lifecycle.check_out(&room_id).await?;
    Ok(Json(json!({ "message": "Guest checked out", "room": RoomView::from(room) })))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.lifecycle.cancel(&room_id).await?;
    Ok(Json(json!({ "message": "Booking cancelled", "room": RoomView::from(room) })))
}

pub async fn start_cleaning(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.lifecycle.start_cleaning(&room_id).await?;
    Ok(Json(json!({ "message": "Cleaning started", "room": RoomView::from(room) })))
}

pub async fn complete_cleaning(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.lifecycle.complete_cleaning(&room_id).await?;
    Ok(Json(json!({ "message": "Cleaning completed", "room": RoomView::from(room) })))
}
