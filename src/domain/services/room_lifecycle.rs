use std::sync::Arc;
use chrono_tz::Tz;
use tracing::{info, warn};
use crate::domain::models::booking::{Booking, BookingStatus, GuestDetails, NewBookingParams};
use crate::domain::models::room::{Room, RoomState};
use crate::domain::ports::{BookingRepository, RoomRepository, RoomTransition, UserRepository};
use crate::domain::services::stay::{plan_stay, today_in, Stay};
use crate::error::AppError;

pub fn book(state: &RoomState, booking_id: &str) -> Result<RoomState, AppError> {
    match state {
        RoomState::Available => Ok(RoomState::Booked { booking_id: booking_id.to_string(), cleaning: false }),
        other => Err(AppError::NotFound(format!("Room is not available (status {})", other.status()))),
    }
}

pub fn check_in(state: &RoomState) -> Result<RoomState, AppError> {
    match state {
        RoomState::Booked { booking_id, cleaning } => Ok(RoomState::Occupied {
            booking_id: booking_id.clone(),
            cleaning: *cleaning,
        }),
        other => Err(AppError::InvalidState(format!("Cannot check in: room is {}", other.status()))),
    }
}

/// A guest leaving mid-clean hands the room to housekeeping instead of dropping the flag.
pub fn check_out(state: &RoomState) -> Result<RoomState, AppError> {
    match state {
        RoomState::Occupied { cleaning: false, .. } => Ok(RoomState::Available),
        RoomState::Occupied { cleaning: true, .. } => Ok(RoomState::Cleaning),
        other => Err(AppError::InvalidState(format!("Cannot check out: room is {}", other.status()))),
    }
}

pub fn cancel(state: &RoomState) -> Result<RoomState, AppError> {
    match state {
        RoomState::Booked { .. } | RoomState::Occupied { .. } => Ok(RoomState::Available),
        other => Err(AppError::InvalidState(format!("No active booking to cancel: room is {}", other.status()))),
    }
}

pub fn start_cleaning(state: &RoomState) -> RoomState {
    match state {
        RoomState::Available | RoomState::Cleaning => RoomState::Cleaning,
        RoomState::Booked { booking_id, .. } => RoomState::Booked { booking_id: booking_id.clone(), cleaning: true },
        RoomState::Occupied { booking_id, .. } => RoomState::Occupied { booking_id: booking_id.clone(), cleaning: true },
        RoomState::Maintenance { .. } => RoomState::Maintenance { cleaning: true },
    }
}

pub fn complete_cleaning(state: &RoomState) -> RoomState {
    match state {
        RoomState::Available | RoomState::Cleaning => RoomState::Available,
        RoomState::Booked { booking_id, .. } => RoomState::Booked { booking_id: booking_id.clone(), cleaning: false },
        RoomState::Occupied { booking_id, .. } => RoomState::Occupied { booking_id: booking_id.clone(), cleaning: false },
        RoomState::Maintenance { .. } => RoomState::Maintenance { cleaning: false },
    }
}

pub struct BookingRequest {
    pub room_id: String,
    pub customer_id: String,
    pub check_in: String,
    pub check_out: String,
    pub guest_details: GuestDetails,
}

fn validate_guest_details(guest: &GuestDetails) -> Result<(), AppError> {
    if guest.first_name.trim().is_empty() || guest.last_name.trim().is_empty() {
        return Err(AppError::Validation("Please enter guest details".into()));
    }
    if guest.adults < 1 {
        return Err(AppError::Validation("At least one adult is required".into()));
    }
    if guest.children < 0 {
        return Err(AppError::Validation("Children cannot be negative".into()));
    }
    Ok(())
}

/// Runs room transitions against the store. Every write is conditional on the state
/// the decision was made from; losing that race surfaces as `Conflict`.
pub struct RoomLifecycleService {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
    timezone: Tz,
}

impl RoomLifecycleService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        timezone: Tz,
    ) -> Self {
        Self { rooms, bookings, users, timezone }
    }

    pub fn plan(&self, check_in: &str, check_out: &str) -> Result<Stay, AppError> {
        plan_stay(check_in, check_out, self.timezone, today_in(self.timezone))
    }

    async fn load(&self, room_id: &str) -> Result<Room, AppError> {
        self.rooms.find_by_id(room_id).await?
            .ok_or(AppError::NotFound("Room not found".into()))
    }

    pub async fn book(&self, request: BookingRequest) -> Result<(Booking, Room), AppError> {
        validate_guest_details(&request.guest_details)?;
        let stay = self.plan(&request.check_in, &request.check_out)?;

        let room = self.load(&request.room_id).await?;

        if self.users.find_by_id(&request.customer_id).await?.is_none() {
            return Err(AppError::NotFound("Customer not found".into()));
        }

        let booking = Booking::new(NewBookingParams {
            room_id: room.id.clone(),
            customer_id: request.customer_id,
            check_in: stay.check_in,
            check_out: stay.check_out,
            nights: stay.nights,
            nightly_price: room.price,
            guest_details: request.guest_details,
        })?;

        let next = book(&room.state, &booking.id)?;
        let (created, updated_room) = self.bookings.create_for_room(&booking, &room.state, &next).await?;

        info!(room_id = %updated_room.id, booking_id = %created.id, nights = created.nights, "Room booked");
        Ok((created, updated_room))
    }

    pub async fn check_in(&self, room_id: &str) -> Result<Room, AppError> {
        let room = self.load(room_id).await?;
        let next = check_in(&room.state)?;
        let booking = room.state.active_booking().map(|id| (id, BookingStatus::CheckedIn));
        let updated = self.commit(&room, &next, booking).await?;
        info!(room_id = %room.id, "Guest checked in");
        Ok(updated)
    }

    pub async fn check_out(&self, room_id: &str) -> Result<Room, AppError> {
        let room = self.load(room_id).await?;
        let next = check_out(&room.state)?;
        let booking = room.state.active_booking().map(|id| (id, BookingStatus::Completed));
        let updated = self.commit(&room, &next, booking).await?;
        info!(room_id = %room.id, status = %updated.state.status(), "Guest checked out");
        Ok(updated)
    }

    pub async fn cancel(&self, room_id: &str) -> Result<Room, AppError> {
        let room = self.load(room_id).await?;
        let next = cancel(&room.state)?;
        let booking = room.state.active_booking().map(|id| (id, BookingStatus::Cancelled));
        let updated = self.commit(&room, &next, booking).await?;
        info!(room_id = %room.id, "Booking cancelled");
        Ok(updated)
    }

    pub async fn start_cleaning(&self, room_id: &str) -> Result<Room, AppError> {
        let room = self.load(room_id).await?;
        let next = start_cleaning(&room.state);
        if next == room.state {
            return Ok(room);
        }
        let updated = self.commit(&room, &next, None).await?;
        info!(room_id = %room.id, status = %updated.state.status(), "Room cleaning started");
        Ok(updated)
    }

    pub async fn complete_cleaning(&self, room_id: &str) -> Result<Room, AppError> {
        let room = self.load(room_id).await?;
        let next = complete_cleaning(&room.state);
        if next == room.state {
            return Ok(room);
        }
        let updated = self.commit(&room, &next, None).await?;
        info!(room_id = %room.id, status = %updated.state.status(), "Room cleaning completed");
        Ok(updated)
    }

    async fn commit(
        &self,
        room: &Room,
        next: &RoomState,
        booking_status: Option<(&str, BookingStatus)>,
    ) -> Result<Room, AppError> {
        let transition = RoomTransition {
            room_id: &room.id,
            expected: &room.state,
            next,
            booking_status,
        };

        match self.rooms.apply_transition(&transition).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!(room_id = %room.id, "Room changed before the transition was written");
                Err(AppError::Conflict("Room was modified by another request, please retry".into()))
            }
        }
    }
}
