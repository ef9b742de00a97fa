use crate::domain::models::{
    auth::RefreshTokenRecord, booking::{Booking, BookingStatus}, room::{Room, RoomState}, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// One conditional room write: applied only while the room is still in `expected`.
/// When `booking_status` is set, the linked booking row is updated in the same transaction.
pub struct RoomTransition<'a> {
    pub room_id: &'a str,
    pub expected: &'a RoomState,
    pub next: &'a RoomState,
    pub booking_status: Option<(&'a str, BookingStatus)>,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn list(&self) -> Result<Vec<Room>, AppError>;
    /// Returns `None` when the room left `expected` before the write landed.
    async fn apply_transition(&self, transition: &RoomTransition<'_>) -> Result<Option<Room>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and moves the room from `expected` to `next` in one transaction.
    /// Fails with `Conflict` (and persists nothing) if the room is no longer in `expected`.
    async fn create_for_room(&self, booking: &Booking, expected: &RoomState, next: &RoomState) -> Result<(Booking, Room), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_room(&self, room_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}
