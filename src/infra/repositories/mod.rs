pub mod sqlite_booking_repo;
pub mod sqlite_room_repo;
pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;

pub mod postgres_booking_repo;
pub mod postgres_room_repo;
pub mod postgres_user_repo;
pub mod postgres_auth_repo;
