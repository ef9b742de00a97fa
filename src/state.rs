use std::sync::Arc;
use crate::domain::ports::{AuthRepository, BookingRepository, RoomRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, room_lifecycle::RoomLifecycleService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub room_repo: Arc<dyn RoomRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub lifecycle: Arc<RoomLifecycleService>,
}
