use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;
use crate::error::AppError;
use crate::infra::database::Database;
use crate::domain::models::user::{Gender, Role, User};
use crate::domain::ports::{AuthRepository, BookingRepository, RoomRepository, UserRepository};
use crate::domain::services::{
    auth_service::AuthService, avatar::avatar_url, password::hash_password,
    room_lifecycle::RoomLifecycleService,
};
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_room_repo::PostgresRoomRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_room_repo::SqliteRoomRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn build_state(config: &Config, database: &Database) -> AppState {
    let (room_repo, booking_repo, user_repo, auth_repo): (
        Arc<dyn RoomRepository>,
        Arc<dyn BookingRepository>,
        Arc<dyn UserRepository>,
        Arc<dyn AuthRepository>,
    ) = match database {
        Database::Postgres(pool) => (
            Arc::new(PostgresRoomRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool.clone())),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresAuthRepo::new(pool.clone())),
        ),
        Database::Sqlite(pool) => (
            Arc::new(SqliteRoomRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteAuthRepo::new(pool.clone())),
        ),
    };

    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
    let lifecycle = Arc::new(RoomLifecycleService::new(
        room_repo.clone(),
        booking_repo.clone(),
        user_repo.clone(),
        config.hotel_timezone,
    ));

    AppState {
        config: config.clone(),
        room_repo,
        booking_repo,
        user_repo,
        auth_repo,
        auth_service,
        lifecycle,
    }
}

/// Creates the configured admin account on first start. Registration only ever
/// produces guests, so this is the one way an admin comes into existence.
pub async fn seed_admin(state: &AppState) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let mut admin = User::new(
        "Hotel".to_string(),
        "Admin".to_string(),
        Gender::Female,
        email,
        hash_password(password)?,
        avatar_url(&state.config.avatar_base_url, Gender::Female, "Hotel"),
    );
    admin.role = Role::Admin.as_str().to_string();

    let created = state.user_repo.create(&admin).await?;
    info!("Seeded admin user: {}", created.id);
    Ok(())
}
