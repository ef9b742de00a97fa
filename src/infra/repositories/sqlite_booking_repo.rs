use crate::domain::{
    models::{booking::Booking, room::{Room, RoomState}},
    ports::BookingRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_room_repo::{into_room, swap_room_state};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_for_room(&self, booking: &Booking, expected: &RoomState, next: &RoomState) -> Result<(Booking, Room), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, room_id, customer_id, check_in_date, check_out_date, nights, total_cost, first_name, last_name, adults, children, special_requests, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.room_id).bind(&booking.customer_id)
            .bind(booking.check_in_date).bind(booking.check_out_date)
            .bind(booking.nights).bind(booking.total_cost)
            .bind(&booking.guest_details.first_name).bind(&booking.guest_details.last_name)
            .bind(booking.guest_details.adults).bind(booking.guest_details.children)
            .bind(&booking.guest_details.special_requests)
            .bind(&booking.status).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let Some(record) = swap_room_state(&mut tx, &booking.room_id, expected, next).await? else {
            warn!(room_id = %booking.room_id, "Room changed while booking, rolling back");
            tx.rollback().await.map_err(AppError::Database)?;
            return Err(AppError::Conflict("Room is no longer available".into()));
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created, into_room(record)?))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_room(&self, room_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE room_id = ? ORDER BY check_in_date DESC")
            .bind(room_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_id = ? ORDER BY check_in_date DESC")
            .bind(customer_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
