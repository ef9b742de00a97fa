use crate::domain::{
    models::room::{Room, RoomRecord, RoomState},
    ports::{RoomRepository, RoomTransition},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

pub struct PostgresRoomRepo {
    pool: PgPool,
}

impl PostgresRoomRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn into_room(record: RoomRecord) -> Result<Room, AppError> {
    Room::try_from(record).map_err(AppError::InternalWithMsg)
}

/// Moves a room from `expected` to `next` only if it is still in `expected`.
pub(crate) async fn swap_room_state(
    conn: &mut PgConnection,
    room_id: &str,
    expected: &RoomState,
    next: &RoomState,
) -> Result<Option<RoomRecord>, AppError> {
    sqlx::query_as::<_, RoomRecord>(
        "UPDATE rooms SET status = $1, secondary_status = $2, active_booking_id = $3, updated_at = $4
         WHERE id = $5 AND status = $6 AND secondary_status = $7 AND active_booking_id IS NOT DISTINCT FROM $8
         RETURNING *"
    )
        .bind(next.status().as_str())
        .bind(next.secondary_status().as_str())
        .bind(next.active_booking())
        .bind(Utc::now())
        .bind(room_id)
        .bind(expected.status().as_str())
        .bind(expected.secondary_status().as_str())
        .bind(expected.active_booking())
        .fetch_optional(conn)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl RoomRepository for PostgresRoomRepo {
    async fn create(&self, room: &Room) -> Result<Room, AppError> {
        let record = sqlx::query_as::<_, RoomRecord>(
            "INSERT INTO rooms (id, number, room_type, floor, guests, price, status, secondary_status, active_booking_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&room.id).bind(&room.number).bind(&room.room_type).bind(room.floor)
            .bind(room.guests).bind(room.price)
            .bind(room.state.status().as_str()).bind(room.state.secondary_status().as_str())
            .bind(room.state.active_booking())
            .bind(room.created_at).bind(room.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        into_room(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, RoomRecord>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(into_room)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, RoomRecord>("SELECT * FROM rooms ORDER BY floor ASC, number ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?
            .into_iter()
            .map(into_room)
            .collect()
    }

    async fn apply_transition(&self, transition: &RoomTransition<'_>) -> Result<Option<Room>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let Some(record) = swap_room_state(&mut tx, transition.room_id, transition.expected, transition.next).await? else {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(None);
        };

        if let Some((booking_id, status)) = transition.booking_status {
            sqlx::query("UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(status.as_str())
                .bind(Utc::now())
                .bind(booking_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        into_room(record).map(Some)
    }
}
