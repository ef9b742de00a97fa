use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, first_name, last_name, gender, email_address, password_hash, avatar, role,
                current_address, contact_number, id_type, id_number, cardholder_name, card_last4,
                billing_address, city, postal_code, country, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING *",
        )
            .bind(&user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.gender)
            .bind(&user.email_address)
            .bind(&user.password_hash)
            .bind(&user.avatar)
            .bind(&user.role)
            .bind(&user.current_address)
            .bind(&user.contact_number)
            .bind(&user.id_type)
            .bind(&user.id_number)
            .bind(&user.cardholder_name)
            .bind(&user.card_last4)
            .bind(&user.billing_address)
            .bind(&user.city)
            .bind(&user.postal_code)
            .bind(&user.country)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email_address = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY last_name ASC, first_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
