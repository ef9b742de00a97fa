use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::services::stay::total_cost;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub adults: i32,
    pub children: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub customer_id: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub nights: i32,
    pub total_cost: i64,
    #[sqlx(flatten)]
    pub guest_details: GuestDetails,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub room_id: String,
    pub customer_id: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub nights: i32,
    pub nightly_price: i64,
    pub guest_details: GuestDetails,
}

impl Booking {
    /// The total is fixed here and never recomputed, even if the room price changes later.
    pub fn new(params: NewBookingParams) -> Result<Self, AppError> {
        let total_cost = total_cost(params.nightly_price, params.nights)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            room_id: params.room_id,
            customer_id: params.customer_id,
            check_in_date: params.check_in,
            check_out_date: params.check_out,
            nights: params.nights,
            total_cost,
            guest_details: params.guest_details,
            status: BookingStatus::Confirmed.as_str().to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}
