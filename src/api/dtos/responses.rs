use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use crate::domain::models::room::{status_text, Room, RoomAction, RoomStatus, SecondaryStatus};
use crate::domain::models::user::User;
use crate::domain::services::stay::{total_cost, Stay};
use crate::error::AppError;

/// Wire shape of a room: the state is flattened back into the three columns the
/// frontend reads, plus the derived badge text and action button.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub floor: i32,
    pub guests: i32,
    pub price: i64,
    pub status: RoomStatus,
    pub secondary_status: SecondaryStatus,
    pub active_booking: Option<String>,
    pub status_text: String,
    pub action: RoomAction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            number: room.number.clone(),
            room_type: room.room_type.clone(),
            floor: room.floor,
            guests: room.guests,
            price: room.price,
            status: room.state.status(),
            secondary_status: room.state.secondary_status(),
            active_booking: room.state.active_booking().map(str::to_string),
            status_text: status_text(&room.state),
            action: RoomAction::for_state(&room.state),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        RoomView::from(&room)
    }
}

/// Account data safe to hand back to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email_address: String,
    pub avatar: String,
    pub role: String,
    pub current_address: Option<String>,
    pub contact_number: Option<String>,
    pub id_type: String,
    pub id_number: Option<String>,
    pub cardholder_name: Option<String>,
    pub card_last4: Option<String>,
    pub billing_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            email_address: user.email_address,
            avatar: user.avatar,
            role: user.role,
            current_address: user.current_address,
            contact_number: user.contact_number,
            id_type: user.id_type,
            id_number: user.id_number,
            cardholder_name: user.cardholder_name,
            card_last4: user.card_last4,
            billing_address: user.billing_address,
            city: user.city,
            postal_code: user.postal_code,
            country: user.country,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub message: String,
    pub csrf_token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub nights: i32,
    pub price: i64,
    pub total_cost: i64,
}

impl QuoteView {
    pub fn new(room: &Room, stay: &Stay) -> Result<Self, AppError> {
        Ok(Self {
            room_id: room.id.clone(),
            check_in: stay.check_in_date,
            check_out: stay.check_out_date,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            nights: stay.nights,
            price: room.price,
            total_cost: total_cost(room.price, stay.nights)?,
        })
    }
}
