use serde::Deserialize;
use crate::domain::models::booking::GuestDetails;
use crate::domain::models::user::{card_last4, Gender, IdType};
use crate::domain::services::password::MIN_PASSWORD_LEN;
use crate::error::AppError;

/// Registration form. Card numbers are reduced to their last four digits before
/// anything is stored; there is no field for a CVV or expiry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub email_address: String,
    pub password: String,
    pub password_confirm: Option<String>,
    pub current_address: Option<String>,
    pub contact_number: Option<String>,
    #[serde(default)]
    pub id_type: IdType,
    pub id_number: Option<String>,
    pub cardholder_name: Option<String>,
    pub card_number: Option<String>,
    pub billing_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl JoinRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::Validation("First and last name are required".into()));
        }
        if !is_email(&self.email_address) {
            return Err(AppError::Validation("Please enter a valid email address".into()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if let Some(confirm) = &self.password_confirm
            && confirm != &self.password
        {
            return Err(AppError::Validation("Passwords do not match".into()));
        }
        Ok(())
    }

    pub fn card_last4(&self) -> Option<String> {
        self.card_number.as_deref().and_then(card_last4)
    }
}

fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

/// Nightly prices are whole currency units; this keeps a decade of nights well inside `i64`.
pub const MAX_ROOM_PRICE: i64 = 1_000_000_000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub floor: i32,
    pub guests: i32,
    pub price: i64,
}

impl CreateRoomRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.number.trim().is_empty() || self.room_type.trim().is_empty() {
            return Err(AppError::Validation("Room number and type are required".into()));
        }
        if self.guests < 1 {
            return Err(AppError::Validation("Room must accommodate at least one guest".into()));
        }
        if self.price < 0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        if self.price > MAX_ROOM_PRICE {
            return Err(AppError::Validation(format!("Price cannot exceed {}", MAX_ROOM_PRICE)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub guest_details: GuestDetailsInput,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetailsInput {
    pub first_name: String,
    pub last_name: String,
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    pub special_requests: Option<String>,
}

impl From<GuestDetailsInput> for GuestDetails {
    fn from(input: GuestDetailsInput) -> Self {
        Self {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            adults: input.adults,
            children: input.children,
            special_requests: input.special_requests.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub check_in: String,
    pub check_out: String,
}
