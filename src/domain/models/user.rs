use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Role::Guest),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IdType {
    #[default]
    #[serde(rename = "National-ID")]
    NationalId,
    #[serde(rename = "Passport")]
    Passport,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::NationalId => "National-ID",
            IdType::Passport => "Passport",
        }
    }
}

/// Persisted user. Raw card numbers, CVVs and expiry dates are never stored;
/// only the last four digits of a submitted card survive registration.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email_address: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
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
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        gender: Gender,
        email_address: String,
        password_hash: String,
        avatar: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            gender: gender.as_str().to_string(),
            email_address,
            password_hash,
            avatar,
            role: Role::Guest.as_str().to_string(),
            current_address: None,
            contact_number: None,
            id_type: IdType::default().as_str().to_string(),
            id_number: None,
            cardholder_name: None,
            card_last4: None,
            billing_address: None,
            city: None,
            postal_code: None,
            country: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Keeps the trailing four digits of a card number, ignoring spaces and dashes.
pub fn card_last4(card_number: &str) -> Option<String> {
    let digits: Vec<char> = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].iter().collect())
}
