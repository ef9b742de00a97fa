use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Booked,
    Occupied,
    Maintenance,
    Cleaning,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "AVAILABLE",
            RoomStatus::Booked => "BOOKED",
            RoomStatus::Occupied => "OCCUPIED",
            RoomStatus::Maintenance => "MAINTENANCE",
            RoomStatus::Cleaning => "CLEANING",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(RoomStatus::Available),
            "BOOKED" => Ok(RoomStatus::Booked),
            "OCCUPIED" => Ok(RoomStatus::Occupied),
            "MAINTENANCE" => Ok(RoomStatus::Maintenance),
            "CLEANING" => Ok(RoomStatus::Cleaning),
            other => Err(format!("unknown room status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecondaryStatus {
    None,
    Cleaning,
}

impl SecondaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecondaryStatus::None => "NONE",
            SecondaryStatus::Cleaning => "CLEANING",
        }
    }
}

impl FromStr for SecondaryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" | "" => Ok(SecondaryStatus::None),
            "CLEANING" => Ok(SecondaryStatus::Cleaning),
            other => Err(format!("unknown secondary status '{}'", other)),
        }
    }
}

/// Lifecycle state of a room.
///
/// Primary status, housekeeping flag and booking link travel together so that only
/// valid combinations can be built: a booking id exists exactly in `Booked` and
/// `Occupied`, and a room whose primary status is `Cleaning` carries no extra flag.
/// An idle `Available` room that needs cleaning moves to `Cleaning` instead of
/// raising the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomState {
    Available,
    Booked { booking_id: String, cleaning: bool },
    Occupied { booking_id: String, cleaning: bool },
    Maintenance { cleaning: bool },
    Cleaning,
}

impl RoomState {
    pub fn status(&self) -> RoomStatus {
        match self {
            RoomState::Available => RoomStatus::Available,
            RoomState::Booked { .. } => RoomStatus::Booked,
            RoomState::Occupied { .. } => RoomStatus::Occupied,
            RoomState::Maintenance { .. } => RoomStatus::Maintenance,
            RoomState::Cleaning => RoomStatus::Cleaning,
        }
    }

    pub fn secondary_status(&self) -> SecondaryStatus {
        match self {
            RoomState::Booked { cleaning: true, .. }
            | RoomState::Occupied { cleaning: true, .. }
            | RoomState::Maintenance { cleaning: true } => SecondaryStatus::Cleaning,
            _ => SecondaryStatus::None,
        }
    }

    pub fn active_booking(&self) -> Option<&str> {
        match self {
            RoomState::Booked { booking_id, .. } | RoomState::Occupied { booking_id, .. } => Some(booking_id),
            _ => None,
        }
    }

    /// Rebuilds the state from its flat storage columns, rejecting combinations
    /// the lifecycle can never produce.
    pub fn from_parts(
        status: RoomStatus,
        secondary: SecondaryStatus,
        active_booking: Option<String>,
    ) -> Result<Self, String> {
        let cleaning = secondary == SecondaryStatus::Cleaning;
        match (status, active_booking) {
            (RoomStatus::Booked, Some(booking_id)) => Ok(RoomState::Booked { booking_id, cleaning }),
            (RoomStatus::Occupied, Some(booking_id)) => Ok(RoomState::Occupied { booking_id, cleaning }),
            (RoomStatus::Booked | RoomStatus::Occupied, None) => {
                Err(format!("room is {} without an active booking", status))
            }
            (_, Some(_)) => Err(format!("room is {} but still linked to a booking", status)),
            (RoomStatus::Maintenance, None) => Ok(RoomState::Maintenance { cleaning }),
            (RoomStatus::Available | RoomStatus::Cleaning, None) if cleaning => {
                Err(format!("{} room cannot carry the cleaning flag", status))
            }
            (RoomStatus::Available, None) => Ok(RoomState::Available),
            (RoomStatus::Cleaning, None) => Ok(RoomState::Cleaning),
        }
    }
}

/// Button shown for a room, derived only from its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAction {
    pub label: String,
    pub enabled: bool,
}

impl RoomAction {
    pub fn for_state(state: &RoomState) -> Self {
        let (label, enabled) = match state.status() {
            RoomStatus::Available => ("Book Now", true),
            RoomStatus::Booked => ("Check-in", true),
            RoomStatus::Occupied => ("Check-out", true),
            RoomStatus::Maintenance => ("Under Maintenance", false),
            RoomStatus::Cleaning => ("Not Available", false),
        };

        let label = if state.secondary_status() == SecondaryStatus::Cleaning {
            format!("{} (Cleaning in progress)", label)
        } else {
            label.to_string()
        };

        Self { label, enabled }
    }
}

/// Badge text: the primary status, annotated while housekeeping is underway.
pub fn status_text(state: &RoomState) -> String {
    match state.secondary_status() {
        SecondaryStatus::Cleaning => format!("{} (Cleaning)", state.status()),
        SecondaryStatus::None => state.status().to_string(),
    }
}

/// Row shape of the `rooms` table.
#[derive(Debug, FromRow, Clone)]
pub struct RoomRecord {
    pub id: String,
    pub number: String,
    pub room_type: String,
    pub floor: i32,
    pub guests: i32,
    pub price: i64,
    pub status: String,
    pub secondary_status: String,
    pub active_booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub number: String,
    pub room_type: String,
    pub floor: i32,
    pub guests: i32,
    pub price: i64,
    pub state: RoomState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewRoomParams {
    pub number: String,
    pub room_type: String,
    pub floor: i32,
    pub guests: i32,
    pub price: i64,
}

impl Room {
    pub fn new(params: NewRoomParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            number: params.number,
            room_type: params.room_type,
            floor: params.floor,
            guests: params.guests,
            price: params.price,
            state: RoomState::Available,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<RoomRecord> for Room {
    type Error = String;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        let status: RoomStatus = record.status.parse()?;
        let secondary: SecondaryStatus = record.secondary_status.parse()?;
        let state = RoomState::from_parts(status, secondary, record.active_booking_id)
            .map_err(|e| format!("room {}: {}", record.id, e))?;

        Ok(Self {
            id: record.id,
            number: record.number,
            room_type: record.room_type,
            floor: record.floor,
            guests: record.guests,
            price: record.price,
            state,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
