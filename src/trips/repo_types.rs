use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::status::RideStatus;

/// Trip record. Rider and driver are referenced by e-mail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Trip {
    #[serde(rename = "RideID")]
    pub ride_id: i32,
    pub pick_up_location: String,
    pub drop_off_location: String,
    pub estimated_time: i32,
    pub fare: f64,
    pub tip: f64,
    pub ride_status: RideStatus,
    #[serde(rename = "RiderID")]
    pub rider_id: String,
    #[serde(rename = "DriverID")]
    pub driver_id: Option<String>,
    #[serde(rename = "created_at", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updated_at", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub pick_up_location: String,
    pub drop_off_location: String,
    pub estimated_time: i32,
    pub fare: f64,
    pub tip: f64,
    pub rider_id: String,
}

/// Optional filters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripFilter<'a> {
    pub status: Option<RideStatus>,
    pub rider: Option<&'a str>,
    pub driver: Option<&'a str>,
}
