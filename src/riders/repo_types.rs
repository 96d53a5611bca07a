use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::models::{iso_date, AccountStatus, LocationStatus};

/// Rider record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rider {
    #[serde(rename = "RiderID")]
    pub rider_id: i32,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "DateOfBirth", with = "iso_date")]
    pub date_of_birth: Date,
    #[serde(rename = "PhoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "StreetAddress")]
    pub street_address: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "ZipCode")]
    pub zip_code: String,
    #[serde(rename = "LocationStatus")]
    pub location_status: LocationStatus,
    pub rider_status: AccountStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub signup_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Rider {
    pub fn is_active(&self) -> bool {
        self.rider_status == AccountStatus::Active
    }
}

/// Validated input for a new rider.
#[derive(Debug, Clone)]
pub struct NewRider {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub phone_number: Option<String>,
    pub email: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub location_status: LocationStatus,
}
