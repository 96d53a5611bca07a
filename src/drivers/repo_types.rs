use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::models::{iso_date, AccountStatus};

/// Driver record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Driver {
    #[serde(rename = "DriverID")]
    pub driver_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub phone_number: Option<String>,
    pub email: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub status: AccountStatus,
    pub license_number: Option<String>,
    #[serde(rename = "InsuranceID")]
    pub insurance_id: Option<i32>,
    #[serde(rename = "BankID")]
    pub bank_id: Option<i32>,
    #[serde(rename = "VehicleID")]
    pub vehicle_id: Option<i32>,
    pub vehicle_color: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_license_plate: Option<String>,
    #[serde(rename = "created_at", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updated_at", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Driver {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Validated input for a new driver.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub phone_number: Option<String>,
    pub email: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub status: AccountStatus,
    pub license_number: Option<String>,
    pub insurance_id: Option<i32>,
    pub bank_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub vehicle_color: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_license_plate: Option<String>,
}
