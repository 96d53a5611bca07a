use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::{NewRider, Rider};
use crate::error::ApiError;
use crate::models::{AccountStatus, LocationStatus};
use crate::validation::{self, non_blank};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRiderRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(alias = "DateofBirth")]
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub location_status: Option<LocationStatus>,
}

impl CreateRiderRequest {
    pub fn validate(self) -> Result<NewRider, ApiError> {
        validation::require(&[
            ("FirstName", self.first_name.as_deref()),
            ("LastName", self.last_name.as_deref()),
            ("DateOfBirth", self.date_of_birth.as_deref()),
            ("Email", self.email.as_deref()),
            ("StreetAddress", self.street_address.as_deref()),
            ("City", self.city.as_deref()),
            ("State", self.state.as_deref()),
            ("ZipCode", self.zip_code.as_deref()),
        ])?;

        let date_of_birth =
            validation::date("DateOfBirth", self.date_of_birth.as_deref().unwrap_or_default())?;
        let email = validation::email(self.email.as_deref().unwrap_or_default())?;

        let field = |v: Option<String>| non_blank(v).unwrap_or_default();
        Ok(NewRider {
            date_of_birth,
            email,
            first_name: field(self.first_name),
            last_name: field(self.last_name),
            phone_number: non_blank(self.phone_number),
            street_address: field(self.street_address),
            city: field(self.city),
            state: field(self.state),
            zip_code: field(self.zip_code),
            location_status: self.location_status.unwrap_or_default(),
        })
    }
}

/// Partial update; blank strings leave a column unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRiderRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(alias = "DateofBirth")]
    pub date_of_birth: Option<String>,
    /// Absent leaves it alone; `null` or `""` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone_number: Option<Option<String>>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub location_status: Option<LocationStatus>,
}

#[derive(Debug, Default)]
pub struct RiderPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub phone_number: Option<Option<String>>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub location_status: Option<LocationStatus>,
}

impl UpdateRiderRequest {
    pub fn validate(self) -> Result<RiderPatch, ApiError> {
        let date_of_birth = match non_blank(self.date_of_birth) {
            Some(raw) => Some(validation::date("DateOfBirth", &raw)?),
            None => None,
        };
        let email = match non_blank(self.email) {
            Some(raw) => Some(validation::email(&raw)?),
            None => None,
        };
        Ok(RiderPatch {
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            date_of_birth,
            phone_number: self.phone_number.map(non_blank),
            email,
            street_address: non_blank(self.street_address),
            city: non_blank(self.city),
            state: non_blank(self.state),
            zip_code: non_blank(self.zip_code),
            location_status: self.location_status,
        })
    }
}

impl RiderPatch {
    pub fn apply(self, rider: &mut Rider) {
        if let Some(v) = self.first_name {
            rider.first_name = v;
        }
        if let Some(v) = self.last_name {
            rider.last_name = v;
        }
        if let Some(v) = self.date_of_birth {
            rider.date_of_birth = v;
        }
        if let Some(v) = self.phone_number {
            rider.phone_number = v;
        }
        if let Some(v) = self.email {
            rider.email = v;
        }
        if let Some(v) = self.street_address {
            rider.street_address = v;
        }
        if let Some(v) = self.city {
            rider.city = v;
        }
        if let Some(v) = self.state {
            rider.state = v;
        }
        if let Some(v) = self.zip_code {
            rider.zip_code = v;
        }
        if let Some(v) = self.location_status {
            rider.location_status = v;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RiderListQuery {
    pub email: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Public part of a freshly registered rider.
#[derive(Debug, Serialize)]
pub struct RiderSummary {
    #[serde(rename = "RiderID")]
    pub rider_id: i32,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

impl From<&Rider> for RiderSummary {
    fn from(r: &Rider) -> Self {
        Self {
            rider_id: r.rider_id,
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            email: r.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RiderCreated {
    pub message: &'static str,
    pub rider: RiderSummary,
}

#[derive(Debug, Serialize)]
pub struct RiderResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub rider: Rider,
}

#[derive(Debug, Serialize)]
pub struct RiderList {
    pub riders: Vec<Rider>,
}
