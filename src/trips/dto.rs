use serde::{Deserialize, Serialize};

use super::repo_types::{NewTrip, Trip};
use super::status::RideStatus;
use crate::error::ApiError;
use crate::validation::{self, non_blank};

/// New trip as sent by the rider page. Any `RideStatus`/`DriverID` is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTripRequest {
    pub pick_up_location: Option<String>,
    pub drop_off_location: Option<String>,
    pub estimated_time: Option<f64>,
    pub fare: Option<f64>,
    pub tip: Option<f64>,
    #[serde(rename = "RiderID")]
    pub rider_id: Option<String>,
}

impl CreateTripRequest {
    pub fn validate(self) -> Result<NewTrip, ApiError> {
        validation::require(&[
            ("PickUpLocation", self.pick_up_location.as_deref()),
            ("DropOffLocation", self.drop_off_location.as_deref()),
            ("RiderID", self.rider_id.as_deref()),
        ])?;
        Ok(NewTrip {
            estimated_time: validation::minutes(
                "EstimatedTime",
                self.estimated_time.unwrap_or_default(),
            )?,
            fare: validation::amount("Fare", self.fare.unwrap_or_default())?,
            tip: validation::amount("Tip", self.tip.unwrap_or_default())?,
            rider_id: validation::email(self.rider_id.as_deref().unwrap_or_default())?,
            pick_up_location: non_blank(self.pick_up_location).unwrap_or_default(),
            drop_off_location: non_blank(self.drop_off_location).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTripRequest {
    pub pick_up_location: Option<String>,
    pub drop_off_location: Option<String>,
    pub estimated_time: Option<f64>,
    pub fare: Option<f64>,
    pub tip: Option<f64>,
}

#[derive(Debug, Default, PartialEq)]
pub struct TripPatch {
    pub pick_up_location: Option<String>,
    pub drop_off_location: Option<String>,
    pub estimated_time: Option<i32>,
    pub fare: Option<f64>,
    pub tip: Option<f64>,
}

impl UpdateTripRequest {
    pub fn validate(self) -> Result<TripPatch, ApiError> {
        Ok(TripPatch {
            pick_up_location: non_blank(self.pick_up_location),
            drop_off_location: non_blank(self.drop_off_location),
            estimated_time: self
                .estimated_time
                .map(|v| validation::minutes("EstimatedTime", v))
                .transpose()?,
            fare: self
                .fare
                .map(|v| validation::amount("Fare", v))
                .transpose()?,
            tip: self.tip.map(|v| validation::amount("Tip", v)).transpose()?,
        })
    }
}

impl TripPatch {
    /// Locations are fixed once a driver is on the way; finished trips only take a tip.
    pub fn apply(self, trip: &mut Trip) -> Result<(), ApiError> {
        let moves_route = self.pick_up_location.is_some() || self.drop_off_location.is_some();
        if moves_route && trip.ride_status != RideStatus::Requested {
            return Err(ApiError::bad_request(
                "Locations can only change while the trip is requested",
            ));
        }
        let reprices = self.fare.is_some() || self.estimated_time.is_some();
        if reprices && trip.ride_status.is_terminal() {
            return Err(ApiError::bad_request(format!(
                "Only the tip can change on a {} trip",
                trip.ride_status
            )));
        }

        if let Some(v) = self.pick_up_location {
            trip.pick_up_location = v;
        }
        if let Some(v) = self.drop_off_location {
            trip.drop_off_location = v;
        }
        if let Some(v) = self.estimated_time {
            trip.estimated_time = v;
        }
        if let Some(v) = self.fare {
            trip.fare = v;
        }
        if let Some(v) = self.tip {
            trip.tip = v;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct AcceptTripRequest {
    #[serde(rename = "DriverID", alias = "driver_id")]
    pub driver_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TripListQuery {
    pub rider: Option<String>,
    pub driver: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub trip: Trip,
}

#[derive(Debug, Serialize)]
pub struct TripList {
    pub trips: Vec<Trip>,
}
