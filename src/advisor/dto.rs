use serde::{Deserialize, Serialize};

use super::services::{Estimate, Source};
use crate::error::ApiError;
use crate::validation::{self, non_blank};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeEstimateRequest {
    pub pick_up_location: Option<String>,
    pub drop_off_location: Option<String>,
}

impl TimeEstimateRequest {
    /// Both locations, trimmed.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        validation::require(&[
            ("PickUpLocation", self.pick_up_location.as_deref()),
            ("DropOffLocation", self.drop_off_location.as_deref()),
        ])?;
        Ok((
            non_blank(self.pick_up_location).unwrap_or_default(),
            non_blank(self.drop_off_location).unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TipEstimateRequest {
    pub fare: Option<f64>,
    pub estimated_time: Option<f64>,
}

impl TipEstimateRequest {
    /// Missing values count as zero.
    pub fn validate(self) -> Result<(f64, i32), ApiError> {
        Ok((
            validation::amount("Fare", self.fare.unwrap_or_default())?,
            validation::minutes("EstimatedTime", self.estimated_time.unwrap_or_default())?,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct TimeEstimateResponse {
    #[serde(rename = "EstimatedTime")]
    pub estimated_time: i32,
    pub source: Source,
}

impl From<Estimate<i32>> for TimeEstimateResponse {
    fn from(e: Estimate<i32>) -> Self {
        Self {
            estimated_time: e.value,
            source: e.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TipEstimateResponse {
    #[serde(rename = "Tip")]
    pub tip: f64,
    pub source: Source,
}

impl From<Estimate<f64>> for TipEstimateResponse {
    fn from(e: Estimate<f64>) -> Self {
        Self {
            tip: e.value,
            source: e.source,
        }
    }
}
