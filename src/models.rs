//! Enumerations and serde helpers shared by rider and driver records.

use serde::{Deserialize, Serialize};

// Dates of birth travel as plain `YYYY-MM-DD`.
time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// Soft-delete flag for riders and drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status")]
pub enum AccountStatus {
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "inactive")]
    Inactive,
}

/// Whether a rider currently shares their location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    #[serde(alias = "On")]
    On,
    #[default]
    #[serde(alias = "Off")]
    Off,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_status_accepts_both_casings() {
        let s: AccountStatus = serde_json::from_str(r#""inactive""#).unwrap();
        assert_eq!(s, AccountStatus::Inactive);
        assert_eq!(serde_json::to_string(&AccountStatus::Active).unwrap(), r#""Active""#);
    }

    #[test]
    fn location_status_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&LocationStatus::On).unwrap(), r#""on""#);
        let s: LocationStatus = serde_json::from_str(r#""Off""#).unwrap();
        assert_eq!(s, LocationStatus::Off);
        assert_eq!(LocationStatus::default(), LocationStatus::Off);
    }
}
