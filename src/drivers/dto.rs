use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::{Driver, NewDriver};
use crate::error::ApiError;
use crate::models::AccountStatus;
use crate::validation::{self, non_blank};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDriverRequest {
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
    pub status: Option<AccountStatus>,
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
}

impl CreateDriverRequest {
    pub fn validate(self) -> Result<NewDriver, ApiError> {
        validation::require(&[
            ("FirstName", self.first_name.as_deref()),
            ("LastName", self.last_name.as_deref()),
            ("DateOfBirth", self.date_of_birth.as_deref()),
            ("Email", self.email.as_deref()),
        ])?;
        let date_of_birth =
            validation::date("DateOfBirth", self.date_of_birth.as_deref().unwrap_or_default())?;
        let email = validation::email(self.email.as_deref().unwrap_or_default())?;

        Ok(NewDriver {
            first_name: non_blank(self.first_name).unwrap_or_default(),
            last_name: non_blank(self.last_name).unwrap_or_default(),
            date_of_birth,
            phone_number: non_blank(self.phone_number),
            email,
            street_address: non_blank(self.street_address),
            city: non_blank(self.city),
            state: non_blank(self.state),
            zip_code: non_blank(self.zip_code),
            status: self.status.unwrap_or(AccountStatus::Active),
            license_number: non_blank(self.license_number),
            insurance_id: self.insurance_id,
            bank_id: self.bank_id,
            vehicle_id: self.vehicle_id,
            vehicle_color: non_blank(self.vehicle_color),
            vehicle_make: non_blank(self.vehicle_make),
            vehicle_model: non_blank(self.vehicle_model),
            vehicle_license_plate: non_blank(self.vehicle_license_plate),
        })
    }
}

/// Partial update. Required columns ignore blanks; optional columns are
/// cleared by `null` or `""` and left alone when absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDriverRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(alias = "DateofBirth")]
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub street_address: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub state: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub license_number: Option<Option<String>>,
    #[serde(rename = "InsuranceID", default, with = "::serde_with::rust::double_option")]
    pub insurance_id: Option<Option<i32>>,
    #[serde(rename = "BankID", default, with = "::serde_with::rust::double_option")]
    pub bank_id: Option<Option<i32>>,
    #[serde(rename = "VehicleID", default, with = "::serde_with::rust::double_option")]
    pub vehicle_id: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub vehicle_color: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub vehicle_make: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub vehicle_model: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub vehicle_license_plate: Option<Option<String>>,
}

#[derive(Debug, Default)]
pub struct DriverPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub email: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub street_address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
    pub license_number: Option<Option<String>>,
    pub insurance_id: Option<Option<i32>>,
    pub bank_id: Option<Option<i32>>,
    pub vehicle_id: Option<Option<i32>>,
    pub vehicle_color: Option<Option<String>>,
    pub vehicle_make: Option<Option<String>>,
    pub vehicle_model: Option<Option<String>>,
    pub vehicle_license_plate: Option<Option<String>>,
}

fn clearable(v: Option<Option<String>>) -> Option<Option<String>> {
    v.map(non_blank)
}

impl UpdateDriverRequest {
    pub fn validate(self) -> Result<DriverPatch, ApiError> {
        let date_of_birth = match non_blank(self.date_of_birth) {
            Some(raw) => Some(validation::date("DateOfBirth", &raw)?),
            None => None,
        };
        let email = match non_blank(self.email) {
            Some(raw) => Some(validation::email(&raw)?),
            None => None,
        };
        Ok(DriverPatch {
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            date_of_birth,
            email,
            phone_number: clearable(self.phone_number),
            street_address: clearable(self.street_address),
            city: clearable(self.city),
            state: clearable(self.state),
            zip_code: clearable(self.zip_code),
            license_number: clearable(self.license_number),
            insurance_id: self.insurance_id,
            bank_id: self.bank_id,
            vehicle_id: self.vehicle_id,
            vehicle_color: clearable(self.vehicle_color),
            vehicle_make: clearable(self.vehicle_make),
            vehicle_model: clearable(self.vehicle_model),
            vehicle_license_plate: clearable(self.vehicle_license_plate),
        })
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl DriverPatch {
    pub fn apply(self, d: &mut Driver) {
        set(&mut d.first_name, self.first_name);
        set(&mut d.last_name, self.last_name);
        set(&mut d.date_of_birth, self.date_of_birth);
        set(&mut d.email, self.email);
        set(&mut d.phone_number, self.phone_number);
        set(&mut d.street_address, self.street_address);
        set(&mut d.city, self.city);
        set(&mut d.state, self.state);
        set(&mut d.zip_code, self.zip_code);
        set(&mut d.license_number, self.license_number);
        set(&mut d.insurance_id, self.insurance_id);
        set(&mut d.bank_id, self.bank_id);
        set(&mut d.vehicle_id, self.vehicle_id);
        set(&mut d.vehicle_color, self.vehicle_color);
        set(&mut d.vehicle_make, self.vehicle_make);
        set(&mut d.vehicle_model, self.vehicle_model);
        set(&mut d.vehicle_license_plate, self.vehicle_license_plate);
    }
}

#[derive(Debug, Deserialize)]
pub struct DriverListQuery {
    pub email: Option<String>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub struct DriverResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub driver: Driver,
}

#[derive(Debug, Serialize)]
pub struct DriverList {
    pub drivers: Vec<Driver>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    fn stored() -> Driver {
        Driver {
            driver_id: 9,
            first_name: "Bo".into(),
            last_name: "Diaz".into(),
            date_of_birth: date!(1985-11-02),
            phone_number: None,
            email: "bo@example.com".into(),
            street_address: Some("2 Elm St".into()),
            city: Some("Springfield".into()),
            state: None,
            zip_code: None,
            status: AccountStatus::Active,
            license_number: Some("D123".into()),
            insurance_id: Some(4),
            bank_id: None,
            vehicle_id: Some(12),
            vehicle_color: Some("Blue".into()),
            vehicle_make: Some("Toyota".into()),
            vehicle_model: Some("Prius".into()),
            vehicle_license_plate: Some("ABC-123".into()),
            created_at: datetime!(2024-02-01 12:00 UTC),
            updated_at: datetime!(2024-02-01 12:00 UTC),
        }
    }

    #[test]
    fn create_requires_identity_fields_only() {
        let new: NewDriver = serde_json::from_value::<CreateDriverRequest>(json!({
            "FirstName": "Bo",
            "LastName": "Diaz",
            "DateOfBirth": "1985-11-02",
            "Email": "BO@example.com",
            "Status": null,
            "InsuranceID": null,
            "VehicleMake": ""
        }))
        .unwrap()
        .validate()
        .expect("valid driver");
        assert_eq!(new.email, "bo@example.com");
        assert_eq!(new.status, AccountStatus::Active);
        assert_eq!(new.vehicle_make, None);

        let err = CreateDriverRequest::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: FirstName, LastName, DateOfBirth, Email"
        );
    }

    #[test]
    fn form_resubmission_clears_nulled_columns() {
        let req: UpdateDriverRequest = serde_json::from_value(json!({
            "FirstName": "Bob",
            "City": null,
            "VehicleColor": "",
            "BankID": 77,
            "InsuranceID": null,
            "Status": "Inactive"
        }))
        .unwrap();
        let mut d = stored();
        req.validate().unwrap().apply(&mut d);
        assert_eq!(d.first_name, "Bob");
        assert_eq!(d.city, None);
        assert_eq!(d.vehicle_color, None);
        assert_eq!(d.bank_id, Some(77));
        assert_eq!(d.insurance_id, None);
        // untouched
        assert_eq!(d.vehicle_make.as_deref(), Some("Toyota"));
        assert_eq!(d.street_address.as_deref(), Some("2 Elm St"));
        assert!(d.is_active());
    }

    #[test]
    fn driver_serializes_with_client_field_names() {
        let v = serde_json::to_value(stored()).unwrap();
        assert_eq!(v["DriverID"], 9);
        assert_eq!(v["InsuranceID"], 4);
        assert_eq!(v["VehicleLicensePlate"], "ABC-123");
        assert_eq!(v["Status"], "Active");
        assert_eq!(v["DateOfBirth"], "1985-11-02");
        assert_eq!(v["created_at"], "2024-02-01T12:00:00Z");
    }
}
