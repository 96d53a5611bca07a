use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{Driver, NewDriver};
use crate::models::AccountStatus;

const DRIVER_COLUMNS: &str = "driver_id, first_name, last_name, date_of_birth, phone_number, \
     email, street_address, city, state, zip_code, status, license_number, insurance_id, \
     bank_id, vehicle_id, vehicle_color, vehicle_make, vehicle_model, vehicle_license_plate, \
     created_at, updated_at";

impl Driver {
    pub async fn find_by_id(db: &PgPool, driver_id: i32) -> anyhow::Result<Option<Driver>> {
        let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE driver_id = $1");
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(driver_id)
            .fetch_optional(db)
            .await
            .context("find driver by id")?;
        Ok(driver)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Driver>> {
        let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE lower(email) = lower($1)");
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
            .context("find driver by email")?;
        Ok(driver)
    }

    pub async fn list(
        db: &PgPool,
        email: Option<&str>,
        status: Option<AccountStatus>,
    ) -> anyhow::Result<Vec<Driver>> {
        let sql = format!(
            r#"
            SELECT {DRIVER_COLUMNS}
              FROM drivers
             WHERE ($1::text IS NULL OR lower(email) = lower($1))
               AND ($2::account_status IS NULL OR status = $2)
             ORDER BY driver_id
            "#
        );
        let rows = sqlx::query_as::<_, Driver>(&sql)
            .bind(email)
            .bind(status)
            .fetch_all(db)
            .await
            .context("list drivers")?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, new: &NewDriver) -> anyhow::Result<Driver> {
        let sql = format!(
            r#"
            INSERT INTO drivers (first_name, last_name, date_of_birth, phone_number, email,
                                 street_address, city, state, zip_code, status, license_number,
                                 insurance_id, bank_id, vehicle_id, vehicle_color, vehicle_make,
                                 vehicle_model, vehicle_license_plate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {DRIVER_COLUMNS}
            "#
        );
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.date_of_birth)
            .bind(&new.phone_number)
            .bind(&new.email)
            .bind(&new.street_address)
            .bind(&new.city)
            .bind(&new.state)
            .bind(&new.zip_code)
            .bind(new.status)
            .bind(&new.license_number)
            .bind(new.insurance_id)
            .bind(new.bank_id)
            .bind(new.vehicle_id)
            .bind(&new.vehicle_color)
            .bind(&new.vehicle_make)
            .bind(&new.vehicle_model)
            .bind(&new.vehicle_license_plate)
            .fetch_one(db)
            .await
            .context("insert driver")?;
        Ok(driver)
    }

    /// Writes back every editable column of an already-patched record.
    pub async fn save(db: &PgPool, d: &Driver) -> anyhow::Result<Driver> {
        let sql = format!(
            r#"
            UPDATE drivers
               SET first_name = $2, last_name = $3, date_of_birth = $4, phone_number = $5,
                   email = $6, street_address = $7, city = $8, state = $9, zip_code = $10,
                   license_number = $11, insurance_id = $12, bank_id = $13, vehicle_id = $14,
                   vehicle_color = $15, vehicle_make = $16, vehicle_model = $17,
                   vehicle_license_plate = $18, updated_at = now()
             WHERE driver_id = $1
            RETURNING {DRIVER_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, Driver>(&sql)
            .bind(d.driver_id)
            .bind(&d.first_name)
            .bind(&d.last_name)
            .bind(d.date_of_birth)
            .bind(&d.phone_number)
            .bind(&d.email)
            .bind(&d.street_address)
            .bind(&d.city)
            .bind(&d.state)
            .bind(&d.zip_code)
            .bind(&d.license_number)
            .bind(d.insurance_id)
            .bind(d.bank_id)
            .bind(d.vehicle_id)
            .bind(&d.vehicle_color)
            .bind(&d.vehicle_make)
            .bind(&d.vehicle_model)
            .bind(&d.vehicle_license_plate)
            .fetch_one(db)
            .await
            .context("update driver")?;
        Ok(saved)
    }

    /// Flips an active driver to inactive; `None` when no active row matched.
    pub async fn deactivate(db: &PgPool, driver_id: i32) -> anyhow::Result<Option<Driver>> {
        let sql = format!(
            r#"
            UPDATE drivers
               SET status = 'Inactive', updated_at = now()
             WHERE driver_id = $1 AND status = 'Active'
            RETURNING {DRIVER_COLUMNS}
            "#
        );
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(driver_id)
            .fetch_optional(db)
            .await
            .context("deactivate driver")?;
        Ok(driver)
    }
}
