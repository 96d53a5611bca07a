use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{NewRider, Rider};
use crate::models::AccountStatus;

const RIDER_COLUMNS: &str = "rider_id, first_name, last_name, date_of_birth, phone_number, \
     email, street_address, city, state, zip_code, location_status, rider_status, \
     signup_date, updated_at";

impl Rider {
    pub async fn find_by_id(db: &PgPool, rider_id: i32) -> anyhow::Result<Option<Rider>> {
        let sql = format!("SELECT {RIDER_COLUMNS} FROM riders WHERE rider_id = $1");
        let rider = sqlx::query_as::<_, Rider>(&sql)
            .bind(rider_id)
            .fetch_optional(db)
            .await
            .context("find rider by id")?;
        Ok(rider)
    }

    /// Case-insensitive lookup; e-mails are unique per table.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Rider>> {
        let sql = format!("SELECT {RIDER_COLUMNS} FROM riders WHERE lower(email) = lower($1)");
        let rider = sqlx::query_as::<_, Rider>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
            .context("find rider by email")?;
        Ok(rider)
    }

    pub async fn list(
        db: &PgPool,
        email: Option<&str>,
        status: Option<AccountStatus>,
    ) -> anyhow::Result<Vec<Rider>> {
        let sql = format!(
            r#"
            SELECT {RIDER_COLUMNS}
              FROM riders
             WHERE ($1::text IS NULL OR lower(email) = lower($1))
               AND ($2::account_status IS NULL OR rider_status = $2)
             ORDER BY rider_id
            "#
        );
        let rows = sqlx::query_as::<_, Rider>(&sql)
            .bind(email)
            .bind(status)
            .fetch_all(db)
            .await
            .context("list riders")?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, new: &NewRider) -> anyhow::Result<Rider> {
        let sql = format!(
            r#"
            INSERT INTO riders (first_name, last_name, date_of_birth, phone_number, email,
                                street_address, city, state, zip_code, location_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RIDER_COLUMNS}
            "#
        );
        let rider = sqlx::query_as::<_, Rider>(&sql)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.date_of_birth)
            .bind(&new.phone_number)
            .bind(&new.email)
            .bind(&new.street_address)
            .bind(&new.city)
            .bind(&new.state)
            .bind(&new.zip_code)
            .bind(new.location_status)
            .fetch_one(db)
            .await
            .context("insert rider")?;
        Ok(rider)
    }

    /// Writes back every editable column of an already-patched record.
    pub async fn save(db: &PgPool, rider: &Rider) -> anyhow::Result<Rider> {
        let sql = format!(
            r#"
            UPDATE riders
               SET first_name = $2, last_name = $3, date_of_birth = $4, phone_number = $5,
                   email = $6, street_address = $7, city = $8, state = $9, zip_code = $10,
                   location_status = $11, updated_at = now()
             WHERE rider_id = $1
            RETURNING {RIDER_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, Rider>(&sql)
            .bind(rider.rider_id)
            .bind(&rider.first_name)
            .bind(&rider.last_name)
            .bind(rider.date_of_birth)
            .bind(&rider.phone_number)
            .bind(&rider.email)
            .bind(&rider.street_address)
            .bind(&rider.city)
            .bind(&rider.state)
            .bind(&rider.zip_code)
            .bind(rider.location_status)
            .fetch_one(db)
            .await
            .context("update rider")?;
        Ok(saved)
    }

    /// Flips an active rider to inactive; `None` when no active row matched.
    pub async fn deactivate(db: &PgPool, rider_id: i32) -> anyhow::Result<Option<Rider>> {
        let sql = format!(
            r#"
            UPDATE riders
               SET rider_status = 'Inactive', updated_at = now()
             WHERE rider_id = $1 AND rider_status = 'Active'
            RETURNING {RIDER_COLUMNS}
            "#
        );
        let rider = sqlx::query_as::<_, Rider>(&sql)
            .bind(rider_id)
            .fetch_optional(db)
            .await
            .context("deactivate rider")?;
        Ok(rider)
    }
}
