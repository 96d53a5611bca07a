use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{NewTrip, Trip, TripFilter};
use super::status::{RideStatus, Transition};

// Money is NUMERIC(10,2) in the table and f64 on the wire.
const TRIP_COLUMNS: &str = "ride_id, pick_up_location, drop_off_location, estimated_time, \
     fare::float8 AS fare, tip::float8 AS tip, ride_status, rider_id, driver_id, \
     created_at, updated_at";

impl Trip {
    pub async fn find_by_id(db: &PgPool, ride_id: i32) -> anyhow::Result<Option<Trip>> {
        let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE ride_id = $1");
        let trip = sqlx::query_as::<_, Trip>(&sql)
            .bind(ride_id)
            .fetch_optional(db)
            .await
            .context("find trip by id")?;
        Ok(trip)
    }

    /// Newest first.
    pub async fn list(db: &PgPool, filter: TripFilter<'_>) -> anyhow::Result<Vec<Trip>> {
        let sql = format!(
            r#"
            SELECT {TRIP_COLUMNS}
              FROM trips
             WHERE ($1::ride_status IS NULL OR ride_status = $1)
               AND ($2::text IS NULL OR lower(rider_id) = lower($2))
               AND ($3::text IS NULL OR lower(driver_id) = lower($3))
             ORDER BY created_at DESC, ride_id DESC
            "#
        );
        let rows = sqlx::query_as::<_, Trip>(&sql)
            .bind(filter.status)
            .bind(filter.rider)
            .bind(filter.driver)
            .fetch_all(db)
            .await
            .context("list trips")?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, new: &NewTrip) -> anyhow::Result<Trip> {
        let sql = format!(
            r#"
            INSERT INTO trips (pick_up_location, drop_off_location, estimated_time, fare, tip,
                               ride_status, rider_id)
            VALUES ($1, $2, $3, $4::numeric(10, 2), $5::numeric(10, 2), 'Requested', $6)
            RETURNING {TRIP_COLUMNS}
            "#
        );
        let trip = sqlx::query_as::<_, Trip>(&sql)
            .bind(&new.pick_up_location)
            .bind(&new.drop_off_location)
            .bind(new.estimated_time)
            .bind(new.fare)
            .bind(new.tip)
            .bind(&new.rider_id)
            .fetch_one(db)
            .await
            .context("insert trip")?;
        Ok(trip)
    }

    /// Saves edited fields, provided the status is still `expected`.
    pub async fn save(
        db: &PgPool,
        trip: &Trip,
        expected: RideStatus,
    ) -> anyhow::Result<Option<Trip>> {
        let sql = format!(
            r#"
            UPDATE trips
               SET pick_up_location = $2, drop_off_location = $3, estimated_time = $4,
                   fare = $5::numeric(10, 2), tip = $6::numeric(10, 2), updated_at = now()
             WHERE ride_id = $1 AND ride_status = $7
            RETURNING {TRIP_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, Trip>(&sql)
            .bind(trip.ride_id)
            .bind(&trip.pick_up_location)
            .bind(&trip.drop_off_location)
            .bind(trip.estimated_time)
            .bind(trip.fare)
            .bind(trip.tip)
            .bind(expected)
            .fetch_optional(db)
            .await
            .context("update trip")?;
        Ok(saved)
    }

    /// Applies a status move in one statement so concurrent callers cannot
    /// both win. `None` means the trip was missing or not in a source state.
    pub async fn transition(
        db: &PgPool,
        ride_id: i32,
        transition: Transition,
        driver: Option<&str>,
    ) -> anyhow::Result<Option<Trip>> {
        let sources: Vec<&str> = transition.sources().iter().map(|s| s.as_str()).collect();
        let sql = format!(
            r#"
            UPDATE trips
               SET ride_status = $2, driver_id = COALESCE($3, driver_id), updated_at = now()
             WHERE ride_id = $1 AND ride_status::text = ANY($4)
            RETURNING {TRIP_COLUMNS}
            "#
        );
        let trip = sqlx::query_as::<_, Trip>(&sql)
            .bind(ride_id)
            .bind(transition.target())
            .bind(driver)
            .bind(sources)
            .fetch_optional(db)
            .await
            .with_context(|| format!("{transition:?} trip {ride_id}"))?;
        Ok(trip)
    }
}
