//! Repeat-route discount cache. A key exists for a route that has already
//! been quoted for the same pickup and delivery dates; entries expire at
//! the end of the pickup day, so the discount incentive resets daily.
//!
//! Cache failures never abort a quotation: callers treat an error as
//! "no discount" and move on.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::{Executor, Pool, Postgres, Row};

use crate::entities::QuoteRequest;
use crate::error::{unexpected_error, Error};

/// Normalized route + dates composite used as the cache key. Owns no
/// business data, only existence with a day-bounded expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(request: &QuoteRequest) -> Self {
        let shipper = &request.shipper;
        let consignee = &request.consignee;

        let key = format!(
            "{}:{}:{}|{}:{}:{}|{}|{}",
            shipper.address.country,
            shipper.address.city,
            shipper.address.postcode,
            consignee.address.country,
            consignee.address.city,
            consignee.address.postcode,
            shipper.pickup_on.date_naive(),
            consignee.deliver_on,
        );

        Self(key.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The last instant of the given calendar day, in UTC.
pub fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>, Error> {
    let end = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| unexpected_error())?;

    Ok(Utc.from_utc_datetime(&end))
}

#[tracing::instrument(skip(pool))]
pub async fn route_exists(pool: &Pool<Postgres>, key: &RouteKey) -> Result<bool, Error> {
    let mut conn = pool.acquire().await?;

    let row = conn
        .fetch_one(
            sqlx::query(
                "SELECT EXISTS(SELECT 1 FROM route_discounts WHERE route_key = $1 AND expires_at > now()) AS known",
            )
            .bind(key.as_str()),
        )
        .await?;

    Ok(row.try_get("known")?)
}

#[tracing::instrument(skip(pool))]
pub async fn record_route(
    pool: &Pool<Postgres>,
    key: &RouteKey,
    pickup_date: NaiveDate,
) -> Result<(), Error> {
    let expires_at = end_of_day(pickup_date)?;

    let mut conn = pool.acquire().await?;

    conn.execute(
        sqlx::query(
            "INSERT INTO route_discounts (route_key, expires_at) VALUES ($1, $2) ON CONFLICT (route_key) DO UPDATE SET expires_at = EXCLUDED.expires_at",
        )
        .bind(key.as_str())
        .bind(expires_at),
    )
    .await?;

    Ok(())
}
