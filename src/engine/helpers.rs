use super::Database;

use sqlx::{types::Json, Acquire, Executor, Pool, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{Address, Quotation},
    error::Error,
};

/// Resolves an address to its stored id, inserting it when unseen.
/// Dedupe is by exact (country, city, postcode) match.
#[tracing::instrument(skip(tx))]
pub async fn resolve_address(
    tx: &mut Transaction<'_, Database>,
    address: &Address,
) -> Result<Uuid, Error> {
    let maybe_result = tx
        .fetch_optional(
            sqlx::query("SELECT id FROM addresses WHERE country = $1 AND city = $2 AND postcode = $3")
                .bind(&address.country)
                .bind(&address.city)
                .bind(&address.postcode),
        )
        .await?;

    if let Some(result) = maybe_result {
        return Ok(result.try_get("id")?);
    }

    let id = Uuid::new_v4();

    tx.execute(
        sqlx::query("INSERT INTO addresses (id, country, city, postcode) VALUES ($1, $2, $3, $4)")
            .bind(&id)
            .bind(&address.country)
            .bind(&address.city)
            .bind(&address.postcode),
    )
    .await?;

    Ok(id)
}

/// Persists a quotation and its (possibly shared) addresses in one
/// transaction.
#[tracing::instrument(skip(pool, quotation), fields(quote_id = %quotation.quote_id))]
pub async fn persist_quotation(
    pool: &Pool<Database>,
    quotation: &Quotation,
) -> Result<(), Error> {
    let mut conn = pool.acquire().await?;
    let mut tx = conn.begin().await?;

    let shipper_id = resolve_address(&mut tx, &quotation.shipper.address).await?;
    let consignee_id = resolve_address(&mut tx, &quotation.consignee.address).await?;

    tx.execute(
        sqlx::query(
            "INSERT INTO quotations (quote_id, status, shipper_id, consignee_id, data) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&quotation.quote_id)
        .bind(quotation.status.name())
        .bind(&shipper_id)
        .bind(&consignee_id)
        .bind(Json(quotation)),
    )
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Fetches a bookable (`QUOTED`) quotation under a row lock, or `None`
/// when no active quotation exists for the id.
#[tracing::instrument(skip(tx))]
pub async fn fetch_quotation_for_update(
    tx: &mut Transaction<'_, Database>,
    quote_id: &Uuid,
) -> Result<Option<Quotation>, Error> {
    let maybe_result = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM quotations WHERE quote_id = $1 AND status = 'QUOTED' FOR UPDATE")
                .bind(quote_id),
        )
        .await?;

    match maybe_result {
        Some(result) => {
            let Json(quotation) = result.try_get("data")?;
            Ok(Some(quotation))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(tx, quotation), fields(quote_id = %quotation.quote_id))]
pub async fn update_quotation(
    tx: &mut Transaction<'_, Database>,
    quotation: &Quotation,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE quotations SET status = $2, data = $3 WHERE quote_id = $1")
            .bind(&quotation.quote_id)
            .bind(quotation.status.name())
            .bind(Json(quotation)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(pool))]
pub async fn find_quotation(
    pool: &Pool<Database>,
    quote_id: Uuid,
) -> Result<Option<Quotation>, Error> {
    let mut conn = pool.acquire().await?;

    let maybe_result = conn
        .fetch_optional(
            sqlx::query("SELECT data FROM quotations WHERE quote_id = $1").bind(&quote_id),
        )
        .await?;

    match maybe_result {
        Some(result) => {
            let Json(quotation) = result.try_get("data")?;
            Ok(Some(quotation))
        }
        None => Ok(None),
    }
}
