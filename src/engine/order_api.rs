use super::helpers::{fetch_quotation_for_update, find_quotation, update_quotation};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Acquire;
use uuid::Uuid;

use crate::{
    api::{BookingConfirmation, OrderAPI},
    entities::Quotation,
    error::{not_found_error, Error},
};

#[async_trait]
impl OrderAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn book_quote(&self, quote_id: Uuid) -> Result<BookingConfirmation, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // the row lock serializes concurrent booking attempts; the loser
        // of a race no longer sees a QUOTED row and gets not-found
        let mut quotation = fetch_quotation_for_update(&mut tx, &quote_id)
            .await?
            .ok_or_else(|| not_found_error("No active quotation found"))?;

        quotation.book(Utc::now())?;

        update_quotation(&mut tx, &quotation).await?;

        tx.commit().await?;

        tracing::info!(quote_id = %quote_id, "quotation booked");

        Ok(BookingConfirmation {
            quote_id,
            status: quotation.status.name(),
            message: "Booking successful.".into(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_order(&self, quote_id: Uuid) -> Result<Quotation, Error> {
        find_quotation(&self.pool, quote_id)
            .await?
            .ok_or_else(|| not_found_error("Order not found"))
    }
}
