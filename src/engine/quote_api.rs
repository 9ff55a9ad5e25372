use super::helpers::find_quotation;
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{QuoteAPI, QuoteStatus},
    entities::{JobResult, QuoteRequest},
    error::{not_found_error, Error},
    validation::validate_quote_request,
    worker::estimated_wait_seconds,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn submit_quote_request(&self, request: QuoteRequest) -> Result<QuoteStatus, Error> {
        validate_quote_request(&request, Utc::now())?;

        let quote_id = self.queue.enqueue(request).await?;
        let position = self.queue.queue_position(quote_id).await?.unwrap_or(1);

        Ok(QuoteStatus::Pending {
            quote_id,
            eta_seconds: estimated_wait_seconds(position),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn poll_quote(&self, quote_id: Uuid) -> Result<QuoteStatus, Error> {
        let job = self
            .queue
            .find_job(quote_id)
            .await?
            .ok_or_else(|| not_found_error("No quotation request found"))?;

        match job.result {
            Some(JobResult::Quoted { quote_id }) => {
                let quotation = find_quotation(&self.pool, quote_id)
                    .await?
                    .ok_or_else(|| not_found_error("Quotation not found"))?;

                Ok(QuoteStatus::Quoted {
                    quote_id,
                    distance: quotation.distance,
                    price: quotation.price,
                    quote_expiry: quotation.expires_at(),
                })
            }
            Some(JobResult::Rejected {
                code,
                message,
                distance,
            }) => Ok(QuoteStatus::Failed {
                quote_id,
                code,
                message,
                distance,
            }),
            None => {
                let position = self.queue.queue_position(quote_id).await?.unwrap_or(1);

                Ok(QuoteStatus::Pending {
                    quote_id,
                    eta_seconds: estimated_wait_seconds(position),
                })
            }
        }
    }
}
