//! The single logical consumer of the quote job queue. One job at a time,
//! a fixed pacing delay before every claim, so the external distance
//! service sees at most one call per pacing interval.

use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{self, RouteKey};
use crate::engine::helpers::persist_quotation;
use crate::entities::{JobResult, Quotation, QuoteJob};
use crate::error::Error;
use crate::external::distance::DistanceResolver;
use crate::pricing;
use crate::queue::JobQueue;

/// Minimum delay between successive distance-service calls.
pub const PACING_SECONDS: i64 = 12;

const OUT_OF_RANGE_MESSAGE: &str =
    "The distance between the shipper and consignee is not in operational range.";

pub struct QuoteWorker {
    pool: Pool<Postgres>,
    queue: JobQueue,
    resolver: Arc<dyn DistanceResolver>,
    pacing: Duration,
}

impl QuoteWorker {
    pub fn new(pool: Pool<Postgres>, resolver: Arc<dyn DistanceResolver>) -> Self {
        let queue = JobQueue::new(pool.clone());

        Self {
            pool,
            queue,
            resolver,
            pacing: Duration::from_secs(PACING_SECONDS as u64),
        }
    }

    pub async fn run(self) {
        loop {
            // pacing before the claim throttles the aggregate request
            // rate to the distance service
            tokio::time::sleep(self.pacing).await;

            let job = match self.queue.claim_next().await {
                Ok(Some(job)) => job,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(error = ?e, "failed to claim next quote job");
                    continue;
                }
            };

            tracing::info!(job_id = %job.id, "worker processing job");

            if let Err(e) = self.process_job(&job).await {
                // the job keeps no successful annotation; clients keep
                // seeing PENDING until operations steps in
                tracing::error!(job_id = %job.id, error = ?e, "error processing quote job");
            }
        }
    }

    #[tracing::instrument(skip(self, job), fields(job_id = %job.id))]
    async fn process_job(&self, job: &QuoteJob) -> Result<(), Error> {
        let request = &job.request;

        let distance = self
            .resolver
            .resolve(&request.shipper.address, &request.consignee.address)
            .await?;

        if !pricing::within_operational_range(distance) {
            tracing::info!(distance, "distance out of operational range, rejecting");

            let quotation = Quotation::failed(
                job.id,
                request.clone(),
                distance,
                422,
                OUT_OF_RANGE_MESSAGE.into(),
            );
            persist_quotation(&self.pool, &quotation).await?;

            self.queue
                .complete_job(
                    job.id,
                    JobResult::Rejected {
                        code: 422,
                        message: OUT_OF_RANGE_MESSAGE.into(),
                        distance,
                    },
                )
                .await?;

            return Ok(());
        }

        let key = RouteKey::new(request);

        let repeat_route = match cache::route_exists(&self.pool, &key).await {
            Ok(known) => known,
            Err(e) => {
                tracing::warn!(error = ?e, "discount cache unavailable, quoting without discount");
                false
            }
        };

        let price = pricing::quote_price(distance, repeat_route);

        let quotation = Quotation::quoted(job.id, request.clone(), distance, price);
        persist_quotation(&self.pool, &quotation).await?;

        if !repeat_route {
            let pickup_date = request.shipper.pickup_on.date_naive();
            if let Err(e) = cache::record_route(&self.pool, &key, pickup_date).await {
                tracing::warn!(error = ?e, "failed to record route for discount eligibility");
            }
        }

        self.queue
            .complete_job(
                job.id,
                JobResult::Quoted {
                    quote_id: quotation.quote_id,
                },
            )
            .await?;

        tracing::info!(quote_id = %quotation.quote_id, price = quotation.price, "job quoted");

        Ok(())
    }
}

/// ETA reported to a polling client, from its 1-indexed queue position.
pub fn estimated_wait_seconds(queue_position: i64) -> i64 {
    queue_position.max(1) * PACING_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_scales_with_queue_position() {
        assert_eq!(estimated_wait_seconds(1), 12);
        assert_eq!(estimated_wait_seconds(3), 36);
    }

    #[test]
    fn eta_never_reports_zero_wait() {
        assert_eq!(estimated_wait_seconds(0), 12);
    }
}
