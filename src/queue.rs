//! Durable, ordered queue of pending quotation requests, backed by a
//! Postgres table. `claim_next` uses `FOR UPDATE SKIP LOCKED` so that a
//! given job is handed to at most one worker at a time, which is what
//! makes the pacing delay hold globally across worker instances.

use sqlx::{types::Json, Acquire, Executor, Pool, Postgres, Row};
use uuid::Uuid;

use crate::entities::{JobResult, JobState, QuoteJob, QuoteRequest};
use crate::error::{not_found_error, Error};

#[derive(Clone, Debug)]
pub struct JobQueue {
    pool: Pool<Postgres>,
}

impl JobQueue {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Appends a request to the queue and returns the job id, which is
    /// also the externally visible `quote_id`.
    #[tracing::instrument(skip(self))]
    pub async fn enqueue(&self, request: QuoteRequest) -> Result<Uuid, Error> {
        let job = QuoteJob::new(request);

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO quote_jobs (id, state, data) VALUES ($1, $2, $3)")
                .bind(&job.id)
                .bind(job.state.name())
                .bind(Json(&job)),
        )
        .await?;

        Ok(job.id)
    }

    /// Claims the oldest waiting job, flipping it to `active` in the same
    /// transaction. Returns `None` when the queue is drained. The row
    /// lock guarantees no two claimants get the same job.
    #[tracing::instrument(skip(self))]
    pub async fn claim_next(&self) -> Result<Option<QuoteJob>, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let maybe_result = tx
            .fetch_optional(sqlx::query(
                "SELECT data FROM quote_jobs WHERE state = 'waiting' ORDER BY position ASC LIMIT 1 FOR UPDATE SKIP LOCKED",
            ))
            .await?;

        let result = match maybe_result {
            Some(result) => result,
            None => return Ok(None),
        };

        let Json(mut job): Json<QuoteJob> = result.try_get("data")?;
        job.state = JobState::Active;

        tx.execute(
            sqlx::query("UPDATE quote_jobs SET state = $2, data = $3 WHERE id = $1")
                .bind(&job.id)
                .bind(job.state.name())
                .bind(Json(&job)),
        )
        .await?;

        tx.commit().await?;

        Ok(Some(job))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_job(&self, id: Uuid) -> Result<Option<QuoteJob>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM quote_jobs WHERE id = $1").bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(job) = result.try_get("data")?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    /// All jobs not yet started, in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn list_waiting(&self) -> Result<Vec<QuoteJob>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query(
                "SELECT data FROM quote_jobs WHERE state = 'waiting' ORDER BY position ASC",
            ))
            .await?;

        let mut jobs = Vec::with_capacity(results.len());
        for result in results.iter() {
            let Json(job) = result.try_get("data")?;
            jobs.push(job);
        }

        Ok(jobs)
    }

    /// 1-indexed rank of the job among jobs not yet completed, in
    /// insertion order. `None` for unknown or already completed jobs.
    /// Used for ETA estimates: position * pacing interval.
    #[tracing::instrument(skip(self))]
    pub async fn queue_position(&self, id: Uuid) -> Result<Option<i64>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query("SELECT position, state FROM quote_jobs WHERE id = $1").bind(&id),
            )
            .await?;

        let result = match maybe_result {
            Some(result) => result,
            None => return Ok(None),
        };

        let state: String = result.try_get("state")?;
        if state == "completed" {
            return Ok(None);
        }

        let position: i64 = result.try_get("position")?;

        let row = conn
            .fetch_one(
                sqlx::query(
                    "SELECT count(*) AS ahead FROM quote_jobs WHERE state IN ('waiting', 'active') AND position <= $1",
                )
                .bind(position),
            )
            .await?;

        Ok(Some(row.try_get("ahead")?))
    }

    /// Writes the result annotation onto the job and marks it completed.
    /// Idempotent when called again with the same result.
    #[tracing::instrument(skip(self))]
    pub async fn complete_job(&self, id: Uuid, job_result: JobResult) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let Json(mut job): Json<QuoteJob> = tx
            .fetch_optional(
                sqlx::query("SELECT data FROM quote_jobs WHERE id = $1 FOR UPDATE").bind(&id),
            )
            .await?
            .ok_or_else(|| not_found_error("job not found"))?
            .try_get("data")?;

        job.result = Some(job_result);
        job.state = JobState::Completed;

        tx.execute(
            sqlx::query("UPDATE quote_jobs SET state = $2, data = $3 WHERE id = $1")
                .bind(&job.id)
                .bind(job.state.name())
                .bind(Json(&job)),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
