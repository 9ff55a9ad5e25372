use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::QuoteRequest;

/// The queue-level unit of work wrapping a quotation request. Its id is
/// handed back to the client as the `quote_id`, which lets the client
/// poll before the quotation row exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteJob {
    pub id: Uuid,
    pub state: JobState,
    pub request: QuoteRequest,
    pub result: Option<JobResult>,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Waiting,
    Active,
    Completed,
}

impl JobState {
    pub fn name(&self) -> String {
        match self {
            Self::Waiting => "waiting".into(),
            Self::Active => "active".into(),
            Self::Completed => "completed".into(),
        }
    }
}

/// The annotation the worker writes back onto the job, exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobResult {
    Quoted {
        quote_id: Uuid,
    },
    Rejected {
        code: i32,
        message: String,
        distance: f64,
    },
}

impl QuoteJob {
    pub fn new(request: QuoteRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: JobState::Waiting,
            request,
            result: None,
            enqueued_at: Utc::now(),
        }
    }
}
