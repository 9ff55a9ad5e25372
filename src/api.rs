use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Quotation, QuoteRequest};
use crate::error::Error;

/// Client-facing view of a quotation request's progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Pending {
        quote_id: Uuid,
        eta_seconds: i64,
    },
    Quoted {
        quote_id: Uuid,
        distance: f64,
        price: i64,
        quote_expiry: DateTime<Utc>,
    },
    Failed {
        quote_id: Uuid,
        code: i32,
        message: String,
        distance: f64,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub quote_id: Uuid,
    pub status: String,
    pub message: String,
}

#[async_trait]
pub trait QuoteAPI {
    /// Validates and enqueues a quotation request; returns the pending
    /// status carrying the `quote_id` the client will poll with.
    async fn submit_quote_request(&self, request: QuoteRequest) -> Result<QuoteStatus, Error>;

    async fn poll_quote(&self, quote_id: Uuid) -> Result<QuoteStatus, Error>;
}

#[async_trait]
pub trait OrderAPI {
    /// Converts an unexpired `QUOTED` quotation into a booked order.
    async fn book_quote(&self, quote_id: Uuid) -> Result<BookingConfirmation, Error>;

    /// Returns the stored quotation in whatever state it is in; reading
    /// never forces expiry.
    async fn find_order(&self, quote_id: Uuid) -> Result<Quotation, Error>;
}

pub trait API: QuoteAPI + OrderAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
