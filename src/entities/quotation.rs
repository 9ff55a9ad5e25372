use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{ConsigneeDetails, QuoteRequest, ShipperDetails};
use crate::error::{expired_quote_error, invalid_state_error, Error};

/// How long a quoted price remains bookable after `placed_at`.
pub fn validity_window() -> Duration {
    Duration::hours(1)
}

/// A priced, time-bounded offer for a delivery route. The pending phase
/// of a request is tracked on the queue job; a quotation row only exists
/// once the worker has reached a terminal pricing outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub quote_id: Uuid,
    pub shipper: ShipperDetails,
    pub consignee: ConsigneeDetails,
    pub distance: f64,
    pub price: i64,
    pub status: Status,
    pub placed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Quoted,
    Failed { code: i32, message: String },
    Booked,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Quoted => "QUOTED".into(),
            Self::Failed {
                code: _,
                message: _,
            } => "FAILED".into(),
            Self::Booked => "BOOKED".into(),
        }
    }
}

impl Quotation {
    pub fn quoted(quote_id: Uuid, request: QuoteRequest, distance: f64, price: i64) -> Self {
        Self {
            quote_id,
            shipper: request.shipper,
            consignee: request.consignee,
            distance,
            price,
            status: Status::Quoted,
            placed_at: Utc::now(),
        }
    }

    pub fn failed(
        quote_id: Uuid,
        request: QuoteRequest,
        distance: f64,
        code: i32,
        message: String,
    ) -> Self {
        Self {
            quote_id,
            shipper: request.shipper,
            consignee: request.consignee,
            distance,
            price: 0,
            status: Status::Failed { code, message },
            placed_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.placed_at + validity_window()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    /// Book the quotation. Only a `Quoted` quotation inside its validity
    /// window can be booked; an expired attempt fails and leaves the
    /// status untouched. `Booked` is terminal.
    #[tracing::instrument]
    pub fn book(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.status {
            Status::Quoted => {
                if self.is_expired(now) {
                    return Err(expired_quote_error());
                }

                self.status = Status::Booked;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}
