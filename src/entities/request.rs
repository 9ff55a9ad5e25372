use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Address;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipperDetails {
    pub address: Address,
    pub pickup_on: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsigneeDetails {
    pub address: Address,
    pub deliver_on: NaiveDate,
}

/// A validated quotation request as submitted by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub shipper: ShipperDetails,
    pub consignee: ConsigneeDetails,
}
