use serde::{Deserialize, Serialize};

/// A postal address, shared between shippers and consignees. Addresses
/// are deduplicated in the store by exact (country, city, postcode) match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub postcode: String,
}
