mod address;
mod job;
mod quotation;
mod request;

pub use address::Address;
pub use job::{JobResult, JobState, QuoteJob};
pub use quotation::{Quotation, Status};
pub use request::{ConsigneeDetails, QuoteRequest, ShipperDetails};
