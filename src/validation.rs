//! Synchronous request validation, applied before a request is enqueued.
//! A request that fails here never enters the worker pipeline.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::entities::{Address, QuoteRequest};
use crate::error::{validation_error, Error};

const ALLOWED_COUNTRIES: [&str; 9] = ["DE", "DK", "PL", "CZ", "AT", "CH", "FR", "BE", "NL"];

const SAME_DAY_CUTOFF: (u32, u32) = (10, 30);

/// Validates the business rules of a quotation request. `now` is passed
/// in explicitly so that cutoff behavior is testable.
pub fn validate_quote_request(request: &QuoteRequest, now: DateTime<Utc>) -> Result<(), Error> {
    validate_country(&request.shipper.address)?;
    validate_country(&request.consignee.address)?;

    let pickup = request.shipper.pickup_on;
    let pickup_date = pickup.date_naive();

    let gap_days = request
        .consignee
        .deliver_on
        .signed_duration_since(pickup_date)
        .num_days();

    if gap_days < 2 {
        return Err(validation_error(
            "At least 2 days are required between expected pickup and delivery.",
        ));
    }

    if gap_days > 7 {
        return Err(validation_error(
            "At max 7 days are allowed between expected pickup and delivery.",
        ));
    }

    if pickup <= now || pickup.minute() != 0 || pickup.second() != 0 {
        return Err(validation_error(
            "Pickup must be a whole hour and must be in the future.",
        ));
    }

    if matches!(pickup.weekday(), Weekday::Sat | Weekday::Sun) || pickup.hour() >= 18 {
        return Err(validation_error(
            "Pickup time must be before 18:00 on a weekday.",
        ));
    }

    let (cutoff_hour, cutoff_minute) = SAME_DAY_CUTOFF;
    let past_cutoff =
        now.hour() > cutoff_hour || (now.hour() == cutoff_hour && now.minute() >= cutoff_minute);

    if pickup_date == now.date_naive() && past_cutoff {
        return Err(validation_error(
            "Orders placed after 10:30 must have pickup time on the next day or later.",
        ));
    }

    Ok(())
}

fn validate_country(address: &Address) -> Result<(), Error> {
    if address.country.len() != 2 || !ALLOWED_COUNTRIES.contains(&address.country.as_str()) {
        return Err(validation_error(
            "Invalid country code, outside the operated region.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ConsigneeDetails, ShipperDetails};

    fn request(pickup_on: &str, deliver_on: &str) -> QuoteRequest {
        QuoteRequest {
            shipper: ShipperDetails {
                address: Address {
                    country: "DE".into(),
                    city: "Berlin".into(),
                    postcode: "10115".into(),
                },
                pickup_on: pickup_on.parse().unwrap(),
            },
            consignee: ConsigneeDetails {
                address: Address {
                    country: "PL".into(),
                    city: "Slupsk".into(),
                    postcode: "76-200".into(),
                },
                deliver_on: deliver_on.parse().unwrap(),
            },
        }
    }

    fn now() -> DateTime<Utc> {
        // a Wednesday morning, before the same-day cutoff
        "2024-01-24T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn accepts_a_valid_request() {
        let request = request("2024-01-25T08:00:00Z", "2024-01-30");
        validate_quote_request(&request, now()).unwrap();
    }

    #[test]
    fn rejects_unknown_country() {
        let mut request = request("2024-01-25T08:00:00Z", "2024-01-30");
        request.shipper.address.country = "US".into();

        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn rejects_delivery_gap_below_two_days() {
        let request = request("2024-01-25T08:00:00Z", "2024-01-26");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn rejects_delivery_gap_above_seven_days() {
        let request = request("2024-01-25T08:00:00Z", "2024-02-02");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn accepts_gap_boundaries() {
        validate_quote_request(&request("2024-01-25T08:00:00Z", "2024-01-27"), now()).unwrap();
        validate_quote_request(&request("2024-01-25T08:00:00Z", "2024-02-01"), now()).unwrap();
    }

    #[test]
    fn rejects_pickup_in_the_past() {
        let request = request("2024-01-23T08:00:00Z", "2024-01-26");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn rejects_pickup_not_on_a_whole_hour() {
        let request = request("2024-01-25T08:30:00Z", "2024-01-30");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn rejects_weekend_pickup() {
        // 2024-01-27 is a Saturday
        let request = request("2024-01-27T08:00:00Z", "2024-01-31");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn rejects_pickup_after_business_hours() {
        let request = request("2024-01-25T19:00:00Z", "2024-01-30");
        assert!(validate_quote_request(&request, now()).is_err());
    }

    #[test]
    fn same_day_pickup_allowed_before_cutoff() {
        let request = request("2024-01-24T14:00:00Z", "2024-01-29");
        validate_quote_request(&request, now()).unwrap();
    }

    #[test]
    fn same_day_pickup_rejected_after_cutoff() {
        let request = request("2024-01-24T14:00:00Z", "2024-01-29");
        let now = "2024-01-24T10:30:00Z".parse().unwrap();

        assert!(validate_quote_request(&request, now).is_err());
    }

    #[test]
    fn next_day_pickup_allowed_after_cutoff() {
        let request = request("2024-01-25T08:00:00Z", "2024-01-30");
        let now = "2024-01-24T12:00:00Z".parse().unwrap();

        validate_quote_request(&request, now).unwrap();
    }
}
