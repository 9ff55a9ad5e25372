//! Deterministic pricing rules for a resolved route distance. Prices are
//! computed in major units (EUR) and converted to minor units (cents)
//! at the end, after any repeat-route discount.

pub const MIN_RANGE_KM: f64 = 3.0;
pub const MAX_RANGE_KM: f64 = 300.0;

/// Discount in major units for a repeat booking of the same route and dates.
pub const ROUTE_DISCOUNT: i64 = 10;

const CENTS_PER_UNIT: i64 = 100;

/// Whether the resolved distance is serviceable. Both bounds are inclusive;
/// only distances strictly outside [3, 300] km are rejected.
pub fn within_operational_range(distance_km: f64) -> bool {
    distance_km >= MIN_RANGE_KM && distance_km <= MAX_RANGE_KM
}

/// Base price in major units for a given distance.
///
/// The 150-250 km tier prices at zero. That is carried over verbatim from
/// the legacy tier table; it looks unintended but is kept for
/// compatibility until the business confirms otherwise.
pub fn base_price(distance_km: f64) -> i64 {
    if distance_km <= 50.0 {
        100
    } else if distance_km <= 150.0 {
        200
    } else if distance_km > 250.0 {
        300
    } else {
        0
    }
}

/// Final price in minor units, with the repeat-route discount applied
/// before the cents conversion.
pub fn quote_price(distance_km: f64, repeat_route: bool) -> i64 {
    let mut price = base_price(distance_km);

    if repeat_route {
        price -= ROUTE_DISCOUNT;
    }

    price * CENTS_PER_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(within_operational_range(3.0));
        assert!(within_operational_range(300.0));
        assert!(within_operational_range(100.0));

        assert!(!within_operational_range(2.9));
        assert!(!within_operational_range(300.1));
        assert!(!within_operational_range(0.0));
    }

    #[test]
    fn base_price_tiers() {
        assert_eq!(base_price(3.0), 100);
        assert_eq!(base_price(50.0), 100);
        assert_eq!(base_price(50.1), 200);
        assert_eq!(base_price(150.0), 200);
        assert_eq!(base_price(250.1), 300);
        assert_eq!(base_price(300.0), 300);
    }

    #[test]
    fn mid_tier_gap_prices_at_zero() {
        // legacy behavior, preserved on purpose
        assert_eq!(base_price(150.1), 0);
        assert_eq!(base_price(200.0), 0);
        assert_eq!(base_price(250.0), 0);
    }

    #[test]
    fn quote_price_converts_to_cents() {
        assert_eq!(quote_price(100.0, false), 20000);
        assert_eq!(quote_price(40.0, false), 10000);
        assert_eq!(quote_price(260.0, false), 30000);
    }

    #[test]
    fn repeat_route_discount_applies_before_conversion() {
        assert_eq!(quote_price(100.0, true), 19000);
        assert_eq!(quote_price(40.0, true), 9000);
    }
}
