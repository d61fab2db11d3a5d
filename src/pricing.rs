//! Delivery price calculation.
//!
//! Everything here is pure: the rate table and the distance outcome are
//! passed in on every call and nothing is read from shared state.

use crate::entities::{DistanceOutcome, PriceQuote, RateTable, Vehicle};

pub const MILES_PER_METER: f64 = 0.000621371;

/// Distance assumed when routing could not measure one.
pub const FALLBACK_MILES: f64 = 25.0;

const LONDON_PREFIXES: [&str; 8] = ["EC", "WC", "E", "SE", "SW", "W", "N", "NW"];

#[derive(Clone, Debug, PartialEq)]
pub struct PricingOutcome {
    pub quote: PriceQuote,
    pub vehicle_override: Option<VehicleOverride>,
}

/// Raised when the requested vehicle may not carry the job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleOverride {
    pub vehicle: Vehicle,
    pub limit_miles: f64,
}

impl VehicleOverride {
    pub fn advisory(&self) -> String {
        format!(
            "Bike deliveries are limited to {} miles. Van selected instead.",
            self.limit_miles
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Miles {
    pub value: f64,
    pub estimated: bool,
}

pub fn resolve_miles(distance: DistanceOutcome) -> Miles {
    let measured = match distance {
        DistanceOutcome::Measured { meters } if meters.is_finite() => meters * MILES_PER_METER,
        _ => 0.0,
    };

    if measured > 0.0 {
        Miles {
            value: measured,
            estimated: false,
        }
    } else {
        Miles {
            value: FALLBACK_MILES,
            estimated: true,
        }
    }
}

/// Leading letters of the outward code, at most two, uppercased.
pub fn outward_prefix(postcode: &str) -> String {
    postcode
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .take(2)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn is_london(postcode: &str) -> bool {
    let prefix = outward_prefix(postcode);

    !prefix.is_empty()
        && LONDON_PREFIXES
            .iter()
            .any(|london| prefix.starts_with(london))
}

pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices one request.
///
/// Multipliers compose in a fixed order (bike floor, urgency, London) and the
/// base is rounded once after all of them. A bike request beyond the bike
/// distance limit is still priced at the bike rate; the returned override
/// tells the caller to re-price it as a van.
pub fn compute_price(
    collection_postcode: &str,
    delivery_postcode: &str,
    vehicle: Vehicle,
    is_urgent: bool,
    distance: DistanceOutcome,
    rates: &RateTable,
) -> PricingOutcome {
    let miles = resolve_miles(distance).value;

    let rate = match vehicle {
        Vehicle::Bike => rates.base_rate_bike_per_mile,
        Vehicle::Van => rates.base_rate_van_per_mile,
    };

    let mut base = miles * rate;
    let mut vehicle_override = None;

    if vehicle == Vehicle::Bike {
        base = base.max(rates.bike_minimum_charge);

        if miles > rates.bike_distance_limit_miles {
            vehicle_override = Some(VehicleOverride {
                vehicle: Vehicle::Van,
                limit_miles: rates.bike_distance_limit_miles,
            });
        }
    }

    if is_urgent {
        base *= rates.urgent_multiplier;
    }

    if is_london(collection_postcode) || is_london(delivery_postcode) {
        base *= rates.london_multiplier;
    }

    let base = round_currency(base);
    let vat = round_currency(base * rates.vat_rate);
    let total = round_currency(base + vat);

    PricingOutcome {
        quote: PriceQuote { base, vat, total },
        vehicle_override,
    }
}

#[cfg(test)]
fn meters(miles: f64) -> DistanceOutcome {
    DistanceOutcome::Measured {
        meters: miles / MILES_PER_METER,
    }
}

#[cfg(test)]
fn is_whole_pence(value: f64) -> bool {
    ((value * 100.0).round() - value * 100.0).abs() < 1e-6
}

#[test]
fn van_baseline_on_fallback_distance() {
    let outcome = compute_price(
        "M1 1AE",
        "B1 1AA",
        Vehicle::Van,
        false,
        DistanceOutcome::Unavailable,
        &RateTable::default(),
    );

    assert_eq!(
        outcome.quote,
        PriceQuote {
            base: 80.00,
            vat: 16.00,
            total: 96.00
        }
    );
    assert_eq!(outcome.vehicle_override, None);
}

#[test]
fn urgent_and_london_compose_in_order() {
    let outcome = compute_price(
        "SW1A 1AA",
        "M1 1AE",
        Vehicle::Van,
        true,
        DistanceOutcome::Unavailable,
        &RateTable::default(),
    );

    assert_eq!(
        outcome.quote,
        PriceQuote {
            base: 144.00,
            vat: 28.80,
            total: 172.80
        }
    );
}

#[test]
fn bike_minimum_charge() {
    let outcome = compute_price(
        "M1 1AE",
        "M2 3BB",
        Vehicle::Bike,
        false,
        meters(1.0),
        &RateTable::default(),
    );

    assert_eq!(
        outcome.quote,
        PriceQuote {
            base: 6.50,
            vat: 1.30,
            total: 7.80
        }
    );
}

#[test]
fn bike_floor_applies_before_multipliers() {
    let rates = RateTable::default();

    for miles in [0.1, 0.5, 1.0, 2.0] {
        let outcome = compute_price(
            "M1",
            "M2",
            Vehicle::Bike,
            false,
            meters(miles),
            &rates,
        );
        assert_eq!(outcome.quote.base, rates.bike_minimum_charge);

        let urgent = compute_price("M1", "M2", Vehicle::Bike, true, meters(miles), &rates);
        assert_eq!(
            urgent.quote.base,
            round_currency(rates.bike_minimum_charge * rates.urgent_multiplier)
        );
    }
}

#[test]
fn zero_distance_matches_fallback_distance() {
    let rates = RateTable::default();

    for vehicle in [Vehicle::Bike, Vehicle::Van] {
        for is_urgent in [false, true] {
            let zero = compute_price(
                "EC1A 1BB",
                "M1",
                vehicle,
                is_urgent,
                DistanceOutcome::Measured { meters: 0.0 },
                &rates,
            );
            let unavailable = compute_price(
                "EC1A 1BB",
                "M1",
                vehicle,
                is_urgent,
                DistanceOutcome::Unavailable,
                &rates,
            );
            let measured = compute_price(
                "EC1A 1BB",
                "M1",
                vehicle,
                is_urgent,
                meters(FALLBACK_MILES),
                &rates,
            );

            assert_eq!(zero.quote.base, measured.quote.base);
            assert_eq!(unavailable.quote.base, measured.quote.base);
        }
    }
}

#[test]
fn bike_over_limit_recommends_van() {
    let rates = RateTable::default();

    let outcome = compute_price("M1", "LS1", Vehicle::Bike, false, meters(40.0), &rates);
    let over = outcome.vehicle_override.unwrap();
    assert_eq!(over.vehicle, Vehicle::Van);
    assert_eq!(over.limit_miles, 30.0);
    assert_eq!(
        over.advisory(),
        "Bike deliveries are limited to 30 miles. Van selected instead."
    );

    let within = compute_price("M1", "LS1", Vehicle::Bike, false, meters(29.0), &rates);
    assert_eq!(within.vehicle_override, None);

    let van = compute_price("M1", "LS1", Vehicle::Van, false, meters(400.0), &rates);
    assert_eq!(van.vehicle_override, None);
}

#[test]
fn london_surcharge_on_either_side() {
    let rates = RateTable::default();
    let price = |collection: &str, delivery: &str| {
        compute_price(
            collection,
            delivery,
            Vehicle::Van,
            false,
            DistanceOutcome::Unavailable,
            &rates,
        )
        .quote
        .base
    };

    assert_eq!(price("M1 1AE", "B1 1AA"), 80.00);
    assert_eq!(price("M1 1AE", "NW1 6XE"), 96.00);
    assert_eq!(price("WC2N 5DU", "B1 1AA"), 96.00);
    assert_eq!(price("E1 6AN", "SE1 9SG"), 96.00);
}

#[test]
fn london_classification() {
    for postcode in ["EC1A 1BB", "wc2n 5du", "E1", "SE1", "SW1A", "W1A", "N1", "NW3"] {
        assert!(is_london(postcode), "{}", postcode);
    }

    for postcode in ["", "   ", "1AA", "M1 1AE", "B33 8TH", "CR0 1XX", "G1", "-"] {
        assert!(!is_london(postcode), "{}", postcode);
    }

    assert_eq!(outward_prefix(" sw1a 1aa"), "SW");
    assert_eq!(outward_prefix("N1"), "N");
}

#[test]
fn vat_identity_and_rounding_closure() {
    let rates = RateTable {
        base_rate_van_per_mile: 3.17,
        base_rate_bike_per_mile: 2.83,
        vat_rate: 0.175,
        ..RateTable::default()
    };

    for miles in [0.3, 1.7, 3.33, 9.99, 17.2, 24.9, 31.4, 77.7] {
        for vehicle in [Vehicle::Bike, Vehicle::Van] {
            for is_urgent in [false, true] {
                for (collection, delivery) in [("M1", "B1"), ("SW1", "B1"), ("M1", "EC2")] {
                    let quote = compute_price(
                        collection,
                        delivery,
                        vehicle,
                        is_urgent,
                        meters(miles),
                        &rates,
                    )
                    .quote;

                    assert!(is_whole_pence(quote.base));
                    assert!(is_whole_pence(quote.vat));
                    assert!(is_whole_pence(quote.total));
                    assert_eq!(quote.vat, round_currency(quote.base * rates.vat_rate));
                    assert_eq!(quote.total, round_currency(quote.base + quote.vat));
                }
            }
        }
    }
}

#[test]
fn deterministic() {
    let rates = RateTable::default();
    let first = compute_price("N1", "M1", Vehicle::Bike, true, meters(12.3), &rates);
    let second = compute_price("N1", "M1", Vehicle::Bike, true, meters(12.3), &rates);

    assert_eq!(first, second);
}

#[test]
fn measured_distance_is_not_estimated() {
    let miles = resolve_miles(meters(10.0));

    assert!(!miles.estimated);
    assert!((miles.value - 10.0).abs() < 1e-9);
    assert!(resolve_miles(DistanceOutcome::Unavailable).estimated);
}
