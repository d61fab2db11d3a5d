use super::{helpers::fetch_rates, Engine};

use async_trait::async_trait;

use crate::{
    api::QuoteAPI,
    auth::{Platform, User},
    entities::{DistanceOutcome, QuoteRequest, QuoteResponse, RateTable},
    error::Error,
    external::DistanceProvider,
    pricing::{compute_price, resolve_miles, FALLBACK_MILES},
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_quote(
        &self,
        user: User,
        request: QuoteRequest,
    ) -> Result<QuoteResponse, Error> {
        self.authorize(user, "quote", Platform::default())?;

        let rates = {
            let mut conn = self.pool.acquire().await?;
            fetch_rates(&mut conn).await?
        };

        Ok(price_request(self.distance.as_ref(), &rates, &request).await)
    }
}

/// Measures and prices a request, switching vehicle when the engine says the
/// requested one cannot take the job.
#[tracing::instrument(skip(distance, rates))]
pub async fn price_request(
    distance: &(dyn DistanceProvider + Send + Sync),
    rates: &RateTable,
    request: &QuoteRequest,
) -> QuoteResponse {
    let origin = request.collection.formatted();
    let destination = request.delivery.formatted();

    let outcome = if origin.is_empty() || destination.is_empty() {
        DistanceOutcome::Unavailable
    } else {
        distance.measure(&origin, &destination).await
    };

    let miles = resolve_miles(outcome);
    if miles.estimated {
        tracing::debug!(miles = FALLBACK_MILES, "distance unavailable, quoting on estimate");
    }

    let collection_postcode = request.collection.postcode.as_str();
    let delivery_postcode = request.delivery.postcode.as_str();

    let mut vehicle = request.vehicle;
    let mut advisory = None;

    let mut priced = compute_price(
        collection_postcode,
        delivery_postcode,
        vehicle,
        request.is_urgent,
        outcome,
        rates,
    );

    if let Some(vehicle_override) = priced.vehicle_override {
        tracing::info!(
            limit_miles = vehicle_override.limit_miles,
            "requested vehicle over its limit, re-pricing"
        );

        vehicle = vehicle_override.vehicle;
        advisory = Some(vehicle_override.advisory());

        priced = compute_price(
            collection_postcode,
            delivery_postcode,
            vehicle,
            request.is_urgent,
            outcome,
            rates,
        );
    }

    QuoteResponse {
        vehicle,
        quote: priced.quote,
        distance_miles: miles.value,
        distance_estimated: miles.estimated,
        advisory,
    }
}

#[cfg(test)]
struct FixedDistance(DistanceOutcome);

#[cfg(test)]
#[async_trait]
impl DistanceProvider for FixedDistance {
    async fn measure(&self, _origin: &str, _destination: &str) -> DistanceOutcome {
        self.0
    }
}

#[cfg(test)]
fn request(collection: &str, delivery: &str, vehicle: crate::entities::Vehicle) -> QuoteRequest {
    use crate::entities::Address;

    QuoteRequest {
        collection: Address {
            street: "1 High Street".into(),
            postcode: collection.into(),
            ..Address::default()
        },
        delivery: Address {
            street: "2 Low Road".into(),
            postcode: delivery.into(),
            ..Address::default()
        },
        vehicle,
        is_urgent: false,
    }
}

#[test]
fn bike_over_limit_is_priced_as_van() {
    use crate::entities::{PriceQuote, Vehicle};
    use crate::pricing::MILES_PER_METER;
    use tokio_test::block_on;

    let distance = FixedDistance(DistanceOutcome::Measured {
        meters: 40.0 / MILES_PER_METER,
    });
    let rates = RateTable::default();

    let response = block_on(price_request(
        &distance,
        &rates,
        &request("M1 1AE", "LS1 4DY", Vehicle::Bike),
    ));

    assert_eq!(response.vehicle, Vehicle::Van);
    assert_eq!(
        response.quote,
        PriceQuote {
            base: 128.00,
            vat: 25.60,
            total: 153.60
        }
    );
    assert_eq!(
        response.advisory.as_deref(),
        Some("Bike deliveries are limited to 30 miles. Van selected instead.")
    );
    assert!(!response.distance_estimated);
}

#[test]
fn bike_within_limit_keeps_bike() {
    use crate::entities::Vehicle;
    use crate::pricing::MILES_PER_METER;
    use tokio_test::block_on;

    let distance = FixedDistance(DistanceOutcome::Measured {
        meters: 10.0 / MILES_PER_METER,
    });

    let response = block_on(price_request(
        &distance,
        &RateTable::default(),
        &request("M1 1AE", "M20 2AA", Vehicle::Bike),
    ));

    assert_eq!(response.vehicle, Vehicle::Bike);
    assert_eq!(response.quote.base, 28.00);
    assert_eq!(response.advisory, None);
}

#[test]
fn failed_lookup_quotes_on_estimate() {
    use crate::entities::Vehicle;
    use tokio_test::block_on;

    let distance = FixedDistance(DistanceOutcome::Unavailable);

    let response = block_on(price_request(
        &distance,
        &RateTable::default(),
        &request("M1 1AE", "B1 1AA", Vehicle::Van),
    ));

    assert!(response.distance_estimated);
    assert_eq!(response.distance_miles, FALLBACK_MILES);
    assert_eq!(response.quote.total, 96.00);
}

#[test]
fn empty_address_skips_lookup() {
    use crate::entities::{Address, Vehicle};
    use crate::pricing::MILES_PER_METER;
    use tokio_test::block_on;

    let distance = FixedDistance(DistanceOutcome::Measured {
        meters: 5.0 / MILES_PER_METER,
    });
    let mut request = request("M1 1AE", "B1 1AA", Vehicle::Van);
    request.delivery = Address::default();

    let response = block_on(price_request(&distance, &RateTable::default(), &request));

    assert!(response.distance_estimated);
    assert_eq!(response.quote.base, 80.00);
}
