use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Address, PriceQuote, QuoteRequest, QuoteResponse, Vehicle};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Booking {
    #[polar(attribute)]
    pub id: Uuid,
    #[polar(attribute)]
    pub customer_id: Uuid,
    pub collection: Address,
    pub delivery: Address,
    pub vehicle: Vehicle,
    pub is_urgent: bool,
    pub distance_miles: f64,
    pub distance_estimated: bool,
    pub quote: PriceQuote,
    pub notes: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingRequest {
    pub collection: Address,
    pub delivery: Address,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub is_urgent: bool,
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            collection: self.collection.clone(),
            delivery: self.delivery.clone(),
            vehicle: self.vehicle,
            is_urgent: self.is_urgent,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Pending,
    Accepted { timestamp: DateTime<Utc> },
    Collected { timestamp: DateTime<Utc> },
    Delivered { timestamp: DateTime<Utc> },
    Cancelled { reason: Option<String> },
}

impl Status {
    pub const NAMES: [&'static str; 5] = ["pending", "accepted", "collected", "delivered", "cancelled"];

    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Accepted { .. } => "accepted".into(),
            Self::Collected { .. } => "collected".into(),
            Self::Delivered { .. } => "delivered".into(),
            Self::Cancelled { .. } => "cancelled".into(),
        }
    }
}

impl Booking {
    /// Confirms a request at the price it was quoted.
    pub fn new(customer_id: Uuid, request: BookingRequest, priced: QuoteResponse) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            customer_id,
            collection: request.collection,
            delivery: request.delivery,
            vehicle: priced.vehicle,
            is_urgent: request.is_urgent,
            distance_miles: priced.distance_miles,
            distance_estimated: priced.distance_estimated,
            quote: priced.quote,
            notes: request.notes,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn accept(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => self.set_status(Status::Accepted {
                timestamp: Utc::now(),
            }),
            _ => Err(Error::invalid_invocation_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn collect(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Accepted { .. } => self.set_status(Status::Collected {
                timestamp: Utc::now(),
            }),
            _ => Err(Error::invalid_invocation_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn deliver(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Collected { .. } => self.set_status(Status::Delivered {
                timestamp: Utc::now(),
            }),
            _ => Err(Error::invalid_invocation_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), Error> {
        match self.status {
            Status::Pending | Status::Accepted { .. } => {
                self.set_status(Status::Cancelled { reason })
            }
            _ => Err(Error::invalid_invocation_error()),
        }
    }

    fn set_status(&mut self, status: Status) -> Result<(), Error> {
        self.status = status;
        self.updated_at = Utc::now();

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_booking(customer_id: Uuid) -> Booking {
    let request = BookingRequest {
        collection: Address {
            postcode: "SW1A 1AA".into(),
            ..Address::default()
        },
        delivery: Address {
            postcode: "M1 1AE".into(),
            ..Address::default()
        },
        vehicle: Vehicle::Van,
        is_urgent: false,
        notes: None,
    };
    let priced = QuoteResponse {
        vehicle: Vehicle::Van,
        quote: PriceQuote {
            base: 96.0,
            vat: 19.2,
            total: 115.2,
        },
        distance_miles: 25.0,
        distance_estimated: true,
        advisory: None,
    };

    Booking::new(customer_id, request, priced)
}

#[test]
fn booking_lifecycle() {
    let mut booking = test_booking(Uuid::new_v4());
    assert_eq!(booking.status.name(), "pending");

    booking.accept().unwrap();
    assert_eq!(booking.status.name(), "accepted");

    booking.collect().unwrap();
    assert_eq!(booking.status.name(), "collected");

    booking.deliver().unwrap();
    assert_eq!(booking.status.name(), "delivered");
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut booking = test_booking(Uuid::new_v4());

    assert_eq!(booking.collect().unwrap_err().code, 100);
    assert!(booking.deliver().is_err());

    booking.accept().unwrap();
    assert!(booking.accept().is_err());
}

#[test]
fn cancel_only_before_collection() {
    let mut booking = test_booking(Uuid::new_v4());
    booking.cancel(Some("changed my mind".into())).unwrap();
    assert_eq!(
        booking.status,
        Status::Cancelled {
            reason: Some("changed my mind".into())
        }
    );
    assert!(booking.accept().is_err());

    let mut booking = test_booking(Uuid::new_v4());
    booking.accept().unwrap();
    booking.collect().unwrap();
    assert!(booking.cancel(None).is_err());
}

#[test]
fn status_names_are_listed() {
    let statuses = [
        Status::Pending,
        Status::Accepted {
            timestamp: Utc::now(),
        },
        Status::Collected {
            timestamp: Utc::now(),
        },
        Status::Delivered {
            timestamp: Utc::now(),
        },
        Status::Cancelled { reason: None },
    ];

    for status in statuses {
        assert!(Status::NAMES.contains(&status.name().as_str()));
    }
}

#[test]
fn status_serializes_tagged() {
    let value = serde_json::to_value(Status::Cancelled { reason: None }).unwrap();

    assert_eq!(value["name"], "cancelled");
}
