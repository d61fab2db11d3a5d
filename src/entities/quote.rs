use serde::{Deserialize, Serialize};

use crate::entities::{Address, Vehicle};

/// Price for one set of inputs. Values are pounds at 2 decimal places.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base: f64,
    pub vat: f64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub collection: Address,
    pub delivery: Address,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub is_urgent: bool,
}

/// A quote after the vehicle policy has been applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub vehicle: Vehicle,
    pub quote: PriceQuote,
    pub distance_miles: f64,
    pub distance_estimated: bool,
    pub advisory: Option<String>,
}
