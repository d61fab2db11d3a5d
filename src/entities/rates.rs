use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Pricing parameters owned by administrators.
///
/// Field names are camelCase on the wire so that previously stored tables keep
/// loading. Any field missing from a stored table falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    #[serde(default = "default_van_rate")]
    pub base_rate_van_per_mile: f64,
    #[serde(default = "default_bike_rate")]
    pub base_rate_bike_per_mile: f64,
    #[serde(default = "default_london_multiplier")]
    pub london_multiplier: f64,
    #[serde(default = "default_urgent_multiplier")]
    pub urgent_multiplier: f64,
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
    #[serde(default = "default_bike_distance_limit")]
    pub bike_distance_limit_miles: f64,
    #[serde(default = "default_bike_minimum_charge")]
    pub bike_minimum_charge: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            base_rate_van_per_mile: default_van_rate(),
            base_rate_bike_per_mile: default_bike_rate(),
            london_multiplier: default_london_multiplier(),
            urgent_multiplier: default_urgent_multiplier(),
            vat_rate: default_vat_rate(),
            bike_distance_limit_miles: default_bike_distance_limit(),
            bike_minimum_charge: default_bike_minimum_charge(),
        }
    }
}

const fn default_van_rate() -> f64 {
    3.20
}

const fn default_bike_rate() -> f64 {
    2.80
}

const fn default_london_multiplier() -> f64 {
    1.20
}

const fn default_urgent_multiplier() -> f64 {
    1.50
}

const fn default_vat_rate() -> f64 {
    0.20
}

const fn default_bike_distance_limit() -> f64 {
    30.0
}

const fn default_bike_minimum_charge() -> f64 {
    6.50
}

impl RateTable {
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("baseRateVanPerMile", self.base_rate_van_per_mile),
            ("baseRateBikePerMile", self.base_rate_bike_per_mile),
            ("londonMultiplier", self.london_multiplier),
            ("urgentMultiplier", self.urgent_multiplier),
            ("vatRate", self.vat_rate),
            ("bikeDistanceLimitMiles", self.bike_distance_limit_miles),
            ("bikeMinimumCharge", self.bike_minimum_charge),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_rates_error(name));
            }
        }

        if self.london_multiplier < 1.0 {
            return Err(Error::invalid_rates_error("londonMultiplier"));
        }

        if self.urgent_multiplier < 1.0 {
            return Err(Error::invalid_rates_error("urgentMultiplier"));
        }

        if self.vat_rate > 1.0 {
            return Err(Error::invalid_rates_error("vatRate"));
        }

        Ok(())
    }
}

/// Partial update of a [`RateTable`]. Absent fields keep their current value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTableUpdate {
    pub base_rate_van_per_mile: Option<f64>,
    pub base_rate_bike_per_mile: Option<f64>,
    pub london_multiplier: Option<f64>,
    pub urgent_multiplier: Option<f64>,
    pub vat_rate: Option<f64>,
    pub bike_distance_limit_miles: Option<f64>,
    pub bike_minimum_charge: Option<f64>,
}

impl RateTableUpdate {
    pub fn apply(&self, current: &RateTable) -> RateTable {
        RateTable {
            base_rate_van_per_mile: self
                .base_rate_van_per_mile
                .unwrap_or(current.base_rate_van_per_mile),
            base_rate_bike_per_mile: self
                .base_rate_bike_per_mile
                .unwrap_or(current.base_rate_bike_per_mile),
            london_multiplier: self.london_multiplier.unwrap_or(current.london_multiplier),
            urgent_multiplier: self.urgent_multiplier.unwrap_or(current.urgent_multiplier),
            vat_rate: self.vat_rate.unwrap_or(current.vat_rate),
            bike_distance_limit_miles: self
                .bike_distance_limit_miles
                .unwrap_or(current.bike_distance_limit_miles),
            bike_minimum_charge: self
                .bike_minimum_charge
                .unwrap_or(current.bike_minimum_charge),
        }
    }
}

#[test]
fn partial_table_takes_defaults() {
    let rates: RateTable =
        serde_json::from_str(r#"{"baseRateVanPerMile": 4.0, "vatRate": 0.0}"#).unwrap();

    assert_eq!(rates.base_rate_van_per_mile, 4.0);
    assert_eq!(rates.vat_rate, 0.0);
    assert_eq!(rates.base_rate_bike_per_mile, 2.80);
    assert_eq!(rates.london_multiplier, 1.20);
    assert_eq!(rates.urgent_multiplier, 1.50);
    assert_eq!(rates.bike_distance_limit_miles, 30.0);
    assert_eq!(rates.bike_minimum_charge, 6.50);
}

#[test]
fn serializes_with_stored_field_names() {
    let value = serde_json::to_value(RateTable::default()).unwrap();

    for key in [
        "baseRateVanPerMile",
        "baseRateBikePerMile",
        "londonMultiplier",
        "urgentMultiplier",
        "vatRate",
        "bikeDistanceLimitMiles",
        "bikeMinimumCharge",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
}

#[test]
fn validate_rejects_out_of_range_values() {
    assert!(RateTable::default().validate().is_ok());

    let rates = RateTable {
        urgent_multiplier: 0.9,
        ..RateTable::default()
    };
    assert_eq!(rates.validate().unwrap_err().code, 104);

    let rates = RateTable {
        vat_rate: 1.5,
        ..RateTable::default()
    };
    assert!(rates.validate().is_err());

    let rates = RateTable {
        base_rate_bike_per_mile: -1.0,
        ..RateTable::default()
    };
    assert!(rates.validate().is_err());

    let rates = RateTable {
        bike_minimum_charge: f64::NAN,
        ..RateTable::default()
    };
    assert!(rates.validate().is_err());
}

#[test]
fn update_keeps_absent_fields() {
    let current = RateTable {
        base_rate_van_per_mile: 3.5,
        ..RateTable::default()
    };
    let update = RateTableUpdate {
        vat_rate: Some(0.175),
        ..RateTableUpdate::default()
    };

    let rates = update.apply(&current);

    assert_eq!(rates.base_rate_van_per_mile, 3.5);
    assert_eq!(rates.vat_rate, 0.175);
    assert_eq!(rates.bike_minimum_charge, 6.50);
}
