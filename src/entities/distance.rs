use serde::{Deserialize, Serialize};

/// What the distance provider reported for a pair of addresses.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum DistanceOutcome {
    Measured { meters: f64 },
    Unavailable,
}

impl DistanceOutcome {
    /// A zero or nonsensical measurement is a failed lookup.
    pub fn from_meters(meters: f64) -> Self {
        if meters.is_finite() && meters > 0.0 {
            Self::Measured { meters }
        } else {
            Self::Unavailable
        }
    }
}

#[test]
fn zero_meters_is_unavailable() {
    assert_eq!(DistanceOutcome::from_meters(0.0), DistanceOutcome::Unavailable);
    assert_eq!(DistanceOutcome::from_meters(-3.0), DistanceOutcome::Unavailable);
    assert_eq!(
        DistanceOutcome::from_meters(f64::INFINITY),
        DistanceOutcome::Unavailable
    );
    assert_eq!(
        DistanceOutcome::from_meters(1609.0),
        DistanceOutcome::Measured { meters: 1609.0 }
    );
}
