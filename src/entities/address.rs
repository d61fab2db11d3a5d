use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub name: String,
    pub building: String,
    pub street: String,
    pub city: String,
    pub town: String,
    pub postcode: String,
}

impl Address {
    /// Single-line form handed to the distance provider. The contact name is
    /// not part of the location.
    pub fn formatted(&self) -> String {
        [
            &self.building,
            &self.street,
            &self.town,
            &self.city,
            &self.postcode,
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[test]
fn formatted_skips_empty_parts_and_name() {
    let address = Address {
        name: "Jo Bloggs".into(),
        building: "Flat 2".into(),
        street: " 10 Downing Street ".into(),
        city: "London".into(),
        town: "".into(),
        postcode: "SW1A 2AA".into(),
    };

    assert_eq!(
        address.formatted(),
        "Flat 2, 10 Downing Street, London, SW1A 2AA"
    );
}

#[test]
fn missing_fields_deserialize_empty() {
    let address: Address = serde_json::from_str(r#"{"postcode": "M1 1AE"}"#).unwrap();

    assert_eq!(address.postcode, "M1 1AE");
    assert_eq!(address.formatted(), "M1 1AE");
}
