use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    entities::DistanceOutcome,
    error::Error,
    external::DistanceProvider,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Row {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Element {
    status: String,
    distance: Option<Distance>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Distance {
    value: f64,
}

#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_distance(&self, origin: &str, destination: &str) -> Result<f64, Error> {
        let url = format!("https://{}/maps/api/distancematrix/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(&[("origins", origin)])
            .query(&[("destinations", destination)])
            .query(&[("region", "uk")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(Error::invalid_input_error());
        } else if status_code != 200 {
            return Err(Error::upstream_error());
        }

        let data: Response = res.json().await?;

        meters_from_response(data)
    }
}

fn meters_from_response(data: Response) -> Result<f64, Error> {
    if data.status != "OK" {
        return Err(Error::upstream_error());
    }

    let element = data
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(Error::upstream_error)?;

    if element.status != "OK" {
        return Err(Error::upstream_error());
    }

    element
        .distance
        .map(|distance| distance.value)
        .ok_or_else(Error::upstream_error)
}

#[async_trait]
impl DistanceProvider for GoogleMaps {
    async fn measure(&self, origin: &str, destination: &str) -> DistanceOutcome {
        match self.find_distance(origin, destination).await {
            Ok(meters) => DistanceOutcome::from_meters(meters),
            Err(err) => {
                tracing::warn!(code = err.code, "distance lookup failed, using estimate");
                DistanceOutcome::Unavailable
            }
        }
    }
}

#[cfg(test)]
fn parse(body: &str) -> Response {
    serde_json::from_str(body).unwrap()
}

#[test]
fn reads_first_element_distance() {
    let data = parse(
        r#"{
            "status": "OK",
            "rows": [
                {"elements": [
                    {"status": "OK", "distance": {"text": "25.0 mi", "value": 40234}, "duration": {"value": 3000}}
                ]}
            ]
        }"#,
    );

    assert_eq!(meters_from_response(data).unwrap(), 40234.0);
}

#[test]
fn route_not_found_is_an_error() {
    let data = parse(
        r#"{"status": "OK", "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]}"#,
    );
    assert_eq!(
        meters_from_response(data).unwrap_err().code,
        Error::upstream_error().code
    );

    let data = parse(r#"{"status": "REQUEST_DENIED"}"#);
    assert!(meters_from_response(data).is_err());

    let data = parse(r#"{"status": "OK", "rows": []}"#);
    assert!(meters_from_response(data).is_err());
}
