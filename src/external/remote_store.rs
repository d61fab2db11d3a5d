use serde::Serialize;
use uuid::Uuid;

use crate::entities::Booking;

/// Best-effort mirror of booking records to a remote HTTP endpoint.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    client: reqwest::Client,
    url: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Payload<'a> {
    Upsert { booking: &'a Booking },
    Delete { id: Uuid },
}

impl RemoteStore {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Fire and forget. Failures are logged and dropped.
    pub fn sync_booking(&self, booking: &Booking) {
        self.send(booking.id, Payload::Upsert { booking });
    }

    /// Fire and forget, like `sync_booking`.
    pub fn sync_deletion(&self, id: Uuid) {
        self.send(id, Payload::Delete { id });
    }

    fn send(&self, id: Uuid, payload: Payload<'_>) {
        let url = match &self.url {
            Some(url) => url.clone(),
            None => return,
        };

        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%id, %err, "could not encode booking for remote store");
                return;
            }
        };

        let client = self.client.clone();

        tokio::spawn(async move {
            match client.post(url).json(&body).send().await {
                Ok(res) if res.status().is_success() => {
                    tracing::debug!(%id, "booking mirrored");
                }
                Ok(res) => {
                    tracing::warn!(%id, status = res.status().as_u16(), "remote store rejected booking");
                }
                Err(err) => {
                    tracing::warn!(%id, %err, "remote store unreachable");
                }
            }
        });
    }
}

#[test]
fn disabled_store_does_not_spawn() {
    use crate::entities::test_booking;

    // no runtime here: spawning would panic
    let store = RemoteStore::disabled();
    assert!(!store.is_enabled());

    store.sync_booking(&test_booking(Uuid::new_v4()));
    store.sync_deletion(Uuid::new_v4());
}

#[test]
fn payload_names_the_action() {
    use crate::entities::test_booking;
    use serde_json::json;

    let booking = test_booking(Uuid::new_v4());

    let upsert = serde_json::to_value(Payload::Upsert { booking: &booking }).unwrap();
    assert_eq!(upsert["action"], "upsert");
    assert_eq!(upsert["booking"]["id"], json!(booking.id));

    let delete = serde_json::to_value(Payload::Delete { id: booking.id }).unwrap();
    assert_eq!(delete, json!({ "action": "delete", "id": booking.id }));
}
