//! Shared fixtures for infrastructure tests.

use std::time::Duration;

use bookdesk_infra::{BookingApiClient, HttpClient};
use serde_json::{json, Value};
use url::Url;

pub const RESOURCE: &str = "room-a";

/// Client pointed at a wiremock server, with fast retries.
pub fn api_client(server_uri: &str) -> BookingApiClient {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(3)
        .base_backoff(Duration::from_millis(1))
        .build()
        .unwrap();
    BookingApiClient::new(Url::parse(server_uri).unwrap(), http)
}

/// Wire-shaped booking JSON: a confirmed HK booking at 10:00 local.
pub fn booking_json(id: &str) -> Value {
    json!({
        "id": id,
        "resourceId": RESOURCE,
        "location": { "id": "loc-hk", "timezone": "Asia/Hong_Kong" },
        "start": "2026-03-02T02:00:00Z",
        "end": "2026-03-02T02:30:00Z",
        "isCanceled": false,
        "isTemporary": false,
        "customerName": "Dana Reyes"
    })
}
