//! IP-based geolocation used when the caller supplies no coordinates.

use reqwest::Client;
use serde_json::Value;
use zomato_core::Coordinates;

use crate::error::{FetchFailure, ScraperError};
use crate::fetch::{read_json, string_or_number};

/// Resolves the caller's approximate coordinates from their public IP.
///
/// Understands the response shapes of the common free services:
/// `{"lat": .., "lon": ..}` (ip-api.com), `{"latitude": .., "longitude": ..}`
/// (ipapi.co), and `{"loc": "lat,lon"}` (ipinfo.io).
pub struct Locator {
    client: Client,
    url: String,
}

impl Locator {
    #[must_use]
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Performs one lookup. Never retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::LocationUnavailable`] on network failure, a
    /// non-2xx status, or a body without parseable in-range coordinates.
    pub async fn resolve(&self) -> Result<Coordinates, ScraperError> {
        let unavailable = |cause: FetchFailure| ScraperError::LocationUnavailable { cause };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(e.into()))?;
        let body = read_json(response).await.map_err(unavailable)?;
        let coordinates = parse_coordinates(&body)
            .map_err(|reason| unavailable(FetchFailure::Shape(reason)))?;

        tracing::debug!(url = %self.url, %coordinates, "resolved location from IP");
        Ok(coordinates)
    }
}

/// Extracts coordinates from a geolocation response body.
pub(crate) fn parse_coordinates(body: &Value) -> Result<Coordinates, String> {
    if body.get("status").and_then(Value::as_str) == Some("fail") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("lookup failed");
        return Err(format!("geolocation service reported failure: {message}"));
    }

    let (latitude, longitude) = if let Some(loc) = body.get("loc").and_then(Value::as_str) {
        let (lat, lon) = loc
            .split_once(',')
            .ok_or_else(|| format!("\"loc\" value \"{loc}\" is not \"lat,lon\""))?;
        (lat.to_owned(), lon.to_owned())
    } else {
        let field = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| body.get(*name).and_then(string_or_number))
        };
        let latitude = field(&["lat", "latitude"]).ok_or("response has no latitude")?;
        let longitude = field(&["lon", "lng", "longitude"]).ok_or("response has no longitude")?;
        (latitude, longitude)
    };

    Coordinates::new(&latitude, &longitude).map_err(|e| e.to_string())
}
