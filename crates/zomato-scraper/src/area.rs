//! Area lookup: coordinates to the provider's place identifier.

use serde_json::{json, Value};

use crate::error::{FetchFailure, ScraperError};
use crate::fetch::{read_json, string_or_number};
use crate::session::SessionContext;
use crate::types::AreaId;

pub(crate) const AREA_LOOKUP_PATH: &str = "/webroutes/location/get";

impl SessionContext {
    /// Resolves the area for the session's coordinates.
    ///
    /// The first success is cached on the session; later calls return the
    /// cached value without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::AreaResolution`] on network failure, a
    /// non-2xx status, or a response without an id and name.
    pub async fn resolve_area(&mut self) -> Result<AreaId, ScraperError> {
        if let Some(area) = &self.area {
            return Ok(area.clone());
        }

        let failed = |cause: FetchFailure| ScraperError::AreaResolution { cause };
        let url = self.endpoint(AREA_LOOKUP_PATH);
        let body = json!({
            "lat": self.coordinates.latitude(),
            "lon": self.coordinates.longitude(),
        });

        let request = self.with_cookies(self.client.post(&url).json(&body));
        let response = request.send().await.map_err(|e| failed(e.into()))?;
        let payload = read_json(response).await.map_err(failed)?;
        let area =
            parse_area(&payload).map_err(|reason| failed(FetchFailure::Shape(reason)))?;

        tracing::info!(area_id = %area.id, area_name = %area.name, "resolved delivery area");
        self.area = Some(area.clone());
        Ok(area)
    }
}

/// Reads the place id and display name from an area-lookup response.
///
/// The provider nests them under `locationDetails`; a bare object at the
/// root is accepted too.
pub(crate) fn parse_area(payload: &Value) -> Result<AreaId, String> {
    let details = payload
        .get("locationDetails")
        .filter(|v| v.is_object())
        .unwrap_or(payload);

    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| details.get(*name).and_then(string_or_number))
    };

    let id = field(&["placeId", "entityId", "id"])
        .ok_or_else(|| "area response has no place id".to_owned())?;
    let name = field(&["placeName", "name", "cityName"])
        .ok_or_else(|| "area response has no display name".to_owned())?;

    Ok(AreaId { id, name })
}
