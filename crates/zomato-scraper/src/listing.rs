//! Restaurant listing pages.

use serde_json::{json, Value};

use crate::cookies::parse_set_cookies;
use crate::error::{FetchFailure, ScraperError};
use crate::fetch::read_json;
use crate::pagination::extract_next_cursor;
use crate::session::SessionContext;
use crate::types::RestaurantRecord;

pub(crate) const LISTING_PATH: &str = "/webroutes/search/home";

const RESTAURANT_POINTERS: [&str; 2] = ["/sections/SECTION_SEARCH_RESULT", "/restaurants"];

impl SessionContext {
    /// Fetches the next page of restaurants.
    ///
    /// Returns an empty `Vec` once the provider has no more pages; every
    /// later call also returns an empty `Vec` without a request. Records
    /// already returned earlier in this session are dropped.
    ///
    /// A failed call leaves the cursor, cookies and seen-record set exactly
    /// as they were, so the same page can be requested again.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::AreaResolution`] if the area was not yet resolved
    ///   and resolving it fails.
    /// - [`ScraperError::ListingFetch`] on network failure, a non-2xx status,
    ///   or a response without a restaurant array.
    pub async fn next_page(&mut self) -> Result<Vec<RestaurantRecord>, ScraperError> {
        if self.is_exhausted() {
            return Ok(Vec::new());
        }

        let area = self.resolve_area().await?;
        let page = self.pages_returned + 1;
        let failed = |cause: FetchFailure| ScraperError::ListingFetch { page, cause };

        let url = self.endpoint(LISTING_PATH);
        let body = json!({
            "context": "delivery",
            "entityId": area.id,
            "entityName": area.name,
            "latitude": self.coordinates.latitude(),
            "longitude": self.coordinates.longitude(),
            "searchMetadata": self.page_state.cursor().cloned().unwrap_or(Value::Null),
        });

        tracing::debug!(page, area_id = %area.id, "requesting listing page");
        let request = self.with_cookies(self.client.post(&url).json(&body));
        let response = request.send().await.map_err(|e| failed(e.into()))?;
        let cookie_updates = parse_set_cookies(response.headers());
        let payload = read_json(response).await.map_err(failed)?;

        let records =
            parse_restaurants(&payload).map_err(|reason| failed(FetchFailure::Shape(reason)))?;
        let next_cursor = extract_next_cursor(&payload);

        // Commit point: nothing below can fail.
        self.cookies.apply(cookie_updates);
        let received = records.len();
        let fresh: Vec<RestaurantRecord> = records
            .into_iter()
            .filter(|record| self.seen.insert(record.dedup_key()))
            .collect();
        self.page_state = self.page_state.advance(next_cursor, fresh.len());
        if !fresh.is_empty() {
            self.pages_returned = page;
        }

        tracing::info!(
            page,
            received,
            returned = fresh.len(),
            exhausted = self.is_exhausted(),
            "fetched listing page"
        );
        Ok(fresh)
    }
}

/// Extracts restaurant entries from a listing response.
///
/// Entries carrying a `type` other than `"restaurant"` (banners, collection
/// tiles) are skipped. A missing array, or an entry that is not an object,
/// is an error.
pub(crate) fn parse_restaurants(payload: &Value) -> Result<Vec<RestaurantRecord>, String> {
    let items = RESTAURANT_POINTERS
        .iter()
        .find_map(|pointer| payload.pointer(pointer))
        .ok_or_else(|| "listing response has no restaurant array".to_owned())?;

    let Value::Array(items) = items else {
        return Err("listing restaurant field is not an array".to_owned());
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(format!("listing entry {index} is not an object"));
        }
        match item.get("type").and_then(Value::as_str) {
            Some(kind) if kind != "restaurant" => {
                tracing::debug!(index, kind, "skipping non-restaurant listing entry");
            }
            _ => records.push(RestaurantRecord::new(item.clone())),
        }
    }
    Ok(records)
}
