//! Menu extraction from a restaurant's order page.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::embedded::extract_embedded_payload;
use crate::error::ScraperError;
use crate::fetch::read_text;
use crate::session::SessionContext;
use crate::types::{MenuDocument, RestaurantRecord};

impl SessionContext {
    /// Fetches and parses the menu page for one listing record.
    ///
    /// Independent of pagination: it may be called for records from any
    /// page already returned, and concurrently through a shared reference.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidRestaurantRecord`] if the record has no deep
    ///   link (no request is made).
    /// - [`ScraperError::MenuFetch`] on network failure or a non-2xx status.
    /// - [`ScraperError::MenuParse`] if the page has no usable embedded
    ///   payload or the payload has no menu sections.
    pub async fn extract_menu(
        &self,
        record: &RestaurantRecord,
    ) -> Result<MenuDocument, ScraperError> {
        let deep_link = record
            .deep_link()
            .ok_or_else(|| ScraperError::InvalidRestaurantRecord {
                reason: format!(
                    "record {} has no order.actionInfo.clickUrl",
                    record.name().unwrap_or("<unnamed>")
                ),
            })?;
        let url = self.menu_url(deep_link);

        tracing::debug!(%url, "fetching menu page");
        let response = self
            .with_cookies(self.client.get(&url))
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| ScraperError::MenuFetch {
                url: url.clone(),
                cause: e.into(),
            })?;
        let page = read_text(response)
            .await
            .map_err(|cause| ScraperError::MenuFetch {
                url: url.clone(),
                cause,
            })?;

        let payload = extract_embedded_payload(&page).map_err(|e| ScraperError::MenuParse {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let sections = menu_sections(&payload, record.res_id().as_deref())
            .map_err(|reason| ScraperError::MenuParse { url: url.clone(), reason })?;

        tracing::info!(%url, sections = sections.len(), "extracted menu");
        Ok(MenuDocument::new(sections))
    }

    /// Deep links are site-relative; absolute links are used as given.
    fn menu_url(&self, deep_link: &str) -> String {
        if deep_link.starts_with("http://") || deep_link.starts_with("https://") {
            deep_link.to_owned()
        } else if deep_link.starts_with('/') {
            self.endpoint(deep_link)
        } else {
            self.endpoint(&format!("/{deep_link}"))
        }
    }
}

/// Finds the section map in an embedded page payload.
///
/// Looks at `page_data.sections` first, then at the `pages.restaurant` entry
/// keyed by the record's restaurant id. A record without an id only matches
/// a payload holding exactly one restaurant page.
pub(crate) fn menu_sections(
    payload: &Value,
    res_id: Option<&str>,
) -> Result<BTreeMap<String, Value>, String> {
    let sections = match payload.pointer("/page_data/sections") {
        Some(sections) => sections,
        None => restaurant_page(payload, res_id)?
            .get("sections")
            .ok_or_else(|| "restaurant page has no menu sections".to_owned())?,
    };

    let Value::Object(map) = sections else {
        return Err("menu sections are not an object".to_owned());
    };
    if map.is_empty() {
        return Err("menu sections are empty".to_owned());
    }
    Ok(map
        .iter()
        .map(|(name, section)| (name.clone(), section.clone()))
        .collect())
}

fn restaurant_page<'a>(payload: &'a Value, res_id: Option<&str>) -> Result<&'a Value, String> {
    let pages = payload
        .pointer("/pages/restaurant")
        .and_then(Value::as_object)
        .ok_or_else(|| "embedded payload has no menu sections".to_owned())?;
    match res_id {
        Some(id) => pages
            .get(id)
            .ok_or_else(|| format!("embedded payload has no restaurant page for id {id}")),
        None if pages.len() == 1 => pages
            .values()
            .next()
            .ok_or_else(|| "embedded payload has no menu sections".to_owned()),
        None => Err(format!(
            "record has no restaurant id to choose among {} restaurant pages",
            pages.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_page_data_sections() {
        let payload = json!({"page_data": {"sections": {
            "SECTION_BASIC_INFO": {"name": "Cafe"},
            "SECTION_MENU_WIDGET": {"menus": []}
        }}});
        let sections = menu_sections(&payload, None).unwrap();
        assert_eq!(
            sections.keys().collect::<Vec<_>>(),
            vec!["SECTION_BASIC_INFO", "SECTION_MENU_WIDGET"]
        );
    }

    #[test]
    fn reads_restaurant_page_sections() {
        let payload = json!({"pages": {"restaurant": {
            "18382360": {"sections": {"SECTION_BASIC_INFO": {"name": "Truffles"}}}
        }}});
        let sections = menu_sections(&payload, Some("18382360")).unwrap();
        assert_eq!(sections["SECTION_BASIC_INFO"], json!({"name": "Truffles"}));
    }

    #[test]
    fn picks_the_restaurant_page_matching_the_record_id() {
        // "100" sorts before "2", so key order alone would pick the wrong page.
        let payload = json!({"pages": {"restaurant": {
            "100": {"sections": {"SECTION_BASIC_INFO": {"name": "Other"}}},
            "2": {"sections": {"SECTION_BASIC_INFO": {"name": "Mine"}}}
        }}});
        let sections = menu_sections(&payload, Some("2")).unwrap();
        assert_eq!(sections["SECTION_BASIC_INFO"], json!({"name": "Mine"}));
    }

    #[test]
    fn unknown_record_id_is_an_error() {
        let payload = json!({"pages": {"restaurant": {
            "100": {"sections": {"SECTION_BASIC_INFO": {"name": "Other"}}}
        }}});
        let err = menu_sections(&payload, Some("2")).unwrap_err();
        assert!(err.contains("id 2"), "got: {err}");
    }

    #[test]
    fn record_without_id_uses_the_only_restaurant_page() {
        let single = json!({"pages": {"restaurant": {
            "7": {"sections": {"SECTION_BASIC_INFO": {"name": "Solo"}}}
        }}});
        let sections = menu_sections(&single, None).unwrap();
        assert_eq!(sections["SECTION_BASIC_INFO"], json!({"name": "Solo"}));

        let several = json!({"pages": {"restaurant": {
            "7": {"sections": {"SECTION_BASIC_INFO": {"name": "Solo"}}},
            "8": {"sections": {"SECTION_BASIC_INFO": {"name": "Duo"}}}
        }}});
        assert!(menu_sections(&several, None).is_err());
    }

    #[test]
    fn missing_sections_is_an_error() {
        assert!(menu_sections(&json!({"pages": {"restaurant": {}}}), None).is_err());
        let no_sections = json!({"pages": {"restaurant": {"1": {}}}});
        assert!(menu_sections(&no_sections, Some("1")).is_err());
        assert!(menu_sections(&json!({"user": {}}), None).is_err());
    }

    #[test]
    fn empty_sections_is_an_error() {
        let err = menu_sections(&json!({"page_data": {"sections": {}}}), None).unwrap_err();
        assert!(err.contains("empty"), "got: {err}");
    }

    #[test]
    fn non_object_sections_is_an_error() {
        assert!(menu_sections(&json!({"page_data": {"sections": []}}), None).is_err());
    }
}
