//! Records produced by the scraping pipeline.
//!
//! Provider payloads are kept as `serde_json::Value` so nothing the provider
//! sends is lost; the typed accessors read the fields callers need.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Provider-defined neighbourhood that scopes restaurant listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaId {
    pub id: String,
    pub name: String,
}

/// One restaurant entry from a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RestaurantRecord(Value);

impl RestaurantRecord {
    #[must_use]
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_raw(self) -> Value {
        self.0
    }

    fn info(&self) -> Option<&Value> {
        self.0.get("info")
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.info()?.get("name")?.as_str()
    }

    /// Aggregate rating, given either as a bare number or as the provider's
    /// `{"aggregate_rating": "4.1", ...}` object.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        let rating = self.info()?.get("rating")?;
        let value = match rating {
            Value::Object(map) => map
                .get("aggregate_rating")
                .or_else(|| map.get("rating"))?,
            other => other,
        };
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Cuisine names, given either as strings or as `{"name": ...}` objects.
    #[must_use]
    pub fn cuisines(&self) -> Vec<String> {
        let cuisines = self
            .info()
            .and_then(|i| i.get("cuisine").or_else(|| i.get("cuisines")));
        let Some(Value::Array(items)) = cuisines else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_owned),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn delivery_time(&self) -> Option<&str> {
        let info = self.info()?;
        info.get("deliveryTime")
            .or_else(|| self.0.pointer("/order/deliveryTime"))
            .and_then(Value::as_str)
    }

    /// Relative path of the restaurant's menu page.
    #[must_use]
    pub fn deep_link(&self) -> Option<&str> {
        self.0
            .pointer("/order/actionInfo/clickUrl")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    /// Provider restaurant id (`info.resId`, or `info.id`), as a string.
    #[must_use]
    pub fn res_id(&self) -> Option<String> {
        self.info()
            .and_then(|i| i.get("resId").or_else(|| i.get("id")))
            .and_then(crate::fetch::string_or_number)
    }

    /// Identity used to drop records already returned in the same session.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        if let Some(id) = self.res_id() {
            return format!("id:{id}");
        }
        if let Some(link) = self.deep_link() {
            return format!("link:{link}");
        }
        format!("raw:{}", self.0)
    }
}

/// Menu page content, keyed by provider section name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuDocument {
    pub page_data: MenuPageData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuPageData {
    pub sections: BTreeMap<String, Value>,
}

pub const SECTION_BASIC_INFO: &str = "SECTION_BASIC_INFO";
pub const SECTION_MENU_WIDGET: &str = "SECTION_MENU_WIDGET";

impl MenuDocument {
    #[must_use]
    pub fn new(sections: BTreeMap<String, Value>) -> Self {
        Self {
            page_data: MenuPageData { sections },
        }
    }

    #[must_use]
    pub fn sections(&self) -> &BTreeMap<String, Value> {
        &self.page_data.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.page_data.sections.get(name)
    }

    #[must_use]
    pub fn basic_info(&self) -> Option<&Value> {
        self.section(SECTION_BASIC_INFO)
    }

    /// The menu categories section; older pages call it `SECTION_MENU`.
    #[must_use]
    pub fn menu_categories(&self) -> Option<&Value> {
        self.section(SECTION_MENU_WIDGET)
            .or_else(|| self.section("SECTION_MENU"))
    }

    #[must_use]
    pub fn restaurant_name(&self) -> Option<&str> {
        let info = self.basic_info()?;
        info.get("name")
            .or_else(|| info.get("restaurant_name"))
            .and_then(Value::as_str)
    }
}
