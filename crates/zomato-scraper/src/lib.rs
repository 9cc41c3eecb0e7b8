//! Restaurant listing and menu scraper for the Zomato web API.
//!
//! The pipeline is: [`Locator`] (optional) → [`SessionContext::open`] →
//! [`SessionContext::resolve_area`] → [`SessionContext::next_page`] →
//! [`SessionContext::extract_menu`].

mod area;
pub mod cookies;
pub mod embedded;
pub mod error;
mod fetch;
mod listing;
pub mod locator;
mod menu;
pub mod pagination;
pub mod session;
pub mod types;

pub use cookies::CookieJar;
pub use embedded::{extract_embedded_payload, EmbeddedPayloadError, PRELOADED_STATE_MARKER};
pub use error::{FetchFailure, ScraperError};
pub use locator::Locator;
pub use pagination::{Cursor, PageState};
pub use session::{SessionConfig, SessionContext};
pub use types::{AreaId, MenuDocument, RestaurantRecord};
pub use zomato_core::Coordinates;
