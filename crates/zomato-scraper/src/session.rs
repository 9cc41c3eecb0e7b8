//! Scraping session: transport, headers, cookies, location and paging state.
//!
//! A [`SessionContext`] is created once and owned by a single caller. The
//! operations that change state (`resolve_area`, `next_page`) take
//! `&mut self`, so paging on one context is serialized by the borrow
//! checker; `extract_menu` only needs `&self`.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use zomato_core::config::{DEFAULT_BASE_URL, DEFAULT_GEOLOCATION_URL, DEFAULT_USER_AGENT};
use zomato_core::{AppConfig, Coordinates};

use crate::cookies::CookieJar;
use crate::error::ScraperError;
use crate::locator::Locator;
use crate::pagination::PageState;
use crate::types::AreaId;

/// Connection settings for a [`SessionContext`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Provider origin without a trailing slash.
    pub base_url: String,
    pub geolocation_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl SessionConfig {
    /// Settings pointed at the given provider origin and geolocation service,
    /// with the default timeout and browser user agent.
    #[must_use]
    pub fn new(base_url: &str, geolocation_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            geolocation_url: geolocation_url.to_owned(),
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            geolocation_url: config.geolocation_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Builds the HTTP client with the browser-like default headers the
    /// provider requires.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the client cannot be built
    /// (e.g. the user agent is not a valid header value).
    pub fn build_client(&self) -> Result<Client, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(client)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_GEOLOCATION_URL)
    }
}

pub struct SessionContext {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) coordinates: Coordinates,
    pub(crate) cookies: CookieJar,
    pub(crate) area: Option<AreaId>,
    pub(crate) page_state: PageState,
    pub(crate) seen: HashSet<String>,
    pub(crate) pages_returned: usize,
}

impl SessionContext {
    /// Opens a session, resolving the location by IP when `coordinates` is
    /// `None`. Area resolution is deferred until first needed.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Transport`] if the HTTP client cannot be built.
    /// - [`ScraperError::LocationUnavailable`] if IP geolocation fails.
    pub async fn open(
        config: &SessionConfig,
        coordinates: Option<Coordinates>,
    ) -> Result<Self, ScraperError> {
        let client = config.build_client()?;

        let coordinates = match coordinates {
            Some(coordinates) => coordinates,
            None => {
                tracing::info!(url = %config.geolocation_url, "no coordinates supplied; locating by IP");
                Locator::new(client.clone(), &config.geolocation_url)
                    .resolve()
                    .await?
            }
        };

        tracing::info!(base_url = %config.base_url, %coordinates, "opened scraping session");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            coordinates,
            cookies: CookieJar::new(),
            area: None,
            page_state: PageState::Start,
            seen: HashSet::new(),
            pages_returned: 0,
        })
    }

    #[must_use]
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// The memoized area, if it has been resolved.
    #[must_use]
    pub fn area(&self) -> Option<&AreaId> {
        self.area.as_ref()
    }

    #[must_use]
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    #[must_use]
    pub fn page_state(&self) -> &PageState {
        &self.page_state
    }

    /// Number of non-empty pages returned so far.
    #[must_use]
    pub fn page_number(&self) -> usize {
        self.pages_returned
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.page_state, PageState::Exhausted)
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the session cookies to an outgoing request.
    pub(crate) fn with_cookies(&self, request: RequestBuilder) -> RequestBuilder {
        match self.cookies.header_value() {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }
}
