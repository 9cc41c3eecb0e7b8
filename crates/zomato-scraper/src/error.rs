use thiserror::Error;

/// Why an HTTP exchange with a provider endpoint did not yield usable data.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Shape(String),
}

impl FetchFailure {
    /// Network failures, 429 and 5xx may succeed on a later attempt; a
    /// response with the wrong shape will not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::Shape(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("location unavailable: {cause}")]
    LocationUnavailable {
        #[source]
        cause: FetchFailure,
    },

    #[error("area resolution failed: {cause}")]
    AreaResolution {
        #[source]
        cause: FetchFailure,
    },

    #[error("listing fetch failed for page {page}: {cause}")]
    ListingFetch {
        page: usize,
        #[source]
        cause: FetchFailure,
    },

    #[error("invalid restaurant record: {reason}")]
    InvalidRestaurantRecord { reason: String },

    #[error("menu fetch failed for {url}: {cause}")]
    MenuFetch {
        url: String,
        #[source]
        cause: FetchFailure,
    },

    #[error("menu parse failed for {url}: {reason}")]
    MenuParse { url: String, reason: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ScraperError {
    /// Returns `true` when retrying the same call may succeed.
    ///
    /// The library never retries on its own; callers use this to build
    /// their own retry policy.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::LocationUnavailable { cause }
            | Self::AreaResolution { cause }
            | Self::ListingFetch { cause, .. }
            | Self::MenuFetch { cause, .. } => cause.is_transient(),
            Self::Transport(_) => true,
            Self::InvalidRestaurantRecord { .. } | Self::MenuParse { .. } => false,
        }
    }
}
