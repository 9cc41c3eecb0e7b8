//! Session cookie state carried between provider requests.
//!
//! The provider rotates session tokens through `Set-Cookie` on listing
//! responses. Updates are parsed first and applied later so a request that
//! fails after receiving headers leaves the jar untouched.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, SET_COOKIE};

/// A single parsed `Set-Cookie` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    Set { name: String, value: String },
    Remove { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    values: BTreeMap<String, String>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn apply(&mut self, updates: Vec<CookieUpdate>) {
        for update in updates {
            match update {
                CookieUpdate::Set { name, value } => {
                    self.values.insert(name, value);
                }
                CookieUpdate::Remove { name } => {
                    self.values.remove(&name);
                }
            }
        }
    }

    /// Renders the jar as a `Cookie` request header value, or `None` when empty.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.values.is_empty() {
            return None;
        }
        Some(
            self.values
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Collects every `Set-Cookie` directive from a response's headers.
///
/// Headers that are not valid UTF-8 or have no `name=` pair are skipped.
#[must_use]
pub fn parse_set_cookies(headers: &HeaderMap) -> Vec<CookieUpdate> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(parse_set_cookie)
        .collect()
}

fn parse_set_cookie(raw: &str) -> Option<CookieUpdate> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let expired = parts.any(|attr| {
        let attr = attr.trim().to_ascii_lowercase();
        attr == "max-age=0" || attr.starts_with("max-age=-")
    });

    if expired || value.is_empty() {
        Some(CookieUpdate::Remove {
            name: name.to_owned(),
        })
    } else {
        Some(CookieUpdate::Set {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }
}
