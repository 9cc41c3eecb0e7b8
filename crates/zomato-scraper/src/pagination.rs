//! Cursor-driven pagination for the restaurant listing endpoint.
//!
//! The provider returns an opaque search-metadata object with every listing
//! page; posting it back unchanged requests the following page. Its inner
//! structure belongs to the provider and is never inspected beyond the
//! end-of-results checks below.
//!
//! ## Response locations
//!
//! Provider search response:
//! ```text
//! {"sections": {"SECTION_SEARCH_META_INFO": {"searchMetaData": {..., "hasMore": true}}}}
//! ```
//!
//! Flat response:
//! ```text
//! {"restaurants": [...], "next_cursor": {...} | null}
//! ```

use serde_json::Value;

/// Opaque provider pagination token.
pub type Cursor = Value;

const CURSOR_POINTERS: [&str; 2] = [
    "/sections/SECTION_SEARCH_META_INFO/searchMetaData",
    "/next_cursor",
];

/// Where a session is in the listing sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// No page requested yet.
    Start,
    /// Holds the cursor for the next page.
    Paging(Cursor),
    /// The provider reported no further pages.
    Exhausted,
}

impl PageState {
    /// Cursor to send with the next request (`None` for the first page).
    #[must_use]
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::Paging(cursor) => Some(cursor),
            Self::Start | Self::Exhausted => None,
        }
    }

    /// State after a page that yielded `fresh_records` new records and
    /// `next_cursor` from the provider.
    ///
    /// A page with no new records ends the sequence, as does a cursor equal
    /// to the one just sent (the provider is cycling).
    #[must_use]
    pub fn advance(&self, next_cursor: Option<Cursor>, fresh_records: usize) -> Self {
        if fresh_records == 0 {
            return Self::Exhausted;
        }
        match next_cursor {
            None => Self::Exhausted,
            Some(cursor) if self.cursor() == Some(&cursor) => {
                tracing::warn!("listing cursor did not change between pages; stopping");
                Self::Exhausted
            }
            Some(cursor) => Self::Paging(cursor),
        }
    }
}

/// Extracts the next-page cursor from a listing response body.
///
/// Returns `None` when the cursor is absent, `null`, an empty string, or an
/// object whose `hasMore` flag is `false`.
#[must_use]
pub fn extract_next_cursor(body: &Value) -> Option<Cursor> {
    let cursor = CURSOR_POINTERS
        .iter()
        .find_map(|pointer| body.pointer(pointer))?;

    if is_terminal(cursor) {
        return None;
    }
    Some(cursor.clone())
}

fn is_terminal(cursor: &Value) -> bool {
    match cursor {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.get("hasMore").and_then(Value::as_bool) == Some(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn returns_none_when_cursor_missing() {
        assert!(extract_next_cursor(&json!({"restaurants": []})).is_none());
    }

    #[test]
    fn returns_none_when_cursor_is_null() {
        assert!(extract_next_cursor(&json!({"next_cursor": null})).is_none());
    }

    #[test]
    fn returns_none_for_empty_string_cursor() {
        assert!(extract_next_cursor(&json!({"next_cursor": ""})).is_none());
    }

    #[test]
    fn extracts_flat_cursor_unchanged() {
        let cursor = json!({"offset": 12, "structure": "grid"});
        let body = json!({"restaurants": [], "next_cursor": cursor});
        assert_eq!(extract_next_cursor(&body), Some(cursor));
    }

    #[test]
    fn extracts_string_cursor() {
        let body = json!({"next_cursor": "eyJvZmZzZXQiOjEyfQ"});
        assert_eq!(extract_next_cursor(&body), Some(json!("eyJvZmZzZXQiOjEyfQ")));
    }

    #[test]
    fn extracts_provider_search_metadata() {
        let meta = json!({
            "hasMore": true,
            "previousSearchParams": "{\"PreviousSearchId\":\"abc\"}",
            "postbackParams": "{\"processed_chain_ids\":[]}",
            "totalResults": 240
        });
        let body = json!({"sections": {"SECTION_SEARCH_META_INFO": {"searchMetaData": meta}}});
        assert_eq!(extract_next_cursor(&body), Some(meta));
    }

    #[test]
    fn has_more_false_ends_pagination() {
        let body = json!({"sections": {"SECTION_SEARCH_META_INFO": {
            "searchMetaData": {"hasMore": false, "postbackParams": "{}"}
        }}});
        assert!(extract_next_cursor(&body).is_none());
    }

    #[test]
    fn start_has_no_cursor() {
        assert!(PageState::Start.cursor().is_none());
        assert!(PageState::Exhausted.cursor().is_none());
    }

    #[test]
    fn advance_moves_to_paging_with_new_cursor() {
        let next = PageState::Start.advance(Some(json!({"offset": 1})), 10);
        assert_eq!(next, PageState::Paging(json!({"offset": 1})));
    }

    #[test]
    fn advance_without_cursor_exhausts() {
        assert_eq!(PageState::Start.advance(None, 2), PageState::Exhausted);
    }

    #[test]
    fn advance_with_no_fresh_records_exhausts() {
        let state = PageState::Paging(json!({"offset": 1}));
        assert_eq!(state.advance(Some(json!({"offset": 2})), 0), PageState::Exhausted);
    }

    #[test]
    fn advance_with_repeated_cursor_exhausts() {
        let state = PageState::Paging(json!({"offset": 1}));
        assert_eq!(state.advance(Some(json!({"offset": 1})), 5), PageState::Exhausted);
    }
}
