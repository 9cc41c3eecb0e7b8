//! Response helpers shared by every provider endpoint.

use reqwest::Response;

use crate::error::FetchFailure;

/// Asserts a 2xx status and reads the body as text.
pub(crate) async fn read_text(response: Response) -> Result<String, FetchFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Asserts a 2xx status and parses the body as JSON.
///
/// An empty or non-JSON body on a successful status is a shape failure, not
/// an empty result.
pub(crate) async fn read_json(response: Response) -> Result<serde_json::Value, FetchFailure> {
    let body = read_text(response).await?;
    if body.trim().is_empty() {
        return Err(FetchFailure::Shape("empty response body".to_owned()));
    }
    serde_json::from_str(&body)
        .map_err(|e| FetchFailure::Shape(format!("response body is not JSON: {e}")))
}

/// Reads a field that providers send either as a JSON string or a number.
pub(crate) fn string_or_number(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
