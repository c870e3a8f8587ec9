//! Error detection over decoded responses.
//!
//! The provider reports failures through several unrelated conventions and
//! nearly always with HTTP 200. Each convention is checked on its own so a
//! field that is present but unset never hides a later one.

use crate::request::Action;
use crate::response::DecodedResponse;

pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";
pub const NO_RESULT: &str = "No result returned from the API";
pub const UNKNOWN_FORMAT: &str = "unknown response format";
pub const AUTHENTICATION_FAILED: &str = "Authentication Failed. Please check your API Username and Key.";

/// Longest slice of an unparseable body carried into an error message.
const MAX_BODY_EXCERPT: usize = 500;

/// Why a response does not count as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFault {
    /// The provider reported a failure; the message is meant for the user.
    Provider(String),
    /// The body is not a recognizable answer; the message is diagnostic.
    Malformed(String),
}

/// Classifies a decoded response of `action`.
///
/// Checks run in a fixed order and the first one that matches decides.
pub fn classify(action: Action, response: &dyn DecodedResponse) -> Result<(), ResponseFault> {
    if let Some(message) = response.get("error").and_then(|value| value.to_message()) {
        return Err(ResponseFault::Provider(message));
    }

    if let Some(message) = status_failure(response) {
        return Err(ResponseFault::Provider(message));
    }

    if let Some(message) = wrapper_failure(response) {
        return Err(ResponseFault::Provider(message));
    }

    if action.checks_result_text() {
        if let Some(message) = result_text_failure(response) {
            return Err(ResponseFault::Provider(message));
        }
    }

    if missing_result(action, response) {
        return Err(ResponseFault::Provider(NO_RESULT.to_string()));
    }

    if !has_known_shape(action, response) {
        return Err(ResponseFault::Malformed(UNKNOWN_FORMAT.to_string()));
    }

    Ok(())
}

/// Classifies a body that did not decode at all.
///
/// Some failures, authentication in particular, come back as plain text.
pub fn classify_unparsed(body: &str) -> ResponseFault {
    let trimmed = body.trim();
    let lower = trimmed.to_lowercase();

    if lower.contains("authentication failed") {
        return ResponseFault::Provider(AUTHENTICATION_FAILED.to_string());
    }
    if ["error", "failed", "denied"].iter().any(|word| lower.contains(word)) {
        return ResponseFault::Provider(excerpt(trimmed));
    }
    ResponseFault::Malformed(format!("unparseable response: {}", excerpt(trimmed)))
}

/// `status` or `result.status` equal to 0 or false.
fn status_failure(response: &dyn DecodedResponse) -> Option<String> {
    for prefix in ["", "result."] {
        let failed = response
            .get(&format!("{}status", prefix))
            .is_some_and(|status| status.is_zero_or_false());
        if failed {
            let message = response
                .get(&format!("{}statusmsg", prefix))
                .and_then(|value| value.to_message())
                .or_else(|| {
                    response
                        .get(&format!("{}errors", prefix))
                        .and_then(|value| value.to_message())
                })
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Some(message);
        }
    }
    None
}

/// Legacy `cpanelresult` wrapper.
fn wrapper_failure(response: &dyn DecodedResponse) -> Option<String> {
    if let Some(message) = response.get("cpanelresult.error").and_then(|value| value.to_message()) {
        return Some(message);
    }

    let failed = response
        .get("cpanelresult.data.result")
        .is_some_and(|result| result.is_zero_or_false());
    failed.then(|| {
        response
            .get_text("cpanelresult.data.reason")
            .or_else(|| response.get_text("cpanelresult.error"))
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
    })
}

/// A top-level `result` string announcing a failure.
fn result_text_failure(response: &dyn DecodedResponse) -> Option<String> {
    let text = response.get_text("result")?;
    let lower = text.to_lowercase();
    (lower.contains("failed") || lower.contains("error")).then_some(text)
}

/// The field that should carry the answer is explicitly null.
fn missing_result(action: Action, response: &dyn DecodedResponse) -> bool {
    let list_is_null = action
        .list_field()
        .and_then(|field| response.get(field))
        .is_some_and(|value| value.is_null());
    list_is_null
        || response
            .get("cpanelresult.data")
            .is_some_and(|value| value.is_null())
}

/// None of the fields a successful answer would carry is present.
fn has_known_shape(action: Action, response: &dyn DecodedResponse) -> bool {
    ["result", "cpanelresult", "status"]
        .iter()
        .chain(action.success_fields())
        .any(|field| response.has_field(field))
        || (action.accepts_root_list() && response.root_items().is_some())
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_EXCERPT {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX_BODY_EXCERPT).collect();
        format!("{}...", cut)
    }
}
