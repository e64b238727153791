//! The uniform JSON envelope every backend response follows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message placed in the synthesized envelope when a 401 forces logout.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Substring the backend uses to reject logins from unverified accounts.
const UNVERIFIED_ACCOUNT_MARKER: &str = "account is not verified";

/// Standardized `{success, message, data, errors}` wrapper.
///
/// `success: false` means `data` must not be trusted; `errors` is keyed by
/// field name so callers can map failures back onto individual form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, FieldError>>,
}

/// One field's validation errors, in any of the shapes the backend emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldError {
    Single(String),
    Many(Vec<String>),
    Nested(BTreeMap<String, FieldError>),
}

impl<T> ApiResponse<T> {
    /// The fixed failure envelope returned in place of a raw 401 body.
    ///
    /// Every caller of an authenticated request sees this exact shape when
    /// the session expires, never an arbitrary backend error body.
    pub fn session_expired() -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(
            "detail".to_string(),
            FieldError::Single("Authentication required".to_string()),
        );
        Self {
            success: false,
            message: SESSION_EXPIRED_MESSAGE.to_string(),
            data: None,
            errors: Some(errors),
        }
    }

    /// Per-field messages, one string per field, for form display.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        self.errors.as_ref().map(normalize_errors).unwrap_or_default()
    }

    /// The first available error message, for callers that show one line.
    ///
    /// Prefers `non_field_errors`, then any field error, then the top-level
    /// message.
    pub fn first_error(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let normalized = self.field_errors();
        normalized
            .get("non_field_errors")
            .cloned()
            .or_else(|| normalized.values().next().cloned())
            .or_else(|| {
                if self.message.is_empty() {
                    None
                } else {
                    Some(self.message.clone())
                }
            })
    }

    /// Whether this rejection means the account exists but is unverified.
    ///
    /// The backend signals this with a `non_field_errors` entry rather than a
    /// dedicated status; callers route the user to OTP verification instead
    /// of showing a generic failure.
    pub fn needs_verification(&self) -> bool {
        if self.success {
            return false;
        }
        self.errors
            .as_ref()
            .and_then(|errors| errors.get("non_field_errors"))
            .map(flatten_field_error)
            .is_some_and(|msg| msg.contains(UNVERIFIED_ACCOUNT_MARKER))
    }
}

/// Collapse the backend's loose error shapes into one string per field.
///
/// Lists keep their first entry; nested objects recurse into their first key
/// (map order). Empty lists drop the field entirely.
pub fn normalize_errors(errors: &BTreeMap<String, FieldError>) -> BTreeMap<String, String> {
    errors
        .iter()
        .filter_map(|(field, error)| {
            let message = flatten_field_error(error);
            if message.is_empty() {
                None
            } else {
                Some((field.clone(), message))
            }
        })
        .collect()
}

fn flatten_field_error(error: &FieldError) -> String {
    match error {
        FieldError::Single(message) => message.clone(),
        FieldError::Many(messages) => messages.first().cloned().unwrap_or_default(),
        FieldError::Nested(nested) => nested
            .values()
            .next()
            .map(flatten_field_error)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ApiResponse<serde_json::Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn envelope_parses_success_with_data() {
        let resp = parse(json!({
            "success": true,
            "message": "Login successful.",
            "data": {"user": {"id": 1}}
        }));
        assert!(resp.success);
        assert!(resp.data.is_some());
        assert!(resp.errors.is_none());
    }

    #[test]
    fn envelope_parses_string_and_list_errors() {
        let resp = parse(json!({
            "success": false,
            "message": "Login failed.",
            "errors": {
                "email": ["Invalid email or password."],
                "detail": "Authentication required"
            }
        }));
        let normalized = resp.field_errors();
        assert_eq!(
            normalized.get("email").map(String::as_str),
            Some("Invalid email or password.")
        );
        assert_eq!(
            normalized.get("detail").map(String::as_str),
            Some("Authentication required")
        );
    }

    #[test]
    fn normalize_recurses_into_nested_objects() {
        let resp = parse(json!({
            "success": false,
            "message": "Failed.",
            "errors": {
                "tokens": {"refresh": ["This field is required."]}
            }
        }));
        let normalized = resp.field_errors();
        assert_eq!(
            normalized.get("tokens").map(String::as_str),
            Some("This field is required.")
        );
    }

    #[test]
    fn normalize_drops_empty_lists() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), FieldError::Many(vec![]));
        assert!(normalize_errors(&errors).is_empty());
    }

    #[test]
    fn session_expired_has_fixed_shape() {
        let resp = ApiResponse::<serde_json::Value>::session_expired();
        assert!(!resp.success);
        assert_eq!(resp.message, SESSION_EXPIRED_MESSAGE);
        assert!(resp.data.is_none());
        assert_eq!(
            resp.field_errors().get("detail").map(String::as_str),
            Some("Authentication required")
        );
    }

    #[test]
    fn first_error_prefers_non_field_errors() {
        let resp = parse(json!({
            "success": false,
            "message": "Login failed.",
            "errors": {
                "email": ["Bad email."],
                "non_field_errors": ["Invalid email or password."]
            }
        }));
        assert_eq!(
            resp.first_error().as_deref(),
            Some("Invalid email or password.")
        );
    }

    #[test]
    fn first_error_falls_back_to_message() {
        let resp = parse(json!({"success": false, "message": "Invalid token."}));
        assert_eq!(resp.first_error().as_deref(), Some("Invalid token."));
    }

    #[test]
    fn needs_verification_detects_marker() {
        let resp = parse(json!({
            "success": false,
            "message": "Login failed. Please check your credentials.",
            "errors": {
                "non_field_errors": [
                    "Your account is not verified. Please verify your email with the OTP code sent to your email address."
                ]
            }
        }));
        assert!(resp.needs_verification());
    }

    #[test]
    fn needs_verification_ignores_other_failures() {
        let resp = parse(json!({
            "success": false,
            "message": "Login failed.",
            "errors": {"non_field_errors": ["Invalid email or password."]}
        }));
        assert!(!resp.needs_verification());
    }
}
