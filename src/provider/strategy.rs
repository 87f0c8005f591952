//! Provider strategy hooks that customize token exchanges and inspect payloads.
//!
//! Implementations decorate outgoing token requests and recognize provider error payloads
//! without tying logins to any particular HTTP client.

// self
use crate::{_prelude::*, document::scalar_text, error::ProviderError, http::Endpoint};

const ERROR_KEY: &str = "error";
const FALLBACK_MESSAGE: &str = "Provider reported an error without a message.";

/// Strategy hook that allows providers to decorate requests and recognize error payloads.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data types
/// so downstream crates never depend on reqwest-specific structures. Override only what
/// you need; every hook has a default.
pub trait ProviderStrategy: Send + Sync {
	/// Inspects a parsed JSON object returned by `endpoint` for an error indicator.
	///
	/// Returning `Some` aborts the login with [`Error::Provider`] before the payload is
	/// interpreted any further. The default applies [`detect_error_payload`].
	fn detect_error_payload(&self, endpoint: Endpoint, payload: &Value) -> Option<ProviderError> {
		detect_error_payload(endpoint, payload)
	}

	/// Gives providers a chance to add custom form parameters before dispatching.
	///
	/// The default implementation does nothing, which is enough for most providers.
	fn augment_token_request(&self, _form: &mut BTreeMap<String, String>) {}
}

/// Default strategy relying on the shared error-payload conventions.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {}

/// Recognizes the two common shapes of the top-level `error` key.
///
/// * Object form (Google, Facebook): the message comes from `error.message`, else the
///   top-level `message`; the code from `error.code`, else the top-level `code`; the reason
///   from `error.errors[0].reason`, else `error.type` or `error.status`.
/// * String form (RFC 6749): the string is the reason and `error_description`, when
///   present, the message.
///
/// `null`, `false`, and empty strings are not errors.
pub fn detect_error_payload(endpoint: Endpoint, payload: &Value) -> Option<ProviderError> {
	let top = payload.as_object()?;

	match top.get(ERROR_KEY)? {
		Value::Object(error) => {
			let reason = error
				.get("errors")
				.and_then(|errors| errors.get(0))
				.and_then(|first| first.get("reason"))
				.and_then(scalar_text)
				.or_else(|| error.get("type").and_then(scalar_text))
				.or_else(|| error.get("status").and_then(scalar_text));
			let message = error
				.get("message")
				.and_then(scalar_text)
				.or_else(|| top.get("message").and_then(scalar_text))
				.or_else(|| reason.clone())
				.unwrap_or_else(|| FALLBACK_MESSAGE.into());
			let code = error
				.get("code")
				.and_then(Value::as_i64)
				.or_else(|| top.get("code").and_then(Value::as_i64));
			let mut detected = ProviderError::new(endpoint, message);

			detected.code = code;
			detected.reason = reason;

			Some(detected)
		},
		Value::String(reason) if !reason.is_empty() => {
			let message = top
				.get("error_description")
				.and_then(scalar_text)
				.unwrap_or_else(|| reason.clone());

			Some(ProviderError::new(endpoint, message).with_reason(reason.clone()))
		},
		Value::Null | Value::Bool(false) | Value::String(_) => None,
		_ => {
			let message =
				top.get("message").and_then(scalar_text).unwrap_or_else(|| FALLBACK_MESSAGE.into());

			Some(ProviderError::new(endpoint, message))
		},
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn google_style_error_objects_are_detected() {
		let payload = json!({
			"error": {
				"errors": [{
					"domain": "usageLimits",
					"reason": "accessNotConfigured",
					"extendedHelp": "https://developers.google.com",
				}],
			},
			"code": 400,
			"message": "Access Not Configured.",
		});
		let err = DefaultProviderStrategy
			.detect_error_payload(Endpoint::Profile, &payload)
			.expect("Google error payload should be detected.");

		assert_eq!(err.endpoint, Endpoint::Profile);
		assert_eq!(err.message, "Access Not Configured.");
		assert_eq!(err.code, Some(400));
		assert_eq!(err.reason.as_deref(), Some("accessNotConfigured"));
	}

	#[test]
	fn facebook_style_error_objects_are_detected() {
		let payload = json!({
			"error": {
				"message": "Invalid OAuth access token.",
				"type": "OAuthException",
				"code": 190,
			},
		});
		let err = detect_error_payload(Endpoint::Profile, &payload)
			.expect("Facebook error payload should be detected.");

		assert_eq!(err.message, "Invalid OAuth access token.");
		assert_eq!(err.code, Some(190));
		assert_eq!(err.reason.as_deref(), Some("OAuthException"));
	}

	#[test]
	fn oauth_string_errors_are_detected() {
		let payload = json!({
			"error": "bad_verification_code",
			"error_description": "The code passed is incorrect or expired.",
		});
		let err = detect_error_payload(Endpoint::Token, &payload)
			.expect("String error payload should be detected.");

		assert_eq!(err.message, "The code passed is incorrect or expired.");
		assert_eq!(err.reason.as_deref(), Some("bad_verification_code"));
		assert_eq!(err.code, None);

		let err = detect_error_payload(Endpoint::Token, &json!({ "error": "invalid_grant" }))
			.expect("Bare string errors should be detected.");

		assert_eq!(err.message, "invalid_grant");
	}

	#[test]
	fn ordinary_payloads_pass() {
		for payload in [
			json!({ "id": "1", "displayName": "octocat" }),
			json!({ "id": "1", "error": null }),
			json!({ "id": "1", "error": "" }),
			json!({ "id": "1", "error": false }),
			json!([{ "error": "not top level" }]),
		] {
			assert_eq!(detect_error_payload(Endpoint::Profile, &payload), None, "{payload}");
		}
	}

	#[test]
	fn unusual_indicators_still_fail() {
		let err = detect_error_payload(Endpoint::Profile, &json!({ "error": true }))
			.expect("Truthy indicators should be detected.");

		assert_eq!(err.message, FALLBACK_MESSAGE);
	}
}
