//! Authorization code extraction from inbound callback requests.

// crates.io
use oauth2::http::{Request, Uri};
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ProviderError, http::Endpoint};

const CODE_PARAM: &str = "code";
const ERROR_PARAM: &str = "error";
const ERROR_DESCRIPTION_PARAM: &str = "error_description";

/// Read access to the query string of an inbound callback request.
///
/// Implemented for the request/URI types callers typically already hold so the login
/// never has to know which server framework routed the request.
pub trait InboundRequest {
	/// Raw query string without the leading `?`, if any.
	fn query(&self) -> Option<&str>;

	/// First value of the query parameter `name`, percent-decoded.
	fn query_param(&self, name: &str) -> Option<String> {
		form_urlencoded::parse(self.query()?.as_bytes())
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.into_owned())
	}
}
impl InboundRequest for Url {
	fn query(&self) -> Option<&str> {
		Url::query(self)
	}
}
impl InboundRequest for Uri {
	fn query(&self) -> Option<&str> {
		Uri::query(self)
	}
}
impl<B> InboundRequest for Request<B> {
	fn query(&self) -> Option<&str> {
		self.uri().query()
	}
}
impl InboundRequest for str {
	fn query(&self) -> Option<&str> {
		let query = self.split_once('?').map_or(self, |(_, query)| query);

		(!query.is_empty()).then_some(query)
	}
}

/// One-time authorization code issued by the provider's authorization endpoint.
///
/// Always non-blank; Debug and Display output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode(TokenSecret);
impl AuthorizationCode {
	/// Wraps a raw code, rejecting blank values with [`Error::MissingCode`].
	pub fn new(value: impl Into<String>) -> Result<Self> {
		let value = value.into();

		if value.trim().is_empty() {
			return Err(Error::MissingCode);
		}

		Ok(Self(TokenSecret::new(value)))
	}

	/// Extracts the `code` query parameter from a callback request.
	///
	/// A callback without a code that carries an OAuth `error` parameter (for example the
	/// user declined consent) fails with the provider's error instead of
	/// [`Error::MissingCode`]. Either way no network call is involved.
	pub fn from_request<R>(request: &R) -> Result<Self>
	where
		R: ?Sized + InboundRequest,
	{
		match request.query_param(CODE_PARAM).map(Self::new) {
			Some(Ok(code)) => Ok(code),
			Some(Err(_)) | None => Err(callback_error(request).unwrap_or(Error::MissingCode)),
		}
	}

	/// Returns the raw code. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}
impl Debug for AuthorizationCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthorizationCode").field(&"<redacted>").finish()
	}
}

fn callback_error<R>(request: &R) -> Option<Error>
where
	R: ?Sized + InboundRequest,
{
	let reason = request.query_param(ERROR_PARAM).filter(|value| !value.trim().is_empty())?;
	let message = request
		.query_param(ERROR_DESCRIPTION_PARAM)
		.filter(|value| !value.trim().is_empty())
		.unwrap_or_else(|| reason.clone());

	Some(ProviderError::new(Endpoint::Authorization, message).with_reason(reason).into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn extracts_code_from_supported_request_types() {
		let url = Url::parse("https://app.example.com/callback?state=s&code=4%2F0Ab")
			.expect("Callback URL fixture should parse.");

		assert_eq!(
			AuthorizationCode::from_request(&url).expect("Code should be extracted.").expose(),
			"4/0Ab"
		);

		let request = Request::builder()
			.uri("/callback?code=code")
			.body(())
			.expect("Request fixture should build.");

		assert_eq!(
			AuthorizationCode::from_request(&request).expect("Code should be extracted.").expose(),
			"code"
		);
		assert_eq!(
			AuthorizationCode::from_request("?code=code").expect("Code should be extracted.").expose(),
			"code"
		);
	}

	#[test]
	fn missing_or_blank_code_is_rejected() {
		for query in ["", "?", "?state=abc", "?code=", "?code=%20%20"] {
			let err = AuthorizationCode::from_request(query)
				.expect_err("Blank or missing codes must be rejected.");

			assert!(matches!(err, Error::MissingCode), "Unexpected error for {query:?}: {err:?}.");
		}
	}

	#[test]
	fn denied_consent_surfaces_provider_error() {
		let err = AuthorizationCode::from_request(
			"/callback?error=access_denied&error_description=User+declined",
		)
		.expect_err("Denied consent must fail.");

		match err {
			Error::Provider(err) => {
				assert_eq!(err.endpoint, Endpoint::Authorization);
				assert_eq!(err.message, "User declined");
				assert_eq!(err.reason.as_deref(), Some("access_denied"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn debug_output_is_redacted() {
		let code = AuthorizationCode::new("secret-code").expect("Code fixture should be valid.");

		assert_eq!(format!("{code:?}"), "AuthorizationCode(\"<redacted>\")");
	}
}
