//! Client credentials registered with a provider.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Immutable client registration used for every token exchange.
///
/// Values are supplied at construction and shared read-only across concurrent logins;
/// nothing here is ever read from the environment implicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret sent in the token request body.
	pub client_secret: TokenSecret,
	/// Token endpoint the authorization code is exchanged at.
	pub token_endpoint: Url,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
}
impl ProviderCredentials {
	/// Creates a new credential set.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		token_endpoint: Url,
		redirect_uri: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			token_endpoint,
			redirect_uri,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_hides_secret() {
		let credentials = ProviderCredentials::new(
			"app",
			"key",
			Url::parse("https://accounts.google.com/o/oauth2/token")
				.expect("Token endpoint fixture should parse."),
			Url::parse("http://localhost/account").expect("Redirect fixture should parse."),
		);
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("app"));
		assert!(!rendered.contains("\"key\""));
		assert!(rendered.contains("<redacted>"));
	}
}
