// self
use crate::_prelude::*;

const DEFAULT_ACCESS_TOKEN_KEY: &str = "access_token";

/// How the access token is attached to the profile request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenPlacement {
	/// Appended as a query parameter (`?access_token=...`).
	Query {
		/// Query parameter name.
		parameter: String,
	},
	/// Sent as `Authorization: Bearer <token>`.
	BearerHeader,
}
impl Default for TokenPlacement {
	fn default() -> Self {
		Self::Query { parameter: DEFAULT_ACCESS_TOKEN_KEY.into() }
	}
}

/// Provider-specific quirks that influence how requests are built and parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Key holding the access token in the token endpoint's JSON response.
	pub access_token_key: String,
	/// Where the access token goes on the profile request.
	pub token_placement: TokenPlacement,
	/// Character used to join scopes when constructing `scope` parameters.
	pub scope_delimiter: char,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			access_token_key: DEFAULT_ACCESS_TOKEN_KEY.into(),
			token_placement: TokenPlacement::default(),
			scope_delimiter: ' ',
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn quirks_deserialize_with_defaults() {
		let quirks: ProviderQuirks = serde_json::from_str(r#"{"scope_delimiter":","}"#)
			.expect("Partial quirks should deserialize.");

		assert_eq!(quirks.access_token_key, "access_token");
		assert_eq!(quirks.scope_delimiter, ',');
		assert_eq!(quirks.token_placement, TokenPlacement::Query { parameter: "access_token".into() });

		let quirks: ProviderQuirks =
			serde_json::from_str(r#"{"token_placement":{"kind":"bearer_header"}}"#)
				.expect("Bearer placement should deserialize.");

		assert_eq!(quirks.token_placement, TokenPlacement::BearerHeader);
	}
}
