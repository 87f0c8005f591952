//! Ready-made descriptor builders for well-known providers.
//!
//! Each preset returns a [`ProviderDescriptorBuilder`] so endpoints (for example a mock
//! server in tests) or scopes can be overridden before [`build`](ProviderDescriptorBuilder::build).

// self
use crate::{
	auth::ProviderId,
	provider::{ProviderDescriptorBuilder, ProviderQuirks, TokenPlacement},
};

const UNKNOWN: &str = "unknown";

/// Google (`urn:google:<id>`); the token travels as the `access_token` query parameter.
pub fn google() -> ProviderDescriptorBuilder {
	ProviderDescriptorBuilder::new(ProviderId::from_static("google"))
		.authorization_endpoint("https://accounts.google.com/o/oauth2/auth")
		.token_endpoint("https://accounts.google.com/o/oauth2/token")
		.profile_endpoint("https://www.googleapis.com/plus/v1/people/me")
		.scopes(["https://www.googleapis.com/auth/userinfo.profile"])
		.field_with_default("name", "displayName", UNKNOWN)
		.optional_field("picture", "image.url")
}

/// GitHub (`urn:github:<id>`); numeric ids are rendered as text.
pub fn github() -> ProviderDescriptorBuilder {
	ProviderDescriptorBuilder::new(ProviderId::from_static("github"))
		.authorization_endpoint("https://github.com/login/oauth/authorize")
		.token_endpoint("https://github.com/login/oauth/access_token")
		.profile_endpoint("https://api.github.com/user")
		.scopes(["read:user"])
		.token_placement(TokenPlacement::BearerHeader)
		.field_with_default("name", "name", UNKNOWN)
		.optional_field("login", "login")
		.optional_field("picture", "avatar_url")
}

/// Facebook (`urn:facebook:<id>`); scopes are comma separated.
pub fn facebook() -> ProviderDescriptorBuilder {
	ProviderDescriptorBuilder::new(ProviderId::from_static("facebook"))
		.authorization_endpoint("https://www.facebook.com/dialog/oauth")
		.token_endpoint("https://graph.facebook.com/oauth/access_token")
		.profile_endpoint("https://graph.facebook.com/me?fields=id,name,picture")
		.scopes(["public_profile"])
		.quirks(ProviderQuirks { scope_delimiter: ',', ..Default::default() })
		.field_with_default("name", "name", UNKNOWN)
		.optional_field("picture", "picture.data.url")
}
