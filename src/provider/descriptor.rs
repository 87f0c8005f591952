//! Provider descriptor data structures shared by every login.
//!
//! A descriptor is plain data: endpoints, requested scopes, the profile field table, and
//! quirks. It derives serde so deployments can keep provider tables in configuration, and
//! the builder validates the same invariants [`ProviderDescriptor::validate`] checks for
//! deserialized values.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::{ProviderCredentials, ProviderId},
	provider::ProfileMapping,
};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint anonymous users are redirected to.
	pub authorization: Url,
	/// Token endpoint that exchanges authorization codes.
	pub token: Url,
	/// Resource endpoint returning the authenticated user's profile.
	pub profile: Url,
}

/// Immutable provider descriptor consumed by logins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier; the provider segment of every URN.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Scopes requested on the authorization redirect.
	#[serde(default)]
	pub scopes: Vec<String>,
	/// Profile field table.
	pub mapping: ProfileMapping,
	/// Provider-specific quirks.
	#[serde(default)]
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Builds the credential set for this provider's token endpoint.
	pub fn credentials(
		&self,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
	) -> ProviderCredentials {
		ProviderCredentials::new(client_id, client_secret, self.endpoints.token.clone(), redirect_uri)
	}

	/// Scopes joined with the provider's delimiter.
	pub fn scope_param(&self) -> String {
		let mut delimiter = [0; 4];
		let delimiter = self.quirks.scope_delimiter.encode_utf8(&mut delimiter);

		self.scopes.join(delimiter)
	}

	/// Validates invariants; deserialized descriptors should be checked before use.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("profile", &self.endpoints.profile)?;
		validate_scope_delimiter(self.quirks.scope_delimiter)?;

		if self.quirks.access_token_key.trim().is_empty() {
			return Err(ProviderDescriptorError::EmptyAccessTokenKey);
		}
		if matches!(
			&self.quirks.token_placement,
			TokenPlacement::Query { parameter } if parameter.trim().is_empty()
		) {
			return Err(ProviderDescriptorError::EmptyTokenParameter);
		}

		self.mapping.validate()?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

fn validate_scope_delimiter(delimiter: char) -> Result<(), ProviderDescriptorError> {
	if delimiter.is_control() {
		Err(ProviderDescriptorError::InvalidScopeDelimiter { delimiter })
	} else {
		Ok(())
	}
}
