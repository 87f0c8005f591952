// crates.io
use url::ParseError;
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	document::{FieldPath, FieldPathError},
	provider::{
		FieldRule, Presence, ProfileMapping, ProfileMappingError, ProviderDescriptor,
		ProviderEndpoints, ProviderQuirks, TokenPlacement,
	},
};

const DEFAULT_ID_FIELD: &str = "id";

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required for the anonymous redirect.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Profile endpoint is mandatory.
	#[error("Missing profile endpoint.")]
	MissingProfileEndpoint,
	/// An endpoint string failed to parse.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Parser failure.
		#[source]
		source: ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
	/// The token response key cannot be blank.
	#[error("Access token key cannot be empty.")]
	EmptyAccessTokenKey,
	/// The profile query parameter cannot be blank.
	#[error("Access token query parameter cannot be empty.")]
	EmptyTokenParameter,
	/// A profile field path failed to parse.
	#[error("Invalid profile field path for `{key}`.")]
	InvalidFieldPath {
		/// Property key (or `id`) whose path was rejected.
		key: String,
		/// Parser failure.
		#[source]
		source: FieldPathError,
	},
	/// The field table is inconsistent.
	#[error(transparent)]
	InvalidMapping(#[from] ProfileMappingError),
}

/// Values accepted wherever the builder expects an endpoint.
pub trait IntoEndpoint {
	/// Converts the value into a URL.
	fn into_endpoint(self) -> Result<Url, ParseError>;
}
impl IntoEndpoint for Url {
	fn into_endpoint(self) -> Result<Url, ParseError> {
		Ok(self)
	}
}
impl IntoEndpoint for &Url {
	fn into_endpoint(self) -> Result<Url, ParseError> {
		Ok(self.clone())
	}
}
impl IntoEndpoint for &str {
	fn into_endpoint(self) -> Result<Url, ParseError> {
		Url::parse(self)
	}
}
impl IntoEndpoint for String {
	fn into_endpoint(self) -> Result<Url, ParseError> {
		Url::parse(&self)
	}
}

/// Builder for [`ProviderDescriptor`] values.
///
/// Endpoints and field paths are accepted in raw form and checked by [`build`](Self::build),
/// so presets and configuration code can chain setters without handling errors midway.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	id: ProviderId,
	authorization_endpoint: Option<Result<Url, ParseError>>,
	token_endpoint: Option<Result<Url, ParseError>>,
	profile_endpoint: Option<Result<Url, ParseError>>,
	scopes: Vec<String>,
	id_field: String,
	fields: Vec<(String, String, Presence)>,
	quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorization_endpoint: None,
			token_endpoint: None,
			profile_endpoint: None,
			scopes: Vec::new(),
			id_field: DEFAULT_ID_FIELD.into(),
			fields: Vec::new(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: impl IntoEndpoint) -> Self {
		self.authorization_endpoint = Some(url.into_endpoint());

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: impl IntoEndpoint) -> Self {
		self.token_endpoint = Some(url.into_endpoint());

		self
	}

	/// Sets the profile endpoint.
	pub fn profile_endpoint(mut self, url: impl IntoEndpoint) -> Self {
		self.profile_endpoint = Some(url.into_endpoint());

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the path of the provider-native user id (defaults to `id`).
	pub fn id_field(mut self, path: impl Into<String>) -> Self {
		self.id_field = path.into();

		self
	}

	/// Maps a property that must be present.
	pub fn required_field(self, key: impl Into<String>, path: impl Into<String>) -> Self {
		self.field(key, path, Presence::Required)
	}

	/// Maps a property that falls back to `fallback` when absent.
	pub fn field_with_default(
		self,
		key: impl Into<String>,
		path: impl Into<String>,
		fallback: impl Into<String>,
	) -> Self {
		self.field(key, path, Presence::Default(fallback.into()))
	}

	/// Maps a property that is omitted when absent.
	pub fn optional_field(self, key: impl Into<String>, path: impl Into<String>) -> Self {
		self.field(key, path, Presence::Optional)
	}

	/// Maps a property with an explicit absence policy.
	pub fn field(
		mut self,
		key: impl Into<String>,
		path: impl Into<String>,
		presence: Presence,
	) -> Self {
		self.fields.push((key.into(), path.into(), presence));

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Overrides only the access-token placement on profile requests.
	pub fn token_placement(mut self, placement: TokenPlacement) -> Self {
		self.quirks.token_placement = placement;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = resolve_endpoint(
			"authorization",
			self.authorization_endpoint,
			ProviderDescriptorError::MissingAuthorizationEndpoint,
		)?;
		let token =
			resolve_endpoint("token", self.token_endpoint, ProviderDescriptorError::MissingTokenEndpoint)?;
		let profile = resolve_endpoint(
			"profile",
			self.profile_endpoint,
			ProviderDescriptorError::MissingProfileEndpoint,
		)?;
		let fields = self
			.fields
			.into_iter()
			.map(|(key, path, presence)| {
				let path = parse_path(&key, &path)?;

				Ok(FieldRule { key, path, presence })
			})
			.collect::<Result<Vec<_>, ProviderDescriptorError>>()?;
		let mapping = ProfileMapping { id: parse_path(DEFAULT_ID_FIELD, &self.id_field)?, fields };
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints: ProviderEndpoints { authorization, token, profile },
			scopes: self.scopes,
			mapping,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn resolve_endpoint(
	endpoint: &'static str,
	value: Option<Result<Url, ParseError>>,
	missing: ProviderDescriptorError,
) -> Result<Url, ProviderDescriptorError> {
	value
		.ok_or(missing)?
		.map_err(|source| ProviderDescriptorError::InvalidEndpoint { endpoint, source })
}

fn parse_path(key: &str, path: &str) -> Result<FieldPath, ProviderDescriptorError> {
	FieldPath::parse(path)
		.map_err(|source| ProviderDescriptorError::InvalidFieldPath { key: key.to_owned(), source })
}
