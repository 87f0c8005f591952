//! Normalized identities produced by a successful login.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderId},
};

const URN_SCHEME: &str = "urn";

/// Errors raised while constructing or parsing a [`Urn`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum UrnError {
	/// The value does not start with `urn:`.
	#[error("URN must start with `urn:`.")]
	MissingScheme,
	/// The provider segment is invalid.
	#[error(transparent)]
	Provider(#[from] IdentifierError),
	/// The provider-native identifier is blank.
	#[error("URN is missing the provider-native identifier.")]
	EmptyId,
}

/// Provider-qualified stable user identifier rendered as `urn:<provider>:<id>`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
	provider: ProviderId,
	id: String,
}
impl Urn {
	/// Creates a URN from a provider and its native user identifier.
	pub fn new(provider: ProviderId, id: impl Into<String>) -> Result<Self, UrnError> {
		let id = id.into();

		if id.trim().is_empty() {
			return Err(UrnError::EmptyId);
		}

		Ok(Self { provider, id })
	}

	/// Provider segment.
	pub fn provider(&self) -> &ProviderId {
		&self.provider
	}

	/// Provider-native identifier segment.
	pub fn id(&self) -> &str {
		&self.id
	}
}
impl Debug for Urn {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Urn({self})")
	}
}
impl Display for Urn {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{URN_SCHEME}:{}:{}", self.provider, self.id)
	}
}
impl FromStr for Urn {
	type Err = UrnError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let rest = s
			.strip_prefix(URN_SCHEME)
			.and_then(|rest| rest.strip_prefix(':'))
			.ok_or(UrnError::MissingScheme)?;
		// Provider ids never contain `:`, so everything after the first separator is the id.
		let (provider, id) = rest.split_once(':').ok_or(UrnError::EmptyId)?;

		Self::new(ProviderId::new(provider)?, id)
	}
}
impl TryFrom<String> for Urn {
	type Error = UrnError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<Urn> for String {
	fn from(value: Urn) -> Self {
		value.to_string()
	}
}
impl PartialEq<str> for Urn {
	fn eq(&self, other: &str) -> bool {
		other
			.strip_prefix(URN_SCHEME)
			.and_then(|rest| rest.strip_prefix(':'))
			.and_then(|rest| rest.split_once(':'))
			.is_some_and(|(provider, id)| provider == &*self.provider && id == self.id)
	}
}
impl PartialEq<&str> for Urn {
	fn eq(&self, other: &&str) -> bool {
		self == *other
	}
}

/// Authenticated user, independent of the provider that vouched for them.
///
/// An identity only exists once every required field has been mapped, so the URN is
/// always present; callers own its lifecycle (session storage, etc.).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	urn: Urn,
	properties: BTreeMap<String, String>,
}
impl Identity {
	/// Creates an identity from a URN and its normalized properties.
	pub fn new(urn: Urn, properties: BTreeMap<String, String>) -> Self {
		Self { urn, properties }
	}

	/// Stable provider-qualified identifier.
	pub fn urn(&self) -> &Urn {
		&self.urn
	}

	/// Normalized properties (`name`, `picture`, ...).
	pub fn properties(&self) -> &BTreeMap<String, String> {
		&self.properties
	}

	/// Looks up a single property.
	pub fn property(&self, key: &str) -> Option<&str> {
		self.properties.get(key).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn google() -> ProviderId {
		ProviderId::new("google").expect("Provider fixture should be valid.")
	}

	#[test]
	fn urn_renders_and_parses() {
		let urn = Urn::new(google(), "1").expect("URN fixture should be valid.");

		assert_eq!(urn.to_string(), "urn:google:1");
		assert_eq!(urn, "urn:google:1");
		assert_eq!("urn:google:1".parse::<Urn>(), Ok(urn));

		let nested: Urn = "urn:mastodon:user:42".parse().expect("Ids may contain separators.");

		assert_eq!(nested.provider().as_ref(), "mastodon");
		assert_eq!(nested.id(), "user:42");
	}

	#[test]
	fn urn_rejects_invalid_values() {
		assert_eq!("google:1".parse::<Urn>(), Err(UrnError::MissingScheme));
		assert_eq!("urn:google".parse::<Urn>(), Err(UrnError::EmptyId));
		assert_eq!("urn:google:".parse::<Urn>(), Err(UrnError::EmptyId));
		assert_eq!("urn::1".parse::<Urn>(), Err(UrnError::Provider(IdentifierError::Empty)));
		assert_eq!(Urn::new(google(), " "), Err(UrnError::EmptyId));
	}

	#[test]
	fn identity_serializes_for_sessions() {
		let identity = Identity::new(
			Urn::new(google(), "1").expect("URN fixture should be valid."),
			BTreeMap::from([("name".to_owned(), "octocat".to_owned())]),
		);
		let json = serde_json::to_string(&identity).expect("Identity should serialize.");

		assert_eq!(json, r#"{"urn":"urn:google:1","properties":{"name":"octocat"}}"#);

		let restored: Identity = serde_json::from_str(&json).expect("Identity should deserialize.");

		assert_eq!(restored, identity);
		assert_eq!(restored.property("name"), Some("octocat"));
		assert_eq!(restored.property("picture"), None);
		assert!(serde_json::from_str::<Identity>(r#"{"urn":"nope","properties":{}}"#).is_err());
	}
}
