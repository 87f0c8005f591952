//! Declarative profile field tables and the mapper that applies them.
//!
//! Every provider returns a differently shaped profile. A [`ProfileMapping`] names where
//! the native user id lives and how each normalized property is sourced, so the mapping
//! logic itself stays provider-agnostic.

// std
use std::collections::BTreeSet;
// self
use crate::{
	_prelude::*,
	auth::{Identity, ProviderId, Urn},
	document::{FieldPath, ProfileDocument},
	error::MalformedResponse,
	http::Endpoint,
};

/// What happens when a mapped field is absent from the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
	/// The login fails with [`MalformedResponse::MissingField`].
	Required,
	/// The property is set to the given fallback value.
	Default(String),
	/// The property is omitted.
	Optional,
}

/// One normalized property and the profile field it is read from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
	/// Property key on the resulting [`Identity`].
	pub key: String,
	/// Location of the value in the profile document.
	pub path: FieldPath,
	/// Absence policy.
	pub presence: Presence,
}

/// Errors raised when a field table is inconsistent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProfileMappingError {
	/// A property key was blank.
	#[error("Profile property keys cannot be empty.")]
	EmptyKey,
	/// Two rules write the same property.
	#[error("Profile property `{key}` is mapped more than once.")]
	DuplicateKey {
		/// Key that was repeated.
		key: String,
	},
}

/// Per-provider field table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMapping {
	/// Path of the provider-native user id.
	pub id: FieldPath,
	/// Property rules applied in order.
	#[serde(default)]
	pub fields: Vec<FieldRule>,
}
impl ProfileMapping {
	/// Creates a mapping that only extracts the user id.
	pub fn new(id: FieldPath) -> Self {
		Self { id, fields: Vec::new() }
	}

	/// Appends a rule.
	pub fn field(mut self, key: impl Into<String>, path: FieldPath, presence: Presence) -> Self {
		self.fields.push(FieldRule { key: key.into(), path, presence });

		self
	}

	/// Checks that property keys are non-empty and unique.
	pub fn validate(&self) -> Result<(), ProfileMappingError> {
		let mut seen = BTreeSet::new();

		for rule in &self.fields {
			if rule.key.trim().is_empty() {
				return Err(ProfileMappingError::EmptyKey);
			}
			if !seen.insert(rule.key.as_str()) {
				return Err(ProfileMappingError::DuplicateKey { key: rule.key.clone() });
			}
		}

		Ok(())
	}
}

/// Applies a [`ProfileMapping`] to a fetched profile.
///
/// The mapper assumes error payloads were already rejected by the profile fetcher; it
/// only decides between a value, a default, an omission, or a missing-field failure.
#[derive(Clone, Copy, Debug)]
pub struct IdentityMapper<'a> {
	mapping: &'a ProfileMapping,
}
impl<'a> IdentityMapper<'a> {
	/// Wraps a field table.
	pub fn new(mapping: &'a ProfileMapping) -> Self {
		Self { mapping }
	}

	/// Produces the normalized identity for `provider`.
	pub fn map(&self, document: &ProfileDocument, provider: &ProviderId) -> Result<Identity> {
		let id = document.text(&self.mapping.id).ok_or_else(|| missing(&self.mapping.id))?;
		let urn = Urn::new(provider.clone(), id).map_err(|_| missing(&self.mapping.id))?;
		let mut properties = BTreeMap::new();

		for rule in &self.mapping.fields {
			match (document.text(&rule.path), &rule.presence) {
				(Some(value), _) => {
					properties.insert(rule.key.clone(), value);
				},
				(None, Presence::Default(fallback)) => {
					properties.insert(rule.key.clone(), fallback.clone());
				},
				(None, Presence::Optional) => {},
				(None, Presence::Required) => return Err(missing(&rule.path)),
			}
		}

		Ok(Identity::new(urn, properties))
	}
}

fn missing(path: &FieldPath) -> Error {
	MalformedResponse::MissingField { endpoint: Endpoint::Profile, field: path.to_string() }.into()
}
