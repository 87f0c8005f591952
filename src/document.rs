//! Read-only JSON documents and the dot-separated paths used to query them.
//!
//! Providers describe where their profile fields live with a [`FieldPath`] such as
//! `image.url` or `emails.0.value`; numeric segments index into arrays. Lookups never fail
//! loudly: an absent branch simply yields `None`, leaving the decision between "default"
//! and "error" to the caller.

// self
use crate::_prelude::*;

/// Errors raised when parsing a [`FieldPath`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum FieldPathError {
	/// The path was empty.
	#[error("Field path cannot be empty.")]
	Empty,
	/// A segment between separators was empty.
	#[error("Field path `{path}` contains an empty segment.")]
	EmptySegment {
		/// The offending path.
		path: String,
	},
}

/// Dot-separated location of a value inside a JSON document.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
	segments: Vec<String>,
}
impl FieldPath {
	/// Parses a dot-separated path.
	pub fn parse(path: &str) -> Result<Self, FieldPathError> {
		if path.is_empty() {
			return Err(FieldPathError::Empty);
		}

		let segments = path.split('.').map(str::to_owned).collect::<Vec<_>>();

		if segments.iter().any(String::is_empty) {
			return Err(FieldPathError::EmptySegment { path: path.to_owned() });
		}

		Ok(Self { segments })
	}

	/// Iterator over the path segments.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().map(String::as_str)
	}
}
impl Debug for FieldPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "FieldPath({self})")
	}
}
impl Display for FieldPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.segments.join("."))
	}
}
impl FromStr for FieldPath {
	type Err = FieldPathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl TryFrom<String> for FieldPath {
	type Error = FieldPathError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}
impl TryFrom<&str> for FieldPath {
	type Error = FieldPathError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
impl From<FieldPath> for String {
	fn from(value: FieldPath) -> Self {
		value.to_string()
	}
}

/// Parsed profile payload; immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileDocument(Value);
impl ProfileDocument {
	/// Wraps a parsed JSON value.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Returns the raw JSON tree.
	pub fn as_value(&self) -> &Value {
		&self.0
	}

	/// Resolves `path`, returning `None` as soon as a segment is absent.
	pub fn get(&self, path: &FieldPath) -> Option<&Value> {
		lookup(&self.0, path)
	}

	/// Resolves `path` to a non-empty scalar rendered as text.
	///
	/// Strings are returned verbatim, numbers and booleans use their JSON form. Null,
	/// objects, arrays, and blank strings count as absent.
	pub fn text(&self, path: &FieldPath) -> Option<String> {
		self.get(path).and_then(scalar_text)
	}
}
impl From<Value> for ProfileDocument {
	fn from(value: Value) -> Self {
		Self::new(value)
	}
}

/// Resolves `path` against any JSON value.
pub fn lookup<'v>(value: &'v Value, path: &FieldPath) -> Option<&'v Value> {
	path.segments().try_fold(value, |current, segment| match current {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
		_ => None,
	})
}

/// Renders a scalar JSON value as text; see [`ProfileDocument::text`].
pub fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}
