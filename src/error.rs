//! Login error types shared across exchangers, fetchers, and mappers.

// self
use crate::{_prelude::*, http::Endpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical login error exposed by public APIs.
///
/// Every variant aborts the login flow; nothing is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Inbound request does not carry an authorization code.
	#[error("Inbound request does not carry an authorization code.")]
	MissingCode,
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a non-success HTTP status.
	#[error("The {endpoint} endpoint rejected the request with HTTP {status}.")]
	ProviderRejected {
		/// Endpoint that rejected the request.
		endpoint: Endpoint,
		/// HTTP status code returned by the provider.
		status: u16,
		/// Preview of the response body for diagnostics.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body is not usable JSON or lacks a required field.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponse),
	/// Provider returned a well-formed error object instead of the expected payload.
	#[error(transparent)]
	Provider(#[from] ProviderError),
}
impl Error {
	/// Returns the coarse category of the failure.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::MissingCode => ErrorKind::MissingCode,
			Self::Transport(_) => ErrorKind::Transport,
			Self::ProviderRejected { .. } => ErrorKind::ProviderRejected,
			Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
			Self::Provider(_) => ErrorKind::ProviderError,
		}
	}
}

/// Stable failure categories for callers that translate errors into HTTP responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// See [`Error::Config`].
	Config,
	/// See [`Error::MissingCode`].
	MissingCode,
	/// See [`Error::Transport`].
	Transport,
	/// See [`Error::ProviderRejected`].
	ProviderRejected,
	/// See [`Error::MalformedResponse`].
	MalformedResponse,
	/// See [`Error::Provider`].
	ProviderError,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Config => "config",
			ErrorKind::MissingCode => "missing_code",
			ErrorKind::Transport => "transport",
			ErrorKind::ProviderRejected => "provider_rejected",
			ErrorKind::MalformedResponse => "malformed_response",
			ErrorKind::ProviderError => "provider_error",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the transport's timeout.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint being called.
		endpoint: Endpoint,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Endpoint the failing request targeted.
	pub fn endpoint(&self) -> Endpoint {
		match self {
			Self::Network { endpoint, .. }
			| Self::Timeout { endpoint }
			| Self::Io { endpoint, .. } => *endpoint,
		}
	}
}

/// Response bodies that cannot be interpreted.
#[derive(Debug, ThisError)]
pub enum MalformedResponse {
	/// Body is not valid JSON.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	InvalidJson {
		/// Endpoint that produced the body.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Body is valid JSON but not an object.
	#[error("The {endpoint} endpoint returned JSON that is not an object.")]
	NotAnObject {
		/// Endpoint that produced the body.
		endpoint: Endpoint,
	},
	/// A required field is absent or empty.
	#[error("The {endpoint} response is missing the `{field}` field.")]
	MissingField {
		/// Endpoint that produced the body.
		endpoint: Endpoint,
		/// Dot-separated path of the missing field.
		field: String,
	},
}
impl MalformedResponse {
	/// Endpoint that produced the malformed body.
	pub fn endpoint(&self) -> Endpoint {
		match self {
			Self::InvalidJson { endpoint, .. }
			| Self::NotAnObject { endpoint }
			| Self::MissingField { endpoint, .. } => *endpoint,
		}
	}
}

/// Error object reported by the provider inside an otherwise well-formed response.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("The {endpoint} endpoint reported an error: {message}")]
pub struct ProviderError {
	/// Endpoint that reported the error.
	pub endpoint: Endpoint,
	/// Human-readable message, verbatim from the provider when available.
	pub message: String,
	/// Numeric error code, when the provider supplies one.
	pub code: Option<i64>,
	/// Machine-readable reason (`invalid_grant`, `accessNotConfigured`, ...).
	pub reason: Option<String>,
}
impl ProviderError {
	/// Creates an error carrying only a message.
	pub fn new(endpoint: Endpoint, message: impl Into<String>) -> Self {
		Self { endpoint, message: message.into(), code: None, reason: None }
	}

	/// Attaches a numeric code.
	pub fn with_code(mut self, code: i64) -> Self {
		self.code = Some(code);

		self
	}

	/// Attaches a machine-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}
}
