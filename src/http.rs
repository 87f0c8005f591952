//! Transport primitives for the token and profile round trips.
//!
//! The module exposes [`HttpExchanger`], the crate's only dependency on an HTTP stack, and
//! [`TransportErrorMapper`], which turns transport failures into [`Error`] values. Requests
//! and responses use the `http` types re-exported by `oauth2` so any client that speaks
//! them can be plugged in. Exchangers perform exactly one round trip per call and never
//! retry; a rejected response keeps its `Retry-After` hint so callers can decide.

// std
use std::io;
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderMap, HeaderValue, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER, USER_AGENT},
	},
};
use time::format_description::well_known::Rfc2822;
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, MalformedResponse, TransportError},
};

/// Boxed future returned by [`HttpExchanger::send`].
pub type ExchangeFuture<'c, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'c + Send>>;

const BODY_PREVIEW_LIMIT: usize = 256;
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const CRATE_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Provider endpoints touched during a login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Authorization endpoint the end-user is redirected to.
	Authorization,
	/// Token endpoint that exchanges the authorization code.
	Token,
	/// Resource endpoint that returns the user's profile.
	Profile,
}
impl Endpoint {
	/// Returns a stable label suitable for messages, span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Authorization => "authorization",
			Endpoint::Token => "token",
			Endpoint::Profile => "profile",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Abstraction over HTTP transports capable of a single request/response round trip.
///
/// Implementations must be `Send + Sync + 'static` so one transport can serve any number of
/// concurrent logins, and the futures they return must be `Send` and own whatever state
/// they need. Dropping the future must cancel the request without leaking the connection.
/// Implementations return exactly one of a response (any status) or a transport error and
/// never retry.
pub trait HttpExchanger
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Performs one round trip.
	fn send(&self, request: HttpRequest) -> ExchangeFuture<'_, Self::TransportError>;
}

/// Maps HTTP transport failures into login [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `endpoint` into a login error.
	fn map_transport_error(&self, endpoint: Endpoint, error: HttpClientError<E>) -> Error;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints return results directly instead of delegating to another URI, so a
/// custom [`ReqwestClient`] should disable redirect following. Timeouts configured on the
/// client apply per round trip; bound the whole login with a caller-side deadline.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpExchanger(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpExchanger {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpExchanger {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpExchanger {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpExchanger for ReqwestHttpExchanger {
	type TransportError = ReqwestError;

	fn send(&self, request: HttpRequest) -> ExchangeFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, endpoint: Endpoint, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			other => map_generic_transport_error(endpoint, other),
		}
	}
}

/// Mapper for custom transports that only need [`map_generic_transport_error`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericTransportErrorMapper;
impl<E> TransportErrorMapper<E> for GenericTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, endpoint: Endpoint, err: HttpClientError<E>) -> Error {
		map_generic_transport_error(endpoint, err)
	}
}

/// Maps the transport-agnostic [`HttpClientError`] variants; custom mappers can delegate
/// here for everything they do not special-case.
pub fn map_generic_transport_error<E>(endpoint: Endpoint, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { endpoint, source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(source) => TransportError::Io { endpoint, source }.into(),
		HttpClientError::Other(message) =>
			TransportError::Io { endpoint, source: io::Error::other(message) }.into(),
		_ => TransportError::Io {
			endpoint,
			source: io::Error::other("HTTP client reported an unrecognized failure"),
		}
		.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout { endpoint }.into();
	}

	TransportError::network(endpoint, err).into()
}

/// Sends `request`, maps transport failures, and rejects non-success statuses.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	endpoint: Endpoint,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let response = http_client
		.send(request)
		.await
		.map_err(|err| mapper.map_transport_error(endpoint, err))?;
	let status = response.status();

	if !status.is_success() {
		return Err(Error::ProviderRejected {
			endpoint,
			status: status.as_u16(),
			body: body_preview(response.body()),
			retry_after: parse_retry_after(response.headers()),
		});
	}

	Ok(response)
}

/// Builds a form-encoded `POST` request.
pub(crate) fn form_post(url: &Url, form: &BTreeMap<String, String>) -> Result<HttpRequest> {
	let body = FormSerializer::new(String::new()).extend_pairs(form.iter()).finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
		.header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE))
		.header(USER_AGENT, HeaderValue::from_static(CRATE_USER_AGENT))
		.body(body.into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Builds a `GET` request, optionally authenticated with a bearer token.
pub(crate) fn get(url: &Url, bearer: Option<&str>) -> Result<HttpRequest> {
	let mut builder = Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE))
		.header(USER_AGENT, HeaderValue::from_static(CRATE_USER_AGENT));

	if let Some(token) = bearer {
		builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
	}

	builder.body(Vec::new()).map_err(|e| ConfigError::from(e).into())
}

/// Parses a response body into a JSON object.
pub(crate) fn parse_json_object(endpoint: Endpoint, body: &[u8]) -> Result<Value> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let value: Value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| MalformedResponse::InvalidJson { endpoint, source })?;

	if value.is_object() {
		Ok(value)
	} else {
		Err(MalformedResponse::NotAnObject { endpoint }.into())
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
