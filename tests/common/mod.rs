//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	future, io,
	sync::{Arc, Mutex},
};
// crates.io
use oauth2_login::{
	flows::OAuthLogin,
	http::{ExchangeFuture, GenericTransportErrorMapper, HttpExchanger},
	oauth::oauth2::{
		HttpClientError, HttpRequest, HttpResponse,
		http::{StatusCode, header::CONTENT_TYPE},
	},
	provider::{ProviderDescriptor, presets},
	url::{Url, form_urlencoded},
};
#[cfg(feature = "reqwest")]
use oauth2_login::{http::ReqwestHttpExchanger, reqwest::Client};

pub const CLIENT_ID: &str = "app";
pub const CLIENT_SECRET: &str = "key";
pub const TOKEN_PATH: &str = "/o/oauth2/token";
pub const PROFILE_PATH: &str = "/plus/v1/people/me";

/// Scripted outcome of one fake round trip.
pub enum Reply {
	/// Respond with a status and a body.
	Respond(u16, String),
	/// Fail at the transport layer.
	Fail(&'static str),
	/// Never complete.
	Hang,
}
impl Reply {
	pub fn json(body: impl Into<String>) -> Self {
		Self::Respond(200, body.into())
	}
}

type Responder = dyn Fn(&HttpRequest) -> Reply + Send + Sync;

/// In-process transport that records every request path.
pub struct FakeExchanger {
	responder: Box<Responder>,
	calls: Mutex<Vec<String>>,
}
impl FakeExchanger {
	pub fn new(responder: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static) -> Self {
		Self { responder: Box::new(responder), calls: Mutex::new(Vec::new()) }
	}

	/// Request paths, in dispatch order.
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().expect("Call log should not be poisoned.").clone()
	}

	pub fn count(&self, path: &str) -> usize {
		self.calls().iter().filter(|call| *call == path).count()
	}
}
impl HttpExchanger for FakeExchanger {
	type TransportError = io::Error;

	fn send(&self, request: HttpRequest) -> ExchangeFuture<'_, Self::TransportError> {
		self.calls
			.lock()
			.expect("Call log should not be poisoned.")
			.push(request.uri().path().to_owned());

		let reply = (self.responder)(&request);

		Box::pin(async move {
			match reply {
				Reply::Respond(status, body) => {
					tokio::task::yield_now().await;

					let mut response = HttpResponse::new(body.into_bytes());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");
					response.headers_mut().insert(
						CONTENT_TYPE,
						"application/json".parse().expect("Header value should parse."),
					);

					Ok(response)
				},
				Reply::Fail(message) => Err(HttpClientError::Io(io::Error::other(message))),
				Reply::Hang => future::pending().await,
			}
		})
	}
}

pub type FakeLogin = OAuthLogin<FakeExchanger, GenericTransportErrorMapper>;

pub fn redirect_uri() -> Url {
	Url::parse("http://localhost/account").expect("Redirect URI fixture should parse.")
}

/// Google preset pointed at `base`.
pub fn google_descriptor(base: &str) -> ProviderDescriptor {
	presets::google()
		.authorization_endpoint(format!("{base}/o/oauth2/auth"))
		.token_endpoint(format!("{base}{TOKEN_PATH}"))
		.profile_endpoint(format!("{base}{PROFILE_PATH}"))
		.build()
		.expect("Google descriptor should build.")
}

pub fn fake_login(descriptor: ProviderDescriptor, http: Arc<FakeExchanger>) -> FakeLogin {
	OAuthLogin::with_http_client(
		descriptor,
		CLIENT_ID,
		CLIENT_SECRET,
		redirect_uri(),
		http,
		GenericTransportErrorMapper,
	)
	.expect("Login fixture should accept a validated descriptor.")
}

/// First value of a form field in a request body.
pub fn form_field(request: &HttpRequest, name: &str) -> Option<String> {
	form_urlencoded::parse(request.body())
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.into_owned())
}

/// First value of a query parameter on a request URI.
pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
	form_urlencoded::parse(request.uri().query()?.as_bytes())
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.into_owned())
}

/// Builds a reqwest transport that accepts the self-signed certificates produced by
/// `httpmock` during tests.
#[cfg(feature = "reqwest")]
pub fn test_http_client() -> ReqwestHttpExchanger {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpExchanger::with_client(client)
}
