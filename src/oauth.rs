//! Authorization-code exchange against a provider's token endpoint.

pub use oauth2;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthorizationCode, ProviderCredentials},
	error::MalformedResponse,
	http::{self, Endpoint, HttpExchanger, TransportErrorMapper},
	provider::{DefaultProviderStrategy, ProviderStrategy},
};

const GRANT_TYPE: &str = "authorization_code";
const DEFAULT_ACCESS_TOKEN_KEY: &str = "access_token";

/// Trades an [`AuthorizationCode`] for an [`AccessToken`].
///
/// One exchange is exactly one `POST` to the token endpoint; nothing is retried.
pub struct TokenExchanger<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	strategy: Arc<dyn ProviderStrategy>,
	access_token_key: String,
}
impl<C, M> TokenExchanger<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an exchanger that reads the token from `access_token`.
	pub fn new(http_client: impl Into<Arc<C>>, transport_mapper: impl Into<Arc<M>>) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: transport_mapper.into(),
			strategy: Arc::new(DefaultProviderStrategy),
			access_token_key: DEFAULT_ACCESS_TOKEN_KEY.into(),
		}
	}

	/// Overrides the strategy used for request augmentation and error detection.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Overrides the response key holding the access token.
	pub fn with_access_token_key(mut self, key: impl Into<String>) -> Self {
		self.access_token_key = key.into();

		self
	}

	/// Posts the code to `credentials.token_endpoint` and extracts the access token.
	///
	/// Fails with [`Error::ProviderRejected`] on a non-success status,
	/// [`Error::MalformedResponse`] when the body is not a JSON object or lacks the token
	/// key, and [`Error::Provider`] when a success response carries an error payload.
	pub async fn exchange(
		&self,
		code: &AuthorizationCode,
		credentials: &ProviderCredentials,
	) -> Result<AccessToken> {
		let mut form = BTreeMap::from([
			("client_id".to_owned(), credentials.client_id.clone()),
			("client_secret".to_owned(), credentials.client_secret.expose().to_owned()),
			("redirect_uri".to_owned(), credentials.redirect_uri.to_string()),
			("grant_type".to_owned(), GRANT_TYPE.to_owned()),
			("code".to_owned(), code.expose().to_owned()),
		]);

		self.strategy.augment_token_request(&mut form);

		let request = http::form_post(&credentials.token_endpoint, &form)?;
		let response =
			http::dispatch(&*self.http_client, &*self.transport_mapper, Endpoint::Token, request)
				.await?;
		let payload = http::parse_json_object(Endpoint::Token, response.body())?;

		if let Some(err) = self.strategy.detect_error_payload(Endpoint::Token, &payload) {
			return Err(err.into());
		}

		payload
			.get(&self.access_token_key)
			.and_then(Value::as_str)
			.filter(|token| !token.trim().is_empty())
			.map(AccessToken::new)
			.ok_or_else(|| {
				MalformedResponse::MissingField {
					endpoint: Endpoint::Token,
					field: self.access_token_key.clone(),
				}
				.into()
			})
	}
}
impl<C, M> Clone for TokenExchanger<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			strategy: self.strategy.clone(),
			access_token_key: self.access_token_key.clone(),
		}
	}
}
impl<C, M> Debug for TokenExchanger<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchanger")
			.field("access_token_key", &self.access_token_key)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{io, sync::Mutex};
	// crates.io
	use oauth2::{
		HttpRequest, HttpResponse,
		http::{StatusCode, header::CONTENT_TYPE},
	};
	// self
	use super::*;
	use crate::{
		error::ProviderError,
		http::{ExchangeFuture, GenericTransportErrorMapper},
	};

	struct CannedExchanger {
		status: StatusCode,
		body: &'static str,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl CannedExchanger {
		fn new(status: u16, body: &'static str) -> Arc<Self> {
			Arc::new(Self {
				status: StatusCode::from_u16(status).expect("Status fixture should be valid."),
				body,
				requests: Mutex::new(Vec::new()),
			})
		}
	}
	impl HttpExchanger for CannedExchanger {
		type TransportError = io::Error;

		fn send(&self, request: HttpRequest) -> ExchangeFuture<'_, Self::TransportError> {
			self.requests.lock().expect("Request log should not be poisoned.").push(request);

			let mut response = HttpResponse::new(self.body.as_bytes().to_vec());

			*response.status_mut() = self.status;

			Box::pin(async move { Ok(response) })
		}
	}

	fn credentials() -> ProviderCredentials {
		ProviderCredentials::new(
			"app",
			"key",
			Url::parse("https://accounts.google.com/o/oauth2/token")
				.expect("Token endpoint fixture should parse."),
			Url::parse("http://localhost/account").expect("Redirect fixture should parse."),
		)
	}

	fn code() -> AuthorizationCode {
		AuthorizationCode::new("code").expect("Code fixture should be valid.")
	}

	fn exchanger(
		http: &Arc<CannedExchanger>,
	) -> TokenExchanger<CannedExchanger, GenericTransportErrorMapper> {
		TokenExchanger::new(http.clone(), GenericTransportErrorMapper)
	}

	#[tokio::test]
	async fn exchange_posts_expected_form() {
		let http = CannedExchanger::new(200, r#"{"access_token":"T123","token_type":"Bearer"}"#);
		let token =
			exchanger(&http).exchange(&code(), &credentials()).await.expect("Exchange should succeed.");

		assert_eq!(token.expose(), "T123");

		let requests = http.requests.lock().expect("Request log should not be poisoned.");
		let request = requests.first().expect("Exactly one request should be sent.");
		let body = String::from_utf8(request.body().clone()).expect("Form body should be UTF-8.");

		assert_eq!(requests.len(), 1);
		assert_eq!(request.uri(), "https://accounts.google.com/o/oauth2/token");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some("application/x-www-form-urlencoded")
		);

		for field in [
			"client_id=app",
			"client_secret=key",
			"redirect_uri=http%3A%2F%2Flocalhost%2Faccount",
			"grant_type=authorization_code",
			"code=code",
		] {
			assert!(body.split('&').any(|pair| pair == field), "Missing `{field}` in `{body}`.");
		}
	}

	#[tokio::test]
	async fn custom_token_key_is_honored() {
		let http = CannedExchanger::new(200, r#"{"token":"T123"}"#);
		let token = exchanger(&http)
			.with_access_token_key("token")
			.exchange(&code(), &credentials())
			.await
			.expect("Exchange should read the custom key.");

		assert_eq!(token.expose(), "T123");
	}

	#[tokio::test]
	async fn failures_are_classified() {
		let http = CannedExchanger::new(401, r#"{"error":"invalid_client"}"#);
		let err = exchanger(&http)
			.exchange(&code(), &credentials())
			.await
			.expect_err("Non-success statuses must fail.");

		assert!(matches!(
			err,
			Error::ProviderRejected { endpoint: Endpoint::Token, status: 401, .. }
		));

		let http = CannedExchanger::new(200, r#"{"token_type":"Bearer","access_token":""}"#);
		let err = exchanger(&http)
			.exchange(&code(), &credentials())
			.await
			.expect_err("Empty tokens must fail.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponse::MissingField {
				endpoint: Endpoint::Token,
				ref field,
			}) if field == "access_token"
		));

		let http = CannedExchanger::new(200, "access_token=T123&token_type=bearer");
		let err = exchanger(&http)
			.exchange(&code(), &credentials())
			.await
			.expect_err("Form-encoded bodies must fail.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponse::InvalidJson { endpoint: Endpoint::Token, .. })
		));
	}

	#[tokio::test]
	async fn success_status_with_error_payload_fails() {
		let http = CannedExchanger::new(
			200,
			r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
		);
		let err = exchanger(&http)
			.exchange(&code(), &credentials())
			.await
			.expect_err("Error payloads must fail.");

		match err {
			Error::Provider(ProviderError { endpoint, message, reason, .. }) => {
				assert_eq!(endpoint, Endpoint::Token);
				assert_eq!(message, "The code passed is incorrect or expired.");
				assert_eq!(reason.as_deref(), Some("bad_verification_code"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
