//! Authenticated profile retrieval.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	document::ProfileDocument,
	http::{self, Endpoint, HttpExchanger, TransportErrorMapper},
	provider::{DefaultProviderStrategy, ProviderStrategy, TokenPlacement},
};

/// Fetches the authenticated user's profile with an [`AccessToken`].
///
/// Error payloads are rejected here, before the document reaches the identity mapper, so a
/// provider error never degrades into a half-defaulted identity.
pub struct ProfileFetcher<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	strategy: Arc<dyn ProviderStrategy>,
	placement: TokenPlacement,
}
impl<C, M> ProfileFetcher<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a fetcher that sends the token as the `access_token` query parameter.
	pub fn new(http_client: impl Into<Arc<C>>, transport_mapper: impl Into<Arc<M>>) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: transport_mapper.into(),
			strategy: Arc::new(DefaultProviderStrategy),
			placement: TokenPlacement::default(),
		}
	}

	/// Overrides the strategy used for error detection.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Overrides where the token is attached.
	pub fn with_placement(mut self, placement: TokenPlacement) -> Self {
		self.placement = placement;

		self
	}

	/// Issues one `GET` to `endpoint` and returns the parsed profile.
	pub async fn fetch(&self, token: &AccessToken, endpoint: &Url) -> Result<ProfileDocument> {
		let request = match &self.placement {
			TokenPlacement::Query { parameter } => {
				let mut url = endpoint.clone();

				url.query_pairs_mut().append_pair(parameter, token.expose());

				http::get(&url, None)?
			},
			TokenPlacement::BearerHeader => http::get(endpoint, Some(token.expose()))?,
		};
		let response =
			http::dispatch(&*self.http_client, &*self.transport_mapper, Endpoint::Profile, request)
				.await?;
		let payload = http::parse_json_object(Endpoint::Profile, response.body())?;

		if let Some(err) = self.strategy.detect_error_payload(Endpoint::Profile, &payload) {
			return Err(err.into());
		}

		Ok(ProfileDocument::new(payload))
	}
}
impl<C, M> Clone for ProfileFetcher<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			strategy: self.strategy.clone(),
			placement: self.placement.clone(),
		}
	}
}
impl<C, M> Debug for ProfileFetcher<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileFetcher").field("placement", &self.placement).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{io, sync::Mutex};
	// crates.io
	use oauth2::{
		HttpRequest, HttpResponse,
		http::{StatusCode, header::AUTHORIZATION},
	};
	// self
	use super::*;
	use crate::{
		document::FieldPath,
		error::MalformedResponse,
		http::{ExchangeFuture, GenericTransportErrorMapper},
	};

	type Fetcher = ProfileFetcher<CannedExchanger, GenericTransportErrorMapper>;

	struct CannedExchanger {
		status: StatusCode,
		body: &'static str,
		requests: Mutex<Vec<HttpRequest>>,
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

	fn canned(status: u16, body: &'static str) -> Arc<CannedExchanger> {
		Arc::new(CannedExchanger {
			status: StatusCode::from_u16(status).expect("Status fixture should be valid."),
			body,
			requests: Mutex::new(Vec::new()),
		})
	}

	fn endpoint() -> Url {
		Url::parse("https://graph.facebook.com/me?fields=id,name").expect("Profile URL should parse.")
	}

	#[tokio::test]
	async fn query_placement_appends_token() {
		let http = canned(200, r#"{"id":"1","name":"octocat"}"#);
		let document = Fetcher::new(http.clone(), GenericTransportErrorMapper)
			.fetch(&AccessToken::new("T123"), &endpoint())
			.await
			.expect("Profile fetch should succeed.");

		assert_eq!(
			document.text(&FieldPath::parse("name").expect("Path should parse.")).as_deref(),
			Some("octocat")
		);

		let requests = http.requests.lock().expect("Request log should not be poisoned.");
		let request = requests.first().expect("Exactly one request should be sent.");

		assert_eq!(request.uri(), "https://graph.facebook.com/me?fields=id,name&access_token=T123");
		assert!(request.headers().get(AUTHORIZATION).is_none());
	}

	#[tokio::test]
	async fn bearer_placement_uses_header() {
		let http = canned(200, r#"{"id":1}"#);

		Fetcher::new(http.clone(), GenericTransportErrorMapper)
			.with_placement(TokenPlacement::BearerHeader)
			.fetch(&AccessToken::new("T123"), &endpoint())
			.await
			.expect("Profile fetch should succeed.");

		let requests = http.requests.lock().expect("Request log should not be poisoned.");
		let request = requests.first().expect("Exactly one request should be sent.");

		assert_eq!(request.uri(), "https://graph.facebook.com/me?fields=id,name");
		assert_eq!(
			request.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
			Some("Bearer T123")
		);
	}

	#[tokio::test]
	async fn error_payloads_and_bad_bodies_fail() {
		let http = canned(
			200,
			r#"{"error":{"errors":[{"domain":"usageLimits","reason":"accessNotConfigured"}]},"code":400,"message":"Access Not Configured."}"#,
		);
		let err = Fetcher::new(http, GenericTransportErrorMapper)
			.fetch(&AccessToken::new("T123"), &endpoint())
			.await
			.expect_err("Error payloads must fail.");

		assert!(matches!(
			err,
			Error::Provider(ref inner) if inner.message == "Access Not Configured."
				&& inner.endpoint == Endpoint::Profile
		));

		let http = canned(200, "<html></html>");
		let err = Fetcher::new(http, GenericTransportErrorMapper)
			.fetch(&AccessToken::new("T123"), &endpoint())
			.await
			.expect_err("Non-JSON bodies must fail.");

		assert!(matches!(err, Error::MalformedResponse(MalformedResponse::InvalidJson { .. })));

		let http = canned(503, "busy");
		let err = Fetcher::new(http, GenericTransportErrorMapper)
			.fetch(&AccessToken::new("T123"), &endpoint())
			.await
			.expect_err("Non-success statuses must fail.");

		assert!(matches!(
			err,
			Error::ProviderRejected { endpoint: Endpoint::Profile, status: 503, ref body, .. }
				if body == "busy"
		));
	}
}
