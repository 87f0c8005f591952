//! High-level login orchestration: the [`OAuthProvider`] capability and its one
//! descriptor-driven implementation, [`OAuthLogin`].

mod enter;
mod exit;

// crates.io
use oauth2::http::Response;
// self
use crate::{
	_prelude::*,
	auth::{Identity, InboundRequest, ProviderCredentials},
	http::{HttpExchanger, TransportErrorMapper},
	provider::{
		DefaultProviderStrategy, ProviderDescriptor, ProviderDescriptorError, ProviderStrategy,
	},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpExchanger, ReqwestTransportErrorMapper};

/// Boxed future returned by [`OAuthProvider::enter`].
pub type LoginFuture<'a> = Pin<Box<dyn Future<Output = Result<Identity>> + 'a + Send>>;

#[cfg(feature = "reqwest")]
/// Login specialized for the crate's default reqwest transport stack.
pub type ReqwestLogin = OAuthLogin<ReqwestHttpExchanger, ReqwestTransportErrorMapper>;

/// Pluggable login capability a web layer can hold without knowing the provider.
///
/// The trait is object safe so heterogeneous providers can sit behind
/// `Arc<dyn OAuthProvider>` in one routing table.
pub trait OAuthProvider: Send + Sync {
	/// Turns an authorization callback into an [`Identity`].
	fn enter(&self, request: &dyn InboundRequest) -> LoginFuture<'_>;

	/// Post-processes an outbound response; anonymous users are redirected to log in.
	fn exit(
		&self,
		response: Response<Vec<u8>>,
		identity: Option<&Identity>,
	) -> Result<Response<Vec<u8>>>;
}

/// Authorization-code login against a single provider descriptor.
///
/// Every field is shared read-only state, so one instance (or any of its clones) can serve
/// concurrent logins without locking. Each [`enter`](OAuthLogin::enter) performs the
/// token and profile round trips strictly in sequence and never retries.
pub struct OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP transport used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines endpoints, scopes, field table, and quirks.
	pub descriptor: ProviderDescriptor,
	/// Client registration used for token exchanges and redirects.
	pub credentials: ProviderCredentials,
	/// Strategy responsible for request augmentation and error-payload detection.
	pub strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a login that reuses the caller-provided transport + mapper pair.
	///
	/// The descriptor is validated first, so one deserialized from configuration gets the
	/// same endpoint and quirk checks as one produced by the builder.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self, ProviderDescriptorError> {
		descriptor.validate()?;

		let credentials = descriptor.credentials(client_id, client_secret, redirect_uri);

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			credentials,
			strategy: Arc::new(DefaultProviderStrategy),
		})
	}

	/// Replaces the provider strategy.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}
}
#[cfg(feature = "reqwest")]
impl OAuthLogin<ReqwestHttpExchanger, ReqwestTransportErrorMapper> {
	/// Creates a login backed by a default reqwest client.
	///
	/// Use [`OAuthLogin::with_http_client`] to supply a client with custom timeouts,
	/// proxies, or redirect policy.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
	) -> Result<Self, ProviderDescriptorError> {
		Self::with_http_client(
			descriptor,
			client_id,
			client_secret,
			redirect_uri,
			ReqwestHttpExchanger::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Clone for OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			descriptor: self.descriptor.clone(),
			credentials: self.credentials.clone(),
			strategy: self.strategy.clone(),
		}
	}
}
impl<C, M> Debug for OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthLogin")
			.field("descriptor", &self.descriptor)
			.field("credentials", &self.credentials)
			.finish_non_exhaustive()
	}
}
impl<C, M> OAuthProvider for OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn enter(&self, request: &dyn InboundRequest) -> LoginFuture<'_> {
		OAuthLogin::enter(self, request)
	}

	fn exit(
		&self,
		response: Response<Vec<u8>>,
		identity: Option<&Identity>,
	) -> Result<Response<Vec<u8>>> {
		OAuthLogin::exit(self, response, identity)
	}
}
