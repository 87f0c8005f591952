// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCode, Identity, InboundRequest},
	flows::{LoginFuture, OAuthLogin},
	http::{HttpExchanger, TransportErrorMapper},
	oauth::TokenExchanger,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, LoginStage},
	profile::ProfileFetcher,
	provider::IdentityMapper,
};

impl<C, M> OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs the login for an authorization callback.
	///
	/// The code is read before the returned future is created, so a callback without one
	/// fails with [`Error::MissingCode`] (or [`Error::Provider`] when the provider sent an
	/// OAuth `error` parameter) without any network traffic. The future then exchanges the
	/// code, fetches the profile, and maps it; the first failing step ends the login.
	/// Dropping the future cancels whichever request is in flight.
	pub fn enter<R>(&self, request: &R) -> LoginFuture<'_>
	where
		R: ?Sized + InboundRequest,
	{
		let span = FlowSpan::new(FlowKind::Enter, LoginStage::ExtractCode, &self.descriptor.id);

		obs::record_flow_outcome(FlowKind::Enter, FlowOutcome::Attempt);

		let code = {
			let _guard = span.clone().entered();

			AuthorizationCode::from_request(request)
				.inspect_err(|err| obs::observe_failure(LoginStage::ExtractCode, err))
		};

		Box::pin(span.instrument(async move {
			let result = match code {
				Ok(code) => self.complete(&code).await,
				Err(err) => Err(err),
			};
			let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

			obs::record_flow_outcome(FlowKind::Enter, outcome);

			result
		}))
	}

	/// Token exchanger configured from the descriptor and strategy.
	pub fn token_exchanger(&self) -> TokenExchanger<C, M> {
		TokenExchanger::new(self.http_client.clone(), self.transport_mapper.clone())
			.with_strategy(self.strategy.clone())
			.with_access_token_key(self.descriptor.quirks.access_token_key.clone())
	}

	/// Profile fetcher configured from the descriptor and strategy.
	pub fn profile_fetcher(&self) -> ProfileFetcher<C, M> {
		ProfileFetcher::new(self.http_client.clone(), self.transport_mapper.clone())
			.with_strategy(self.strategy.clone())
			.with_placement(self.descriptor.quirks.token_placement.clone())
	}

	async fn complete(&self, code: &AuthorizationCode) -> Result<Identity> {
		let tokens = self.token_exchanger();
		let token =
			run_stage(LoginStage::TokenExchange, tokens.exchange(code, &self.credentials)).await?;
		let profiles = self.profile_fetcher();
		let document = run_stage(
			LoginStage::ProfileFetch,
			profiles.fetch(&token, &self.descriptor.endpoints.profile),
		)
		.await?;
		let _guard = FlowSpan::stage(LoginStage::IdentityMap).entered();

		IdentityMapper::new(&self.descriptor.mapping)
			.map(&document, &self.descriptor.id)
			.inspect_err(|err| obs::observe_failure(LoginStage::IdentityMap, err))
	}
}

async fn run_stage<T, F>(stage: LoginStage, step: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	FlowSpan::stage(stage)
		.instrument(step)
		.await
		.inspect_err(|err| obs::observe_failure(stage, err))
}
