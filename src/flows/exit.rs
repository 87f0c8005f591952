// crates.io
use oauth2::http::{Response, StatusCode, header::LOCATION};
// self
use crate::{
	_prelude::*,
	auth::Identity,
	error::ConfigError,
	flows::OAuthLogin,
	http::{HttpExchanger, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan, LoginStage},
};

impl<C, M> OAuthLogin<C, M>
where
	C: ?Sized + HttpExchanger,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Authorization endpoint URL carrying `response_type=code`, `client_id`,
	/// `redirect_uri`, `scope` (when any are configured), and the optional `state`.
	pub fn authorization_url(&self, state: Option<&str>) -> Url {
		let mut url = self.descriptor.endpoints.authorization.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs
				.append_pair("response_type", "code")
				.append_pair("client_id", &self.credentials.client_id)
				.append_pair("redirect_uri", self.credentials.redirect_uri.as_str());

			if !self.descriptor.scopes.is_empty() {
				pairs.append_pair("scope", &self.descriptor.scope_param());
			}
			if let Some(state) = state {
				pairs.append_pair("state", state);
			}
		}

		url
	}

	/// Passes `response` through for authenticated users; anonymous users get a
	/// `303 See Other` redirect to [`authorization_url`](Self::authorization_url) instead.
	pub fn exit<B>(&self, response: Response<B>, identity: Option<&Identity>) -> Result<Response<B>>
	where
		B: Default,
	{
		let _guard =
			FlowSpan::new(FlowKind::Exit, LoginStage::Redirect, &self.descriptor.id).entered();

		obs::record_flow_outcome(FlowKind::Exit, FlowOutcome::Attempt);

		if identity.is_some() {
			obs::record_flow_outcome(FlowKind::Exit, FlowOutcome::Success);

			return Ok(response);
		}

		let redirect = Response::builder()
			.status(StatusCode::SEE_OTHER)
			.header(LOCATION, self.authorization_url(None).as_str())
			.body(B::default())
			.map_err(|err| Error::from(ConfigError::from(err)))
			.inspect_err(|err| obs::observe_failure(LoginStage::Redirect, err));
		let outcome = if redirect.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

		obs::record_flow_outcome(FlowKind::Exit, outcome);

		redirect
	}
}
