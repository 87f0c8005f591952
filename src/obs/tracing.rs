// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	obs::{FlowKind, LoginStage},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by login flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates the top-level span for one `enter`/`exit` call.
	pub fn new(kind: FlowKind, stage: LoginStage, provider: &ProviderId) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_login.flow",
				flow = kind.as_str(),
				stage = stage.as_str(),
				provider = provider.as_ref()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage, provider);

			Self {}
		}
	}

	/// Creates a span for one step; it nests under whichever flow span is current.
	pub fn stage(stage: LoginStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("oauth2_login.stage", stage = stage.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Emits a `warn` event for a failed step (when enabled).
///
/// Only the error's display form is logged; codes and tokens never reach it.
pub fn trace_failure(stage: LoginStage, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			stage = stage.as_str(),
			kind = err.kind().as_str(),
			error = %err,
			"login step failed"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, err);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn provider() -> ProviderId {
		ProviderId::new("google").expect("Provider fixture should be valid.")
	}

	#[test]
	fn flow_span_noop_without_tracing() {
		let _guard = FlowSpan::new(FlowKind::Exit, LoginStage::Redirect, &provider()).entered();

		trace_failure(LoginStage::Redirect, &Error::MissingCode);
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Enter, LoginStage::ExtractCode, &provider());
		let value = span
			.instrument(async { FlowSpan::stage(LoginStage::TokenExchange).instrument(async { 42 }).await })
			.await;

		assert_eq!(value, 42);
	}
}
