// self
use crate::{
	error::ErrorKind,
	obs::{FlowKind, FlowOutcome, LoginStage},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_login_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records which step failed and why (when enabled).
pub fn record_failure(stage: LoginStage, kind: ErrorKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_login_failure_total",
			"stage" => stage.as_str(),
			"kind" => kind.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, kind);
	}
}
