//! Optional observability helpers for login flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_login.flow` with the `flow`
//!   (enter/exit), `stage`, and `provider` fields, nested `oauth2_login.stage` spans per
//!   step, and a `warn` event whenever a step fails.
//! - Enable `metrics` to increment the `oauth2_login_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `oauth2_login_failure_total` counter labeled by `stage` + `kind`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider capabilities observed by the login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Callback handling that produces an identity.
	Enter,
	/// Response post-processing (anonymous redirect).
	Exit,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Enter => "enter",
			FlowKind::Exit => "exit",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a login operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Steps of a login, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginStage {
	/// Reading the authorization code from the callback.
	ExtractCode,
	/// Trading the code for an access token.
	TokenExchange,
	/// Fetching the user's profile.
	ProfileFetch,
	/// Normalizing the profile into an identity.
	IdentityMap,
	/// Building the anonymous redirect.
	Redirect,
}
impl LoginStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginStage::ExtractCode => "extract_code",
			LoginStage::TokenExchange => "token_exchange",
			LoginStage::ProfileFetch => "profile_fetch",
			LoginStage::IdentityMap => "identity_map",
			LoginStage::Redirect => "redirect",
		}
	}
}
impl Display for LoginStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a failed step on every enabled backend.
pub fn observe_failure(stage: LoginStage, err: &Error) {
	record_failure(stage, err.kind());
	trace_failure(stage, err);
}
