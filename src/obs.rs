//! Optional observability helpers for WeCom flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `wecom.flow` with the `flow` (redirect or
//!   identity class) and `stage` (call site) fields, plus `warn` events for failed vendor calls.
//! - Enable `metrics` to increment the `wecom_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and `wecom_api_failure_total`
//!   labeled by `call`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{
	_prelude::*,
	api::{ApiCall, VendorStatus},
	user::IdentityKind,
};

/// Flow kinds observed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Login redirect construction.
	Authorize,
	/// Code exchange resolving an employee.
	Employee,
	/// Code exchange resolving an external contact.
	Contact,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::Employee => "employee",
			FlowKind::Contact => "contact",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<IdentityKind> for FlowKind {
	fn from(kind: IdentityKind) -> Self {
		match kind {
			IdentityKind::Employee => FlowKind::Employee,
			IdentityKind::Contact => FlowKind::Contact,
		}
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a provider flow.
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

/// Reports a failed vendor call and returns the matching [`Error::AuthFailed`].
///
/// Every `AuthFailed` the provider raises passes through here first.
pub fn report_auth_failure(call: ApiCall, status: &VendorStatus) -> Error {
	#[cfg(feature = "tracing")]
	::tracing::warn!(
		call = call.as_str(),
		errcode = status.errcode,
		errmsg = status.message(),
		"WeCom API call failed."
	);

	record_api_failure(call);

	status.to_error(call)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn report_auth_failure_builds_error() {
		let err = report_auth_failure(
			ApiCall::GetUser,
			&VendorStatus { errcode: 60111, errmsg: "userid not found".into() },
		);

		assert_eq!(err.to_string(), "Failed to get user: userid not found.");
		assert!(matches!(err, Error::AuthFailed { errcode: 60111, .. }));
	}

	#[test]
	fn identity_kinds_map_to_flows() {
		assert_eq!(FlowKind::from(IdentityKind::Employee), FlowKind::Employee);
		assert_eq!(FlowKind::from(IdentityKind::Contact).as_str(), "contact");
	}
}
