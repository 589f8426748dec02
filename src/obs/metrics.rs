// self
use crate::{
	api::ApiCall,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"wecom_flow_total",
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

/// Counts a vendor call that returned a failure envelope.
pub fn record_api_failure(call: ApiCall) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("wecom_api_failure_total", "call" => call.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = call;
	}
}
