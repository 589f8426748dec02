//! Provider-level error types shared across configuration, transport, and vendor calls.

// self
use crate::{_prelude::*, api::ApiCall};

/// Provider-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provider error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; the caller may try again later.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Vendor reported a non-zero error code or omitted an expected identity field.
	#[error("{}: {message}.", .call.failure_context())]
	AuthFailed {
		/// Vendor call that failed.
		call: ApiCall,
		/// Vendor `errcode` (zero when the failure is a missing field).
		errcode: i64,
		/// Vendor `errmsg`, or `unknown` when the vendor omitted one.
		message: String,
	},
	/// Returned `state` does not match the one issued with the authorization redirect.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Operation is not offered by this provider.
	#[error("WeCom does not support {operation}.")]
	Unsupported {
		/// Human-readable operation label.
		operation: &'static str,
	},
}

/// Configuration and validation failures raised while building or using a provider.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint overrides failed validation.
	#[error(transparent)]
	Endpoints(#[from] crate::provider::EndpointsError),
	/// Configured scopes cannot be normalized.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Provider identifier failed validation.
	#[error("Provider identifier is invalid.")]
	InvalidProviderId(#[from] crate::auth::IdentifierError),
	/// Configuration document could not be decoded.
	#[error("Configuration document is invalid at `{}`.", .source.path())]
	InvalidDocument {
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Config builder was finalized without a redirect URL.
	#[error("A redirect URL is required.")]
	MissingRedirectUrl,
	/// QR-connect login needs an agent id from `with_agent_id` or the `agent_id` key.
	#[error("Agent id required: configure `agent_id` or call `with_agent_id`.")]
	MissingAgentId,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Vendor endpoint answered with an unexpected HTTP status or the request timed out.
	#[error("WeCom {call} endpoint returned an unexpected response: {message}.")]
	Api {
		/// Vendor call that failed.
		call: ApiCall,
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Vendor endpoint responded with JSON that does not match the documented shape.
	#[error("WeCom {call} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Vendor call whose payload failed to decode.
		call: ApiCall,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the WeCom API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the WeCom API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn auth_failed_renders_call_context() {
		let err = Error::AuthFailed {
			call: ApiCall::GetUserInfo,
			errcode: 40029,
			message: "invalid code".into(),
		};

		assert_eq!(err.to_string(), "Failed to get user openid: invalid code.");

		let err = Error::AuthFailed { call: ApiCall::GetToken, errcode: 1, message: "unknown".into() };

		assert_eq!(err.to_string(), "Failed to get api access_token: unknown.");
	}

	#[test]
	fn missing_agent_id_mentions_requirement() {
		let err = Error::from(ConfigError::MissingAgentId);

		assert!(err.to_string().contains("Agent id required"));
	}
}
