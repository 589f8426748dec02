//! Vendor API calls: endpoint catalog, request dispatch, and response decoding.

pub mod response;

pub use oauth2;
pub use response::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{Method, header::ACCEPT},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	http::{ApiHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::WeComEndpoints,
};

/// Fixed WeCom endpoints called during a code exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiCall {
	/// `GET /cgi-bin/gettoken` with `corpid`, `corpsecret`.
	GetToken,
	/// `GET /cgi-bin/user/getuserinfo` with `access_token`, `code`.
	GetUserInfo,
	/// `POST /cgi-bin/user/get` with `access_token`, `userid`.
	GetUser,
	/// `GET /cgi-bin/externalcontact/get` with `access_token`, `external_userid`.
	GetExternalContact,
}
impl ApiCall {
	/// Request path relative to the API base.
	pub const fn path(self) -> &'static str {
		match self {
			ApiCall::GetToken => "/cgi-bin/gettoken",
			ApiCall::GetUserInfo => "/cgi-bin/user/getuserinfo",
			ApiCall::GetUser => "/cgi-bin/user/get",
			ApiCall::GetExternalContact => "/cgi-bin/externalcontact/get",
		}
	}

	/// HTTP method the vendor expects.
	pub fn method(self) -> Method {
		match self {
			ApiCall::GetUser => Method::POST,
			_ => Method::GET,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiCall::GetToken => "gettoken",
			ApiCall::GetUserInfo => "user.getuserinfo",
			ApiCall::GetUser => "user.get",
			ApiCall::GetExternalContact => "externalcontact.get",
		}
	}

	/// Prefix used by [`Error::AuthFailed`] messages.
	pub const fn failure_context(self) -> &'static str {
		match self {
			ApiCall::GetToken => "Failed to get api access_token",
			ApiCall::GetUserInfo => "Failed to get user openid",
			ApiCall::GetUser => "Failed to get user",
			ApiCall::GetExternalContact => "Failed to get external contact",
		}
	}
}
impl Display for ApiCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into provider [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a provider error.
	fn map_transport_error(
		&self,
		call: ApiCall,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		call: ApiCall,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(call, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(call, meta, message),
			_ => map_unknown_transport_error(call, meta),
		}
	}
}

/// Issues one vendor call and decodes its JSON body into `T`.
///
/// Non-2xx statuses become [`TransientError::Api`]; the `errcode` envelope is left to the
/// caller because each call has its own success criterion.
pub(crate) async fn dispatch<T, C, M>(
	http_client: &C,
	mapper: &M,
	endpoints: &WeComEndpoints,
	call: ApiCall,
	query: &[(&str, &str)],
) -> Result<T>
where
	T: DeserializeOwned,
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let url = endpoints.api_url(call, query);
	let request: HttpRequest = oauth2::http::Request::builder()
		.method(call.method())
		.uri(url.as_str())
		.header(ACCEPT, "application/json")
		.body(Vec::new())
		.map_err(ConfigError::from)?;
	let slot = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(slot.clone());

	#[cfg(feature = "tracing")]
	tracing::debug!(call = call.as_str(), method = %call.method(), path = call.path(), "Dispatching WeCom API call.");

	let response = match handle.call(request).await {
		Ok(response) => response,
		Err(e) => return Err(mapper.map_transport_error(call, slot.take().as_ref(), e)),
	};
	let meta = slot.take();
	let status = response.status();

	if !status.is_success() {
		return Err(TransientError::Api {
			call,
			message: format!("HTTP status {status}"),
			status: Some(status.as_u16()),
			retry_after: meta_retry_after(meta.as_ref()),
		}
		.into());
	}

	decode(call, response.body(), Some(status.as_u16()))
}

pub(crate) fn decode<T>(call: ApiCall, body: &[u8], status: Option<u16>) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ResponseParse { call, source, status }.into())
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(call: ApiCall, meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::Api {
			call,
			message: "request timed out".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::from(err).into()
}

#[cfg(feature = "reqwest")]
fn map_generic_transport_error(
	call: ApiCall,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	TransientError::Api {
		call,
		message: format!("HTTP client error: {message}"),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

#[cfg(feature = "reqwest")]
fn map_unknown_transport_error(call: ApiCall, meta: Option<&ResponseMetadata>) -> Error {
	TransientError::Api {
		call,
		message: "HTTP client error".into(),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

#[cfg(feature = "reqwest")]
fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn calls_use_documented_paths_and_methods() {
		assert_eq!(ApiCall::GetToken.path(), "/cgi-bin/gettoken");
		assert_eq!(ApiCall::GetUserInfo.path(), "/cgi-bin/user/getuserinfo");
		assert_eq!(ApiCall::GetUser.path(), "/cgi-bin/user/get");
		assert_eq!(ApiCall::GetUser.method(), Method::POST);
		assert_eq!(ApiCall::GetToken.method(), Method::GET);
		assert_eq!(ApiCall::GetUserInfo.method(), Method::GET);
	}

	#[test]
	fn decode_reports_json_path() {
		let err = decode::<TokenResponse>(ApiCall::GetToken, br#"{"errcode":"x"}"#, Some(200))
			.expect_err("String errcode must fail to decode.");

		match err {
			Error::Transient(TransientError::ResponseParse { call, status, .. }) => {
				assert_eq!(call, ApiCall::GetToken);
				assert_eq!(status, Some(200));
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
