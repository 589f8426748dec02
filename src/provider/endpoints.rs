//! Vendor endpoint set with HTTPS validation for the redirect targets.

// self
use crate::{_prelude::*, api::ApiCall};

/// Base URL of the WeCom server API (`gettoken`, `user/getuserinfo`, `user/get`, ...).
pub const DEFAULT_API_BASE: &str = "https://qyapi.weixin.qq.com";
/// Web-authorization endpoint used when scopes are configured.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://open.weixin.qq.com/connect/oauth2/authorize";
/// QR-connect login endpoint used when no scopes are configured.
pub const DEFAULT_QR_CONNECT_URL: &str = "https://open.work.weixin.qq.com/wwopen/sso/qrConnect";
/// Fragment WeCom requires on both redirect flavors.
pub const REDIRECT_FRAGMENT: &str = "wechat_redirect";

/// Errors raised while resolving endpoint overrides.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum EndpointsError {
	/// A built-in endpoint constant failed to parse.
	#[error("The built-in {endpoint} endpoint is not a valid URL.")]
	InvalidDefault {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base must be an HTTP(S) URL.
	#[error("The {endpoint} endpoint must be an HTTP(S) URL: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Optional endpoint overrides carried by configuration (private deployments, tests).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOverrides {
	/// Replacement for [`DEFAULT_API_BASE`].
	pub api_base: Option<Url>,
	/// Replacement for [`DEFAULT_AUTHORIZE_URL`].
	pub authorize: Option<Url>,
	/// Replacement for [`DEFAULT_QR_CONNECT_URL`].
	pub qr_connect: Option<Url>,
}

/// Resolved, validated endpoint set consumed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeComEndpoints {
	/// Server API base; vendor call paths are joined onto it.
	pub api_base: Url,
	/// Web-authorization endpoint.
	pub authorize: Url,
	/// QR-connect login endpoint.
	pub qr_connect: Url,
}
impl WeComEndpoints {
	/// Returns the vendor's public endpoints.
	pub fn vendor() -> Result<Self, EndpointsError> {
		Self::resolve(&EndpointOverrides::default())
	}

	/// Applies overrides on top of the vendor defaults and validates the result.
	pub fn resolve(overrides: &EndpointOverrides) -> Result<Self, EndpointsError> {
		let endpoints = Self {
			api_base: pick(&overrides.api_base, "api_base", DEFAULT_API_BASE)?,
			authorize: pick(&overrides.authorize, "authorize", DEFAULT_AUTHORIZE_URL)?,
			qr_connect: pick(&overrides.qr_connect, "qr_connect", DEFAULT_QR_CONNECT_URL)?,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}

	/// Builds the absolute URL for a vendor call, appending `query` in order.
	pub fn api_url(&self, call: ApiCall, query: &[(&str, &str)]) -> Url {
		let mut url = self.api_base.clone();

		url.set_path(call.path());
		url.set_query(None);
		url.set_fragment(None);

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key, value);
			}
		}

		url
	}

	fn validate(&self) -> Result<(), EndpointsError> {
		if !matches!(self.api_base.scheme(), "http" | "https") {
			return Err(EndpointsError::UnsupportedScheme {
				endpoint: "api_base",
				url: self.api_base.to_string(),
			});
		}

		validate_https("authorize", &self.authorize)?;
		validate_https("qr_connect", &self.qr_connect)?;

		Ok(())
	}
}

fn pick(
	value: &Option<Url>,
	endpoint: &'static str,
	default: &str,
) -> Result<Url, EndpointsError> {
	match value {
		Some(url) => Ok(url.clone()),
		None => Url::parse(default).map_err(|source| EndpointsError::InvalidDefault { endpoint, source }),
	}
}

fn validate_https(endpoint: &'static str, url: &Url) -> Result<(), EndpointsError> {
	if url.scheme() != "https" {
		Err(EndpointsError::InsecureEndpoint { endpoint, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn vendor_endpoints_match_published_hosts() {
		let endpoints = WeComEndpoints::vendor().expect("Vendor endpoints should resolve.");

		assert_eq!(endpoints.api_base.host_str(), Some("qyapi.weixin.qq.com"));
		assert_eq!(endpoints.authorize.as_str(), DEFAULT_AUTHORIZE_URL);
		assert_eq!(endpoints.qr_connect.as_str(), DEFAULT_QR_CONNECT_URL);
	}

	#[test]
	fn api_url_joins_path_and_query() {
		let endpoints = WeComEndpoints::vendor().expect("Vendor endpoints should resolve.");
		let url = endpoints.api_url(ApiCall::GetToken, &[("corpid", "ww1"), ("corpsecret", "s")]);

		assert_eq!(url.as_str(), "https://qyapi.weixin.qq.com/cgi-bin/gettoken?corpid=ww1&corpsecret=s");
	}

	#[test]
	fn overrides_are_validated() {
		let err = WeComEndpoints::resolve(&EndpointOverrides {
			authorize: Some(url("http://open.example.com/authorize")),
			..Default::default()
		})
		.expect_err("Plain HTTP authorize endpoints must be rejected.");

		assert!(matches!(err, EndpointsError::InsecureEndpoint { endpoint: "authorize", .. }));

		let err = WeComEndpoints::resolve(&EndpointOverrides {
			api_base: Some(url("ftp://files.example.com")),
			..Default::default()
		})
		.expect_err("Non-HTTP API bases must be rejected.");

		assert!(matches!(err, EndpointsError::UnsupportedScheme { endpoint: "api_base", .. }));

		let endpoints = WeComEndpoints::resolve(&EndpointOverrides {
			api_base: Some(url("http://127.0.0.1:8080")),
			..Default::default()
		})
		.expect("Plain HTTP API bases are allowed for local mocks.");

		assert_eq!(
			endpoints.api_url(ApiCall::GetUser, &[]).as_str(),
			"http://127.0.0.1:8080/cgi-bin/user/get"
		);
	}
}
