//! Authorization-URL strategies.
//!
//! WeCom offers two login redirects: the scoped web-authorization page (opened inside the
//! WeCom client) and the QR-connect page (scanned from a desktop browser). Each is an
//! [`AuthorizeStrategy`]; the provider picks one at construction time from the configured
//! scopes, and callers may install their own.

// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	error::ConfigError,
	provider::{REDIRECT_FRAGMENT, WeComEndpoints},
};

/// Redirect flavors understood by WeCom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizeKind {
	/// `open.weixin.qq.com/connect/oauth2/authorize` with `response_type=code` and scopes.
	Scoped,
	/// `open.work.weixin.qq.com/wwopen/sso/qrConnect` with an agent id.
	QrConnect,
}
impl AuthorizeKind {
	/// Selects the flavor for a scope set: any scope picks [`AuthorizeKind::Scoped`].
	pub fn for_scopes(scope: &ScopeSet) -> Self {
		if scope.is_empty() { Self::QrConnect } else { Self::Scoped }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthorizeKind::Scoped => "scoped",
			AuthorizeKind::QrConnect => "qr_connect",
		}
	}
}
impl Display for AuthorizeKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Inputs shared by every strategy.
#[derive(Clone, Copy, Debug)]
pub struct AuthorizeRequest<'a> {
	/// Resolved endpoint set.
	pub endpoints: &'a WeComEndpoints,
	/// Application id sent as `appid`.
	pub client_id: &'a str,
	/// Callback the vendor redirects to with `code` and `state`.
	pub redirect_url: &'a Url,
	/// Configured scopes.
	pub scope: &'a ScopeSet,
	/// Separator used to join scopes.
	pub scope_separator: char,
	/// Resolved agent id; zero when neither the setter nor configuration supplied one.
	pub agent_id: u64,
	/// Opaque state echoed back on the callback.
	pub state: &'a str,
}

/// Builds the login redirect for one flavor.
pub trait AuthorizeStrategy: Send + Sync {
	/// Flavor produced by this strategy.
	fn kind(&self) -> AuthorizeKind;

	/// Renders the full redirect URL, including the `#wechat_redirect` fragment.
	fn authorize_url(&self, request: &AuthorizeRequest<'_>) -> Result<Url>;
}

/// Scoped web-authorization redirect.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScopedRedirect;
impl AuthorizeStrategy for ScopedRedirect {
	fn kind(&self) -> AuthorizeKind {
		AuthorizeKind::Scoped
	}

	fn authorize_url(&self, request: &AuthorizeRequest<'_>) -> Result<Url> {
		let mut url = request.endpoints.authorize.clone();
		let scope = request.scope.join(request.scope_separator).unwrap_or_default();

		url.query_pairs_mut()
			.append_pair("appid", request.client_id)
			.append_pair("redirect_uri", request.redirect_url.as_str())
			.append_pair("response_type", "code")
			.append_pair("scope", &scope)
			.append_pair("state", request.state);
		url.set_fragment(Some(REDIRECT_FRAGMENT));

		Ok(url)
	}
}

/// QR-connect redirect; requires a non-zero agent id.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrConnect;
impl AuthorizeStrategy for QrConnect {
	fn kind(&self) -> AuthorizeKind {
		AuthorizeKind::QrConnect
	}

	fn authorize_url(&self, request: &AuthorizeRequest<'_>) -> Result<Url> {
		if request.agent_id == 0 {
			return Err(ConfigError::MissingAgentId.into());
		}

		let mut url = request.endpoints.qr_connect.clone();

		url.query_pairs_mut()
			.append_pair("appid", request.client_id)
			.append_pair("agentid", &request.agent_id.to_string())
			.append_pair("redirect_uri", request.redirect_url.as_str())
			.append_pair("state", request.state);
		url.set_fragment(Some(REDIRECT_FRAGMENT));

		Ok(url)
	}
}

/// Returns the built-in strategy for a flavor.
pub fn default_strategy(kind: AuthorizeKind) -> Arc<dyn AuthorizeStrategy> {
	match kind {
		AuthorizeKind::Scoped => Arc::new(ScopedRedirect),
		AuthorizeKind::QrConnect => Arc::new(QrConnect),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request<'a>(
		endpoints: &'a WeComEndpoints,
		redirect: &'a Url,
		scope: &'a ScopeSet,
		agent_id: u64,
	) -> AuthorizeRequest<'a> {
		AuthorizeRequest {
			endpoints,
			client_id: "ww-corp",
			redirect_url: redirect,
			scope,
			scope_separator: ',',
			agent_id,
			state: "state-1",
		}
	}

	#[test]
	fn kind_follows_scope_presence() {
		let scoped = ScopeSet::new(["snsapi_base"]).expect("Scope fixture should be valid.");

		assert_eq!(AuthorizeKind::for_scopes(&scoped), AuthorizeKind::Scoped);
		assert_eq!(AuthorizeKind::for_scopes(&ScopeSet::default()), AuthorizeKind::QrConnect);
		assert_eq!(default_strategy(AuthorizeKind::Scoped).kind(), AuthorizeKind::Scoped);
		assert_eq!(default_strategy(AuthorizeKind::QrConnect).kind(), AuthorizeKind::QrConnect);
	}

	#[test]
	fn scoped_redirect_renders_query_and_fragment() {
		let endpoints = WeComEndpoints::vendor().expect("Vendor endpoints should resolve.");
		let redirect = Url::parse("https://app.example.com/cb").expect("Redirect should parse.");
		let scope = ScopeSet::new(["snsapi_privateinfo", "snsapi_base"])
			.expect("Scope fixture should be valid.");
		let url = ScopedRedirect
			.authorize_url(&request(&endpoints, &redirect, &scope, 0))
			.expect("Scoped redirect never needs an agent id.");

		assert_eq!(
			url.as_str(),
			"https://open.weixin.qq.com/connect/oauth2/authorize?appid=ww-corp&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb&response_type=code&scope=snsapi_base%2Csnsapi_privateinfo&state=state-1#wechat_redirect"
		);
	}

	#[test]
	fn qr_connect_requires_agent_id() {
		let endpoints = WeComEndpoints::vendor().expect("Vendor endpoints should resolve.");
		let redirect = Url::parse("https://app.example.com/cb").expect("Redirect should parse.");
		let scope = ScopeSet::default();
		let err = QrConnect
			.authorize_url(&request(&endpoints, &redirect, &scope, 0))
			.expect_err("Zero agent id must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAgentId)));

		let url = QrConnect
			.authorize_url(&request(&endpoints, &redirect, &scope, 1000002))
			.expect("Non-zero agent id should succeed.");

		assert_eq!(url.host_str(), Some("open.work.weixin.qq.com"));
		assert_eq!(url.path(), "/wwopen/sso/qrConnect");
		assert_eq!(url.fragment(), Some("wechat_redirect"));

		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("agentid").map(String::as_str), Some("1000002"));
		assert_eq!(pairs.get("appid").map(String::as_str), Some("ww-corp"));
		assert!(!pairs.contains_key("scope"));
	}
}
