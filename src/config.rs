//! Provider configuration.
//!
//! [`WeComConfig`] deserializes from the flat key/value documents social-login layers
//! usually keep per provider, and [`WeComConfigBuilder`] covers programmatic setup. The
//! vendor's tenant credentials are accepted under two spellings (`corpid`/`corp_id`,
//! `corpsecret`/`corp_secret`); the underscore spelling wins when it is non-empty.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Secret},
	error::ConfigError,
	provider::EndpointOverrides,
};

/// Separator used to join scopes when the configuration does not name one.
pub const DEFAULT_SCOPE_SEPARATOR: char = ',';

/// Immutable WeCom provider configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeComConfig {
	/// Application id sent as `appid` in redirects.
	pub client_id: String,
	/// Application secret (unused by the WeCom calls, kept for the generic contract).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<Secret>,
	/// Callback URL registered with WeCom.
	pub redirect_url: Url,
	/// Web-authorization scopes; empty selects the QR-connect flow.
	#[serde(default)]
	pub scopes: ScopeSet,
	/// Separator used when joining scopes.
	#[serde(default = "default_scope_separator")]
	pub scope_separator: char,
	/// Application agent id; zero means unset.
	#[serde(default)]
	pub agent_id: u64,
	/// Corp id (legacy spelling).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corpid: Option<String>,
	/// Corp id; wins over `corpid` when non-empty.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corp_id: Option<String>,
	/// Corp secret (legacy spelling).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corpsecret: Option<Secret>,
	/// Corp secret; wins over `corpsecret` when non-empty.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corp_secret: Option<Secret>,
	/// Pre-supplied API access token that skips the `gettoken` call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_access_token: Option<Secret>,
	/// Fixed `state` for redirects; a random one is generated when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Endpoint overrides.
	#[serde(default)]
	pub endpoints: EndpointOverrides,
}
impl WeComConfig {
	/// Creates a builder seeded with the required keys.
	pub fn builder(client_id: impl Into<String>, redirect_url: Url) -> WeComConfigBuilder {
		WeComConfigBuilder::new(client_id).redirect_url(redirect_url)
	}

	/// Decodes a configuration document, reporting the path of the first offending key.
	pub fn from_value(value: Value) -> Result<Self, ConfigError> {
		serde_path_to_error::deserialize(value)
			.map_err(|source| ConfigError::InvalidDocument { source })
	}

	/// Resolves the tenant credentials used by `gettoken`.
	pub fn corp_credentials(&self) -> CorpCredentials {
		let corp_id = prefer(self.corp_id.as_deref(), self.corpid.as_deref()).unwrap_or_default();
		let corp_secret = prefer(
			self.corp_secret.as_ref().map(Secret::expose),
			self.corpsecret.as_ref().map(Secret::expose),
		)
		.unwrap_or_default();

		CorpCredentials { corp_id: corp_id.to_owned(), corp_secret: Secret::new(corp_secret) }
	}
}

/// Tenant credentials identifying the enterprise account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpCredentials {
	/// Corp id sent as `corpid`.
	pub corp_id: String,
	/// Corp secret sent as `corpsecret`.
	pub corp_secret: Secret,
}

/// Builder for [`WeComConfig`] values.
#[derive(Debug)]
pub struct WeComConfigBuilder {
	/// Application id.
	pub client_id: String,
	/// Optional application secret.
	pub client_secret: Option<Secret>,
	/// Callback URL; required by [`WeComConfigBuilder::build`].
	pub redirect_url: Option<Url>,
	/// Raw scope strings, validated on build.
	pub scopes: Vec<String>,
	/// Scope separator.
	pub scope_separator: char,
	/// Agent id; zero means unset.
	pub agent_id: u64,
	/// Corp id.
	pub corp_id: Option<String>,
	/// Corp secret.
	pub corp_secret: Option<Secret>,
	/// Pre-supplied API access token.
	pub api_access_token: Option<Secret>,
	/// Fixed redirect state.
	pub state: Option<String>,
	/// Endpoint overrides.
	pub endpoints: EndpointOverrides,
}
impl WeComConfigBuilder {
	/// Creates a builder for the provided application id.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			redirect_url: None,
			scopes: Vec::new(),
			scope_separator: DEFAULT_SCOPE_SEPARATOR,
			agent_id: 0,
			corp_id: None,
			corp_secret: None,
			api_access_token: None,
			state: None,
			endpoints: EndpointOverrides::default(),
		}
	}

	/// Sets the application secret.
	pub fn client_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the callback URL.
	pub fn redirect_url(mut self, url: Url) -> Self {
		self.redirect_url = Some(url);

		self
	}

	/// Replaces the scope list.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the scope separator.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = separator;

		self
	}

	/// Sets the application agent id.
	pub fn agent_id(mut self, agent_id: u64) -> Self {
		self.agent_id = agent_id;

		self
	}

	/// Sets the tenant credentials.
	pub fn corp_credentials(
		mut self,
		corp_id: impl Into<String>,
		corp_secret: impl Into<Secret>,
	) -> Self {
		self.corp_id = Some(corp_id.into());
		self.corp_secret = Some(corp_secret.into());

		self
	}

	/// Supplies an API access token up front.
	pub fn api_access_token(mut self, token: impl Into<Secret>) -> Self {
		self.api_access_token = Some(token.into());

		self
	}

	/// Fixes the redirect state.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Overrides the API base (private deployments, mock servers).
	pub fn api_base(mut self, url: Url) -> Self {
		self.endpoints.api_base = Some(url);

		self
	}

	/// Replaces every endpoint override.
	pub fn endpoints(mut self, endpoints: EndpointOverrides) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<WeComConfig, ConfigError> {
		let redirect_url = self.redirect_url.ok_or(ConfigError::MissingRedirectUrl)?;
		let scopes = ScopeSet::new(self.scopes)?;

		Ok(WeComConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			redirect_url,
			scopes,
			scope_separator: self.scope_separator,
			agent_id: self.agent_id,
			corpid: None,
			corp_id: self.corp_id,
			corpsecret: None,
			corp_secret: self.corp_secret,
			api_access_token: self.api_access_token,
			state: self.state,
			endpoints: self.endpoints,
		})
	}
}

fn default_scope_separator() -> char {
	DEFAULT_SCOPE_SEPARATOR
}

fn prefer<'a>(primary: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
	primary.filter(|value| !value.is_empty()).or(fallback)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn underscore_keys_win_when_non_empty() {
		let config = WeComConfig::from_value(json!({
			"client_id": "ww-app",
			"redirect_url": "https://app.example.com/cb",
			"corpid": "legacy-corp",
			"corp_id": "corp-1",
			"corpsecret": "legacy-secret",
			"corp_secret": "",
		}))
		.expect("Config document should decode.");
		let credentials = config.corp_credentials();

		assert_eq!(credentials.corp_id, "corp-1");
		assert_eq!(credentials.corp_secret.expose(), "legacy-secret");
	}

	#[test]
	fn missing_credentials_resolve_to_empty_strings() {
		let config = WeComConfig::from_value(json!({
			"client_id": "ww-app",
			"redirect_url": "https://app.example.com/cb",
		}))
		.expect("Config document should decode.");
		let credentials = config.corp_credentials();

		assert_eq!(credentials.corp_id, "");
		assert!(credentials.corp_secret.is_empty());
		assert_eq!(config.scope_separator, DEFAULT_SCOPE_SEPARATOR);
		assert_eq!(config.agent_id, 0);
		assert!(config.scopes.is_empty());
	}

	#[test]
	fn invalid_documents_report_key_path() {
		let err = WeComConfig::from_value(json!({
			"client_id": "ww-app",
			"redirect_url": "https://app.example.com/cb",
			"agent_id": "not-a-number",
		}))
		.expect_err("String agent ids must be rejected.");

		assert!(err.to_string().contains("agent_id"), "Unexpected message: {err}");
	}

	#[test]
	fn builder_validates_redirect_and_scopes() {
		let err = WeComConfigBuilder::new("ww-app").build().expect_err("Redirect is required.");

		assert!(matches!(err, ConfigError::MissingRedirectUrl));

		let redirect = Url::parse("https://app.example.com/cb").expect("Redirect should parse.");
		let err = WeComConfig::builder("ww-app", redirect.clone())
			.scopes(["snsapi base"])
			.build()
			.expect_err("Whitespace scopes must be rejected.");

		assert!(matches!(err, ConfigError::InvalidScope(_)));

		let config = WeComConfig::builder("ww-app", redirect)
			.scopes(["snsapi_base"])
			.agent_id(1000002)
			.corp_credentials("corp-1", "secret-1")
			.build()
			.expect("Builder should succeed.");

		assert_eq!(config.agent_id, 1000002);
		assert_eq!(config.corp_credentials().corp_id, "corp-1");
		assert!(config.scopes.contains("snsapi_base"));
	}
}
