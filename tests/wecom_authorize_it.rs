// self
use socialite_wecom::{
	_preludet::*,
	config::WeComConfig,
	error::ConfigError,
	provider::{AuthorizeKind, AuthorizeRequest, AuthorizeStrategy, SocialProvider},
	wecom::ReqwestWeCom,
};

fn redirect_url() -> Url {
	Url::parse("https://app.example.com/cb").expect("Redirect URL should parse successfully.")
}

fn provider(scopes: &[&str], agent_id: u64) -> ReqwestWeCom {
	let config = WeComConfig::builder("ww-app", redirect_url())
		.scopes(scopes.iter().copied())
		.agent_id(agent_id)
		.build()
		.expect("WeCom config should build successfully.");

	ReqwestWeCom::new(config).expect("Provider should build successfully.")
}

fn query(url: &Url) -> HashMap<String, String> {
	url.query_pairs().into_owned().collect()
}

#[test]
fn scoped_redirect_joins_scopes() {
	let redirect = provider(&["snsapi_privateinfo", "snsapi_base"], 0)
		.with_state("state-1")
		.authorize()
		.expect("Scoped redirect should build.");
	let params = query(&redirect.authorize_url);

	assert_eq!(redirect.kind, AuthorizeKind::Scoped);
	assert_eq!(redirect.authorize_url.host_str(), Some("open.weixin.qq.com"));
	assert_eq!(redirect.authorize_url.fragment(), Some("wechat_redirect"));
	assert_eq!(params.get("appid").map(String::as_str), Some("ww-app"));
	assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
	assert_eq!(params.get("scope").map(String::as_str), Some("snsapi_base,snsapi_privateinfo"));
	assert_eq!(params.get("redirect_uri").map(String::as_str), Some("https://app.example.com/cb"));
	assert_eq!(params.get("state").map(String::as_str), Some("state-1"));
	assert!(redirect.validate_state("state-1").is_ok());
}

#[test]
fn empty_scopes_select_qr_connect() {
	let redirect = provider(&[], 1000002).authorize().expect("QR redirect should build.");
	let params = query(&redirect.authorize_url);

	assert_eq!(redirect.kind, AuthorizeKind::QrConnect);
	assert_eq!(redirect.authorize_url.host_str(), Some("open.work.weixin.qq.com"));
	assert_eq!(params.get("agentid").map(String::as_str), Some("1000002"));
	assert!(!params.contains_key("scope"));
	assert_eq!(redirect.state.len(), 32);
	assert_eq!(params.get("state"), Some(&redirect.state));
}

#[test]
fn explicit_agent_id_wins_over_config() {
	let url = provider(&["snsapi_base"], 1000002)
		.with_agent_id(42)
		.qr_connect_url()
		.expect("QR URL should build.");

	assert_eq!(query(&url).get("agentid").map(String::as_str), Some("42"));
}

#[test]
fn qr_connect_without_agent_id_is_a_config_error() {
	let err = provider(&[], 0).authorize().expect_err("Agent id is required for QR connect.");

	assert!(matches!(err, Error::Config(ConfigError::MissingAgentId)));
	assert!(err.to_string().contains("Agent id required"));
}

#[test]
fn trait_authorize_uses_installed_strategy() {
	struct FixedStrategy;
	impl AuthorizeStrategy for FixedStrategy {
		fn kind(&self) -> AuthorizeKind {
			AuthorizeKind::Scoped
		}

		fn authorize_url(&self, request: &AuthorizeRequest<'_>) -> Result<Url> {
			let mut url = Url::parse("https://sso.example.com/login").expect("URL should parse.");

			url.query_pairs_mut().append_pair("state", request.state);

			Ok(url)
		}
	}

	let provider: Box<dyn SocialProvider> = Box::new(
		provider(&[], 0).with_state("fixed").with_authorize_strategy(Arc::new(FixedStrategy)),
	);
	let redirect = provider.authorize().expect("Custom redirect should build.");

	assert_eq!(redirect.authorize_url.as_str(), "https://sso.example.com/login?state=fixed");
	assert!(matches!(redirect.validate_state("other"), Err(Error::StateMismatch)));
}
