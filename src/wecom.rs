//! The WeCom provider: configuration, per-instance mutators, and the code-exchange pipeline.
//!
//! A [`WeCom`] value owns the transport, the resolved endpoint set, and the two pieces of
//! per-exchange state (the cached API access token and the `detailed` flag). Exchanges take
//! `&mut self`; run one instance per in-flight exchange.

pub mod authorize;

mod exchange;

pub use authorize::*;

// self
use crate::{
	_prelude::*,
	api::TransportErrorMapper,
	auth::{ProviderId, Secret},
	config::WeComConfig,
	error::ConfigError,
	http::ApiHttpClient,
	provider::{AuthorizeKind, AuthorizeStrategy, ProviderFuture, SocialProvider, WeComEndpoints},
	user::{self, Attributes, IdentityKind, Profile, User},
};
#[cfg(feature = "reqwest")]
use crate::{api::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

/// Identifier stamped onto every user this provider produces.
pub const PROVIDER_ID: &str = "wecom";

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestWeCom = WeCom<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// WeCom social-login provider.
pub struct WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	config: WeComConfig,
	endpoints: WeComEndpoints,
	id: ProviderId,
	authorize: Arc<dyn AuthorizeStrategy>,
	detailed: bool,
	agent_id: u64,
	api_access_token: Option<Secret>,
	state: Option<String>,
}
impl<C, M> WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	///
	/// Endpoint overrides are validated here; the redirect flavor is chosen from the
	/// configured scopes (any scope selects the scoped page, none selects QR connect).
	pub fn with_http_client(
		config: WeComConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let endpoints = WeComEndpoints::resolve(&config.endpoints).map_err(ConfigError::from)?;
		let id = ProviderId::new(PROVIDER_ID).map_err(ConfigError::from)?;
		let authorize = crate::provider::default_strategy(AuthorizeKind::for_scopes(&config.scopes));
		let api_access_token = config.api_access_token.clone().filter(|token| !token.is_empty());
		let state = config.state.clone();

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			endpoints,
			id,
			authorize,
			detailed: false,
			agent_id: 0,
			api_access_token,
			state,
		})
	}

	/// Requests the full member profile after the user id is resolved.
	///
	/// The flag is reset during an exchange when the vendor resolves no employee id.
	pub fn detailed(mut self) -> Self {
		self.detailed = true;

		self
	}

	/// Sets the agent id used by the QR-connect redirect; zero falls back to the config.
	pub fn with_agent_id(mut self, agent_id: u64) -> Self {
		self.agent_id = agent_id;

		self
	}

	/// Supplies an API access token so exchanges skip `gettoken`.
	pub fn with_api_access_token(mut self, token: impl Into<Secret>) -> Self {
		let token: Secret = token.into();

		self.api_access_token = (!token.is_empty()).then_some(token);

		self
	}

	/// Fixes the `state` sent with login redirects.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Replaces the redirect strategy chosen from the scopes.
	pub fn with_authorize_strategy(mut self, strategy: Arc<dyn AuthorizeStrategy>) -> Self {
		self.authorize = strategy;

		self
	}

	/// Returns whether the next exchange will fetch the full member profile.
	pub fn is_detailed(&self) -> bool {
		self.detailed
	}

	/// Redirect flavor produced by [`WeCom::authorize`].
	pub fn authorize_strategy(&self) -> AuthorizeKind {
		self.authorize.kind()
	}

	/// Configuration the provider was built from.
	pub fn config(&self) -> &WeComConfig {
		&self.config
	}

	/// Resolved endpoint set.
	pub fn endpoints(&self) -> &WeComEndpoints {
		&self.endpoints
	}

	/// Maps a vendor response into an employee user.
	pub fn map_user_to_employee(&self, profile: Profile<'_>) -> User {
		user::map_profile(&self.id, IdentityKind::Employee, profile)
	}

	/// Maps a vendor response into a contact user.
	pub fn map_user_to_contact(&self, profile: Profile<'_>) -> User {
		user::map_profile(&self.id, IdentityKind::Contact, profile)
	}

	/// Returns the employee member id (`userID`) of `user`, or `""`.
	pub fn identify_user_as_employee<'u>(&self, user: &'u User) -> &'u str {
		user::identify_as_employee(user)
	}

	/// Returns the contact open id (`openID`) of `user`, or `""`.
	pub fn identify_user_as_contact<'u>(&self, user: &'u User) -> &'u str {
		user::identify_as_contact(user)
	}

	fn resolved_agent_id(&self) -> u64 {
		if self.agent_id != 0 { self.agent_id } else { self.config.agent_id }
	}
}
#[cfg(feature = "reqwest")]
impl WeCom<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a default reqwest transport.
	pub fn new(config: WeComConfig) -> Result<Self> {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> SocialProvider for WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn id(&self) -> &ProviderId {
		&self.id
	}

	fn authorize(&self) -> Result<AuthorizationRedirect> {
		WeCom::authorize(self)
	}

	fn token_url(&self) -> Option<&Url> {
		None
	}

	fn user_from_code<'a>(&'a mut self, code: &'a str) -> ProviderFuture<'a, User> {
		Box::pin(WeCom::user_from_code(self, code))
	}

	fn user_by_token<'a>(&'a self, _token: &'a str) -> ProviderFuture<'a, Attributes> {
		Box::pin(async { Err(Error::Unsupported { operation: "access_token mode" }) })
	}
}
impl<C, M> Debug for WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WeCom")
			.field("id", &self.id)
			.field("client_id", &self.config.client_id)
			.field("authorize", &self.authorize.kind())
			.field("detailed", &self.detailed)
			.field("agent_id", &self.resolved_agent_id())
			.field("api_access_token_set", &self.api_access_token.is_some())
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	fn config(scopes: &[&str]) -> WeComConfig {
		WeComConfig::builder(
			"ww-corp",
			Url::parse("https://app.example.com/cb").expect("Redirect should parse."),
		)
		.scopes(scopes.iter().copied())
		.corp_credentials("corp-1", "corp-secret")
		.build()
		.expect("Config should build.")
	}

	#[test]
	fn strategy_follows_scopes() {
		let scoped = ReqwestWeCom::new(config(&["snsapi_base"])).expect("Provider should build.");
		let qr = ReqwestWeCom::new(config(&[])).expect("Provider should build.");

		assert_eq!(scoped.authorize_strategy(), AuthorizeKind::Scoped);
		assert_eq!(qr.authorize_strategy(), AuthorizeKind::QrConnect);
		assert!(scoped.token_url().is_none());
		assert_eq!(scoped.id().as_ref(), PROVIDER_ID);
	}

	#[test]
	fn mutators_update_state() {
		let provider = ReqwestWeCom::new(config(&[]))
			.expect("Provider should build.")
			.detailed()
			.with_agent_id(1000002)
			.with_api_access_token("T");

		assert!(provider.is_detailed());
		assert_eq!(provider.resolved_agent_id(), 1000002);
		assert_eq!(provider.api_access_token.as_ref().map(Secret::expose), Some("T"));
	}

	#[test]
	fn debug_redacts_tokens() {
		let provider = ReqwestWeCom::new(config(&["snsapi_base"]))
			.expect("Provider should build.")
			.with_api_access_token("very-secret-token");
		let rendered = format!("{provider:?}");

		assert!(rendered.contains("api_access_token_set: true"));
		assert!(!rendered.contains("very-secret-token"));
		assert!(!rendered.contains("corp-secret"));
	}

	#[test]
	fn insecure_authorize_override_is_rejected() {
		let mut config = config(&["snsapi_base"]);

		config.endpoints.authorize =
			Some(Url::parse("http://open.example.com/authorize").expect("URL should parse."));

		let err = ReqwestWeCom::new(config).expect_err("Plain-HTTP authorize endpoints must fail.");

		assert!(matches!(err, Error::Config(ConfigError::Endpoints(_))));
	}
}
