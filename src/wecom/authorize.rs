//! Login redirect construction.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	api::TransportErrorMapper,
	http::ApiHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{AuthorizeKind, AuthorizeRequest, AuthorizeStrategy, QrConnect},
	wecom::WeCom,
};

const STATE_LEN: usize = 32;

/// Login redirect handed to the end user's browser.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRedirect {
	/// Redirect flavor.
	pub kind: AuthorizeKind,
	/// Opaque state value that must round-trip via the callback.
	pub state: String,
	/// Callback URL the vendor redirects to.
	pub redirect_url: Url,
	/// Fully rendered vendor URL.
	pub authorize_url: Url,
}
impl AuthorizationRedirect {
	/// Validates the `state` returned on the callback.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}
impl Debug for AuthorizationRedirect {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRedirect")
			.field("kind", &self.kind)
			.field("state", &self.state)
			.field("redirect_url", &self.redirect_url.as_str())
			.field("authorize_url", &self.authorize_url.as_str())
			.finish()
	}
}

impl<C, M> WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the login redirect with the installed strategy.
	///
	/// The state is the one fixed through [`WeCom::with_state`] or the configuration, or a
	/// fresh 32-character alphanumeric token otherwise.
	pub fn authorize(&self) -> Result<AuthorizationRedirect> {
		self.redirect_with(self.authorize.as_ref())
	}

	/// Builds the QR-connect redirect regardless of the configured scopes.
	///
	/// Fails with [`crate::error::ConfigError::MissingAgentId`] when neither
	/// [`WeCom::with_agent_id`] nor the `agent_id` key supplied one.
	pub fn qr_connect_url(&self) -> Result<Url> {
		self.redirect_with(&QrConnect).map(|redirect| redirect.authorize_url)
	}

	fn redirect_with(&self, strategy: &dyn AuthorizeStrategy) -> Result<AuthorizationRedirect> {
		let _span = FlowSpan::new(FlowKind::Authorize, strategy.kind().as_str()).entered();

		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Attempt);

		let state = self.state.clone().unwrap_or_else(random_state);
		let request = AuthorizeRequest {
			endpoints: &self.endpoints,
			client_id: &self.config.client_id,
			redirect_url: &self.config.redirect_url,
			scope: &self.config.scopes,
			scope_separator: self.config.scope_separator,
			agent_id: self.resolved_agent_id(),
			state: &state,
		};
		let authorize_url = match strategy.authorize_url(&request) {
			Ok(url) => url,
			Err(e) => {
				obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Failure);

				return Err(e);
			},
		};

		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Success);

		Ok(AuthorizationRedirect {
			kind: strategy.kind(),
			state,
			redirect_url: self.config.redirect_url.clone(),
			authorize_url,
		})
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
