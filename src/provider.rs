//! Generic social-provider contract plus WeCom's endpoint set and redirect strategies.
//!
//! `endpoints` exposes the validated vendor URLs, `authorize` the two login-redirect
//! flavors behind [`AuthorizeStrategy`]. [`SocialProvider`] is the object-safe contract a
//! multi-provider login layer drives without knowing which vendor sits behind it.

pub mod authorize;
pub mod endpoints;

pub use authorize::*;
pub use endpoints::*;

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	user::{Attributes, User},
	wecom::AuthorizationRedirect,
};

/// Boxed `Send` future returned by [`SocialProvider`] methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Contract shared by every social-login provider.
///
/// Exchanges take `&mut self` because a provider may cache vendor credentials between
/// calls; use one instance per in-flight exchange.
pub trait SocialProvider: Send {
	/// Identifier stamped onto every produced [`User`].
	fn id(&self) -> &ProviderId;

	/// Builds the login redirect the end user should be sent to.
	fn authorize(&self) -> Result<AuthorizationRedirect>;

	/// Token endpoint for code exchanges, when the provider uses a standard one.
	fn token_url(&self) -> Option<&Url>;

	/// Exchanges an authorization code for a normalized user.
	fn user_from_code<'a>(&'a mut self, code: &'a str) -> ProviderFuture<'a, User>;

	/// Fetches raw user attributes for an OAuth access token.
	fn user_by_token<'a>(&'a self, token: &'a str) -> ProviderFuture<'a, Attributes>;
}
