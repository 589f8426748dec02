//! Code-exchange pipeline: access token, user id, optional profile, mapping.

// self
use crate::{
	_prelude::*,
	api::{
		self, ApiCall, ExternalContactResponse, TokenResponse, TransportErrorMapper, UserDetail,
		UserInfo, VendorStatus,
	},
	auth::Secret,
	http::ApiHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	user::{IdentityKind, Profile, User},
	wecom::WeCom,
};

impl<C, M> WeCom<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns the API access token, calling `gettoken` with the corp credentials on first use.
	///
	/// The token is cached on the instance and never refreshed.
	pub async fn api_access_token(&mut self) -> Result<Secret> {
		if let Some(token) = &self.api_access_token {
			return Ok(token.clone());
		}

		let token = self.create_api_access_token().await?;

		self.api_access_token = Some(token.clone());

		Ok(token)
	}

	/// Resolves the identity behind an authorization code.
	///
	/// Turns detailed mode off when the vendor resolves no employee id.
	pub async fn user_id(&mut self, access_token: &str, code: &str) -> Result<UserInfo> {
		let info: UserInfo = self
			.call(ApiCall::GetUserInfo, &[("access_token", access_token), ("code", code)])
			.await?;

		if info.envelope.is_error() {
			return Err(obs::report_auth_failure(ApiCall::GetUserInfo, &info.envelope));
		}
		if !info.has_identity() {
			return Err(obs::report_auth_failure(ApiCall::GetUserInfo, &missing_field()));
		}
		if info.user_id.is_empty() {
			self.detailed = false;
		}

		Ok(info)
	}

	/// Fetches the full member profile for `user_id`.
	pub async fn user_by_id(&mut self, user_id: &str) -> Result<UserDetail> {
		let token = self.api_access_token().await?;
		let detail: UserDetail = self
			.call(ApiCall::GetUser, &[("access_token", token.expose()), ("userid", user_id)])
			.await?;

		if detail.envelope.is_error() {
			return Err(obs::report_auth_failure(ApiCall::GetUser, &detail.envelope));
		}
		if detail.userid.is_empty() {
			return Err(obs::report_auth_failure(ApiCall::GetUser, &missing_field()));
		}

		Ok(detail)
	}

	/// Fetches an external contact card and the members following it.
	pub async fn external_contact(
		&mut self,
		external_user_id: &str,
	) -> Result<ExternalContactResponse> {
		let token = self.api_access_token().await?;
		let contact: ExternalContactResponse = self
			.call(
				ApiCall::GetExternalContact,
				&[("access_token", token.expose()), ("external_userid", external_user_id)],
			)
			.await?;

		if contact.envelope.is_error() {
			return Err(obs::report_auth_failure(ApiCall::GetExternalContact, &contact.envelope));
		}

		Ok(contact)
	}

	/// Exchanges an authorization code for an employee user.
	pub async fn user_from_code(&mut self, code: &str) -> Result<User> {
		self.exchange(IdentityKind::Employee, code).await
	}

	/// Exchanges an authorization code for a contact user.
	pub async fn contact_from_code(&mut self, code: &str) -> Result<User> {
		self.exchange(IdentityKind::Contact, code).await
	}

	async fn exchange(&mut self, kind: IdentityKind, code: &str) -> Result<User> {
		let flow = FlowKind::from(kind);
		let span = FlowSpan::new(flow, "exchange_code");

		obs::record_flow_outcome(flow, FlowOutcome::Attempt);

		let result = span.instrument(self.resolve_user(kind, code)).await;

		obs::record_flow_outcome(
			flow,
			if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure },
		);

		result
	}

	async fn resolve_user(&mut self, kind: IdentityKind, code: &str) -> Result<User> {
		let token = self.api_access_token().await?;
		let info = self.user_id(token.expose(), code).await?;

		if self.detailed {
			let detail = self.user_by_id(&info.user_id).await?;

			return Ok(self.map(kind, Profile::Detailed(&detail)));
		}

		Ok(self.map(kind, Profile::Basic(&info)))
	}

	async fn create_api_access_token(&self) -> Result<Secret> {
		let credentials = self.config.corp_credentials();
		let response: TokenResponse = self
			.call(
				ApiCall::GetToken,
				&[
					("corpid", credentials.corp_id.as_str()),
					("corpsecret", credentials.corp_secret.expose()),
				],
			)
			.await?;

		if response.envelope.is_error() {
			return Err(obs::report_auth_failure(ApiCall::GetToken, &response.envelope));
		}
		if response.access_token.is_empty() {
			return Err(obs::report_auth_failure(ApiCall::GetToken, &missing_field()));
		}

		Ok(Secret::new(response.access_token))
	}

	async fn call<T>(&self, call: ApiCall, query: &[(&str, &str)]) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		api::dispatch(
			&*self.http_client,
			&*self.transport_mapper,
			&self.endpoints,
			call,
			query,
		)
		.await
	}

	fn map(&self, kind: IdentityKind, profile: Profile<'_>) -> User {
		match kind {
			IdentityKind::Employee => self.map_user_to_employee(profile),
			IdentityKind::Contact => self.map_user_to_contact(profile),
		}
	}
}

// A success envelope whose expected identity field is empty.
fn missing_field() -> VendorStatus {
	VendorStatus::default()
}
