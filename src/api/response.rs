//! Typed vendor responses.
//!
//! Every WeCom payload carries `errcode`/`errmsg`; a missing `errcode` decodes as zero.
//! String fields default to empty so absent identity fields map to `""`, matching how the
//! vendor omits them for non-employees.

// self
use crate::{_prelude::*, api::ApiCall, user::Attributes};

/// Sentinel used when the vendor reports a failure without a message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown";

/// `errcode`/`errmsg` envelope shared by all vendor responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorStatus {
	/// Vendor error code; zero on success.
	#[serde(default)]
	pub errcode: i64,
	/// Vendor error message.
	#[serde(default)]
	pub errmsg: String,
}
impl VendorStatus {
	/// Returns true when the vendor reported a failure.
	pub fn is_error(&self) -> bool {
		self.errcode != 0
	}

	/// Message to surface in errors, falling back to [`UNKNOWN_ERROR_MESSAGE`].
	pub fn message(&self) -> &str {
		if self.errmsg.is_empty() { UNKNOWN_ERROR_MESSAGE } else { &self.errmsg }
	}

	/// Builds the `AuthFailed` error for `call` from this envelope.
	pub fn to_error(&self, call: ApiCall) -> Error {
		Error::AuthFailed { call, errcode: self.errcode, message: self.message().to_owned() }
	}
}

/// `GET /cgi-bin/gettoken` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
	/// Envelope.
	#[serde(flatten)]
	pub envelope: VendorStatus,
	/// API access token.
	#[serde(default)]
	pub access_token: String,
	/// Lifetime in seconds (informational; tokens are not refreshed).
	#[serde(default)]
	pub expires_in: i64,
}

/// `GET /cgi-bin/user/getuserinfo` payload.
///
/// Employees carry `UserId`, anonymous devices `DeviceId`, non-members `OpenId`, and
/// external contacts `external_userid`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
	/// Envelope.
	#[serde(flatten)]
	pub envelope: VendorStatus,
	/// Member id of an identified employee.
	#[serde(default, rename = "UserId", alias = "UserID", alias = "userid")]
	pub user_id: String,
	/// Device id of the requesting client.
	#[serde(default, rename = "DeviceId", alias = "DeviceID", alias = "deviceid")]
	pub device_id: String,
	/// Open id of a non-member.
	#[serde(default, rename = "OpenId", alias = "OpenID", alias = "openid")]
	pub open_id: String,
	/// External contact id.
	#[serde(default, rename = "external_userid", alias = "ExternalUserID")]
	pub external_user_id: String,
}
impl UserInfo {
	/// Returns true when at least one of user, device, or open id is present.
	pub fn has_identity(&self) -> bool {
		!(self.user_id.is_empty() && self.device_id.is_empty() && self.open_id.is_empty())
	}
}

/// `POST /cgi-bin/user/get` payload: the full member profile.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserDetail {
	/// Envelope.
	#[serde(flatten)]
	pub envelope: VendorStatus,
	/// Member id.
	pub userid: String,
	/// Display name.
	pub name: String,
	/// Department ids.
	pub department: Vec<i64>,
	/// Sort order inside each department.
	pub order: Vec<i64>,
	/// Job title.
	pub position: String,
	/// Mobile number.
	pub mobile: String,
	/// Gender code (`0` unknown, `1` male, `2` female).
	pub gender: String,
	/// Email address.
	pub email: String,
	/// Enterprise mailbox.
	pub biz_mail: String,
	/// Leader flag per department.
	pub is_leader_in_dept: Vec<i64>,
	/// Direct leaders' member ids.
	pub direct_leader: Vec<String>,
	/// Avatar URL.
	pub avatar: String,
	/// Thumbnail avatar URL.
	pub thumb_avatar: String,
	/// Landline number.
	pub telephone: String,
	/// Alias.
	pub alias: String,
	/// Office address.
	pub address: String,
	/// Cross-application open user id.
	pub open_userid: String,
	/// Primary department id.
	pub main_department: i64,
	/// Custom attributes (vendor-defined nested document).
	pub extattr: Value,
	/// Activation status (`1` active, `2` disabled, `4` inactive, `5` left).
	pub status: i64,
	/// Personal QR code URL.
	pub qr_code: String,
	/// Title shown to external contacts.
	pub external_position: String,
	/// Profile shown to external contacts (vendor-defined nested document).
	pub external_profile: Value,
}
impl UserDetail {
	/// Flattens the documented profile fields into an attribute map keyed by vendor names.
	pub fn to_attributes(&self) -> Attributes {
		let mut attributes = Attributes::new();
		let mut put = |key: &str, value: Value| {
			attributes.insert(key.to_owned(), value);
		};

		put("userid", self.userid.clone().into());
		put("name", self.name.clone().into());
		put("department", self.department.clone().into());
		put("order", self.order.clone().into());
		put("position", self.position.clone().into());
		put("mobile", self.mobile.clone().into());
		put("gender", self.gender.clone().into());
		put("email", self.email.clone().into());
		put("biz_mail", self.biz_mail.clone().into());
		put("is_leader_in_dept", self.is_leader_in_dept.clone().into());
		put("direct_leader", self.direct_leader.clone().into());
		put("avatar", self.avatar.clone().into());
		put("thumb_avatar", self.thumb_avatar.clone().into());
		put("telephone", self.telephone.clone().into());
		put("alias", self.alias.clone().into());
		put("address", self.address.clone().into());
		put("open_userid", self.open_userid.clone().into());
		put("main_department", self.main_department.into());
		put("extattr", self.extattr.clone());
		put("status", self.status.into());
		put("qr_code", self.qr_code.clone().into());
		put("external_position", self.external_position.clone().into());
		put("external_profile", self.external_profile.clone());

		attributes
	}
}

/// External contact card returned by `externalcontact/get`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExternalContact {
	/// External contact id.
	pub external_userid: String,
	/// Display name.
	pub name: String,
	/// Job title.
	pub position: String,
	/// Avatar URL.
	pub avatar: String,
	/// Short company name.
	pub corp_name: String,
	/// Full company name.
	pub corp_full_name: String,
	/// Contact type (`1` WeChat user, `2` WeCom user).
	#[serde(rename = "type")]
	pub kind: i64,
	/// Gender code.
	pub gender: i64,
	/// WeChat union id, when authorized.
	pub unionid: String,
}

/// Member who added an external contact.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FollowUser {
	/// Member id.
	pub userid: String,
	/// Remark the member gave the contact.
	pub remark: String,
	/// Description the member gave the contact.
	pub description: String,
	/// Unix timestamp of when the contact was added.
	pub createtime: i64,
	/// Channel state parameter.
	pub state: String,
	/// Operator member id.
	pub oper_userid: String,
	/// How the contact was added.
	pub add_way: i64,
}

/// `GET /cgi-bin/externalcontact/get` payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExternalContactResponse {
	/// Envelope.
	#[serde(flatten)]
	pub envelope: VendorStatus,
	/// Contact card.
	#[serde(default)]
	pub external_contact: ExternalContact,
	/// Members following the contact.
	#[serde(default)]
	pub follow_user: Vec<FollowUser>,
}
