//! Generic user record and the WeCom response mappers.

// self
use crate::{
	_prelude::*,
	api::{UserDetail, UserInfo},
	auth::ProviderId,
};

/// Flat string-keyed attribute map carried by a [`User`].
pub type Attributes = BTreeMap<String, Value>;

/// Basic-mapping key for the employee member id.
pub const USER_ID_KEY: &str = "userID";
/// Basic-mapping key for the device id.
pub const DEVICE_ID_KEY: &str = "deviceID";
/// Basic-mapping key for the open id.
pub const OPEN_ID_KEY: &str = "openID";
/// Basic-mapping key for the external contact id (contact mapping only).
pub const EXTERNAL_USER_ID_KEY: &str = "externalUserID";

/// Provider-agnostic user produced by a code exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	provider: ProviderId,
	attributes: Attributes,
	raw: Attributes,
}
impl User {
	/// Creates a user from its attributes; the raw payload starts empty.
	pub fn new(attributes: Attributes, provider: ProviderId) -> Self {
		Self { provider, attributes, raw: Attributes::new() }
	}

	/// Replaces the provider back-reference.
	pub fn with_provider(mut self, provider: ProviderId) -> Self {
		self.provider = provider;

		self
	}

	/// Replaces the raw payload.
	pub fn with_raw(mut self, raw: Attributes) -> Self {
		self.raw = raw;

		self
	}

	/// Provider that produced this user.
	pub fn provider(&self) -> &ProviderId {
		&self.provider
	}

	/// Current attributes.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Untouched attribute set captured when the user was mapped.
	pub fn raw(&self) -> &Attributes {
		&self.raw
	}

	/// Looks up one attribute.
	pub fn attribute(&self, key: &str) -> Option<&Value> {
		self.attributes.get(key)
	}

	/// Looks up a string attribute, returning `""` when absent or not a string.
	pub fn attribute_str(&self, key: &str) -> &str {
		self.attribute(key).and_then(Value::as_str).unwrap_or_default()
	}

	/// Sets one attribute (post-processing hook; [`User::raw`] is left untouched).
	pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.attributes.insert(key.into(), value.into());
	}
}

/// Identity class a code exchange resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKind {
	/// Internal staff keyed by `userID`.
	Employee,
	/// External party keyed by `openID`/`externalUserID`.
	Contact,
}
impl IdentityKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentityKind::Employee => "employee",
			IdentityKind::Contact => "contact",
		}
	}
}

/// Vendor response a user is mapped from.
#[derive(Clone, Copy, Debug)]
pub enum Profile<'a> {
	/// `user/getuserinfo` result.
	Basic(&'a UserInfo),
	/// `user/get` result.
	Detailed(&'a UserDetail),
}

/// Maps a vendor response into a fresh [`User`] stamped with `provider` and a raw copy of
/// its own attributes.
pub fn map_profile(provider: &ProviderId, kind: IdentityKind, profile: Profile<'_>) -> User {
	let attributes = match profile {
		Profile::Detailed(detail) => detail.to_attributes(),
		Profile::Basic(info) => basic_attributes(kind, info),
	};
	let raw = attributes.clone();

	User::new(attributes, provider.clone()).with_raw(raw)
}

/// Returns the employee member id (`userID`), or `""`.
pub fn identify_as_employee(user: &User) -> &str {
	user.attribute_str(USER_ID_KEY)
}

/// Returns the contact open id (`openID`), or `""`.
pub fn identify_as_contact(user: &User) -> &str {
	user.attribute_str(OPEN_ID_KEY)
}

fn basic_attributes(kind: IdentityKind, info: &UserInfo) -> Attributes {
	let mut attributes = Attributes::from([
		(USER_ID_KEY.to_owned(), Value::from(info.user_id.as_str())),
		(DEVICE_ID_KEY.to_owned(), Value::from(info.device_id.as_str())),
		(OPEN_ID_KEY.to_owned(), Value::from(info.open_id.as_str())),
	]);

	if kind == IdentityKind::Contact {
		attributes
			.insert(EXTERNAL_USER_ID_KEY.to_owned(), Value::from(info.external_user_id.as_str()));
	}

	attributes
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn provider() -> ProviderId {
		ProviderId::new("wecom").expect("Provider fixture should be valid.")
	}

	fn info() -> UserInfo {
		UserInfo {
			user_id: String::new(),
			device_id: "d1".into(),
			open_id: "o1".into(),
			external_user_id: String::new(),
			..Default::default()
		}
	}

	#[test]
	fn employee_mapping_never_includes_external_id() {
		let user = map_profile(&provider(), IdentityKind::Employee, Profile::Basic(&info()));

		assert_eq!(user.attributes().len(), 3);
		assert_eq!(user.attribute(USER_ID_KEY), Some(&json!("")));
		assert_eq!(user.attribute(DEVICE_ID_KEY), Some(&json!("d1")));
		assert_eq!(user.attribute(OPEN_ID_KEY), Some(&json!("o1")));
		assert!(user.attribute(EXTERNAL_USER_ID_KEY).is_none());
		assert_eq!(user.provider().as_ref(), "wecom");
	}

	#[test]
	fn contact_mapping_always_includes_external_id() {
		let user = map_profile(&provider(), IdentityKind::Contact, Profile::Basic(&info()));

		assert_eq!(user.attributes().len(), 4);
		assert_eq!(user.attribute(EXTERNAL_USER_ID_KEY), Some(&json!("")));
		assert_eq!(identify_as_contact(&user), "o1");
		assert_eq!(identify_as_employee(&user), "");
	}

	#[test]
	fn detailed_mapping_captures_raw_copy() {
		let detail = UserDetail {
			userid: "zhangsan".into(),
			name: "Zhang San".into(),
			department: vec![1],
			..Default::default()
		};

		for kind in [IdentityKind::Employee, IdentityKind::Contact] {
			let user = map_profile(&provider(), kind, Profile::Detailed(&detail));

			assert_eq!(user.raw(), user.attributes());
			assert_eq!(user.attribute_str("userid"), "zhangsan");
		}
	}

	#[test]
	fn post_processing_leaves_raw_untouched() {
		let mut user = map_profile(&provider(), IdentityKind::Employee, Profile::Basic(&info()));

		user.set_attribute("nickname", "Zhang");

		assert_eq!(user.attribute_str("nickname"), "Zhang");
		assert!(!user.raw().contains_key("nickname"));
	}
}
