//! Strongly typed provider identifier stamped onto every mapped user.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	Empty,
	/// The identifier contains characters other than ASCII alphanumerics, `-`, or `_`.
	#[error("Provider identifier contains an invalid character: {found:?}.")]
	InvalidCharacter {
		/// First offending character.
		found: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier of the provider that produced a user (for example `wecom`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);
impl ProviderId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProviderId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ProviderId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ProviderId> for String {
	fn from(value: ProviderId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if let Some(found) = view.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
	{
		return Err(IdentifierError::InvalidCharacter { found });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate_charset() {
		assert!(ProviderId::new("").is_err());
		assert!(ProviderId::new(" wecom").is_err(), "Leading whitespace must be rejected.");
		assert_eq!(
			ProviderId::new("we.com").expect_err("Dots must be rejected."),
			IdentifierError::InvalidCharacter { found: '.' }
		);

		let id = ProviderId::new("wecom").expect("Provider fixture should be considered valid.");

		assert_eq!(id.as_ref(), "wecom");
		assert_eq!(format!("{id:?}"), "Provider(wecom)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: ProviderId =
			serde_json::from_str("\"wecom\"").expect("Provider should deserialize successfully.");

		assert_eq!(&*id, "wecom");
		assert!(serde_json::from_str::<ProviderId>("\"with space\"").is_err());
		assert!(ProviderId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}
