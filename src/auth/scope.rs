//! Scope modeling for the web-authorization redirect.

// std
use std::{collections::BTreeSet, slice::Iter};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized set of OAuth scopes (for WeCom usually `snsapi_base` or `snsapi_privateinfo`).
///
/// Scopes are deduplicated and sorted so equality and hashing stay stable no matter how the
/// configuration listed them. An empty set selects the QR-connect login flow.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeSet {
	scopes: Arc<[String]>,
}
impl ScopeSet {
	/// Creates a normalized scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Ok(Self { scopes: normalize(scopes)? })
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the normalized set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Iterator over normalized scopes.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Joins the scopes with the provider's separator, or `None` when the set is empty.
	pub fn join(&self, separator: char) -> Option<String> {
		if self.is_empty() {
			return None;
		}

		let mut buf = String::new();

		for (idx, value) in self.iter().enumerate() {
			if idx > 0 {
				buf.push(separator);
			}

			buf.push_str(value);
		}

		Some(buf)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.scopes).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.scopes.join(" "))
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeSet {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.scopes.iter() }
	}
}
impl TryFrom<Vec<String>> for ScopeSet {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(|c| c.is_whitespace() || c == ',') {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split(|c: char| c.is_whitespace() || c == ',').filter(|part| !part.is_empty()))
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeSet::new(values).map_err(DeError::custom)
	}
}

fn normalize<I, S>(scopes: I) -> Result<Arc<[String]>, ScopeValidationError>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut set = BTreeSet::new();

	for scope in scopes {
		let owned: String = scope.into();

		if owned.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if owned.chars().any(char::is_whitespace) {
			return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
		}

		set.insert(owned);
	}

	Ok(Arc::from(set.into_iter().collect::<Vec<_>>()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_and_join_with_separator() {
		let scope = ScopeSet::new(["snsapi_privateinfo", "snsapi_base", "snsapi_base"])
			.expect("Scope set should be valid.");

		assert_eq!(scope.len(), 2);
		assert!(scope.contains("snsapi_base"));
		assert_eq!(scope.join(','), Some("snsapi_base,snsapi_privateinfo".into()));
		assert_eq!(scope.join(' '), Some("snsapi_base snsapi_privateinfo".into()));
		assert_eq!(ScopeSet::default().join(','), None);
	}

	#[test]
	fn invalid_entries_are_rejected() {
		assert_eq!(ScopeSet::new([""]).expect_err("Empty scope must fail."), ScopeValidationError::Empty);
		assert!(matches!(
			ScopeSet::new(["snsapi base"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
		assert!(serde_json::from_str::<ScopeSet>("[\"\"]").is_err());
	}

	#[test]
	fn from_str_accepts_comma_or_space_lists() {
		let scope: ScopeSet = "snsapi_base, snsapi_privateinfo".parse().expect("List should parse.");

		assert_eq!(scope.as_slice(), ["snsapi_base".to_owned(), "snsapi_privateinfo".to_owned()]);
		assert!(" , ".parse::<ScopeSet>().is_err());
		assert!("".parse::<ScopeSet>().expect("Empty string means no scopes.").is_empty());
	}
}
