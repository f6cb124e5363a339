//! Secure string handling for carrier credentials
//!
//! Carrier API keys, basic-auth passwords and OAuth2 client secrets are held
//! in a `SecretString` that zeroizes its contents on drop and redacts itself
//! from `Debug`/`Display` output and log lines.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string that clears its memory when dropped and never prints its value
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	/// Create a new `SecretString` from a `String`
	pub fn new(secret: String) -> Self {
		Self { inner: secret }
	}

	/// Create a new `SecretString` from a string slice
	pub fn from_string(secret: &str) -> Self {
		Self::new(secret.to_string())
	}

	/// Expose the secret value
	///
	/// Use sparingly; the returned slice is the live secret.
	pub fn expose_secret(&self) -> &str {
		&self.inner
	}

	/// Length of the secret without exposing it
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Whether the secret is empty, without exposing it
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SecretString")
			.field("inner", &"[REDACTED]")
			.finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(secret: String) -> Self {
		Self::new(secret)
	}
}

impl From<&str> for SecretString {
	fn from(secret: &str) -> Self {
		Self::from_string(secret)
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for SecretString {}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.inner)
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let secret = String::deserialize(deserializer)?;
		Ok(Self::new(secret))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_and_display_redact() {
		let secret = SecretString::from_string("carrier-api-key-12345");
		assert!(!format!("{:?}", secret).contains("carrier-api-key"));
		assert_eq!(format!("{}", secret), "[REDACTED]");
	}

	#[test]
	fn test_expose_secret() {
		let secret = SecretString::from_string("basic-auth-pass");
		assert_eq!(secret.expose_secret(), "basic-auth-pass");
		assert_eq!(secret.len(), 15);
		assert!(!secret.is_empty());
	}
}
