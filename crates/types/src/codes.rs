//! Internal-to-carrier classification code mappings
//!
//! Carriers rate Workers' Compensation exposure against their own class code
//! vocabulary (NCCI or proprietary), keyed by territory. The host platform
//! resolves the full mapping set before an attempt starts; a missing mapping
//! for a code the application uses is a pre-transport hard stop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lookup from (internal code, territory) to the carrier's native code
///
/// Loaded once per quote attempt and treated as immutable thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CodeMappingSet {
	entries: HashMap<String, String>,
}

impl CodeMappingSet {
	pub fn new() -> Self {
		Self::default()
	}

	fn key(internal_code: &str, territory: &str) -> String {
		format!("{}|{}", internal_code, territory)
	}

	pub fn insert(&mut self, internal_code: &str, territory: &str, carrier_code: &str) {
		self.entries
			.insert(Self::key(internal_code, territory), carrier_code.to_string());
	}

	pub fn with_mapping(mut self, internal_code: &str, territory: &str, carrier_code: &str) -> Self {
		self.insert(internal_code, territory, carrier_code);
		self
	}

	/// The carrier's native code for an internal code in a territory
	pub fn lookup(&self, internal_code: &str, territory: &str) -> Option<&str> {
		self.entries
			.get(&Self::key(internal_code, territory))
			.map(|s| s.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}
