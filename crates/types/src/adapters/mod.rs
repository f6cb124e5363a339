//! Adapter identity, requirements declaration and the adapter contract

pub mod errors;
pub mod traits;

pub use errors::AdapterError;
pub use traits::QuoteAdapter;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Identity and version of one adapter implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adapter {
	/// Unique identifier, referenced by carrier configuration
	pub adapter_id: String,

	/// Human-readable name
	pub name: String,

	pub description: Option<String>,

	pub version: String,
}

impl Adapter {
	pub fn new(adapter_id: &str, name: &str, version: &str) -> Self {
		Self {
			adapter_id: adapter_id.to_string(),
			name: name.to_string(),
			description: None,
			version: version.to_string(),
		}
	}

	pub fn with_description(mut self, description: &str) -> Self {
		self.description = Some(description.to_string());
		self
	}
}

/// Adapter-level requirements, declared before any request is built
///
/// The dispatcher consults these to short-circuit an attempt whose required
/// mappings were not supplied, saving a request that is guaranteed to fail
/// its pre-checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterRequirements {
	/// The carrier needs its own industry code for the business
	pub needs_industry_code: bool,

	/// The carrier needs native class/activity codes for every exposure
	pub needs_activity_codes: bool,
}

impl AdapterRequirements {
	pub fn activity_codes() -> Self {
		Self {
			needs_industry_code: false,
			needs_activity_codes: true,
		}
	}

	pub fn industry_and_activity_codes() -> Self {
		Self {
			needs_industry_code: true,
			needs_activity_codes: true,
		}
	}
}
