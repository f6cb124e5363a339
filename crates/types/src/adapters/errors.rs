//! Error types for adapter operations
//!
//! These are the faults that can occur below the adapter contract boundary.
//! None of them ever escape `quote()`: every variant has a canonical
//! classification into an `error` or `outage` outcome.

use thiserror::Error;

use crate::questions::QuestionError;

/// Adapter operation errors
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("connection error: {0}")]
	Connection(String),

	#[error("network error: {0}")]
	Network(String),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatus { status_code: u16, reason: String },

	#[error("invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("carrier returned error: {code} - {message}")]
	CarrierError { code: String, message: String },

	#[error("authentication failed for carrier {carrier_id}")]
	AuthenticationFailed { carrier_id: String },

	#[error("configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("unsupported operation: {operation} for adapter {adapter_id}")]
	UnsupportedOperation {
		operation: String,
		adapter_id: String,
	},

	#[error("question resolution failed: {0}")]
	Question(#[from] QuestionError),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("markup error: {0}")]
	Markup(String),

	#[error("unsupported adapter: {0}")]
	UnsupportedAdapter(String),
}

impl AdapterError {
	/// HTTP status code carried by the error, if any
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatus { status_code, .. } => Some(*status_code),
			_ => None,
		}
	}

	/// Create an HTTP failure with the given status code and reason
	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatus {
			status_code,
			reason: reason.into(),
		}
	}

	/// Create an HTTP failure from a bare status code with a default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatus {
			status_code,
			reason,
		}
	}

	/// Whether this fault indicates the carrier is temporarily unavailable
	/// rather than broken, mapping to an `outage` outcome
	pub fn is_outage(&self) -> bool {
		matches!(
			self,
			AdapterError::HttpStatus {
				status_code: 502 | 503 | 504,
				..
			}
		)
	}
}
