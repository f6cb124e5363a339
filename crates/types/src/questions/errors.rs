//! Error types for question resolution

use thiserror::Error;

/// Errors raised while deriving carrier answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
	/// A question flagged required-for-quote has a stored answer that cannot
	/// be interpreted. Fails the whole attempt; the adapter converts this
	/// into an `error` outcome naming the question.
	#[error("malformed answer for required question '{internal_id}': {reason}")]
	MalformedRequired { internal_id: String, reason: String },
}

impl QuestionError {
	/// Internal id of the question that failed resolution
	pub fn internal_id(&self) -> &str {
		match self {
			QuestionError::MalformedRequired { internal_id, .. } => internal_id,
		}
	}
}
