//! Liability limit tuples and carrier limit negotiation
//!
//! A policy requests an ordered tuple of dollar thresholds (for Workers'
//! Compensation the three-part per-accident / per-disease-employee /
//! per-disease-policy tuple; occurrence/aggregate pairs for liability lines).
//! Each carrier supports a fixed ordered list of tuples; negotiation picks
//! the cheapest supported tuple that still covers the request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from limit negotiation and parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
	/// The carrier has no supported tuple covering the request. A business
	/// appetite mismatch, classified as `autodeclined`, never as a defect.
	#[error("carrier does not support requested limits {requested}")]
	Unsupported { requested: LimitTuple },

	#[error("invalid limit tuple '{input}': {reason}")]
	Parse { input: String, reason: String },
}

/// An ordered tuple of dollar coverage thresholds
///
/// Component order is line-specific and fixed by convention; tuples are only
/// comparable when they have the same arity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LimitTuple(Vec<u64>);

impl LimitTuple {
	pub fn new(components: Vec<u64>) -> Self {
		Self(components)
	}

	pub fn components(&self) -> &[u64] {
		&self.0
	}

	pub fn arity(&self) -> usize {
		self.0.len()
	}

	/// Component-wise `self >= other`; false when arities differ
	pub fn covers(&self, other: &LimitTuple) -> bool {
		self.arity() == other.arity() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
	}
}

impl fmt::Display for LimitTuple {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
		write!(f, "{}", parts.join("/"))
	}
}

impl FromStr for LimitTuple {
	type Err = LimitError;

	/// Parse the conventional `a/b/c` notation
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let components: Result<Vec<u64>, _> =
			s.split('/').map(|part| part.trim().parse::<u64>()).collect();

		match components {
			Ok(parts) if !parts.is_empty() => Ok(Self(parts)),
			Ok(_) => Err(LimitError::Parse {
				input: s.to_string(),
				reason: "empty tuple".to_string(),
			}),
			Err(e) => Err(LimitError::Parse {
				input: s.to_string(),
				reason: e.to_string(),
			}),
		}
	}
}

/// The ordered list of limit tuples a carrier supports for one line/state
///
/// Tuples are ordered from lowest to highest coverage; negotiation relies on
/// that order to return the cheapest satisfying tuple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarrierLimitSet {
	supported: Vec<LimitTuple>,
}

impl CarrierLimitSet {
	pub fn new(supported: Vec<LimitTuple>) -> Self {
		Self { supported }
	}

	pub fn supported(&self) -> &[LimitTuple] {
		&self.supported
	}

	/// Select the best supported tuple for a requested tuple
	///
	/// Returns the first (lowest-coverage) supported tuple that is
	/// component-wise >= the request. Requests below the carrier floor get
	/// the floor tuple; carriers are never asked to quote below it. When no
	/// supported tuple covers the request the carrier's appetite excludes
	/// these limits and `LimitError::Unsupported` is returned.
	pub fn negotiate(&self, requested: &LimitTuple) -> Result<&LimitTuple, LimitError> {
		self.supported
			.iter()
			.find(|candidate| candidate.covers(requested))
			.ok_or_else(|| LimitError::Unsupported {
				requested: requested.clone(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wc_set() -> CarrierLimitSet {
		CarrierLimitSet::new(vec![
			LimitTuple::new(vec![100_000, 500_000, 100_000]),
			LimitTuple::new(vec![500_000, 500_000, 500_000]),
			LimitTuple::new(vec![1_000_000, 1_000_000, 1_000_000]),
		])
	}

	#[test]
	fn test_exact_match_selected() {
		let set = wc_set();
		let requested = LimitTuple::new(vec![500_000, 500_000, 500_000]);
		assert_eq!(set.negotiate(&requested).unwrap(), &requested);
	}

	#[test]
	fn test_smallest_covering_tuple_selected() {
		// Middle tuple fails the first component, so the top tuple wins.
		let set = CarrierLimitSet::new(vec![
			LimitTuple::new(vec![100_000, 500_000, 100_000]),
			LimitTuple::new(vec![1_000_000, 1_000_000, 1_000_000]),
		]);
		let requested = LimitTuple::new(vec![500_000, 500_000, 500_000]);
		assert_eq!(
			set.negotiate(&requested).unwrap(),
			&LimitTuple::new(vec![1_000_000, 1_000_000, 1_000_000])
		);
	}

	#[test]
	fn test_below_floor_resolves_to_minimum() {
		let set = wc_set();
		let requested = LimitTuple::new(vec![50_000, 50_000, 50_000]);
		assert_eq!(
			set.negotiate(&requested).unwrap(),
			&LimitTuple::new(vec![100_000, 500_000, 100_000])
		);
	}

	#[test]
	fn test_above_maximum_is_unsupported() {
		let set = wc_set();
		let requested = LimitTuple::new(vec![2_000_000, 1_000_000, 1_000_000]);
		assert!(matches!(
			set.negotiate(&requested),
			Err(LimitError::Unsupported { .. })
		));
	}

	#[test]
	fn test_arity_mismatch_is_unsupported() {
		let set = wc_set();
		let requested = LimitTuple::new(vec![500_000, 500_000]);
		assert!(set.negotiate(&requested).is_err());
	}

	#[test]
	fn test_negotiation_is_deterministic() {
		let set = wc_set();
		let requested = LimitTuple::new(vec![200_000, 400_000, 200_000]);
		let first = set.negotiate(&requested).unwrap().clone();
		for _ in 0..10 {
			assert_eq!(set.negotiate(&requested).unwrap(), &first);
		}
	}

	#[test]
	fn test_tuple_display_and_parse_round_trip() {
		let tuple = LimitTuple::new(vec![500_000, 500_000, 500_000]);
		assert_eq!(tuple.to_string(), "500000/500000/500000");
		assert_eq!("500000/500000/500000".parse::<LimitTuple>().unwrap(), tuple);
		assert!("abc/def".parse::<LimitTuple>().is_err());
	}
}
