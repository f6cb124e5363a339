//! Quotewire Types
//!
//! Shared models and traits for the quotewire insurer quote integration
//! framework. This crate contains the domain models organized by business
//! entity: the application snapshot, limit negotiation, question resolution,
//! carrier configuration, the canonical outcome model and the adapter
//! contract.

pub mod adapters;
pub mod application;
pub mod carriers;
pub mod codes;
pub mod limits;
pub mod models;
pub mod outcomes;
pub mod questions;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

// Re-export commonly used types for convenience
pub use adapters::{Adapter, AdapterError, AdapterRequirements, AdapterResult, QuoteAdapter};

pub use application::{
	ActivityExposure, Address, ApplicationSnapshot, Business, ClaimRecord, ConstructionInfo,
	Contact, EntityType, IndustryClassification, Location, OwnerOfficer, PolicyRequest, PolicyType,
};

pub use carriers::{
	Carrier, CarrierCredentials, CarrierEndpoints, CarrierRuntimeConfig, Environment, QuoteContext,
};

pub use codes::CodeMappingSet;

pub use limits::{CarrierLimitSet, LimitError, LimitTuple};

pub use models::SecretString;

pub use outcomes::{
	CoverageLine, LetterAttachment, OutcomeError, PricingOutcome, QuoteOutcome, QuoteStatus,
};

pub use questions::{
	resolve_answers, AnswerValue, BoolTokens, QuestionCatalogEntry, QuestionError, QuestionResult,
	QuestionType, ResolutionRules, ResolvedAnswer,
};
