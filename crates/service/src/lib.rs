//! Quotewire Service
//!
//! The dispatch layer: fans one application snapshot out across every
//! enabled carrier concurrently and collects one outcome per attempt.

pub mod dispatch;

pub use dispatch::{AttemptResult, AttemptSpec, QuoteDispatcher};
