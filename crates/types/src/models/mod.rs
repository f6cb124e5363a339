//! Shared low-level models used across the framework

pub mod secret_string;

pub use secret_string::SecretString;
