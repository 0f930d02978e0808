pub mod types;
pub mod lexicon;
pub mod extraction;
pub mod fingerprint;
pub mod entropy;
pub mod template;
pub mod substitution;
pub mod strength;
pub mod orchestrator;

#[cfg(test)]
mod property_tests;

pub use entropy::{Clock, FixedClock, SystemClock};
pub use orchestrator::MovementPasswordEngine;
pub use types::{MovementDescription, PasswordResult, StrengthCategory, StrengthReport};
