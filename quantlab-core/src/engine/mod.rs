//! Simulation engine: drives a strategy over a bar series and keeps the books.
//!
//! Two states, Flat and Long. A Buy while Flat converts all cash to the asset
//! at the close; a Sell while Long converts the whole position back to cash at
//! the close. Every other signal/state pair is a no-op. Equity is recorded
//! once per bar whether or not a trade happened.

pub mod loop_runner;
pub mod state;

pub use loop_runner::{Engine, EngineError};
pub use state::{Holdings, RunResult};
