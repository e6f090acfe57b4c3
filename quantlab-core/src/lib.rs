//! QuantLab Core: domain types, strategies, and the simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, trades)
//! - Streaming indicators built on a fixed-capacity ring buffer
//! - The `Strategy` trait plus the MA crossover, buy-and-hold and scripted strategies
//! - The all-in/all-out engine producing a trade log and an equity curve

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

pub use domain::{Bar, Signal, Trade, TradeSide};
pub use engine::{Engine, EngineError, Holdings, RunResult};
pub use strategy::{Strategy, StrategyError};
