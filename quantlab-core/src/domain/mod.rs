//! Domain types for QuantLab

pub mod bar;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use signal::Signal;
pub use trade::{Trade, TradeSide};
