//! # Cogent Tools
//!
//! Built-in implementations of the [`cogent_core::Tool`] trait.

pub mod calculator;
pub mod current_time;

pub use calculator::CalculatorTool;
pub use current_time::CurrentTimeTool;
