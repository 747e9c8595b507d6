//! # Cogent Memory
//!
//! In-process implementations of the [`cogent_core::Memory`] trait, the
//! durable cross-run conversation log. Retention policies:
//!
//! - [`WholeMemory`] — keep everything, optionally pruned to a token budget
//! - [`SlidingWindowMemory`] — keep the N most recent messages

pub mod sliding_window;
pub mod whole;

pub use sliding_window::SlidingWindowMemory;
pub use whole::WholeMemory;
