//! Core types for the toolstage acquisition layer.
//!
//! This crate holds the pieces every other toolstage crate agrees on: the
//! error taxonomy for the acquisition phase, the orchestrator options, and
//! the shared build context that tools publish derived paths into.

pub mod context;
pub mod error;
pub mod options;

pub use context::BuildContext;
pub use error::{Error, Result};
pub use options::BuildOptions;
