//! Tool acquisition and environment composition.
//!
//! This crate drives the tool lifecycle for a build invocation: every tool a
//! run requires is looked up in the [`registry::ToolRegistry`], bound to the
//! orchestrator's directories, materialized on disk (delegating byte-level
//! work to the extraction service), and asked for its PATH contribution. The
//! [`builder::Builder`] folds those contributions into one ordered search
//! path plus a build-wide "environment changed" signal for the downstream
//! build engine.

pub mod builder;
pub mod builtin;
pub mod descriptor;
pub mod registry;
pub mod tool;

pub use builder::{Builder, ToolEnvironment};
pub use descriptor::ToolDescriptor;
pub use registry::{ToolFactory, ToolRegistry};
pub use tool::{PathContribution, Stage, Tool};
