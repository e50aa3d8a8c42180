//! Binding resolution passes.
//!
//! # Pipeline Position
//!
//! ```text
//! Register → Autowire → Resolve Bindings → Named Arguments → Validation
//!                           ^^^^^^
//!                        YOU ARE HERE
//! ```
//!
//! # Data flow
//!
//! Binding keys are parsed when bindings are set on a definition. The
//! [`rewrite`] module walks every argument slot, asks [`matcher`] for the
//! most specific binding, and records consumption in [`usage`]. Classes to
//! reflect on come from [`lineage`], which follows parent definitions.

pub mod lineage;
pub mod matcher;
pub mod pipeline;
pub mod rewrite;
pub mod usage;

pub use lineage::{ClassResolver, DefinitionIndex};
pub use matcher::{Probe, match_parameter};
pub use pipeline::{ResolveBindingsPass, ResolveReport, resolve_bindings};
pub use usage::UsageTracker;
