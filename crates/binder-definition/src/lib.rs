// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Service definition model for the binder container compiler.
//!
//! A [`ServiceDefinition`] describes how one service is built: its class,
//! constructor [`Arguments`], [`MethodCall`]s and the [`Bindings`] that
//! override individual parameters. Definitions are collected in a
//! [`DefinitionRegistry`] in registration order, which every compiler pass
//! relies on for reproducible output.

pub mod argument;
pub mod binding;
pub mod definition;
pub mod registry;

pub use argument::{Argument, Arguments, InvalidBehavior, Reference, TypedReference};
pub use binding::{BindingKey, BindingOrigin, Bindings, BoundArgument};
pub use definition::{Factory, MethodCall, ServiceDefinition};
pub use registry::DefinitionRegistry;
