// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Binding resolution for binder service definitions
//!
//! This crate rewrites constructor and method-call arguments of service
//! definitions by substituting their declared bindings, and verifies that
//! every declared binding was consumed.

pub mod config;
pub mod error;
pub mod resolve;
pub mod signatures;

pub use config::ResolveConfig;
pub use error::{ErrorKind, ResolveError, ResolveErrors};
pub use resolve::*;
pub use signatures::{ClassTable, FormalParameter, MethodLookup, SignatureProvider};
