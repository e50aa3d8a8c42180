//! Binder Foundation
//!
//! Identifier types shared by the definition model and the resolution
//! passes.

pub mod ids;

pub use ids::{ClassName, Path, ServiceId};
