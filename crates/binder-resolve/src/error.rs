//! Binding resolution errors.
//!
//! Every failure is a hard, non-retryable compile-time error attributed to
//! the service it was found in and, where one is involved, the binding key.
//! The pass collects all of them before failing so a single run reports
//! every problem in the configuration.
//!
//! # Design
//!
//! - `ResolveError`: one diagnostic
//! - `ErrorKind`: category, for filtering and statistics
//! - `ResolveErrors`: everything one pass run found, in report order

use std::fmt;

use binder_definition::BindingKey;
use binder_foundation::{ClassName, ServiceId};
use thiserror::Error;

/// Category of a resolution error.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// A declared binding matched no argument slot
    UnusedBinding = 0,
    /// No loadable class via the definition or its parent chain
    MissingClass = 1,
    /// A method call targets a method the class does not have
    InvalidInjectionTarget = 2,
}

/// Human-readable names for error kinds.
///
/// Index matches ErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "unused binding",           // 0: UnusedBinding
    "missing class",            // 1: MissingClass
    "invalid injection target", // 2: InvalidInjectionTarget
];

impl ErrorKind {
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why no class could be determined for a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingClassReason {
    /// Neither the definition nor any parent names a class
    NoClass,
    /// The class, or one of its ancestors, is unknown
    ClassNotFound(ClassName),
    /// A parent or factory service id is not registered
    UnknownDefinition(ServiceId),
    /// The parent chain revisits this definition
    ParentCycle(ServiceId),
    /// The parent chain is longer than the configured bound
    ChainTooDeep(usize),
}

impl fmt::Display for MissingClassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingClassReason::NoClass => {
                f.write_str("no class is configured on the service or its parents")
            }
            MissingClassReason::ClassNotFound(class) => write!(f, "class {class} not found"),
            MissingClassReason::UnknownDefinition(id) => {
                write!(f, "definition \"{id}\" does not exist")
            }
            MissingClassReason::ParentCycle(parent) => {
                write!(f, "parent chain loops back to \"{parent}\"")
            }
            MissingClassReason::ChainTooDeep(depth) => {
                write!(f, "parent chain is deeper than {depth} levels")
            }
        }
    }
}

/// A single binding resolution error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unused binding \"{key}\" in service \"{service}\"{}.", declared_in(.file))]
    UnusedBinding {
        service: ServiceId,
        key: BindingKey,
        file: Option<String>,
    },

    #[error("Invalid service \"{service}\": {reason}{}.", via_parents(.chain))]
    MissingClass {
        service: ServiceId,
        reason: MissingClassReason,
        /// Definitions walked, starting with `service`
        chain: Vec<ServiceId>,
    },

    #[error("Invalid service \"{service}\": method \"{class}::{method}()\" does not exist.")]
    InvalidInjectionTarget {
        service: ServiceId,
        class: ClassName,
        method: String,
    },
}

fn declared_in(file: &Option<String>) -> String {
    match file {
        Some(file) => format!(" (declared in \"{file}\")"),
        None => String::new(),
    }
}

fn via_parents(chain: &[ServiceId]) -> String {
    if chain.len() < 2 {
        return String::new();
    }
    let hops: Vec<String> = chain.iter().map(ServiceId::as_str).collect();
    format!(" (via {})", hops.join(" -> "))
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnusedBinding { .. } => ErrorKind::UnusedBinding,
            ResolveError::MissingClass { .. } => ErrorKind::MissingClass,
            ResolveError::InvalidInjectionTarget { .. } => ErrorKind::InvalidInjectionTarget,
        }
    }

    /// Service the error is attributed to.
    pub fn service(&self) -> &ServiceId {
        match self {
            ResolveError::UnusedBinding { service, .. }
            | ResolveError::MissingClass { service, .. }
            | ResolveError::InvalidInjectionTarget { service, .. } => service,
        }
    }

    pub fn binding_key(&self) -> Option<&BindingKey> {
        match self {
            ResolveError::UnusedBinding { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether the definition it was found in must be left unmodified.
    pub fn aborts_definition(&self) -> bool {
        matches!(self, ResolveError::InvalidInjectionTarget { .. })
    }
}

/// All errors reported by one pass run, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", render(.0))]
pub struct ResolveErrors(pub Vec<ResolveError>);

fn render(errors: &[ResolveError]) -> String {
    match errors {
        [single] => single.to_string(),
        _ => {
            let mut out = format!("{} binding resolution errors:", errors.len());
            for (i, error) in errors.iter().enumerate() {
                out.push_str(&format!("\n  {}. {error}", i + 1));
            }
            out
        }
    }
}

impl ResolveErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolveError> {
        self.0.iter()
    }

    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ResolveError> {
        self.0.iter().filter(move |e| e.kind() == kind)
    }
}

impl IntoIterator for ResolveErrors {
    type Item = ResolveError;
    type IntoIter = std::vec::IntoIter<ResolveError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Invalid [`ResolveConfig`](crate::ResolveConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid resolve config: {0}")]
    InvalidValue(String),
}
