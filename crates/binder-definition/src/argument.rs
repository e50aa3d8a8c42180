//! Argument values
//!
//! Everything a definition can pass to a constructor, a factory or a method
//! call is an [`Argument`]: scalars, symbolic references to other services,
//! inline sub-definitions and structured lists/maps of those.

use std::collections::BTreeMap;

use binder_foundation::{ClassName, ServiceId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::definition::ServiceDefinition;

/// Behaviour of a reference whose target service does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidBehavior {
    /// Fail container compilation
    #[default]
    Exception,
    /// Fail only when the service is actually requested at runtime
    RuntimeException,
    /// Inject `null` instead
    Null,
    /// Drop the argument or method call
    Ignore,
    /// Inject only if the target was already initialized
    IgnoreUninitialized,
}

/// Symbolic pointer to another service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: ServiceId,
    #[serde(default)]
    pub invalid_behavior: InvalidBehavior,
}

impl Reference {
    pub fn new(id: impl Into<ServiceId>) -> Self {
        Self {
            id: id.into(),
            invalid_behavior: InvalidBehavior::default(),
        }
    }

    pub fn with_behavior(mut self, invalid_behavior: InvalidBehavior) -> Self {
        self.invalid_behavior = invalid_behavior;
        self
    }
}

/// Reference that also records the type the consumer expects.
///
/// Autowiring emits these with `id` equal to `ty` before it knows which
/// service will satisfy the slot; see [`TypedReference::is_autowire_placeholder`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedReference {
    pub id: ServiceId,
    #[serde(rename = "type")]
    pub ty: ClassName,
    #[serde(default)]
    pub invalid_behavior: InvalidBehavior,
    /// Name of the parameter this reference was generated for, if known
    #[serde(default)]
    pub name: Option<String>,
}

impl TypedReference {
    pub fn new(id: impl Into<ServiceId>, ty: impl Into<ClassName>) -> Self {
        Self {
            id: id.into(),
            ty: ty.into(),
            invalid_behavior: InvalidBehavior::default(),
            name: None,
        }
    }

    /// Placeholder that stands for "whatever is bound or autowired for `ty`".
    pub fn placeholder(ty: impl Into<ClassName>) -> Self {
        let ty = ty.into();
        Self::new(ty.clone(), ty)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when the service id still spells the declared type.
    pub fn is_autowire_placeholder(&self) -> bool {
        self.id.names_class(&self.ty)
    }
}

/// A value passed to a constructor, factory or method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Reference(Reference),
    TypedReference(TypedReference),
    /// Inline sub-definition, built in place rather than looked up by id
    Definition(Box<ServiceDefinition>),
    List(Vec<Argument>),
    Map(IndexMap<String, Argument>),
}

impl Argument {
    /// Shorthand for a plain [`Reference`] to `id`.
    pub fn reference(id: impl Into<ServiceId>) -> Self {
        Argument::Reference(Reference::new(id))
    }

    /// The typed reference held by this argument, if it is an autowire placeholder.
    pub fn as_autowire_placeholder(&self) -> Option<&TypedReference> {
        match self {
            Argument::TypedReference(r) if r.is_autowire_placeholder() => Some(r),
            _ => None,
        }
    }

    /// Empty string, written where a value is still to be filled in.
    pub fn is_blank(&self) -> bool {
        matches!(self, Argument::String(s) if s.is_empty())
    }

    /// Visits the inline definitions directly reachable from this value.
    ///
    /// Lists and maps are searched; the visited definitions themselves are
    /// not descended into, so the caller decides how to recurse.
    pub fn inline_definitions_mut(&mut self, visit: &mut dyn FnMut(&mut ServiceDefinition)) {
        match self {
            Argument::Definition(def) => visit(def),
            Argument::List(items) => {
                for item in items {
                    item.inline_definitions_mut(visit);
                }
            }
            Argument::Map(entries) => {
                for item in entries.values_mut() {
                    item.inline_definitions_mut(visit);
                }
            }
            _ => {}
        }
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::String(s.to_owned())
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::String(s)
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Argument::Int(v)
    }
}

impl From<bool> for Argument {
    fn from(v: bool) -> Self {
        Argument::Bool(v)
    }
}

impl From<Reference> for Argument {
    fn from(r: Reference) -> Self {
        Argument::Reference(r)
    }
}

impl From<TypedReference> for Argument {
    fn from(r: TypedReference) -> Self {
        Argument::TypedReference(r)
    }
}

impl From<ServiceDefinition> for Argument {
    fn from(def: ServiceDefinition) -> Self {
        Argument::Definition(Box::new(def))
    }
}

/// Sparse, position-ordered argument list.
///
/// Slots may be missing (e.g. `{1: "123"}` leaves position 0 unset);
/// iteration is always by ascending position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(BTreeMap<usize, Argument>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: usize) -> Option<&Argument> {
        self.0.get(&position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Argument> {
        self.0.get_mut(&position)
    }

    /// Sets the slot at `position`, returning the previous value.
    pub fn set(&mut self, position: usize, value: impl Into<Argument>) -> Option<Argument> {
        self.0.insert(position, value.into())
    }

    /// Appends after the highest occupied position.
    ///
    /// A list already holding position `usize::MAX` has no room after it;
    /// that slot is replaced.
    pub fn push(&mut self, value: impl Into<Argument>) {
        self.0.insert(self.end(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One past the highest occupied position, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.0
            .keys()
            .next_back()
            .map_or(0, |last| last.saturating_add(1))
    }

    /// Occupied positions, ascending.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Argument)> {
        self.0.iter().map(|(position, value)| (*position, value))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.0.values_mut()
    }

    /// Values in position order, gaps dropped.
    pub fn to_vec(&self) -> Vec<Argument> {
        self.0.values().cloned().collect()
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(values: Vec<Argument>) -> Self {
        Self(values.into_iter().enumerate().collect())
    }
}

impl FromIterator<(usize, Argument)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (usize, Argument)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
