//! Parameter-to-binding matching.
//!
//! Precedence, most specific first:
//!
//! 1. tuple key `Type $name`: declared type and name both match
//! 2. type key `Type`: declared type matches
//! 3. name key `$name`: name matches
//!
//! The first rule that finds a binding wins. Only the definition's own
//! bindings are consulted; a child definition inherits its parent's class,
//! never its parent's binding map.

use binder_definition::{BindingKey, Bindings, BoundArgument, TypedReference};
use binder_foundation::ClassName;

use crate::signatures::FormalParameter;

/// What is known about the slot being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe<'p> {
    pub name: Option<&'p str>,
    pub ty: Option<&'p ClassName>,
}

impl<'p> Probe<'p> {
    /// Probe for an unset slot described by a reflected parameter.
    pub fn parameter(parameter: &'p FormalParameter) -> Self {
        Self {
            name: Some(&parameter.name),
            ty: parameter.ty.as_ref(),
        }
    }

    /// Probe for an autowire placeholder.
    ///
    /// The placeholder's type is authoritative; the name comes from the
    /// reflected parameter when there is one.
    pub fn placeholder(
        placeholder: &'p TypedReference,
        parameter: Option<&'p FormalParameter>,
    ) -> Self {
        Self {
            name: parameter
                .map(|p| p.name.as_str())
                .or(placeholder.name.as_deref()),
            ty: Some(&placeholder.ty),
        }
    }
}

/// Finds the most specific binding for `probe`.
pub fn match_parameter<'b>(
    bindings: &'b Bindings,
    probe: &Probe<'_>,
) -> Option<(&'b BindingKey, &'b BoundArgument)> {
    if let (Some(ty), Some(name)) = (probe.ty, probe.name) {
        let key = BindingKey::Tuple {
            ty: ty.clone(),
            name: name.to_owned(),
        };
        if let Some(hit) = bindings.get_key_value(&key) {
            return Some(hit);
        }
    }

    if let Some(ty) = probe.ty {
        if let Some(hit) = bindings.get_key_value(&BindingKey::Type(ty.clone())) {
            return Some(hit);
        }
    }

    probe
        .name
        .and_then(|name| bindings.get_key_value(&BindingKey::name(name)))
}
