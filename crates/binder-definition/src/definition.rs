//! Service definitions
//!
//! Metadata describing how one service instance is constructed. A
//! definition either names its class directly or inherits it from a parent
//! definition (decoration / child definitions).

use binder_foundation::{ClassName, ServiceId};
use serde::{Deserialize, Serialize};

use crate::argument::{Argument, Arguments};
use crate::binding::{BindingKey, Bindings, BoundArgument};

/// Name under which constructors appear in class signatures.
pub const CONSTRUCTOR: &str = "__construct";

/// A method to call on the instance after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Arguments::new(),
        }
    }

    pub fn with_arguments(method: impl Into<String>, arguments: impl Into<Arguments>) -> Self {
        Self {
            method: method.into(),
            arguments: arguments.into(),
        }
    }
}

/// How the instance is obtained when it is not built via `new Class(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factory {
    /// `Class::method(...)`
    Static { class: ClassName, method: String },
    /// `service->method(...)` on another registered service
    Service { service: ServiceId, method: String },
    /// Free function; its parameters are not introspectable
    Function(String),
}

/// How to construct one service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDefinition {
    /// Concrete class; `None` means "inherit from `parent`"
    pub class: Option<ClassName>,
    /// Definition this one decorates or extends
    pub parent: Option<ServiceId>,
    pub factory: Option<Factory>,
    pub arguments: Arguments,
    pub method_calls: Vec<MethodCall>,
    pub bindings: Bindings,
    /// Template-only definitions are never instantiated
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
}

impl ServiceDefinition {
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// Definition with no class of its own, inheriting from `parent`.
    pub fn child(parent: impl Into<ServiceId>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::default()
        }
    }

    pub fn set_argument(&mut self, position: usize, value: impl Into<Argument>) -> &mut Self {
        self.arguments.set(position, value);
        self
    }

    pub fn add_argument(&mut self, value: impl Into<Argument>) -> &mut Self {
        self.arguments.push(value);
        self
    }

    pub fn set_arguments(&mut self, arguments: impl Into<Arguments>) -> &mut Self {
        self.arguments = arguments.into();
        self
    }

    pub fn add_method_call(&mut self, method: impl Into<String>) -> &mut Self {
        self.method_calls.push(MethodCall::new(method));
        self
    }

    pub fn add_method_call_with(
        &mut self,
        method: impl Into<String>,
        arguments: impl Into<Arguments>,
    ) -> &mut Self {
        self.method_calls
            .push(MethodCall::with_arguments(method, arguments));
        self
    }

    pub fn set_factory(&mut self, factory: Factory) -> &mut Self {
        self.factory = Some(factory);
        self
    }

    pub fn set_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Replaces the bindings, parsing each raw key.
    ///
    /// Keys that parse to the same [`BindingKey`] (e.g. `T$a` and `T $a`)
    /// collapse into one entry; the later value wins.
    pub fn set_bindings<K, V>(&mut self, bindings: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<BoundArgument>,
    {
        self.bindings = bindings
            .into_iter()
            .map(|(key, value)| (BindingKey::parse(key.as_ref()), value.into()))
            .collect();
        self
    }

    /// Every argument list of the definition: constructor first, then each call.
    pub fn argument_lists_mut(&mut self) -> impl Iterator<Item = &mut Arguments> {
        std::iter::once(&mut self.arguments)
            .chain(self.method_calls.iter_mut().map(|call| &mut call.arguments))
    }

    /// Visits the inline definitions nested anywhere in this definition's arguments.
    pub fn inline_definitions_mut(&mut self, visit: &mut dyn FnMut(&mut ServiceDefinition)) {
        for arguments in self.argument_lists_mut() {
            for value in arguments.values_mut() {
                value.inline_definitions_mut(visit);
            }
        }
    }
}
