//! Class signature lookup.
//!
//! Binding resolution needs the formal parameters of constructors, factory
//! methods and setters. That capability sits behind [`SignatureProvider`];
//! [`ClassTable`] is the static-metadata implementation used when class
//! signatures are extracted ahead of time (and by the tests).

use std::collections::HashSet;

use binder_foundation::ClassName;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// One formal parameter of a method, as reflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParameter {
    pub position: usize,
    pub name: String,
    /// Declared type, `None` when the parameter is untyped
    pub ty: Option<ClassName>,
}

/// Result of asking a class for one of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodLookup {
    /// Declared on the class or an ancestor; parameters in order
    Found(Vec<FormalParameter>),
    /// Not declared, and the class does not accept arbitrary calls
    Missing,
    /// Not declared, but calls are forwarded to a catch-all handler
    Magic,
}

/// A class (or one of its ancestors) could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("class {0} not found")]
pub struct ClassNotFound(pub ClassName);

/// Source of class and method signatures.
pub trait SignatureProvider {
    /// Checks that `class` and its whole ancestry can be loaded.
    ///
    /// The error names the first class that could not be.
    fn load_class(&self, class: &ClassName) -> Result<(), ClassNotFound>;

    /// Formal parameters of `method` on `class`, including inherited methods.
    ///
    /// Method names compare case-insensitively.
    fn method_parameters(&self, class: &ClassName, method: &str)
    -> Result<MethodLookup, ClassNotFound>;
}

impl<T: SignatureProvider + ?Sized> SignatureProvider for &T {
    fn load_class(&self, class: &ClassName) -> Result<(), ClassNotFound> {
        (**self).load_class(class)
    }

    fn method_parameters(
        &self,
        class: &ClassName,
        method: &str,
    ) -> Result<MethodLookup, ClassNotFound> {
        (**self).method_parameters(class, method)
    }
}

/// Declared parameter in a [`ClassSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<ClassName>,
}

impl ParameterDecl {
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed(name: impl Into<String>, ty: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty.into()),
        }
    }
}

/// Static description of one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassSignature {
    /// Parent class whose methods are inherited
    pub extends: Option<ClassName>,
    /// Declared methods by name
    pub methods: IndexMap<String, Vec<ParameterDecl>>,
    /// Accepts calls to undeclared methods
    pub magic_call: bool,
}

impl ClassSignature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extends(mut self, parent: impl Into<ClassName>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = ParameterDecl>,
    ) -> Self {
        self.methods
            .insert(name.into(), parameters.into_iter().collect());
        self
    }

    pub fn with_magic_call(mut self) -> Self {
        self.magic_call = true;
        self
    }

    fn find_method(&self, method: &str) -> Option<&[ParameterDecl]> {
        self.methods
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(method))
            .map(|(_, parameters)| parameters.as_slice())
    }
}

/// Registry of class signatures keyed by class name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ClassTable {
    classes: IndexMap<ClassName, ClassSignature>,
}

impl ClassTable {
    /// Creates a new, empty [`ClassTable`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a class signature.
    pub fn register(&mut self, class: impl Into<ClassName>, signature: ClassSignature) {
        self.classes.insert(class.into(), signature);
    }

    pub fn get(&self, class: &ClassName) -> Option<&ClassSignature> {
        self.classes.get(class)
    }

    pub fn contains(&self, class: &ClassName) -> bool {
        self.classes.contains_key(class)
    }

    /// The class followed by its ancestors, nearest first.
    ///
    /// An inheritance loop ends the walk at the first repeated class.
    fn ancestry(&self, class: &ClassName) -> Result<Vec<&ClassSignature>, ClassNotFound> {
        let mut seen = HashSet::new();
        let mut lineage = Vec::new();
        let mut current = Some(class);

        while let Some(name) = current {
            if !seen.insert(name) {
                break;
            }
            let signature = self
                .classes
                .get(name)
                .ok_or_else(|| ClassNotFound(name.clone()))?;
            lineage.push(signature);
            current = signature.extends.as_ref();
        }

        Ok(lineage)
    }
}

impl SignatureProvider for ClassTable {
    fn load_class(&self, class: &ClassName) -> Result<(), ClassNotFound> {
        self.ancestry(class).map(|_| ())
    }

    fn method_parameters(
        &self,
        class: &ClassName,
        method: &str,
    ) -> Result<MethodLookup, ClassNotFound> {
        let lineage = self.ancestry(class)?;

        if let Some(parameters) = lineage.iter().find_map(|sig| sig.find_method(method)) {
            return Ok(MethodLookup::Found(
                parameters
                    .iter()
                    .enumerate()
                    .map(|(position, decl)| FormalParameter {
                        position,
                        name: decl.name.clone(),
                        ty: decl.ty.clone(),
                    })
                    .collect(),
            ));
        }

        if lineage.iter().any(|sig| sig.magic_call) {
            Ok(MethodLookup::Magic)
        } else {
            Ok(MethodLookup::Missing)
        }
    }
}
