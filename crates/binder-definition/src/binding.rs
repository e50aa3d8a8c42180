//! Bindings: per-definition parameter overrides
//!
//! A binding associates a parameter signature with a value. The signature
//! is written as a key string:
//!
//! - `$name`: any parameter called `name`
//! - `app.Logger`: any parameter declared with type `app.Logger`
//! - `app.Logger $name` (or `app.Logger$name`): a parameter with both
//!
//! The value half is a [`BoundArgument`], which also tracks whether some
//! parameter consumed it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use binder_foundation::ClassName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::argument::Argument;

/// Bindings declared on one definition, in declaration order.
pub type Bindings = IndexMap<BindingKey, BoundArgument>;

/// Parsed binding key.
///
/// Keys that fit none of the three shapes are kept verbatim as
/// [`BindingKey::Name`] without the `$` prefix they would normally carry,
/// so they can never match a parameter and surface as unused bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BindingKey {
    /// `$name`, stored with its `$` prefix
    Name(String),
    /// `Fully.Qualified.Type`
    Type(ClassName),
    /// `Fully.Qualified.Type $name`, name stored without `$`
    Tuple { ty: ClassName, name: String },
}

impl BindingKey {
    /// Parses a raw key string. Never fails; see the type docs for malformed keys.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if raw.starts_with('$') {
            return BindingKey::Name(raw.to_owned());
        }

        if let Some((ty, name)) = raw.split_once('$') {
            let ty = ty.trim_end();
            if is_type_name(ty) && is_identifier(name) {
                return BindingKey::Tuple {
                    ty: ClassName::from(ty),
                    name: name.to_owned(),
                };
            }
            return BindingKey::Name(raw.to_owned());
        }

        if is_type_name(raw) {
            BindingKey::Type(ClassName::from(raw))
        } else {
            BindingKey::Name(raw.to_owned())
        }
    }

    /// Key matching parameters called `name`.
    pub fn name(name: &str) -> Self {
        BindingKey::Name(format!("${name}"))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, BindingKey::Tuple { .. })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_type_name(s: &str) -> bool {
    let s = s.strip_prefix('\\').unwrap_or(s);
    !s.is_empty() && s.split(['.', '\\']).all(is_identifier)
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::Name(name) => f.write_str(name),
            BindingKey::Type(ty) => write!(f, "{ty}"),
            BindingKey::Tuple { ty, name } => write!(f, "{ty} ${name}"),
        }
    }
}

impl From<&str> for BindingKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for BindingKey {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<BindingKey> for String {
    fn from(key: BindingKey) -> Self {
        key.to_string()
    }
}

/// Where a binding was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingOrigin {
    /// On the service itself
    #[default]
    Service,
    /// Inherited from file-level defaults
    Defaults,
    /// Inherited from an instanceof conditional
    Instanceof,
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_identifier() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1
}

/// Value half of a binding, plus usage tracking.
///
/// The identifier is assigned at construction and survives cloning, so the
/// same bound argument registered on several definitions is recognised as
/// one binding by usage accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundArgument {
    value: Argument,
    #[serde(skip, default = "next_identifier")]
    identifier: u64,
    #[serde(skip)]
    used: bool,
    #[serde(default)]
    origin: BindingOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl BoundArgument {
    pub fn new(value: impl Into<Argument>) -> Self {
        Self {
            value: value.into(),
            identifier: next_identifier(),
            used: false,
            origin: BindingOrigin::Service,
            file: None,
        }
    }

    pub fn with_origin(mut self, origin: BindingOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn value(&self) -> &Argument {
        &self.value
    }

    /// Identity token; stable across clones, increasing with creation order.
    pub fn identifier(&self) -> u64 {
        self.identifier
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }

    pub fn origin(&self) -> BindingOrigin {
        self.origin
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

impl PartialEq for BoundArgument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.origin == other.origin && self.file == other.file
    }
}

impl From<Argument> for BoundArgument {
    fn from(value: Argument) -> Self {
        Self::new(value)
    }
}

impl From<&str> for BoundArgument {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<crate::argument::Reference> for BoundArgument {
    fn from(value: crate::argument::Reference) -> Self {
        Self::new(value)
    }
}
