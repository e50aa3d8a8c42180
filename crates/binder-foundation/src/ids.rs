//! Identifiers for services and classes
//!
//! Services and classes are identified by typed string wrappers over a
//! dot-separated [`Path`]. Keeping them distinct prevents a service id from
//! being passed where a class name is expected, while still allowing the
//! two to be compared segment-wise when a service is registered under its
//! own class name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchical, dot-separated name (e.g. `app.mailer.Transport`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Path {
    /// Ordered segments of the path.
    pub segments: Vec<String>,
}

impl Path {
    /// Creates a new Path from a list of segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Creates a new Path from a dot-separated string.
    ///
    /// A single leading `\` is dropped so that `\app.Mailer` and
    /// `app.Mailer` name the same thing.
    pub fn from_path_str(s: &str) -> Self {
        let s = s.strip_prefix('\\').unwrap_or(s);
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(String::is_empty)
    }

    /// Get the last segment (short name).
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::from_path_str(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self::from_path_str(&s)
    }
}

impl From<Path> for String {
    fn from(p: Path) -> Self {
        p.to_string()
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        *self == Path::from_path_str(other)
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Path);

        impl $name {
            /// Creates a new identifier from a path.
            pub fn new(p: impl Into<Path>) -> Self {
                Self(p.into())
            }

            /// Returns the identifier as a string.
            pub fn as_str(&self) -> String {
                self.0.to_string()
            }

            /// Returns a reference to the underlying path.
            pub fn path(&self) -> &Path {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(Path::from_path_str(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Path::from_path_str(&s))
            }
        }

        impl From<Path> for $name {
            fn from(p: Path) -> Self {
                Self(p)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered service (e.g. `mailer` or `app.Mailer`)
    ServiceId
);

define_id!(
    /// Fully-qualified class or type name (e.g. `app.mail.Transport`)
    ClassName
);

impl ServiceId {
    /// Whether this service id spells the same path as `class`.
    ///
    /// Services registered under their own class name, and typed
    /// references that still point at their declared type, compare equal.
    pub fn names_class(&self, class: &ClassName) -> bool {
        self.0 == class.0
    }
}

impl From<ClassName> for ServiceId {
    fn from(class: ClassName) -> Self {
        Self(class.0)
    }
}
