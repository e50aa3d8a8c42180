//! Binding usage accounting.
//!
//! Bound arguments are tracked by identity token rather than by owner: the
//! same bound argument registered on several definitions (e.g. inherited
//! from shared defaults) counts as used once any of them consumes it, and
//! is reported at most once otherwise.

use std::collections::HashSet;

use binder_definition::{BindingKey, BindingOrigin, Bindings, DefinitionRegistry, ServiceDefinition};
use binder_foundation::ServiceId;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::ResolveConfig;
use crate::error::ResolveError;

#[derive(Debug, Clone)]
struct Declaration {
    service: ServiceId,
    key: BindingKey,
    origin: BindingOrigin,
    file: Option<String>,
}

/// Records declared bindings and which of them were consumed.
#[derive(Debug, Default)]
pub struct UsageTracker {
    /// First declaration of each identity, in processing order
    declared: IndexMap<u64, Declaration>,
    used: HashSet<u64>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bindings owned by a definition processed for `service`.
    ///
    /// Bindings already flagged as used count as consumed.
    pub fn declare(&mut self, service: &ServiceId, bindings: &Bindings) {
        for (key, bound) in bindings {
            let identifier = bound.identifier();
            if bound.is_used() {
                self.used.insert(identifier);
            }
            // First owner wins; a shared unused binding is reported against
            // the earliest registered service.
            self.declared
                .entry(identifier)
                .or_insert_with(|| Declaration {
                    service: service.clone(),
                    key: key.clone(),
                    origin: bound.origin(),
                    file: bound.file().map(str::to_owned),
                });
        }
    }

    pub fn mark(&mut self, identifier: u64) {
        self.used.insert(identifier);
    }

    pub fn is_used(&self, identifier: u64) -> bool {
        self.used.contains(&identifier)
    }

    /// Number of distinct declared bindings that were consumed.
    pub fn used_count(&self) -> usize {
        self.declared
            .keys()
            .filter(|identifier| self.used.contains(identifier))
            .count()
    }

    /// One error per unconsumed binding, in declaration order.
    pub fn unused(&self, config: &ResolveConfig) -> Vec<ResolveError> {
        let mut errors = Vec::new();

        for (identifier, decl) in &self.declared {
            if self.used.contains(identifier) {
                continue;
            }
            if decl.origin != BindingOrigin::Service && !config.report_inherited_unused {
                debug!(
                    service = %decl.service,
                    key = %decl.key,
                    origin = ?decl.origin,
                    "inherited binding unused"
                );
                continue;
            }
            errors.push(ResolveError::UnusedBinding {
                service: decl.service.clone(),
                key: decl.key.clone(),
                file: decl.file.clone(),
            });
        }

        errors
    }

    /// Sets the `used` flag on every copy of a consumed binding.
    pub fn apply(&self, registry: &mut DefinitionRegistry) {
        for (_, definition) in registry.iter_mut() {
            self.apply_to(definition);
        }
    }

    fn apply_to(&self, definition: &mut ServiceDefinition) {
        for bound in definition.bindings.values_mut() {
            if self.used.contains(&bound.identifier()) {
                bound.mark_used();
            }
        }
        definition.inline_definitions_mut(&mut |inline| self.apply_to(inline));
    }
}
