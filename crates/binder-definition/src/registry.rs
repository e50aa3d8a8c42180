//! Registration-ordered collection of service definitions.

use binder_foundation::ServiceId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::definition::ServiceDefinition;

/// All service definitions of a container, keyed by id.
///
/// Iteration follows registration order; compiler passes depend on this
/// for reproducible diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionRegistry {
    definitions: IndexMap<ServiceId, ServiceDefinition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a definition and returns it for further setup.
    ///
    /// Replacing keeps the original registration position.
    pub fn register(
        &mut self,
        id: impl Into<ServiceId>,
        definition: ServiceDefinition,
    ) -> &mut ServiceDefinition {
        let entry = self.definitions.entry(id.into());
        match entry {
            indexmap::map::Entry::Occupied(mut slot) => {
                slot.insert(definition);
                slot.into_mut()
            }
            indexmap::map::Entry::Vacant(slot) => slot.insert(definition),
        }
    }

    pub fn get(&self, id: &ServiceId) -> Option<&ServiceDefinition> {
        self.definitions.get(id)
    }

    pub fn get_mut(&mut self, id: &ServiceId) -> Option<&mut ServiceDefinition> {
        self.definitions.get_mut(id)
    }

    pub fn contains(&self, id: &ServiceId) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceId, &ServiceDefinition)> {
        self.definitions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ServiceId, &mut ServiceDefinition)> {
        self.definitions.iter_mut()
    }
}
