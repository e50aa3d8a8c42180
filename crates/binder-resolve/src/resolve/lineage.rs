//! Class resolution through parent definitions.
//!
//! A definition that names no class of its own inherits the class of its
//! parent definition, recursively. The walk runs over a snapshot of the
//! class/parent links of every registered definition, so it can proceed
//! while the definitions themselves are being rewritten.

use std::collections::HashSet;

use binder_definition::{DefinitionRegistry, ServiceDefinition};
use binder_foundation::{ClassName, ServiceId};
use indexmap::IndexMap;

use crate::error::{MissingClassReason, ResolveError};
use crate::signatures::{ClassNotFound, SignatureProvider};

#[derive(Debug, Clone)]
struct Link {
    class: Option<ClassName>,
    parent: Option<ServiceId>,
}

/// Class and parent of every registered definition.
#[derive(Debug, Clone, Default)]
pub struct DefinitionIndex {
    links: IndexMap<ServiceId, Link>,
}

impl DefinitionIndex {
    pub fn from_registry(registry: &DefinitionRegistry) -> Self {
        let links = registry
            .iter()
            .map(|(id, def)| {
                let link = Link {
                    class: def.class.clone(),
                    parent: def.parent.clone(),
                };
                (id.clone(), link)
            })
            .collect();
        Self { links }
    }
}

/// Determines the loadable class behind a definition.
pub struct ClassResolver<'a> {
    index: &'a DefinitionIndex,
    provider: &'a dyn SignatureProvider,
    max_depth: usize,
}

impl<'a> ClassResolver<'a> {
    pub fn new(
        index: &'a DefinitionIndex,
        provider: &'a dyn SignatureProvider,
        max_depth: usize,
    ) -> Self {
        Self {
            index,
            provider,
            max_depth,
        }
    }

    /// Class of `definition`, processed on behalf of `service`.
    pub fn resolve(
        &self,
        service: &ServiceId,
        definition: &ServiceDefinition,
    ) -> Result<ClassName, ResolveError> {
        self.walk(service, definition.class.clone(), definition.parent.clone())
    }

    /// Class of the registered definition `target`, looked up while
    /// processing `service` (e.g. a factory service).
    pub fn resolve_registered(
        &self,
        service: &ServiceId,
        target: &ServiceId,
    ) -> Result<ClassName, ResolveError> {
        self.walk(service, None, Some(target.clone()))
    }

    fn walk(
        &self,
        service: &ServiceId,
        mut class: Option<ClassName>,
        mut next: Option<ServiceId>,
    ) -> Result<ClassName, ResolveError> {
        let mut chain = vec![service.clone()];
        let mut visited = HashSet::new();
        let mut hops = 0;

        let class = loop {
            if let Some(class) = class.take() {
                break class;
            }
            let Some(parent) = next.take() else {
                return Err(missing_class(service, chain, MissingClassReason::NoClass));
            };
            if hops == self.max_depth {
                return Err(missing_class(
                    service,
                    chain,
                    MissingClassReason::ChainTooDeep(self.max_depth),
                ));
            }
            if !visited.insert(parent.clone()) {
                return Err(missing_class(service, chain, MissingClassReason::ParentCycle(parent)));
            }
            hops += 1;
            chain.push(parent.clone());

            let Some(link) = self.index.links.get(&parent) else {
                return Err(missing_class(
                    service,
                    chain,
                    MissingClassReason::UnknownDefinition(parent),
                ));
            };
            class = link.class.clone();
            next = link.parent.clone();
        };

        match self.provider.load_class(&class) {
            Ok(()) => Ok(class),
            Err(ClassNotFound(missing)) => Err(missing_class(
                service,
                chain,
                MissingClassReason::ClassNotFound(missing),
            )),
        }
    }
}

fn missing_class(
    service: &ServiceId,
    chain: Vec<ServiceId>,
    reason: MissingClassReason,
) -> ResolveError {
    ResolveError::MissingClass {
        service: service.clone(),
        reason,
        chain,
    }
}
