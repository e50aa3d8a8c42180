//! Argument rewriting.
//!
//! Walks the constructor arguments and every method call of a definition
//! and substitutes matching bindings into eligible slots. A slot is
//! eligible when it is unset or holds an autowire placeholder; concrete
//! values and references are never replaced. Method calls declared with
//! explicit arguments only have their placeholders substituted.
//!
//! Inline definitions nested in argument values are rewritten against
//! their own bindings and attributed to the enclosing service.

use std::collections::BTreeSet;

use binder_definition::definition::CONSTRUCTOR;
use binder_definition::{Arguments, Bindings, Factory, ServiceDefinition};
use binder_foundation::{ClassName, ServiceId};
use tracing::{debug, trace};

use crate::error::{MissingClassReason, ResolveError};
use crate::resolve::lineage::ClassResolver;
use crate::resolve::matcher::{Probe, match_parameter};
use crate::resolve::usage::UsageTracker;
use crate::signatures::{ClassNotFound, FormalParameter, MethodLookup, SignatureProvider};

/// Rewrites definitions one at a time, accumulating errors.
pub(crate) struct Rewriter<'a> {
    resolver: ClassResolver<'a>,
    provider: &'a dyn SignatureProvider,
    usage: &'a mut UsageTracker,
    errors: Vec<ResolveError>,
    substitutions: usize,
}

impl<'a> Rewriter<'a> {
    pub(crate) fn new(
        resolver: ClassResolver<'a>,
        provider: &'a dyn SignatureProvider,
        usage: &'a mut UsageTracker,
    ) -> Self {
        Self {
            resolver,
            provider,
            usage,
            errors: Vec::new(),
            substitutions: 0,
        }
    }

    /// Errors found so far and the number of slots rewritten.
    pub(crate) fn finish(self) -> (Vec<ResolveError>, usize) {
        (self.errors, self.substitutions)
    }

    /// Rewrites `definition` on behalf of `service`.
    ///
    /// If an injection target turns out to be invalid the definition is
    /// left exactly as it was.
    pub(crate) fn rewrite(&mut self, service: &ServiceId, definition: &mut ServiceDefinition) {
        let checkpoint = self.errors.len();
        let substitutions = self.substitutions;

        let mut working = definition.clone();
        self.rewrite_in_place(service, &mut working);

        if self.errors[checkpoint..]
            .iter()
            .any(ResolveError::aborts_definition)
        {
            debug!(service = %service, "definition left unmodified");
            self.substitutions = substitutions;
        } else {
            *definition = working;
        }
    }

    fn rewrite_in_place(&mut self, service: &ServiceId, definition: &mut ServiceDefinition) {
        self.usage.declare(service, &definition.bindings);
        self.bind_definition(service, definition);

        // Includes definitions substituted from bound values.
        definition.inline_definitions_mut(&mut |inline| self.rewrite(service, inline));
    }

    fn bind_definition(&mut self, service: &ServiceId, definition: &mut ServiceDefinition) {
        if definition.bindings.is_empty() {
            return;
        }
        if definition.is_abstract {
            debug!(service = %service, "abstract definition skipped");
            return;
        }

        let class = match self.resolver.resolve(service, definition) {
            Ok(class) => class,
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };

        let ServiceDefinition {
            factory,
            arguments,
            method_calls,
            bindings,
            ..
        } = definition;

        if let Some(parameters) = self.constructor_parameters(service, &class, factory.as_ref()) {
            self.bind(service, bindings, arguments, &parameters, true);
        }

        for call in method_calls.iter_mut() {
            match self.lookup(service, &class, &call.method) {
                Some(MethodLookup::Found(parameters)) => {
                    let fill_unset = call.arguments.is_empty();
                    self.bind(service, bindings, &mut call.arguments, &parameters, fill_unset);
                }
                Some(MethodLookup::Magic) => {
                    trace!(service = %service, method = %call.method, "call forwarded to magic handler");
                }
                Some(MethodLookup::Missing) => {
                    self.errors.push(ResolveError::InvalidInjectionTarget {
                        service: service.clone(),
                        class: class.clone(),
                        method: call.method.clone(),
                    });
                }
                None => {}
            }
        }
    }

    /// Formal parameters the constructor arguments are bound against.
    ///
    /// `None` means an error was recorded and constructor binding is skipped.
    fn constructor_parameters(
        &mut self,
        service: &ServiceId,
        class: &ClassName,
        factory: Option<&Factory>,
    ) -> Option<Vec<FormalParameter>> {
        let (target, method) = match factory {
            None => {
                return match self.lookup(service, class, CONSTRUCTOR)? {
                    MethodLookup::Found(parameters) => Some(parameters),
                    MethodLookup::Missing | MethodLookup::Magic => Some(Vec::new()),
                };
            }
            Some(Factory::Function(name)) => {
                debug!(service = %service, factory = %name, "function factory is not introspectable");
                return Some(Vec::new());
            }
            Some(Factory::Static { class, method }) => {
                if let Err(ClassNotFound(missing)) = self.provider.load_class(class) {
                    self.errors.push(ResolveError::MissingClass {
                        service: service.clone(),
                        reason: MissingClassReason::ClassNotFound(missing),
                        chain: vec![service.clone()],
                    });
                    return None;
                }
                (class.clone(), method)
            }
            Some(Factory::Service {
                service: factory_service,
                method,
            }) => match self.resolver.resolve_registered(service, factory_service) {
                Ok(class) => (class, method),
                Err(error) => {
                    self.errors.push(error);
                    return None;
                }
            },
        };

        match self.lookup(service, &target, method)? {
            MethodLookup::Found(parameters) => Some(parameters),
            MethodLookup::Magic => Some(Vec::new()),
            MethodLookup::Missing => {
                self.errors.push(ResolveError::InvalidInjectionTarget {
                    service: service.clone(),
                    class: target,
                    method: method.clone(),
                });
                None
            }
        }
    }

    fn lookup(&mut self, service: &ServiceId, class: &ClassName, method: &str) -> Option<MethodLookup> {
        match self.provider.method_parameters(class, method) {
            Ok(lookup) => Some(lookup),
            Err(ClassNotFound(missing)) => {
                self.errors.push(ResolveError::MissingClass {
                    service: service.clone(),
                    reason: MissingClassReason::ClassNotFound(missing),
                    chain: vec![service.clone()],
                });
                None
            }
        }
    }

    /// Substitutes bindings into the eligible slots of `arguments`.
    ///
    /// Placeholders and blank values are always eligible; unset slots only
    /// with `fill_unset`.
    fn bind(
        &mut self,
        service: &ServiceId,
        bindings: &Bindings,
        arguments: &mut Arguments,
        parameters: &[FormalParameter],
        fill_unset: bool,
    ) {
        let positions: BTreeSet<usize> =
            (0..parameters.len()).chain(arguments.positions()).collect();

        for position in positions {
            let parameter = parameters.get(position);
            let probe = match arguments.get(position) {
                None if fill_unset => match parameter {
                    Some(parameter) => Probe::parameter(parameter),
                    None => continue,
                },
                None => continue,
                Some(value) => match (value.as_autowire_placeholder(), parameter) {
                    (Some(placeholder), _) => Probe::placeholder(placeholder, parameter),
                    (None, Some(parameter)) if value.is_blank() => Probe::parameter(parameter),
                    (None, _) => continue,
                },
            };

            let Some((key, bound)) = match_parameter(bindings, &probe) else {
                trace!(service = %service, position, "no binding for slot");
                continue;
            };

            debug!(service = %service, position, key = %key, "binding substituted");
            self.usage.mark(bound.identifier());
            arguments.set(position, bound.value().clone());
            self.substitutions += 1;
        }
    }
}
