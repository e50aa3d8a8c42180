//! Binding resolution pass entry point.
//!
//! Runs the rewriter over every registered definition in registration
//! order, then reports unused bindings together with any class or
//! injection-target errors found along the way.

use binder_definition::DefinitionRegistry;
use tracing::{info, instrument, warn};

use crate::config::ResolveConfig;
use crate::error::{ConfigError, ResolveErrors};
use crate::resolve::lineage::{ClassResolver, DefinitionIndex};
use crate::resolve::rewrite::Rewriter;
use crate::resolve::usage::UsageTracker;
use crate::signatures::SignatureProvider;

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    /// Registered definitions processed
    pub definitions: usize,
    /// Argument slots rewritten
    pub substitutions: usize,
    /// Distinct bindings consumed
    pub bindings_used: usize,
}

/// The binding resolution pass.
///
/// The pass is consumed by [`process`](Self::process): bindings are marked
/// used as a side effect, so running it twice over the same registry would
/// misreport usage.
pub struct ResolveBindingsPass<P> {
    provider: P,
    config: ResolveConfig,
}

impl<P: SignatureProvider> ResolveBindingsPass<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ResolveConfig::default(),
        }
    }

    pub fn with_config(provider: P, config: ResolveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Rewrites every definition in `registry` and validates binding usage.
    ///
    /// All definitions are scanned before failing, so the error lists
    /// every unused binding and every class or method problem at once.
    /// Unused bindings come first, in declaration order.
    #[instrument(skip_all, fields(definitions = registry.len()))]
    pub fn process(self, registry: &mut DefinitionRegistry) -> Result<ResolveReport, ResolveErrors> {
        let index = DefinitionIndex::from_registry(registry);
        let resolver = ClassResolver::new(&index, &self.provider, self.config.max_parent_depth);
        let mut usage = UsageTracker::new();

        let mut rewriter = Rewriter::new(resolver, &self.provider, &mut usage);
        for (id, definition) in registry.iter_mut() {
            rewriter.rewrite(id, definition);
        }
        let (rewrite_errors, substitutions) = rewriter.finish();

        usage.apply(registry);

        let mut errors = usage.unused(&self.config);
        errors.extend(rewrite_errors);

        for error in &errors {
            warn!(kind = %error.kind(), service = %error.service(), "{error}");
        }

        if !errors.is_empty() {
            return Err(ResolveErrors(errors));
        }

        let report = ResolveReport {
            definitions: registry.len(),
            substitutions,
            bindings_used: usage.used_count(),
        };
        info!(
            substitutions = report.substitutions,
            bindings_used = report.bindings_used,
            "bindings resolved"
        );
        Ok(report)
    }
}

/// Runs [`ResolveBindingsPass`] with the default configuration.
pub fn resolve_bindings<P: SignatureProvider>(
    registry: &mut DefinitionRegistry,
    provider: &P,
) -> Result<ResolveReport, ResolveErrors> {
    ResolveBindingsPass::new(provider).process(registry)
}
