use crate::config::MissingSeedPolicy;
use crate::core::{EnvminError, EnvminResult};
use crate::resolver::seeds::{RequiredClosure, SeedSet};
use std::path::Path;
use tracing::{info, warn};

/// Everything the resolver needs for one closure computation
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub java_home: &'a Path,
    pub classpath: &'a str,
    /// Compiled classes of the input environment, where starting classes are looked up
    pub classes_dir: &'a Path,
    pub seeds: &'a SeedSet,
    /// Starting classes, one per line (blank and `#` lines are skipped by the resolver)
    pub classes_file: &'a Path,
    /// Extra explicit class names to keep
    pub additional_file: Option<&'a Path>,
}

/// Computes the transitive set of type names needed by the seeds.
///
/// Implementations are opaque to the minifier; failures are reported as-is.
pub trait DependencyResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> anyhow::Result<RequiredClosure>;
}

/// Obtains the required closure from a resolver and applies the missing-seed policy
pub struct ClosureCollector<'a> {
    resolver: &'a dyn DependencyResolver,
    policy: MissingSeedPolicy,
}

impl<'a> ClosureCollector<'a> {
    pub fn new(resolver: &'a dyn DependencyResolver, policy: MissingSeedPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Run the resolver once. No retries, no partial results.
    pub fn collect(&self, request: &ResolveRequest<'_>) -> EnvminResult<RequiredClosure> {
        let closure = self
            .resolver
            .resolve(request)
            .map_err(EnvminError::Resolution)?;

        if closure.is_empty() {
            warn!("resolver returned an empty closure; only build files will be copied");
        }

        let unmatched = request.seeds.unmatched(&closure);
        if !unmatched.is_empty() {
            match self.policy {
                MissingSeedPolicy::Warn => {
                    for seed in &unmatched {
                        warn!(seed = %seed, "no class in the closure matches seed");
                    }
                }
                MissingSeedPolicy::Fail => {
                    return Err(EnvminError::Resolution(anyhow::anyhow!(
                        "no class in the closure matches seed(s): {}",
                        unmatched.join(", ")
                    )));
                }
            }
        }

        info!(classes = closure.len(), "collected dependency closure");
        Ok(closure)
    }
}
