use std::sync::Arc;

use objrt_config::Config;
use objrt_core::{ClusterAdapter, PathResolver};

/// Resolver over the configured roots, using the Slurm adapter described by
/// the `[cluster]` section.
pub fn build_resolver(config: &Config) -> PathResolver {
    build_resolver_with_adapter(config, Arc::new(config.slurm_adapter()))
}

pub fn build_resolver_with_adapter(
    config: &Config,
    adapter: Arc<dyn ClusterAdapter>,
) -> PathResolver {
    let resolver = PathResolver::new(Arc::new(config.root_bindings()), adapter);
    match config.advertised_endpoint() {
        Some(origin) => resolver.with_origin(origin),
        None => resolver,
    }
}
