use crate::resolver::{Resolution, Resolver};
use crate::CoreError;
use codecfg_schema::{OptionOverrideRule, PlatformDescriptor};
use std::thread;
use tracing::debug;

/// Resolve the same rules for several platforms, one thread per platform.
///
/// Results come back in the order of `platforms`. Each resolution owns its
/// option set, so a failure on one platform does not affect the others.
pub fn resolve_matrix(
    resolver: &Resolver<'_>,
    dependency: &str,
    platforms: &[PlatformDescriptor],
    rules: &[OptionOverrideRule],
) -> Vec<Result<Resolution, CoreError>> {
    debug!(
        "resolving {dependency} for {} platform(s) in parallel",
        platforms.len()
    );
    thread::scope(|scope| {
        let handles: Vec<_> = platforms
            .iter()
            .map(|platform| scope.spawn(move || resolver.resolve(dependency, platform, rules)))
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
