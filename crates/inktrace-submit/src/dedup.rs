//! Collision-free remote paths.

use inktrace_core::{ContentStore, RemoteConfig, RemotePath};
use log::{debug, warn};

/// Suffixes tried after the plain name before giving up
pub const MAX_DEDUP_ATTEMPTS: u32 = 100;

/// First free path among `base`, `base-1`, … `base-100`.
///
/// Lookups run one at a time. A lookup that fails for any reason counts as a
/// free slot. When all 101 candidates are taken the original `base` is
/// returned and the upload replaces that file.
pub fn resolve_unique_path<S>(store: &S, destination: &RemoteConfig, base: &RemotePath) -> RemotePath
where
    S: ContentStore + ?Sized,
{
    if !is_occupied(store, destination, base) {
        return base.clone();
    }

    for n in 1..=MAX_DEDUP_ATTEMPTS {
        let candidate = base.with_suffix(n);
        if !is_occupied(store, destination, &candidate) {
            debug!("Resolved {} -> {}", base, candidate);
            return candidate;
        }
    }

    warn!(
        "All {} suffixes of {} are taken, overwriting the original",
        MAX_DEDUP_ATTEMPTS, base
    );
    base.clone()
}

fn is_occupied<S>(store: &S, destination: &RemoteConfig, path: &RemotePath) -> bool
where
    S: ContentStore + ?Sized,
{
    match store.fetch_sha(destination, path) {
        Ok(sha) => sha.is_some(),
        Err(err) => {
            warn!("Lookup of {} failed, treating it as free: {}", path, err);
            false
        }
    }
}
