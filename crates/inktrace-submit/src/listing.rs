//! Remote listing used to tell which items are already done.

use std::collections::BTreeSet;

use inktrace_core::{traits::EntryKind, ContentStore, RemoteConfig, StoreError};
use log::debug;

/// Stems of all `.svg` files in the destination folder.
///
/// Only plain files count; the extension match ignores case.
pub fn list_svg_stems<S>(store: &S, destination: &RemoteConfig) -> Result<BTreeSet<String>, StoreError>
where
    S: ContentStore + ?Sized,
{
    let entries = store.list_folder(destination, destination.folder())?;
    let stems: BTreeSet<String> = entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .filter_map(|entry| svg_stem(&entry.name).map(str::to_string))
        .collect();
    debug!("{} SVG files under '{}'", stems.len(), destination.folder());
    Ok(stems)
}

fn svg_stem(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(4)?;
    let (stem, ext) = (name.get(..split)?, name.get(split..)?);
    ext.eq_ignore_ascii_case(".svg").then_some(stem)
}
