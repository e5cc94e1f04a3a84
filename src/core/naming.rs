//! Logical test names.
//!
//! Sources under `fl/` and `fx/` get a directory prefix so that
//! `fl/algorithm.cpp` and a root-level `algorithm.cpp` stay distinct.
//! Everything else keeps its bare file stem.

use crate::core::error::{OrganizerError, Result};
use crate::core::models::SourceFile;
use std::collections::HashMap;

/// Directories whose sources get a `<dir>_` name prefix, in precedence order
const PREFIXED_DIRS: &[&str] = &["fl", "fx"];

/// Derive the logical test name for a source path.
pub fn resolve_name(file: &SourceFile) -> String {
    let stem = file.stem();
    match PREFIXED_DIRS.iter().find(|dir| file.is_under(dir)) {
        Some(dir) => format!("{}_{}", dir, stem),
        None => stem.to_string(),
    }
}

/// Resolve names for every file, failing on the first collision.
///
/// Output order matches input order.
pub fn resolve_unique(files: &[SourceFile]) -> Result<Vec<(String, SourceFile)>> {
    let mut owners: HashMap<String, &SourceFile> = HashMap::with_capacity(files.len());
    let mut named = Vec::with_capacity(files.len());

    for file in files {
        let name = resolve_name(file);
        if let Some(first) = owners.get(&name) {
            return Err(OrganizerError::NameCollision {
                name,
                first: first.to_string(),
                second: file.to_string(),
            });
        }
        owners.insert(name.clone(), file);
        named.push((name, file.clone()));
    }

    Ok(named)
}
