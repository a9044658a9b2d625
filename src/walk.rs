use crate::error::OutlineError;
use crate::languages;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::{DirEntry, WalkBuilder};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Dependency trees are never outlined, ignore files or not.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Collect the files below `root` that can be outlined, sorted by path.
///
/// Hidden entries and anything excluded by `.gitignore`, `.ignore` or the global
/// gitignore are skipped. `max_depth` counts levels below `root`, so `Some(0)`
/// only looks at `root`'s own files.
pub fn walk_directory(root: &Path, max_depth: Option<usize>, ext_filter: &[String]) -> Result<Vec<PathBuf>, OutlineError> {
    if !root.is_dir() {
        return Err(OutlineError::InvalidPath(root.display().to_string()));
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| !is_skipped_dir(entry))
        .sort_by_file_path(|a, b| a.cmp(b));
    // `ignore` puts the root itself at depth 0.
    if let Some(depth) = max_depth {
        builder.max_depth(Some(depth + 1));
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| OutlineError::ReadError {
            path: root.display().to_string(),
            source: std::io::Error::other(e.to_string()),
        })?;
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && languages::is_supported_file(entry.path(), ext_filter) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_some_and(|t| t.is_dir()) && is_skipped_name(entry.file_name())
}

fn is_skipped_name(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}

/// The walk's exclusion rules for one path at a time, for paths reported after
/// the initial walk. Ignore files are read once, from the root only.
pub struct WalkFilter {
    root: PathBuf,
    max_depth: Option<usize>,
    ext_filter: Vec<String>,
    ignore: Gitignore,
}

impl WalkFilter {
    pub fn new(root: &Path, max_depth: Option<usize>, ext_filter: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        // The walk only honors .gitignore inside a repository.
        let in_repo = root.ancestors().any(|dir| dir.join(".git").exists());
        let names: &[&str] = if in_repo { &[".gitignore", ".ignore"] } else { &[".ignore"] };
        for name in names {
            let path = root.join(name);
            if path.is_file() {
                if let Some(e) = builder.add(&path) {
                    debug!("Skipping rules in {}: {}", path.display(), e);
                }
            }
        }
        let ignore = builder.build().unwrap_or_else(|e| {
            debug!("Ignore rules under {} unusable: {}", root.display(), e);
            Gitignore::empty()
        });

        WalkFilter {
            root: root.to_path_buf(),
            max_depth,
            ext_filter: ext_filter.to_vec(),
            ignore,
        }
    }

    /// Whether [`walk_directory`] on the root would pick up `path`.
    pub fn accepts(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let names: Vec<&OsStr> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        let Some((_, dirs)) = names.split_last() else {
            return false;
        };

        if self.max_depth.is_some_and(|depth| dirs.len() > depth) {
            return false;
        }
        if names.iter().any(|name| is_hidden(name)) || dirs.iter().any(|name| is_skipped_name(name)) {
            return false;
        }
        if self.ignore.matched_path_or_any_parents(relative, false).is_ignore() {
            return false;
        }
        languages::is_supported_file(path, &self.ext_filter)
    }
}
