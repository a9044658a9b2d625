//! Re-emit outlines as files change.

use crate::error::OutlineError;
use crate::session::{OutlineEvent, OutlineSession};
use crate::walk::WalkFilter;
use crate::{collect_outlines, outline_file, render, FileOutline, ProcessOptions};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Outline `path` once, then again whenever a watched file changes, handing
/// rendered text to `emit`. Only returns on a watcher error.
pub fn watch_path(
    path: &Path,
    options: &ProcessOptions,
    mut emit: impl FnMut(&str) + 'static,
) -> Result<(), OutlineError> {
    if !path.exists() {
        return Err(OutlineError::PathNotFound(path.display().to_string()));
    }
    // notify reports absolute paths; key the session the same way.
    let root = path.canonicalize().map_err(|e| OutlineError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut session = OutlineSession::new();
    let render_options = options.clone();
    let _subscription = session.subscribe(move |event| match event {
        OutlineEvent::Updated { path, outline } => {
            let file = FileOutline {
                path: path.display().to_string(),
                lines: 0,
                bytes: 0,
                outline: outline.to_vec(),
            };
            match render(vec![file], &render_options) {
                Ok(text) => emit(&text),
                Err(e) => warn!("Failed to render {}: {}", path.display(), e),
            }
        }
        OutlineEvent::Removed { path } => emit(&format!("{} removed\n", path.display())),
    });

    for file in collect_outlines(&root, options.depth, &options.ext)? {
        session.refresh(file.path, file.outline);
    }

    let scope = Scope::new(&root, options);
    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
    debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;
    info!("Watching {}", root.display());

    for result in rx {
        match result {
            Ok(events) => {
                for event in events {
                    apply_change(&mut session, &scope, &event.path);
                }
            }
            Err(e) => warn!("File system watcher error: {:?}", e),
        }
    }

    Ok(())
}

/// Which changed paths belong to the watched root.
pub(crate) enum Scope {
    File(PathBuf),
    /// Same exclusions as the initial walk.
    Tree(WalkFilter),
}

impl Scope {
    pub(crate) fn new(root: &Path, options: &ProcessOptions) -> Self {
        if root.is_file() {
            Scope::File(root.to_path_buf())
        } else {
            Scope::Tree(WalkFilter::new(root, options.depth, &options.ext))
        }
    }

    fn covers(&self, path: &Path) -> bool {
        match self {
            Scope::File(root) => path == root,
            Scope::Tree(filter) => filter.accepts(path),
        }
    }
}

/// Bring the session up to date with one changed path.
pub(crate) fn apply_change(session: &mut OutlineSession, scope: &Scope, changed: &Path) {
    if !changed.exists() {
        // A deleted directory is reported once, for the directory itself.
        let removed = session.remove_under(changed);
        if removed > 0 {
            debug!("Dropped {} outline(s) under {}", removed, changed.display());
        }
        return;
    }
    if !changed.is_file() || !scope.covers(changed) {
        return;
    }

    match outline_file(changed) {
        Ok(file) => {
            session.refresh(changed.to_path_buf(), file.outline);
        }
        Err(e) => warn!("Failed to process {}: {}", changed.display(), e),
    }
}
