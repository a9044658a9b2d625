//! Latest outline per file, with scoped change subscriptions.
//!
//! A consumer calls [`OutlineSession::subscribe`] and holds on to the returned
//! [`Subscription`]; dropping it stops delivery. Identical outlines for a path
//! are not re-announced, so a superseded request that produced the same tree is
//! silent.

use crate::outline::OutlineNode;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineEvent<'a> {
    Updated { path: &'a Path, outline: &'a [OutlineNode] },
    Removed { path: &'a Path },
}

type Listener = Box<dyn FnMut(&OutlineEvent<'_>)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    /// Ids dropped while their entries were checked out for dispatch.
    released: Vec<u64>,
    dispatching: bool,
}

/// Keeps a listener registered until dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            // The closure may own other subscriptions; drop it once unborrowed.
            let _removed = {
                let mut listeners = listeners.borrow_mut();
                if listeners.dispatching {
                    listeners.released.push(self.id);
                }
                let position = listeners.entries.iter().position(|(id, _)| *id == self.id);
                position.map(|i| listeners.entries.remove(i))
            };
        }
    }
}

#[derive(Default)]
pub struct OutlineSession {
    outlines: BTreeMap<PathBuf, Vec<OutlineNode>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl OutlineSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&OutlineEvent<'_>) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Box::new(listener)));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Store the outline for `path`. Returns `true` (and notifies) only when it
    /// differs from the one already held.
    pub fn refresh(&mut self, path: impl Into<PathBuf>, outline: Vec<OutlineNode>) -> bool {
        let path = path.into();
        if self.outlines.get(&path) == Some(&outline) {
            return false;
        }
        self.outlines.insert(path.clone(), outline);
        if let Some(outline) = self.outlines.get(&path) {
            self.emit(&OutlineEvent::Updated { path: &path, outline });
        }
        true
    }

    /// Forget `path`. Returns `true` (and notifies) if it was known.
    pub fn remove(&mut self, path: &Path) -> bool {
        if self.outlines.remove(path).is_none() {
            return false;
        }
        self.emit(&OutlineEvent::Removed { path });
        true
    }

    /// Forget `prefix` and everything below it, notifying once per path.
    pub fn remove_under(&mut self, prefix: &Path) -> usize {
        let gone: Vec<PathBuf> = self.paths().filter(|p| p.starts_with(prefix)).map(Path::to_path_buf).collect();
        for path in &gone {
            self.remove(path);
        }
        gone.len()
    }

    pub fn outline(&self, path: &Path) -> Option<&[OutlineNode]> {
        self.outlines.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.outlines.keys().map(PathBuf::as_path)
    }

    fn emit(&self, event: &OutlineEvent<'_>) {
        // Listeners are checked out so they may subscribe or drop their own
        // subscription while being called.
        let mut dispatched = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.dispatching = true;
            std::mem::take(&mut listeners.entries)
        };

        for (_, listener) in dispatched.iter_mut() {
            listener(event);
        }

        let _released: Vec<(u64, Listener)> = {
            let mut listeners = self.listeners.borrow_mut();
            let released = std::mem::take(&mut listeners.released);
            let (gone, mut kept): (Vec<_>, Vec<_>) =
                dispatched.into_iter().partition(|(id, _)| released.contains(id));
            kept.append(&mut listeners.entries);
            listeners.entries = kept;
            listeners.dispatching = false;
            gone
        };
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{method, Position};

    fn outline(name: &str) -> Vec<OutlineNode> {
        vec![OutlineNode {
            tokenized_text: vec![method(name)],
            representative_name: Some(name.to_string()),
            start_position: Position::new(0, 0),
            end_position: Position::new(0, 3),
            children: vec![],
        }]
    }

    fn recorder(session: &OutlineSession) -> (Rc<RefCell<Vec<String>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let subscription = session.subscribe(move |event| {
            let entry = match event {
                OutlineEvent::Updated { path, outline } => {
                    format!("updated {} {}", path.display(), outline.len())
                }
                OutlineEvent::Removed { path } => format!("removed {}", path.display()),
            };
            sink.borrow_mut().push(entry);
        });
        (log, subscription)
    }

    #[test]
    fn refresh_notifies_on_change_only() {
        let mut session = OutlineSession::new();
        let (log, _subscription) = recorder(&session);

        assert!(session.refresh("a.js", outline("foo")));
        assert!(!session.refresh("a.js", outline("foo")));
        assert!(session.refresh("a.js", outline("bar")));

        assert_eq!(*log.borrow(), vec!["updated a.js 1", "updated a.js 1"]);
        assert_eq!(session.outline(Path::new("a.js")), Some(outline("bar").as_slice()));
    }

    #[test]
    fn remove_notifies_known_paths() {
        let mut session = OutlineSession::new();
        let (log, _subscription) = recorder(&session);
        session.refresh("a.js", outline("foo"));

        assert!(session.remove(Path::new("a.js")));
        assert!(!session.remove(Path::new("a.js")));
        assert_eq!(log.borrow().last().map(String::as_str), Some("removed a.js"));
        assert_eq!(session.paths().count(), 0);
    }

    #[test]
    fn remove_under_forgets_a_whole_directory() {
        let mut session = OutlineSession::new();
        session.refresh("src/a.js", outline("a"));
        session.refresh("src/lib/b.js", outline("b"));
        session.refresh("src2/c.js", outline("c"));
        let (log, _subscription) = recorder(&session);

        assert_eq!(session.remove_under(Path::new("src")), 2);
        assert_eq!(*log.borrow(), vec!["removed src/a.js", "removed src/lib/b.js"]);
        assert_eq!(session.paths().collect::<Vec<_>>(), vec![Path::new("src2/c.js")]);
        assert_eq!(session.remove_under(Path::new("src")), 0);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let mut session = OutlineSession::new();
        let (log, subscription) = recorder(&session);
        session.refresh("a.js", outline("foo"));
        drop(subscription);
        session.refresh("a.js", outline("bar"));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn listener_may_drop_its_own_subscription() {
        let mut session = OutlineSession::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let own = Rc::clone(&slot);
        let counter = Rc::clone(&calls);
        let subscription = session.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            own.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        session.refresh("a.js", outline("foo"));
        session.refresh("a.js", outline("bar"));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn subscriptions_outliving_the_session_are_harmless() {
        let session = OutlineSession::new();
        let (_log, subscription) = recorder(&session);
        drop(session);
        drop(subscription);
    }
}
