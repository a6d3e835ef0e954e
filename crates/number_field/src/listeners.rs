//! Ordered, copy-on-iterate listener lists.
//!
//! Dispatch clones the current callbacks before invoking any of them, so a
//! listener may subscribe, unsubscribe or trigger another update on the same
//! field while it runs. A listener removed mid-dispatch still receives the
//! event being delivered; one added mid-dispatch first sees the next event.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<dyn Fn(&E)>;

struct ListenerList<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

pub struct Listeners<E> {
    inner: Rc<RefCell<ListenerList<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback. Callbacks run in subscription order.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Registration {
        let id = {
            let mut list = self.inner.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<ListenerList<E>>> = Rc::downgrade(&self.inner);
        Registration {
            unsubscribe: Some(Box::new(move || {
                if let Some(list) = weak.upgrade() {
                    list.borrow_mut().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.inner.borrow().entries.len())
            .finish()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the listener alive;
/// call [`remove`](Self::remove) to unsubscribe.
#[must_use = "dropping a Registration does not unsubscribe; keep it to call remove()"]
pub struct Registration {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn remove(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
