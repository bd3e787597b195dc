use std::{cell::RefCell, rc::Rc};

use crate::WorkoutRecordID;

/// Mutation of the record set that listeners are notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created(WorkoutRecordID),
    Deleted(WorkoutRecordID),
}

pub type Listener = Rc<dyn Fn(Change)>;

/// Listeners are called synchronously, in subscription order.
///
/// A listener may subscribe further listeners while it is called. These
/// are notified from the next change on.
#[derive(Default)]
pub struct Listeners {
    listeners: RefCell<Vec<Listener>>,
}

impl Listeners {
    pub fn subscribe(&self, listener: impl Fn(Change) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn notify(&self, change: Change) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(change);
        }
    }
}
