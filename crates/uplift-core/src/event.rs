//! Inbound platform events and the bus that delivers them.
//!
//! The event source publishes; the coordinator subscribes at construction
//! and holds the returned [`Subscription`] for as long as it wants
//! delivery. Dropping the guard unsubscribes, so acquisition and release
//! are scoped rather than ambient.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::anim::AnimationCurve;
use crate::geometry::Rect;
use crate::tree::NodeId;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A field gained focus. `frame` is its frame in the immediate
    /// container's coordinate space at that moment.
    FocusGained { field: NodeId, frame: Rect },
    FocusLost { field: NodeId },
    /// Raw keyboard frame in window coordinates; geometry that does not
    /// intersect the window degrades to height zero.
    KeyboardWillShow {
        frame: Rect,
        duration: f32,
        curve: AnimationCurve,
    },
    KeyboardWillHide { duration: f32 },
    KeyboardDidHide,
    OrientationWillChange,
}

pub type SubId = usize;

type Handler = Rc<dyn Fn(&Event)>;

#[derive(Default)]
pub struct EventBus {
    subs: RefCell<Vec<(SubId, Handler)>>,
    next: Cell<SubId>,
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn subscribe(self: &Rc<Self>, handler: impl Fn(&Event) + 'static) -> Subscription {
        let id = self.next.get();
        self.next.set(id + 1);
        self.subs.borrow_mut().push((id, Rc::new(handler)));
        Subscription {
            bus: Rc::downgrade(self),
            id,
        }
    }

    pub fn publish(&self, event: &Event) {
        // Snapshot so handlers may subscribe/unsubscribe while we deliver.
        let handlers: Vec<Handler> = self.subs.borrow().iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(event);
        }
    }

    fn unsubscribe(&self, id: SubId) {
        self.subs.borrow_mut().retain(|(sid, _)| *sid != id);
    }
}

/// Releases its subscription when dropped.
#[must_use = "dropping the subscription stops event delivery"]
pub struct Subscription {
    bus: Weak<EventBus>,
    id: SubId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_subscribe_and_publish() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_clone = seen.clone();
        let _sub = bus.subscribe(move |_| *seen_clone.borrow_mut() += 1);

        bus.publish(&Event::KeyboardDidHide);
        bus.publish(&Event::OrientationWillChange);
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_dropping_subscription_stops_delivery() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_clone = seen.clone();
        let sub = bus.subscribe(move |_| *seen_clone.borrow_mut() += 1);

        bus.publish(&Event::KeyboardDidHide);
        drop(sub);
        bus.publish(&Event::KeyboardDidHide);
        assert_eq!(*seen.borrow(), 1);
    }
}
