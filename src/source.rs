//! Working-copy strategies
//!
//! One session state machine serves both ways a host can source an element:
//!
//! - [`Copied`]: copy-in/copy-out. The session owns a clone; the host's
//!   instance is untouched until `on_save` hands the copy back.
//! - [`Shared`]: shared reference, for reference-identity elements the host
//!   observes directly. Edits land on the shared instance, but persisting them
//!   is still the business of `on_save`.
//!
//! `Shared` reads borrow the `RefCell` for the duration of the closure. Host
//! callbacks receive a snapshot through [`WorkingCopy::lend`] instead, so a
//! host may borrow its own handle mutably from inside `on_save`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::element::Element;

/// How a session reads and mutates its working element
pub trait WorkingCopy<E: Element> {
    fn read<R>(&self, f: impl FnOnce(&E) -> R) -> R;

    fn edit<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> R;

    /// Hand the element to a host callback.
    ///
    /// No borrow the host can observe is held while `f` runs.
    fn lend<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        self.read(f)
    }

    fn element_id(&self) -> E::Id {
        self.read(|e| e.id())
    }
}

/// Session-owned copy of the host's element
#[derive(Debug, Clone)]
pub struct Copied<E> {
    element: E,
}

impl<E: Clone> Copied<E> {
    /// Copy the host's element
    pub fn of(original: &E) -> Self {
        Self {
            element: original.clone(),
        }
    }
}

impl<E> Copied<E> {
    /// Take ownership of a freshly created element (add episodes)
    pub fn owned(element: E) -> Self {
        Self { element }
    }

    pub fn into_inner(self) -> E {
        self.element
    }
}

impl<E: Element> WorkingCopy<E> for Copied<E> {
    fn read<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.element)
    }

    fn edit<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.element)
    }
}

/// Element shared with the host by reference
#[derive(Debug)]
pub struct Shared<E> {
    element: Rc<RefCell<E>>,
}

impl<E> Shared<E> {
    pub fn new(element: Rc<RefCell<E>>) -> Self {
        Self { element }
    }

    /// Another handle to the shared element
    pub fn handle(&self) -> Rc<RefCell<E>> {
        Rc::clone(&self.element)
    }
}

impl<E: Element + Clone> WorkingCopy<E> for Shared<E> {
    fn read<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.element.borrow())
    }

    fn lend<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        let snapshot = self.element.borrow().clone();
        f(&snapshot)
    }

    fn edit<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.element.borrow_mut())
    }
}
