//! Host adapter core
//!
//! A [`Detailer`] belongs to one master list screen. It holds the shared
//! config and opens episodes: edit and add sessions for either sourcing
//! strategy, and read-only view episodes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::commands::{Cmd, Outcome};
use crate::context::Mode;
use crate::element::Element;
use crate::menu::{self, RowActions};
use crate::session::DetailSession;
use crate::session_config::SessionConfig;
use crate::source::{Copied, Shared};

/// Opens detail episodes for a host screen
#[derive(Debug)]
pub struct Detailer<E: Element> {
    config: Rc<SessionConfig<E>>,
}

impl<E: Element> Clone for Detailer<E> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
        }
    }
}

impl<E: Element> Detailer<E> {
    pub fn new(config: SessionConfig<E>) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    pub fn from_shared(config: Rc<SessionConfig<E>>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig<E> {
        &self.config
    }

    /// Open an existing element for editing on a private copy.
    ///
    /// Returns None if the `can_edit` policy rejects the element.
    pub fn open_edit(&self, element: &E) -> Option<DetailSession<E>>
    where
        E: Clone,
    {
        if !self.config.can_edit(element) {
            tracing::debug!(id = ?element.id(), "edit refused by policy");
            return None;
        }
        Some(DetailSession::new(
            Rc::clone(&self.config),
            Copied::of(element),
            Mode::Edit,
            Some(element.id()),
        ))
    }

    /// Open a freshly created element. Nothing exists in the host collection
    /// until the session saves.
    pub fn open_add(&self, element: E) -> DetailSession<E> {
        DetailSession::new(
            Rc::clone(&self.config),
            Copied::owned(element),
            Mode::Add,
            None,
        )
    }

    /// Open a reference-identity element without copying it.
    ///
    /// Edit mode is subject to `can_edit`; add mode is not. Host callbacks
    /// receive a snapshot, so the host may borrow its handle from inside them.
    pub fn open_shared(
        &self,
        element: Rc<RefCell<E>>,
        mode: Mode,
    ) -> Option<DetailSession<E, Shared<E>>>
    where
        E: Clone,
    {
        let original_id = match mode {
            Mode::Edit => {
                let e = element.borrow();
                if !self.config.can_edit(&e) {
                    tracing::debug!(id = ?e.id(), "edit refused by policy");
                    return None;
                }
                let id = e.id();
                Some(id)
            }
            Mode::Add => None,
        };
        Some(DetailSession::new(
            Rc::clone(&self.config),
            Shared::new(element),
            mode,
            original_id,
        ))
    }

    /// Open an element read-only
    pub fn open_view(&self, element: &E) -> ViewSession<E>
    where
        E: Clone,
    {
        ViewSession {
            config: Rc::clone(&self.config),
            element: element.clone(),
            closed: false,
        }
    }

    /// Row menu state for an element in the list
    pub fn row_actions(&self, element: &E) -> RowActions {
        RowActions::for_element(&self.config, element)
    }

    /// Delete straight from the list; see [`menu::delete_row`]
    pub fn delete_row(&self, element: &E) -> bool {
        menu::delete_row(&self.config, element)
    }
}

/// Read-only episode: title plus a Close action
#[derive(Debug)]
pub struct ViewSession<E: Element> {
    config: Rc<SessionConfig<E>>,
    element: E,
    closed: bool,
}

impl<E: Element> ViewSession<E> {
    pub fn title(&self) -> String {
        self.config.title(&self.element)
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the view. Never touches host state; a second close is ignored.
    pub fn close(&mut self) -> Option<Cmd> {
        if self.closed {
            return None;
        }
        self.closed = true;
        Some(Cmd::CloseEpisode(Outcome::Cancelled))
    }
}
