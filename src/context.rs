//! Per-session context handed to host callbacks and field validators

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::field::FieldKey;
use crate::scheduler::ReportHandle;
use crate::session_config::SessionConfig;

/// Whether an episode edits an existing element or adds a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Add,
    Edit,
}

/// Handle exposing the session's config, its field-report channel and the
/// identity of the element being edited.
pub struct Context<E: Element> {
    config: Rc<SessionConfig<E>>,
    reporter: ReportHandle,
    mode: Mode,
    original_id: Option<E::Id>,
}

impl<E: Element> Context<E> {
    pub fn new(
        config: Rc<SessionConfig<E>>,
        reporter: ReportHandle,
        mode: Mode,
        original_id: Option<E::Id>,
    ) -> Self {
        Self {
            config,
            reporter,
            mode,
            original_id,
        }
    }

    pub fn config(&self) -> &SessionConfig<E> {
        &self.config
    }

    /// Schedule a field status for the next settle point. Dropped silently
    /// once the session has closed.
    pub fn report_field_validation(&self, key: impl Into<FieldKey>, is_valid: bool) -> bool {
        self.reporter.report(key.into(), is_valid)
    }

    pub fn reporter(&self) -> &ReportHandle {
        &self.reporter
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True for an add episode (no element existed before)
    pub fn is_add(&self) -> bool {
        self.mode == Mode::Add
    }

    /// Id of the host's element this episode started from, if any
    pub fn original_id(&self) -> Option<&E::Id> {
        self.original_id.as_ref()
    }
}

impl<E: Element> Clone for Context<E> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            reporter: self.reporter.clone(),
            mode: self.mode,
            original_id: self.original_id.clone(),
        }
    }
}

impl<E: Element> fmt::Debug for Context<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("mode", &self.mode)
            .field("original_id", &self.original_id)
            .field("connected", &self.reporter.is_connected())
            .finish()
    }
}
