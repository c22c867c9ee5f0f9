//! Detail session - one editing episode for one element
//!
//! The session owns the working copy, the field bindings and the validation
//! registry, and is the only place Save/Delete/Cancel transitions happen.
//! All state changes go through [`DetailSession::update`] (or
//! [`DetailSession::edit`], which is update plus a mutation).
//!
//! # Ordering
//!
//! Field validators schedule their reports; the registry only changes on a
//! settle point (`SessionMsg::Settle`, or implicitly at the start of Save).
//! Gating reads are therefore only meaningful at quiescence, and
//! [`DetailSession::can_save`] reports false while reports are pending.
//!
//! # Teardown
//!
//! Reaching a terminal state discards the registry, the field bindings and
//! the report queue. Messages delivered afterwards are ignored.

use std::cell::RefCell;
use std::rc::Rc;

use crate::commands::{Alert, Cmd, Outcome};
use crate::context::{Context, Mode};
use crate::element::Element;
use crate::field::FieldKey;
use crate::messages::SessionMsg;
use crate::registry::ValidationRegistry;
use crate::scheduler::{ReportHandle, ReportQueue, SharedQueue};
use crate::session_config::SessionConfig;
use crate::source::{Copied, WorkingCopy};
use crate::validator::{BoundField, ObservedField};

/// Lifecycle state of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Saving,
    Cancelling,
    Deleting,
    Saved,
    Cancelled,
    Deleted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Saved | SessionState::Cancelled | SessionState::Deleted
        )
    }

    fn closed(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Saved => SessionState::Saved,
            Outcome::Cancelled => SessionState::Cancelled,
            Outcome::Deleted => SessionState::Deleted,
        }
    }
}

/// One open-to-close editing episode
pub struct DetailSession<E: Element, W: WorkingCopy<E> = Copied<E>> {
    config: Rc<SessionConfig<E>>,
    working: W,
    registry: ValidationRegistry,
    /// None once the session is torn down
    queue: Option<SharedQueue>,
    fields: Vec<Box<dyn ObservedField<E>>>,
    mode: Mode,
    original_id: Option<E::Id>,
    state: SessionState,
    pending_alert: Option<Alert>,
    /// Messages from the last whole-element validation pass
    last_messages: Vec<String>,
}

impl<E, W> DetailSession<E, W>
where
    E: Element,
    W: WorkingCopy<E>,
{
    pub fn new(
        config: Rc<SessionConfig<E>>,
        working: W,
        mode: Mode,
        original_id: Option<E::Id>,
    ) -> Self {
        tracing::debug!(?mode, ?original_id, "opening detail session");
        Self {
            config,
            working,
            registry: ValidationRegistry::new(),
            queue: Some(Rc::new(RefCell::new(ReportQueue::new()))),
            fields: Vec::new(),
            mode,
            original_id,
            state: SessionState::Editing,
            pending_alert: None,
            last_messages: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Field binding
    // ------------------------------------------------------------------------

    /// Attach a field-level check.
    ///
    /// The field is evaluated immediately (the indicator reflects it right
    /// away) and its report is scheduled for the next settle point.
    pub fn bind_field<T>(
        &mut self,
        key: impl Into<FieldKey>,
        accessor: impl Fn(&E) -> T + 'static,
        test: impl Fn(&T) -> bool + 'static,
    ) -> &mut Self
    where
        E: 'static,
        T: PartialEq + Clone + 'static,
    {
        if self.is_closed() {
            return self;
        }
        let mut field = BoundField::new(key, accessor, test);
        let reporter = self.reporter();
        self.working.read(|e| field.bind(e, &reporter));
        self.fields.push(Box::new(field));
        self
    }

    // ------------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------------

    /// Mutate the working copy, then re-observe every bound field
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        if self.is_closed() {
            tracing::debug!("ignoring edit for closed session");
            return None;
        }
        let result = self.working.edit(f);
        self.fields_changed();
        Some(result)
    }

    /// Main update function - the only entry point for state transitions
    pub fn update(&mut self, msg: SessionMsg) -> Option<Cmd> {
        if self.is_closed() {
            if msg.is_action() {
                tracing::debug!(
                    ?msg,
                    state = ?self.state,
                    "ignoring action for closed session"
                );
            }
            return None;
        }
        if self.state != SessionState::Editing {
            // Re-entrant delivery while a transition callback is running
            tracing::warn!(
                ?msg,
                state = ?self.state,
                "ignoring message during transition"
            );
            return None;
        }

        match msg {
            SessionMsg::FieldsChanged => self.fields_changed(),
            SessionMsg::Settle => {
                if self.settle() > 0 {
                    Some(Cmd::Redraw)
                } else {
                    None
                }
            }
            SessionMsg::Save => self.save(),
            SessionMsg::Delete => self.delete(),
            SessionMsg::Cancel => self.cancel(),
            SessionMsg::Dismiss => self.dismiss(),
        }
    }

    /// Apply all deferred field reports in scheduling order.
    ///
    /// Returns the number of reports that changed the registry.
    pub fn settle(&mut self) -> usize {
        let Some(queue) = &self.queue else {
            return 0;
        };
        let changed = queue.borrow_mut().drain_into(&mut self.registry);
        tracing::trace!(
            changed,
            invalid = self.registry.invalid_count(),
            "settled field reports"
        );
        changed
    }

    fn fields_changed(&mut self) -> Option<Cmd> {
        // Stale once the element changed; the next save re-runs validation
        self.last_messages.clear();

        let reporter = self.reporter();
        let working = &self.working;
        let mut changed = 0;
        for field in self.fields.iter_mut() {
            if working.read(|e| field.observe(e, &reporter)).is_some() {
                changed += 1;
            }
        }
        tracing::trace!(changed, "fields observed");
        Some(Cmd::Redraw)
    }

    fn save(&mut self) -> Option<Cmd> {
        let config = Rc::clone(&self.config);
        let Some(on_save) = config.on_save() else {
            tracing::debug!("save refused: capability not granted");
            return None;
        };

        self.settle();
        self.state = SessionState::Saving;
        let ctx = self.context();

        // Whole-element validation is authoritative and checked first
        let messages = self.working.lend(|e| config.validate(&ctx, e));
        // Reports made during validation must land before the registry is read
        self.settle();
        if !messages.is_empty() {
            tracing::debug!(
                count = messages.len(),
                "save aborted: element validation failed"
            );
            let alert = Alert::from_messages(&messages);
            self.last_messages = messages;
            return Some(self.abort_save(alert));
        }
        self.last_messages.clear();

        let invalid = self.registry.invalid_count();
        if invalid > 0 {
            tracing::debug!(
                invalid,
                fields = ?self.registry.invalid_keys(),
                "save aborted: invalid fields"
            );
            return Some(self.abort_save(Alert::invalid_fields(invalid)));
        }

        self.working.lend(|e| on_save(&ctx, e));
        Some(self.close(Outcome::Saved))
    }

    fn abort_save(&mut self, alert: Alert) -> Cmd {
        self.state = SessionState::Editing;
        self.pending_alert = Some(alert.clone());
        Cmd::PresentAlert(alert)
    }

    fn delete(&mut self) -> Option<Cmd> {
        let config = Rc::clone(&self.config);
        let Some(on_delete) = config.on_delete() else {
            tracing::debug!("delete refused: capability not granted");
            return None;
        };
        if !self.working.read(|e| config.can_delete(e)) {
            tracing::debug!("delete refused: element cannot be deleted");
            return None;
        }

        self.state = SessionState::Deleting;
        let id = self.working.element_id();
        on_delete(&id);
        Some(self.close(Outcome::Deleted))
    }

    fn cancel(&mut self) -> Option<Cmd> {
        self.state = SessionState::Cancelling;
        let ctx = self.context();
        self.working.lend(|e| self.config.cancel(&ctx, e));
        Some(self.close(Outcome::Cancelled))
    }

    fn dismiss(&mut self) -> Option<Cmd> {
        match self.mode {
            // Nothing was added: same semantics as an explicit cancel
            Mode::Add => self.cancel(),
            Mode::Edit => Some(self.close(Outcome::Cancelled)),
        }
    }

    fn close(&mut self, outcome: Outcome) -> Cmd {
        self.state = SessionState::closed(outcome);
        if let Some(queue) = self.queue.take() {
            let dropped = queue.borrow_mut().discard();
            if dropped > 0 {
                tracing::trace!(dropped, "discarded pending field reports");
            }
        }
        self.registry.clear();
        self.fields.clear();
        self.pending_alert = None;
        self.last_messages.clear();
        tracing::info!(%outcome, mode = ?self.mode, "detail session closed");
        Cmd::CloseEpisode(outcome)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Context for callbacks and custom field reporters
    pub fn context(&self) -> Context<E> {
        Context::new(
            Rc::clone(&self.config),
            self.reporter(),
            self.mode,
            self.original_id.clone(),
        )
    }

    fn reporter(&self) -> ReportHandle {
        match &self.queue {
            Some(queue) => ReportHandle::new(queue),
            None => ReportHandle::detached(),
        }
    }

    pub fn config(&self) -> &SessionConfig<E> {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_add(&self) -> bool {
        self.mode == Mode::Add
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_terminal()
    }

    /// No deferred field reports are waiting
    pub fn is_quiescent(&self) -> bool {
        self.queue.as_ref().map_or(true, |q| q.borrow().is_empty())
    }

    /// Read the working copy
    pub fn read<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        self.working.read(f)
    }

    pub fn working_copy(&self) -> &W {
        &self.working
    }

    /// Title for the detail view
    pub fn title(&self) -> String {
        self.working.read(|e| self.config.title(e))
    }

    pub fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    pub fn invalid_count(&self) -> usize {
        self.registry.invalid_count()
    }

    /// Whether the invalid-field marker next to `key` should be shown.
    ///
    /// Reflects the bound validator's latest evaluation, which is computed
    /// synchronously; falls back to the registry for keys reported through
    /// the context only.
    pub fn indicator_visible(&self, key: &FieldKey) -> bool {
        match self.fields.iter().find(|f| f.key() == key) {
            Some(field) => field.indicator_visible(),
            None => self.registry.is_invalid(key),
        }
    }

    /// Delete button is shown
    pub fn is_delete_available(&self) -> bool {
        !self.is_closed() && self.config.is_delete_available()
    }

    /// Delete button is enabled
    pub fn can_delete(&self) -> bool {
        self.is_delete_available() && self.working.read(|e| self.config.can_delete(e))
    }

    /// Save button is shown
    pub fn is_save_available(&self) -> bool {
        !self.is_closed() && self.config.is_save_available()
    }

    /// Save button is enabled: capability granted, no invalid fields, no
    /// outstanding element-level messages, and no reports pending
    pub fn can_save(&self) -> bool {
        self.is_save_available()
            && self.is_quiescent()
            && self.registry.is_satisfied()
            && self.last_messages.is_empty()
    }

    /// Messages from the last element validation pass (cleared on edit)
    pub fn last_validation_messages(&self) -> &[String] {
        &self.last_messages
    }

    pub fn pending_alert(&self) -> Option<&Alert> {
        self.pending_alert.as_ref()
    }

    /// Take the alert once the host has presented it
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.pending_alert.take()
    }
}

impl<E> DetailSession<E, Copied<E>>
where
    E: Element,
{
    /// Consume the session and return its working copy
    pub fn into_working_copy(self) -> E {
        self.working.into_inner()
    }
}

impl<E, W> std::fmt::Debug for DetailSession<E, W>
where
    E: Element,
    W: WorkingCopy<E>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailSession")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("original_id", &self.original_id)
            .field("registry", &self.registry)
            .field("fields", &self.fields.len())
            .field("pending_alert", &self.pending_alert)
            .finish_non_exhaustive()
    }
}
