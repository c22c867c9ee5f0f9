//! Deferred field reports
//!
//! Field validators never touch the registry directly. A report is scheduled
//! on the session's [`ReportQueue`] and applied on the next settle point, so
//! the registry is not mutated in the middle of the pass that produced the
//! value change. Reports are applied in scheduling order.
//!
//! Validators hold a [`ReportHandle`], a weak reference to the queue. Once the
//! session is torn down the queue is dropped and late reports through old
//! handles are discarded.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::field::FieldKey;
use crate::registry::ValidationRegistry;

/// One pending field status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub key: FieldKey,
    pub is_valid: bool,
}

/// FIFO of reports waiting for the next settle point
#[derive(Debug, Default)]
pub struct ReportQueue {
    pending: VecDeque<Report>,
}

impl ReportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a report behind any already pending ones
    pub fn schedule(&mut self, key: FieldKey, is_valid: bool) {
        tracing::trace!(%key, is_valid, pending = self.pending.len(), "scheduling field report");
        self.pending.push_back(Report { key, is_valid });
    }

    /// Number of reports not yet applied
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is waiting (quiescence)
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending report to the registry in order.
    ///
    /// Returns the number of reports that changed the registry.
    pub fn drain_into(&mut self, registry: &mut ValidationRegistry) -> usize {
        let mut changed = 0;
        while let Some(report) = self.pending.pop_front() {
            if registry.report(report.key, report.is_valid) {
                changed += 1;
            }
        }
        changed
    }

    /// Drop pending reports without applying them
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

/// Shared queue owned by one session
pub(crate) type SharedQueue = Rc<RefCell<ReportQueue>>;

/// Weak handle used to schedule reports into a session's queue
#[derive(Debug, Clone, Default)]
pub struct ReportHandle {
    queue: Weak<RefCell<ReportQueue>>,
}

impl ReportHandle {
    pub(crate) fn new(queue: &SharedQueue) -> Self {
        Self {
            queue: Rc::downgrade(queue),
        }
    }

    /// A handle attached to no session. Every report through it is dropped.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Schedule a report for the next settle point.
    ///
    /// Returns false if the owning session has been torn down; the report is
    /// discarded in that case.
    pub fn report(&self, key: FieldKey, is_valid: bool) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().schedule(key, is_valid);
                true
            }
            None => {
                tracing::trace!(%key, is_valid, "dropping report for closed session");
                false
            }
        }
    }

    /// Whether the owning session is still alive
    pub fn is_connected(&self) -> bool {
        self.queue.strong_count() > 0
    }
}
