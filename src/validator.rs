//! Field-level validation
//!
//! Lightweight per-field checks that run on every value change. Heavyweight
//! whole-element validation happens only on save (see `SessionConfig`).
//!
//! A [`FieldValidator`] evaluates its test synchronously, so the adjacent
//! indicator always matches the current value, but its report to the registry
//! is deferred through a [`ReportHandle`].

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::element::Element;
use crate::field::FieldKey;
use crate::scheduler::ReportHandle;

/// Predicate over one field's value
pub type Test<T> = Box<dyn Fn(&T) -> bool>;

/// Binds one field's value to a predicate and reports the result
pub struct FieldValidator<T> {
    key: FieldKey,
    test: Test<T>,
    last_value: Option<T>,
    last_result: Option<bool>,
}

impl<T> std::fmt::Debug for FieldValidator<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValidator")
            .field("key", &self.key)
            .field("last_value", &self.last_value)
            .field("last_result", &self.last_result)
            .finish_non_exhaustive()
    }
}

impl<T> FieldValidator<T>
where
    T: PartialEq + Clone,
{
    pub fn new(key: impl Into<FieldKey>, test: impl Fn(&T) -> bool + 'static) -> Self {
        Self {
            key: key.into(),
            test: Box::new(test),
            last_value: None,
            last_result: None,
        }
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    /// Initial binding: always evaluates and schedules a report.
    pub fn bind(&mut self, value: &T, reporter: &ReportHandle) -> bool {
        self.apply(value, reporter)
    }

    /// Observe the field's current value.
    ///
    /// Only a value that differs from the last observed one is re-evaluated
    /// and reported. Returns the new result, or None if nothing changed.
    pub fn observe(&mut self, value: &T, reporter: &ReportHandle) -> Option<bool> {
        if self.last_value.as_ref() == Some(value) {
            return None;
        }
        Some(self.apply(value, reporter))
    }

    /// Result of the most recent evaluation (None before the first bind)
    pub fn last_result(&self) -> Option<bool> {
        self.last_result
    }

    /// The invalid-field marker is shown iff the last evaluation failed
    pub fn indicator_visible(&self) -> bool {
        self.last_result == Some(false)
    }

    fn apply(&mut self, value: &T, reporter: &ReportHandle) -> bool {
        let result = self.evaluate(value);
        self.last_value = Some(value.clone());
        self.last_result = Some(result);
        reporter.report(self.key.clone(), result);
        result
    }

    /// Run the test. A panicking test fails closed.
    fn evaluate(&self, value: &T) -> bool {
        match catch_unwind(AssertUnwindSafe(|| (self.test)(value))) {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(key = %self.key, "field test panicked; treating field as invalid");
                false
            }
        }
    }
}

/// A validator attached to an element through an accessor.
///
/// The session keeps these type-erased so fields of different value types can
/// live side by side.
pub trait ObservedField<E: Element> {
    fn key(&self) -> &FieldKey;

    /// Initial evaluation against the element
    fn bind(&mut self, element: &E, reporter: &ReportHandle) -> bool;

    /// Re-read the field from the element; returns Some(result) if it changed
    fn observe(&mut self, element: &E, reporter: &ReportHandle) -> Option<bool>;

    fn indicator_visible(&self) -> bool;
}

/// [`FieldValidator`] plus the accessor that extracts its value
pub struct BoundField<E, T> {
    accessor: Box<dyn Fn(&E) -> T>,
    validator: FieldValidator<T>,
}

impl<E, T> BoundField<E, T>
where
    T: PartialEq + Clone,
{
    pub fn new(
        key: impl Into<FieldKey>,
        accessor: impl Fn(&E) -> T + 'static,
        test: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self {
            accessor: Box::new(accessor),
            validator: FieldValidator::new(key, test),
        }
    }
}

impl<E, T> ObservedField<E> for BoundField<E, T>
where
    E: Element,
    T: PartialEq + Clone,
{
    fn key(&self) -> &FieldKey {
        self.validator.key()
    }

    fn bind(&mut self, element: &E, reporter: &ReportHandle) -> bool {
        let value = (self.accessor)(element);
        self.validator.bind(&value, reporter)
    }

    fn observe(&mut self, element: &E, reporter: &ReportHandle) -> Option<bool> {
        let value = (self.accessor)(element);
        self.validator.observe(&value, reporter)
    }

    fn indicator_visible(&self) -> bool {
        self.validator.indicator_visible()
    }
}
