//! Validation registry - the set of currently invalid fields
//!
//! Field validators report pass/fail per [`FieldKey`]; the registry keeps only
//! the keys whose latest report was a failure. A key that was never reported
//! counts as valid. There is no ordering across keys: this is a set, not a log.

use std::collections::HashSet;

use crate::field::FieldKey;

/// Aggregated per-field validation state for one session
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    invalid: HashSet<FieldKey>,
}

impl ValidationRegistry {
    /// Create an empty (satisfied) registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest status for a field.
    ///
    /// Returns true if the registry changed. Repeating the status a key
    /// already holds is a no-op.
    pub fn report(&mut self, key: FieldKey, is_valid: bool) -> bool {
        if is_valid {
            self.invalid.remove(&key)
        } else {
            self.invalid.insert(key)
        }
    }

    /// True iff no field is currently marked invalid
    pub fn is_satisfied(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Number of fields currently marked invalid
    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    /// Whether a specific field is currently marked invalid
    pub fn is_invalid(&self, key: &FieldKey) -> bool {
        self.invalid.contains(key)
    }

    /// Invalid keys in sorted order (for display and logging)
    pub fn invalid_keys(&self) -> Vec<&FieldKey> {
        let mut keys: Vec<_> = self.invalid.iter().collect();
        keys.sort();
        keys
    }

    /// Forget every reported status
    pub fn clear(&mut self) {
        self.invalid.clear();
    }
}
