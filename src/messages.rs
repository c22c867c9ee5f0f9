//! Message types for the Elm-style architecture
//!
//! Every inbound host event for an open episode flows through [`SessionMsg`].
//! Edits to a copied working element go through `DetailSession::edit`, which
//! raises `FieldsChanged` internally.

/// Host intents and notifications for one detail session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMsg {
    /// Field values changed (shared-reference hosts send this after mutating
    /// the element through their own handle)
    FieldsChanged,
    /// Next turn of the event loop: apply deferred field reports
    Settle,
    /// Save button / default action
    Save,
    /// Delete button
    Delete,
    /// Cancel button / cancel action
    Cancel,
    /// Episode dismissed without an explicit action (outside tap, back
    /// navigation, sheet swipe)
    Dismiss,
}

impl SessionMsg {
    /// Whether this message is a user action that can end the episode
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            SessionMsg::Save | SessionMsg::Delete | SessionMsg::Cancel | SessionMsg::Dismiss
        )
    }
}
