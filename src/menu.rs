//! Row actions for the master list
//!
//! The list shows Edit and Delete actions per row (context menu, swipe
//! actions, buttons). Edit opens a session; Delete acts directly through the
//! config without opening one.

use crate::element::Element;
use crate::session_config::SessionConfig;

/// Which row actions to show and enable for one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub edit_enabled: bool,
    /// Hidden entirely when no delete handler is configured
    pub delete_shown: bool,
    pub delete_enabled: bool,
}

impl RowActions {
    pub fn for_element<E: Element>(config: &SessionConfig<E>, element: &E) -> Self {
        let delete_shown = config.is_delete_available();
        Self {
            edit_enabled: config.can_edit(element),
            delete_shown,
            delete_enabled: delete_shown && config.can_delete(element),
        }
    }
}

/// Delete a row directly from the list.
///
/// Refused (returns false, nothing invoked) when delete is not granted or the
/// element cannot be deleted.
pub fn delete_row<E: Element>(config: &SessionConfig<E>, element: &E) -> bool {
    let Some(on_delete) = config.on_delete() else {
        return false;
    };
    if !config.can_delete(element) {
        tracing::debug!(id = ?element.id(), "row delete refused");
        return false;
    }
    on_delete(&element.id());
    true
}
