//! Session configuration - the capability and policy bundle supplied by the host
//!
//! Every callback except the titler is optional. An absent `on_save` or
//! `on_delete` means the capability was not granted: the matching action is
//! refused, not treated as an error. The config is immutable once built and
//! shared by all sessions of one host screen through an `Rc`.

use std::fmt;
use std::rc::Rc;

use crate::config::{IndicatorStyle, Presentation};
use crate::context::Context;
use crate::element::Element;

pub type CanEdit<E> = Box<dyn Fn(&E) -> bool>;
pub type CanDelete<E> = Box<dyn Fn(&E) -> bool>;
pub type OnDelete<E> = Box<dyn Fn(&<E as Element>::Id)>;
pub type OnValidate<E> = Box<dyn Fn(&Context<E>, &E) -> Vec<String>>;
pub type OnSave<E> = Box<dyn Fn(&Context<E>, &E)>;
pub type OnCancel<E> = Box<dyn Fn(&Context<E>, &E)>;
pub type Titler<E> = Box<dyn Fn(&E) -> String>;

/// Immutable capability/policy bundle for one host screen
pub struct SessionConfig<E: Element> {
    presentation: Presentation,
    can_edit: Option<CanEdit<E>>,
    can_delete: CanDelete<E>,
    on_delete: Option<OnDelete<E>>,
    on_validate: OnValidate<E>,
    on_save: Option<OnSave<E>>,
    on_cancel: OnCancel<E>,
    titler: Titler<E>,
}

impl<E: Element> SessionConfig<E> {
    /// Start building a config. The titler is the only required part.
    pub fn builder(titler: impl Fn(&E) -> String + 'static) -> SessionConfigBuilder<E> {
        SessionConfigBuilder::new(titler)
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn min_width(&self) -> f32 {
        self.presentation.min_width
    }

    pub fn indicator(&self) -> &IndicatorStyle {
        &self.presentation.indicator
    }

    /// Display title for an element
    pub fn title(&self, element: &E) -> String {
        (self.titler)(element)
    }

    /// Whether the element may be opened for editing (absent policy = yes)
    pub fn can_edit(&self, element: &E) -> bool {
        self.can_edit.as_ref().map_or(true, |f| f(element))
    }

    /// The `can_delete` policy on its own, ignoring whether delete is available
    pub fn can_delete(&self, element: &E) -> bool {
        (self.can_delete)(element)
    }

    /// Delete capability granted at all
    pub fn is_delete_available(&self) -> bool {
        self.on_delete.is_some()
    }

    /// Delete granted and permitted for this element
    pub fn is_delete_permitted(&self, element: &E) -> bool {
        self.is_delete_available() && self.can_delete(element)
    }

    /// Save capability granted at all
    pub fn is_save_available(&self) -> bool {
        self.on_save.is_some()
    }

    /// Whole-element validation messages, in order
    pub fn validate(&self, ctx: &Context<E>, element: &E) -> Vec<String> {
        (self.on_validate)(ctx, element)
    }

    pub fn on_save(&self) -> Option<&OnSave<E>> {
        self.on_save.as_ref()
    }

    pub fn on_delete(&self) -> Option<&OnDelete<E>> {
        self.on_delete.as_ref()
    }

    pub fn cancel(&self, ctx: &Context<E>, element: &E) {
        (self.on_cancel)(ctx, element)
    }
}

impl<E: Element> fmt::Debug for SessionConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("presentation", &self.presentation)
            .field("can_edit", &self.can_edit.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_save", &self.on_save.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SessionConfig`]; unset capabilities take their defaults
pub struct SessionConfigBuilder<E: Element> {
    presentation: Presentation,
    can_edit: Option<CanEdit<E>>,
    can_delete: Option<CanDelete<E>>,
    on_delete: Option<OnDelete<E>>,
    on_validate: Option<OnValidate<E>>,
    on_save: Option<OnSave<E>>,
    on_cancel: Option<OnCancel<E>>,
    titler: Titler<E>,
}

impl<E: Element> SessionConfigBuilder<E> {
    fn new(titler: impl Fn(&E) -> String + 'static) -> Self {
        Self {
            presentation: Presentation::default(),
            can_edit: None,
            can_delete: None,
            on_delete: None,
            on_validate: None,
            on_save: None,
            on_cancel: None,
            titler: Box::new(titler),
        }
    }

    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn min_width(mut self, min_width: f32) -> Self {
        self.presentation.min_width = min_width;
        self
    }

    pub fn indicator(mut self, indicator: IndicatorStyle) -> Self {
        self.presentation.indicator = indicator;
        self
    }

    pub fn can_edit(mut self, f: impl Fn(&E) -> bool + 'static) -> Self {
        self.can_edit = Some(Box::new(f));
        self
    }

    pub fn can_delete(mut self, f: impl Fn(&E) -> bool + 'static) -> Self {
        self.can_delete = Some(Box::new(f));
        self
    }

    /// Grant the delete capability
    pub fn on_delete(mut self, f: impl Fn(&E::Id) + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_validate(mut self, f: impl Fn(&Context<E>, &E) -> Vec<String> + 'static) -> Self {
        self.on_validate = Some(Box::new(f));
        self
    }

    /// Grant the save capability
    pub fn on_save(mut self, f: impl Fn(&Context<E>, &E) + 'static) -> Self {
        self.on_save = Some(Box::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn(&Context<E>, &E) + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    pub fn build(self) -> SessionConfig<E> {
        SessionConfig {
            presentation: self.presentation,
            can_edit: self.can_edit,
            can_delete: self.can_delete.unwrap_or_else(|| Box::new(|_: &E| true)),
            on_delete: self.on_delete,
            on_validate: self
                .on_validate
                .unwrap_or_else(|| Box::new(|_: &Context<E>, _: &E| Vec::new())),
            on_save: self.on_save,
            on_cancel: self
                .on_cancel
                .unwrap_or_else(|| Box::new(|_: &Context<E>, _: &E| {})),
            titler: self.titler,
        }
    }

    /// Build and wrap for sharing across sessions
    pub fn shared(self) -> Rc<SessionConfig<E>> {
        Rc::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Mode;
    use crate::scheduler::ReportHandle;

    #[derive(Debug, Clone)]
    struct Item {
        id: u32,
        locked: bool,
    }

    impl Element for Item {
        type Id = u32;
        fn id(&self) -> u32 {
            self.id
        }
    }

    fn item() -> Item {
        Item {
            id: 7,
            locked: false,
        }
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::builder(|i: &Item| format!("Item {}", i.id)).shared();
        let ctx = Context::new(config.clone(), ReportHandle::detached(), Mode::Edit, Some(7));

        assert!(config.can_edit(&item()));
        assert!(config.can_delete(&item()));
        assert!(!config.is_delete_available());
        assert!(!config.is_delete_permitted(&item()));
        assert!(!config.is_save_available());
        assert!(config.validate(&ctx, &item()).is_empty());
        assert_eq!(config.title(&item()), "Item 7");
        assert_eq!(config.min_width(), 300.0);
    }

    #[test]
    fn test_delete_permission_needs_both_parts() {
        let config = SessionConfig::builder(|i: &Item| i.id.to_string())
            .can_delete(|i: &Item| !i.locked)
            .on_delete(|_| {})
            .build();

        assert!(config.is_delete_permitted(&item()));
        let locked = Item {
            locked: true,
            ..item()
        };
        assert!(!config.is_delete_permitted(&locked));
    }

    #[test]
    fn test_can_edit_policy() {
        let config = SessionConfig::builder(|i: &Item| i.id.to_string())
            .can_edit(|i: &Item| !i.locked)
            .build();
        assert!(config.can_edit(&item()));
        assert!(!config.can_edit(&Item {
            locked: true,
            ..item()
        }));
    }

    #[test]
    fn test_debug_lists_capabilities() {
        let config = SessionConfig::builder(|i: &Item| i.id.to_string())
            .on_save(|_, _| {})
            .build();
        let dbg = format!("{:?}", config);
        assert!(dbg.contains("on_save: true"));
        assert!(dbg.contains("on_delete: false"));
    }
}
