//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use detailer::{Context, DetailSession, Detailer, Element, SessionConfig};

/// Minimal contact record used across the integration tests
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub archived: bool,
}

impl Element for Contact {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

pub fn contact(name: &str, email: &str) -> Contact {
    Contact {
        id: 42,
        name: name.to_string(),
        email: email.to_string(),
        archived: false,
    }
}

/// Every host callback the session invoked, in order
#[derive(Debug, Default)]
pub struct HostLog {
    pub saved: Vec<Contact>,
    pub deleted: Vec<u32>,
    pub cancelled: Vec<Contact>,
    pub validated: usize,
}

pub type SharedLog = Rc<RefCell<HostLog>>;

/// Config with save, delete and cancel recorded into the returned log.
/// Whole-element validation returns `messages` verbatim.
pub fn recording_config(messages: Vec<String>) -> (SessionConfig<Contact>, SharedLog) {
    let log: SharedLog = Rc::new(RefCell::new(HostLog::default()));
    let on_validate = Rc::clone(&log);
    let on_save = Rc::clone(&log);
    let on_delete = Rc::clone(&log);
    let on_cancel = Rc::clone(&log);

    let config = SessionConfig::builder(|c: &Contact| c.name.clone())
        .can_delete(|c: &Contact| !c.archived)
        .on_validate(move |_: &Context<Contact>, _: &Contact| {
            on_validate.borrow_mut().validated += 1;
            messages.clone()
        })
        .on_save(move |_, c: &Contact| on_save.borrow_mut().saved.push(c.clone()))
        .on_delete(move |id: &u32| on_delete.borrow_mut().deleted.push(*id))
        .on_cancel(move |_, c: &Contact| on_cancel.borrow_mut().cancelled.push(c.clone()))
        .build();
    (config, log)
}

/// Edit session over `element` with the name field required non-empty
pub fn edit_session(config: SessionConfig<Contact>, element: &Contact) -> DetailSession<Contact> {
    let mut session = Detailer::new(config)
        .open_edit(element)
        .expect("edit permitted");
    session.bind_field(
        "name",
        |c: &Contact| c.name.clone(),
        |name: &String| !name.trim().is_empty(),
    );
    session
}
