//! Detail session lifecycle tests
//!
//! Save/Delete/Cancel/Dismiss transitions, gating and teardown.

mod common;

use std::rc::Rc;

use common::{contact, edit_session, recording_config, Contact, SharedLog};

use detailer::{
    Cmd, Context, DetailSession, Detailer, FieldKey, Mode, Outcome, SessionConfig, SessionMsg,
    SessionState,
};

fn settled(session: &mut DetailSession<Contact>) {
    session.update(SessionMsg::Settle);
    assert!(session.is_quiescent());
}

// ========================================================================
// Save
// ========================================================================

#[test]
fn test_save_with_invalid_field_alerts_with_count() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("", "a@b.c"));
    settled(&mut session);
    assert_eq!(session.invalid_count(), 1);

    let cmd = session.update(SessionMsg::Save).unwrap();

    let alert = cmd.alert().expect("alert presented");
    assert!(alert.message.contains("1 field(s)"));
    assert_eq!(
        alert.message,
        "1 field(s) require valid values before you can save."
    );
    assert!(log.borrow().saved.is_empty());
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.pending_alert(), Some(alert));
}

#[test]
fn test_element_validation_message_is_the_alert() {
    let (config, log) = recording_config(vec!["Name is required".to_string()]);
    let mut session = Detailer::new(config)
        .open_edit(&contact("Ada", "a@b.c"))
        .unwrap();
    assert!(session.registry().is_satisfied());

    let cmd = session.update(SessionMsg::Save).unwrap();

    assert_eq!(cmd.alert().unwrap().message, "Name is required");
    assert!(log.borrow().saved.is_empty());
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn test_element_validation_takes_precedence_over_field_count() {
    let (config, log) = recording_config(vec!["Email domain not allowed".to_string()]);
    let mut session = edit_session(config, &contact("", "a@b.c"));
    settled(&mut session);
    assert_eq!(session.invalid_count(), 1);

    let cmd = session.update(SessionMsg::Save).unwrap();

    assert_eq!(cmd.alert().unwrap().message, "Email domain not allowed");
    assert!(log.borrow().saved.is_empty());
}

#[test]
fn test_multiple_messages_joined_in_order() {
    let (config, _log) = recording_config(vec!["First".to_string(), "Second".to_string()]);
    let mut session = Detailer::new(config).open_edit(&contact("Ada", "")).unwrap();

    let cmd = session.update(SessionMsg::Save).unwrap();
    assert_eq!(cmd.alert().unwrap().message, "First\n\nSecond");
}

#[test]
fn test_valid_save_invokes_on_save_once_and_closes() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", "a@b.c"));
    settled(&mut session);
    assert!(session.can_save());

    let cmd = session.update(SessionMsg::Save);

    assert_eq!(cmd, Some(Cmd::CloseEpisode(Outcome::Saved)));
    assert_eq!(session.state(), SessionState::Saved);
    assert_eq!(log.borrow().saved.len(), 1);
    assert_eq!(log.borrow().validated, 1);

    // A second save on the closed session is ignored
    assert_eq!(session.update(SessionMsg::Save), None);
    assert_eq!(log.borrow().saved.len(), 1);
}

#[test]
fn test_save_hands_over_edited_copy_without_touching_original() {
    let (config, log) = recording_config(vec![]);
    let original = contact("Ada", "a@b.c");
    let mut session = edit_session(config, &original);

    session.edit(|c| c.email = "ada@lovelace.org".into());
    session.update(SessionMsg::Save);

    assert_eq!(original.email, "a@b.c");
    assert_eq!(log.borrow().saved[0].email, "ada@lovelace.org");
}

#[test]
fn test_save_settles_pending_reports_first() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("", "a@b.c"));
    settled(&mut session);

    // Fix the field and save in the same turn: the pending report is applied
    // before gating
    session.edit(|c| c.name = "Ada".into());
    assert!(!session.is_quiescent());
    let cmd = session.update(SessionMsg::Save);

    assert_eq!(cmd, Some(Cmd::CloseEpisode(Outcome::Saved)));
    assert_eq!(log.borrow().saved.len(), 1);
}

#[test]
fn test_save_refused_without_on_save() {
    let config = SessionConfig::builder(|c: &Contact| c.name.clone()).build();
    let mut session = Detailer::new(config).open_edit(&contact("Ada", "")).unwrap();

    assert!(!session.is_save_available());
    assert!(!session.can_save());
    assert_eq!(session.update(SessionMsg::Save), None);
    assert!(session.pending_alert().is_none());
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn test_alert_can_be_taken_and_editing_continues() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("", ""));
    session.update(SessionMsg::Save);

    assert!(session.take_alert().is_some());
    assert!(session.pending_alert().is_none());

    session.edit(|c| c.name = "Grace".into());
    settled(&mut session);
    assert_eq!(
        session.update(SessionMsg::Save),
        Some(Cmd::CloseEpisode(Outcome::Saved))
    );
    assert_eq!(log.borrow().saved[0].name, "Grace");
}

#[test]
fn test_reports_made_during_validation_gate_the_same_save() {
    let log = SharedLog::default();
    let saved = Rc::clone(&log);
    let config = SessionConfig::builder(|c: &Contact| c.name.clone())
        .on_validate(|ctx: &Context<Contact>, c: &Contact| {
            ctx.report_field_validation("email", c.email.contains('@'));
            Vec::new()
        })
        .on_save(move |_, c: &Contact| saved.borrow_mut().saved.push(c.clone()))
        .build();
    let mut session = Detailer::new(config)
        .open_edit(&contact("Ada", "nope"))
        .unwrap();

    let cmd = session.update(SessionMsg::Save).unwrap();

    assert_eq!(
        cmd.alert().unwrap().message,
        "1 field(s) require valid values before you can save."
    );
    assert!(session.is_quiescent());
    assert!(session.registry().is_invalid(&FieldKey::from("email")));
    assert!(log.borrow().saved.is_empty());

    session.edit(|c| c.email = "ada@example.org".into());
    assert_eq!(
        session.update(SessionMsg::Save),
        Some(Cmd::CloseEpisode(Outcome::Saved))
    );
    assert_eq!(log.borrow().saved.len(), 1);
}

// ========================================================================
// Field reports
// ========================================================================

#[test]
fn test_false_then_true_in_one_turn_is_valid() {
    let (config, _log) = recording_config(vec![]);
    let mut session = Detailer::new(config).open_edit(&contact("Ada", "")).unwrap();
    let ctx = session.context();

    ctx.report_field_validation("name", false);
    ctx.report_field_validation("name", true);
    settled(&mut session);

    assert!(!session.registry().is_invalid(&FieldKey::from("name")));
    assert!(session.can_save());
}

#[test]
fn test_reports_do_not_reach_registry_before_settle() {
    let (config, _log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("", ""));

    assert!(session.registry().is_satisfied());
    assert!(session.indicator_visible(&"name".into()));
    assert!(!session.can_save());

    assert_eq!(session.update(SessionMsg::Settle), Some(Cmd::Redraw));
    assert_eq!(session.invalid_count(), 1);
    // Nothing pending: a second settle changes nothing
    assert_eq!(session.update(SessionMsg::Settle), None);
}

#[test]
fn test_unchanged_field_is_not_reported_again() {
    let (config, _log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));
    settled(&mut session);

    session.edit(|c| c.email = "new@x.y".into());
    assert!(session.is_quiescent());
}

#[test]
fn test_panicking_field_test_blocks_save() {
    let (config, log) = recording_config(vec![]);
    let mut session = Detailer::new(config).open_edit(&contact("Ada", "")).unwrap();
    session.bind_field(
        "email",
        |c: &Contact| c.email.clone(),
        |email: &String| email.split('@').nth(1).expect("domain").contains('.'),
    );
    settled(&mut session);

    assert!(session.indicator_visible(&"email".into()));
    assert_eq!(session.invalid_count(), 1);
    let cmd = session.update(SessionMsg::Save).unwrap();
    assert!(cmd.alert().is_some());
    assert!(log.borrow().saved.is_empty());
}

// ========================================================================
// Delete
// ========================================================================

#[test]
fn test_delete_invokes_on_delete_with_id() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));
    assert!(session.can_delete());

    let cmd = session.update(SessionMsg::Delete);

    assert_eq!(cmd, Some(Cmd::CloseEpisode(Outcome::Deleted)));
    assert_eq!(log.borrow().deleted, vec![42]);
    assert_eq!(session.state(), SessionState::Deleted);
}

#[test]
fn test_delete_refused_when_policy_denies() {
    let (config, log) = recording_config(vec![]);
    let archived = Contact {
        archived: true,
        ..contact("Ada", "")
    };
    let mut session = edit_session(config, &archived);
    assert!(session.is_delete_available());
    assert!(!session.can_delete());

    assert_eq!(session.update(SessionMsg::Delete), None);
    assert!(log.borrow().deleted.is_empty());
    assert!(log.borrow().saved.is_empty());
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn test_delete_refused_without_on_delete() {
    let config = SessionConfig::builder(|c: &Contact| c.name.clone()).build();
    let mut session = Detailer::new(config).open_edit(&contact("Ada", "")).unwrap();

    assert!(!session.is_delete_available());
    assert_eq!(session.update(SessionMsg::Delete), None);
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn test_delete_policy_follows_working_copy() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));

    session.edit(|c| c.archived = true);
    assert!(!session.can_delete());
    assert_eq!(session.update(SessionMsg::Delete), None);
    assert!(log.borrow().deleted.is_empty());
}

// ========================================================================
// Cancel / Dismiss
// ========================================================================

#[test]
fn test_cancel_never_saves_or_deletes() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));
    session.edit(|c| c.name = "Changed".into());

    let cmd = session.update(SessionMsg::Cancel);

    assert_eq!(cmd, Some(Cmd::CloseEpisode(Outcome::Cancelled)));
    let log = log.borrow();
    assert!(log.saved.is_empty());
    assert!(log.deleted.is_empty());
    assert_eq!(log.cancelled.len(), 1);
    assert_eq!(log.cancelled[0].name, "Changed");
}

#[test]
fn test_cancel_with_invalid_fields_still_closes() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("", ""));
    settled(&mut session);

    assert_eq!(
        session.update(SessionMsg::Cancel),
        Some(Cmd::CloseEpisode(Outcome::Cancelled))
    );
    assert!(log.borrow().saved.is_empty());
    assert_eq!(session.invalid_count(), 0);
}

#[test]
fn test_dismissed_add_is_cancelled() {
    let (config, log) = recording_config(vec![]);
    let detailer = Detailer::new(config);
    let mut session = detailer.open_add(contact("New", "n@e.w"));
    assert!(session.is_add());
    assert!(session.context().original_id().is_none());

    let cmd = session.update(SessionMsg::Dismiss);

    assert_eq!(cmd, Some(Cmd::CloseEpisode(Outcome::Cancelled)));
    assert_eq!(session.state(), SessionState::Cancelled);
    let log = log.borrow();
    assert!(log.saved.is_empty());
    assert_eq!(log.cancelled.len(), 1);
}

#[test]
fn test_dismissed_edit_closes_without_callbacks() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));

    assert_eq!(
        session.update(SessionMsg::Dismiss),
        Some(Cmd::CloseEpisode(Outcome::Cancelled))
    );
    let log = log.borrow();
    assert!(log.saved.is_empty());
    assert!(log.cancelled.is_empty());
    assert!(log.deleted.is_empty());
}

// ========================================================================
// Teardown
// ========================================================================

#[test]
fn test_events_after_close_are_ignored() {
    let (config, log) = recording_config(vec![]);
    let mut session = edit_session(config, &contact("Ada", ""));
    let ctx = session.context();
    session.update(SessionMsg::Cancel);

    for msg in [
        SessionMsg::Save,
        SessionMsg::Delete,
        SessionMsg::Cancel,
        SessionMsg::Dismiss,
        SessionMsg::Settle,
        SessionMsg::FieldsChanged,
    ] {
        assert_eq!(session.update(msg), None, "{:?} after close", msg);
    }
    assert!(!ctx.report_field_validation("name", false));
    assert_eq!(session.edit(|c| c.name.clear()), None);

    let log = log.borrow();
    assert!(log.saved.is_empty());
    assert_eq!(log.cancelled.len(), 1);
    assert!(!session.can_save());
    assert!(!session.can_delete());
}

#[test]
fn test_context_describes_episode() {
    let (config, _log) = recording_config(vec![]);
    let config = Rc::new(config);
    let detailer = Detailer::from_shared(Rc::clone(&config));

    let edit = detailer.open_edit(&contact("Ada", "")).unwrap();
    let ctx = edit.context();
    assert_eq!(ctx.mode(), Mode::Edit);
    assert!(!ctx.is_add());
    assert_eq!(ctx.original_id(), Some(&42));
    assert_eq!(ctx.config().title(&contact("X", "")), "X");

    let add = detailer.open_add(contact("New", ""));
    assert!(add.context().is_add());
    assert_eq!(edit.title(), "Ada");
    assert_eq!(add.title(), "New");
}
