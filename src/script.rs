//! Episode scripts
//!
//! A script describes one detail episode against a generic [`Record`]: the
//! capabilities the host grants, whole-record and per-field rules, the
//! starting record and the sequence of host events. [`run`] replays it
//! through a real [`DetailSession`] and records every emitted command and
//! host callback.
//!
//! ```yaml
//! mode: edit
//! title_field: name
//! record: { id: 1, fields: { name: "", age: "41" } }
//! capabilities: { save: true, delete: true }
//! require: [name]
//! rules:
//!   age: [integer, { max_len: 3 }]
//! steps:
//!   - set: { field: name, value: Ada }
//!   - settle
//!   - save
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::{Cmd, Outcome};
use crate::config::Presentation;
use crate::context::Mode;
use crate::element::Element;
use crate::host::Detailer;
use crate::messages::SessionMsg;
use crate::session::DetailSession;
use crate::session_config::SessionConfig;

/// Errors loading or replaying a script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown field '{field}' (record has: {known})")]
    UnknownField { field: String, known: String },

    #[error("record {id} cannot be opened for editing")]
    EditRefused { id: u64 },
}

/// A generic record: stable numeric id plus named string fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Title from a field, falling back to the id
    pub fn title(&self, field: Option<&str>) -> String {
        field
            .and_then(|f| self.get(f))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Record {}", self.id))
    }
}

impl Element for Record {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Built-in field checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    NonEmpty,
    Integer,
    MaxLen(usize),
}

impl Rule {
    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::NonEmpty => !value.trim().is_empty(),
            Rule::Integer => value.trim().parse::<i64>().is_ok(),
            Rule::MaxLen(max) => value.chars().count() <= *max,
        }
    }
}

/// Capabilities the host grants
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub save: bool,
    #[serde(default)]
    pub delete: bool,
    /// `can_delete` policy result
    #[serde(default = "yes")]
    pub deletable: bool,
    /// `can_edit` policy result
    #[serde(default = "yes")]
    pub editable: bool,
}

fn yes() -> bool {
    true
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            save: false,
            delete: false,
            deletable: true,
            editable: true,
        }
    }
}

/// One host event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Set { field: String, value: String },
    Settle,
    Save,
    Delete,
    Cancel,
    Dismiss,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Set { field, value } => write!(f, "set {} = {:?}", field, value),
            Step::Settle => write!(f, "settle"),
            Step::Save => write!(f, "save"),
            Step::Delete => write!(f, "delete"),
            Step::Cancel => write!(f, "cancel"),
            Step::Dismiss => write!(f, "dismiss"),
        }
    }
}

/// A complete episode description
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    pub record: Record,
    #[serde(default)]
    pub title_field: Option<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Fields that whole-record validation requires to be non-blank
    #[serde(default)]
    pub require: Vec<String>,
    /// Rules and steps use the single-key map form (`- set: {..}`,
    /// `{ max_len: 3 }`) rather than YAML tags
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub rules: BTreeMap<String, Vec<Rule>>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

fn default_mode() -> Mode {
    Mode::Edit
}

impl Script {
    pub fn from_yaml(source: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    fn check_field(&self, field: &str) -> Result<(), ScriptError> {
        if self.record.fields.contains_key(field) {
            Ok(())
        } else {
            Err(ScriptError::UnknownField {
                field: field.to_string(),
                known: self
                    .record
                    .fields
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }
}

/// State after one step
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub step: String,
    /// Emitted commands; empty means the event was refused or ignored
    pub commands: Vec<String>,
    pub state: String,
    pub invalid_fields: usize,
    pub can_save: bool,
    pub can_delete: bool,
}

/// Full record of a replayed episode
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Title of the working copy after the last step
    pub title: String,
    pub mode: Mode,
    pub entries: Vec<Entry>,
    /// Host callbacks in invocation order
    pub host_calls: Vec<String>,
    pub outcome: Option<Outcome>,
    pub working_copy: Record,
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "episode: {} ({:?})", self.title, self.mode)?;
        for entry in &self.entries {
            let commands = if entry.commands.is_empty() {
                "-".to_string()
            } else {
                entry.commands.join(", ")
            };
            writeln!(
                f,
                "  {:<24} {:<40} [{} invalid={} save={} delete={}]",
                entry.step,
                commands,
                entry.state,
                entry.invalid_fields,
                entry.can_save,
                entry.can_delete
            )?;
        }
        for call in &self.host_calls {
            writeln!(f, "  host: {}", call)?;
        }
        match self.outcome {
            Some(outcome) => writeln!(f, "outcome: {}", outcome),
            None => writeln!(f, "outcome: still editing"),
        }
    }
}

fn describe(cmd: &Cmd, out: &mut Vec<String>) {
    match cmd {
        Cmd::Redraw => out.push("redraw".to_string()),
        Cmd::PresentAlert(alert) => {
            out.push(format!("alert: {}", alert.message.replace("\n\n", " | ")))
        }
        Cmd::CloseEpisode(outcome) => out.push(format!("close: {}", outcome)),
    }
}

fn entry(step: String, cmd: Option<Cmd>, session: &DetailSession<Record>) -> Entry {
    let mut commands = Vec::new();
    if let Some(cmd) = &cmd {
        describe(cmd, &mut commands);
    }
    Entry {
        step,
        commands,
        state: format!("{:?}", session.state()),
        invalid_fields: session.invalid_count(),
        can_save: session.can_save(),
        can_delete: session.can_delete(),
    }
}

fn build_config(
    script: &Script,
    presentation: Presentation,
    log: &Rc<RefCell<Vec<String>>>,
) -> SessionConfig<Record> {
    let editable = script.capabilities.editable;
    let deletable = script.capabilities.deletable;
    let title_field = script.title_field.clone();
    let require = script.require.clone();

    let mut builder = SessionConfig::builder(move |r: &Record| r.title(title_field.as_deref()))
        .presentation(presentation)
        .can_edit(move |_| editable)
        .can_delete(move |_| deletable)
        .on_validate(move |_, r: &Record| {
            require
                .iter()
                .filter(|f| r.get(f).map_or(true, |v| v.trim().is_empty()))
                .map(|f| format!("{} is required", f))
                .collect()
        })
        .on_cancel({
            let log = Rc::clone(log);
            move |ctx, r: &Record| {
                log.borrow_mut()
                    .push(format!("on_cancel(id={}, add={})", r.id, ctx.is_add()))
            }
        });

    if script.capabilities.save {
        let log = Rc::clone(log);
        builder = builder.on_save(move |ctx, r: &Record| {
            log.borrow_mut()
                .push(format!("on_save(id={}, add={})", r.id, ctx.is_add()))
        });
    }
    if script.capabilities.delete {
        let log = Rc::clone(log);
        builder = builder.on_delete(move |id: &u64| {
            log.borrow_mut().push(format!("on_delete({})", id))
        });
    }
    builder.build()
}

/// Replay a script and collect the transcript
pub fn run(script: &Script, presentation: Presentation) -> Result<Transcript, ScriptError> {
    for field in script.rules.keys() {
        script.check_field(field)?;
    }
    for step in &script.steps {
        if let Step::Set { field, .. } = step {
            script.check_field(field)?;
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let detailer = Detailer::new(build_config(script, presentation, &log));

    let mut session = match script.mode {
        Mode::Add => detailer.open_add(script.record.clone()),
        Mode::Edit => detailer
            .open_edit(&script.record)
            .ok_or(ScriptError::EditRefused {
                id: script.record.id,
            })?,
    };

    for (field, rules) in &script.rules {
        let name = field.clone();
        let rules = rules.clone();
        session.bind_field(
            field.clone(),
            move |r: &Record| r.get(&name).unwrap_or_default().to_string(),
            move |v: &String| rules.iter().all(|rule| rule.check(v)),
        );
    }

    let mut entries = vec![entry("open".to_string(), None, &session)];
    let mut outcome = None;

    for step in &script.steps {
        let cmd = match step {
            Step::Set { field, value } => session
                .edit(|r| {
                    r.fields.insert(field.clone(), value.clone());
                })
                .map(|_| Cmd::Redraw),
            Step::Settle => session.update(SessionMsg::Settle),
            Step::Save => session.update(SessionMsg::Save),
            Step::Delete => session.update(SessionMsg::Delete),
            Step::Cancel => session.update(SessionMsg::Cancel),
            Step::Dismiss => session.update(SessionMsg::Dismiss),
        };
        if let Some(closed) = cmd.as_ref().and_then(Cmd::outcome) {
            outcome = Some(closed);
        }
        // The host shows the alert and the user acknowledges it
        session.take_alert();
        entries.push(entry(step.to_string(), cmd, &session));
    }

    let title = session.title();
    let host_calls = log.borrow().clone();
    Ok(Transcript {
        title,
        mode: script.mode,
        entries,
        host_calls,
        outcome,
        working_copy: session.into_working_copy(),
    })
}
