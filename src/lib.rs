//! Detailer - detail-session engine for master/detail editing
//!
//! Given one element drawn from a collection, a [`DetailSession`] manages an
//! isolated working copy, aggregates per-field validation reported by
//! independently rendered field widgets, and gates Save/Delete/Cancel on the
//! aggregated state. The host supplies capabilities and callbacks through a
//! [`SessionConfig`] and renders whatever the session exposes.
//!
//! The session follows the Elm architecture: host events arrive as
//! [`SessionMsg`], [`DetailSession::update`] applies them, and effects come
//! back as [`Cmd`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod context;
pub mod element;
pub mod field;
pub mod host;
pub mod menu;
pub mod messages;
pub mod registry;
pub mod scheduler;
pub mod script;
pub mod session;
pub mod session_config;
pub mod source;
pub mod tracing;
pub mod validator;

// Re-export commonly used types
pub use commands::{Alert, Cmd, Outcome};
pub use context::{Context, Mode};
pub use element::Element;
pub use field::FieldKey;
pub use host::{Detailer, ViewSession};
pub use messages::SessionMsg;
pub use registry::ValidationRegistry;
pub use session::{DetailSession, SessionState};
pub use session_config::SessionConfig;
pub use source::{Copied, Shared, WorkingCopy};
pub use validator::FieldValidator;
