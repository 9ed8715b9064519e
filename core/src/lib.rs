pub mod config;
pub mod decider;
pub mod eval;
pub mod events;
pub mod host;
pub mod keyword;
pub mod ledger;
pub mod sim;

// Re-exports for convenience
pub use config::{ConfigError, load_default_settings, load_or_create_settings, load_settings, save_settings};
pub use decider::{Decision, should_skip};
pub use events::{EquipRequest, EquipVerdict, EventRouter, HostEvent};
pub use host::{Actor, DebuffRef, FormId, Forms, Host, ObjectDef};
pub use keyword::{KeywordIssue, PolicyKeyword, Severity, lint_tag};
pub use ledger::DebuffLedger;
pub use restrictor_types::{RestrictOn, RestrictParams, RestrictReason, RestrictType, Settings};
