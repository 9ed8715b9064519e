//! Shared configuration types for the restrictor engine.
//!
//! Used by the core crate and by tooling such as the validate CLI.

pub mod notification;
pub mod restrict;
pub mod settings;

pub use notification::render_template;
pub use restrict::{RestrictOn, RestrictParams, RestrictReason, RestrictType};
pub use settings::{NotificationTemplates, Settings, default_template};
