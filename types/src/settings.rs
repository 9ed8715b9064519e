//! User-facing settings.
//!
//! Loaded from TOML by the core crate. Every field has a default so a
//! partial file (or none at all) is valid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::notification::render_template;
use crate::restrict::{RestrictOn, RestrictParams, RestrictReason, RestrictType};

/// Message templates for one action kind, keyed by the failure reason.
/// Unset entries use the built-in text for that action kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTemplates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
}

impl NotificationTemplates {
    /// Every reason filled in with the built-in text.
    pub fn builtin(on: RestrictOn, kind: RestrictType) -> Self {
        let text = |reason| Some(default_template(on, kind, reason).to_string());
        Self {
            generic: text(RestrictReason::Generic),
            level: text(RestrictReason::Level),
            skill: text(RestrictReason::Skill),
        }
    }

    pub fn for_reason(&self, reason: RestrictReason) -> Option<&str> {
        match reason {
            RestrictReason::Generic => self.generic.as_deref(),
            RestrictReason::Level => self.level.as_deref(),
            RestrictReason::Skill => self.skill.as_deref(),
        }
    }
}

/// Built-in message for a decision context.
pub fn default_template(on: RestrictOn, kind: RestrictType, reason: RestrictReason) -> &'static str {
    use RestrictReason::{Generic, Level, Skill};

    match (on, kind, reason) {
        (RestrictOn::Equip, RestrictType::Restrict, Generic) => "You cannot equip {item}.",
        (RestrictOn::Equip, RestrictType::Restrict, Level) => "You are not experienced enough to equip {item}.",
        (RestrictOn::Equip, RestrictType::Restrict, Skill) => "You are not skilled enough to equip {item}.",
        (RestrictOn::Equip, RestrictType::Debuff, Generic) => "You feel uncomfortable wearing {item}.",
        (RestrictOn::Equip, RestrictType::Debuff, Level) => "You are not experienced enough to use {item} properly.",
        (RestrictOn::Equip, RestrictType::Debuff, Skill) => "You are not skilled enough to use {item} properly.",
        (RestrictOn::Cast, _, Generic) => "You cannot cast {item}.",
        (RestrictOn::Cast, _, Level) => "You are not experienced enough to cast {item}.",
        (RestrictOn::Cast, _, Skill) => "You are not skilled enough to cast {item}.",
    }
}

fn default_true() -> bool {
    true
}

/// Root settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Master switch for restriction messages
    #[serde(default = "default_true")]
    pub show_notifications: bool,

    #[serde(default)]
    pub equip: NotificationTemplates,

    #[serde(default)]
    pub debuff: NotificationTemplates,

    #[serde(default)]
    pub cast: NotificationTemplates,

    /// Per-object templates keyed by editor ID. Override every reason.
    /// An empty override silences the object.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_notifications: true,
            equip: NotificationTemplates::default(),
            debuff: NotificationTemplates::default(),
            cast: NotificationTemplates::default(),
            overrides: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults with every template written out, for generating a starter file.
    pub fn with_builtin_templates() -> Self {
        Self {
            equip: NotificationTemplates::builtin(RestrictOn::Equip, RestrictType::Restrict),
            debuff: NotificationTemplates::builtin(RestrictOn::Equip, RestrictType::Debuff),
            cast: NotificationTemplates::builtin(RestrictOn::Cast, RestrictType::Restrict),
            ..Self::default()
        }
    }

    /// Configured templates for a decision context.
    pub fn templates(&self, on: RestrictOn, kind: RestrictType) -> &NotificationTemplates {
        match (on, kind) {
            (RestrictOn::Cast, _) => &self.cast,
            (RestrictOn::Equip, RestrictType::Restrict) => &self.equip,
            (RestrictOn::Equip, RestrictType::Debuff) => &self.debuff,
        }
    }

    /// Template text for a decision context, configured or built-in.
    pub fn template(&self, params: &RestrictParams) -> &str {
        self.templates(params.on, params.kind)
            .for_reason(params.reason)
            .unwrap_or_else(|| default_template(params.on, params.kind, params.reason))
    }

    /// Notification for a restricted object. Empty string means "say nothing".
    pub fn notification(&self, editor_id: &str, item_name: &str, params: &RestrictParams) -> String {
        if !self.show_notifications {
            return String::new();
        }
        let template = match self.overrides.get(editor_id) {
            Some(custom) => custom.as_str(),
            None => self.template(params),
        };
        render_template(template, item_name)
    }
}
