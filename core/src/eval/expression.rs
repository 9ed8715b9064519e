//! Single term evaluation.

use restrictor_types::{RestrictParams, RestrictReason};
use thiserror::Error;

use crate::host::{ActorValue, FormId, FormKind, FormRef};
use crate::keyword::{Arg, Predicate, Term, TermBody};

use super::QueryContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("global `{0}` does not exist")]
    MissingGlobal(String),

    #[error("`{0}` is neither a faction nor an actor value")]
    UnknownThreshold(String),

    #[error("actor value index `{0}` is out of range")]
    ActorValueIndex(String),
}

/// Left-hand side of a `name(arg)` threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    FactionRank(FormId),
    Value(ActorValue),
}

/// Category of a bare identifier after lookup. Anything that is not one of
/// the actor-state categories is checked as a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Faction(FormId),
    Perk(FormId),
    Race(FormId),
    Spell(FormId),
    MagicEffect(FormId),
    Keyword,
}

impl Resolved {
    fn classify(form: Option<FormRef>) -> Self {
        let Some(form) = form else {
            return Self::Keyword;
        };
        match form.kind {
            FormKind::Faction => Self::Faction(form.id),
            FormKind::Perk => Self::Perk(form.id),
            FormKind::Race => Self::Race(form.id),
            FormKind::Spell => Self::Spell(form.id),
            FormKind::MagicEffect => Self::MagicEffect(form.id),
            FormKind::Global | FormKind::Keyword | FormKind::Other => Self::Keyword,
        }
    }
}

/// Evaluate one filter term.
///
/// A `Level(..)` term that ends up false records `RestrictReason::Level`,
/// a `name(..)` term records `RestrictReason::Skill`, including when the
/// name is not a faction or actor value. The reason reflects the final
/// (post-inversion) outcome and is overwritten by later terms.
pub fn evaluate_term(ctx: &QueryContext<'_>, raw: &str, params: &mut RestrictParams) -> bool {
    let term = Term::parse(raw);

    match term.body {
        TermBody::Predicate(predicate) => predicate_matches(ctx, predicate) != term.invert,
        TermBody::Level(arg) => match level_matches(ctx, arg) {
            Ok(matched) => {
                let result = matched != term.invert;
                if !result {
                    params.reason = RestrictReason::Level;
                }
                result
            }
            Err(e) => {
                tracing::warn!(term = raw, error = %e, "Unresolvable level filter");
                false
            }
        },
        TermBody::Threshold { name, arg } => match threshold_matches(ctx, name, arg) {
            Ok(matched) => {
                let result = matched != term.invert;
                if !result {
                    params.reason = RestrictReason::Skill;
                }
                result
            }
            Err(e) => {
                tracing::warn!(term = raw, error = %e, "Unresolvable threshold filter");
                // An unknown name still reads as a skill failure, a missing global does not
                if !matches!(e, ResolveError::MissingGlobal(_)) {
                    params.reason = RestrictReason::Skill;
                }
                false
            }
        },
        TermBody::Malformed => {
            tracing::warn!(term = raw, "Malformed filter argument");
            false
        }
        TermBody::Identifier(name) => identifier_matches(ctx, name) != term.invert,
    }
}

fn predicate_matches(ctx: &QueryContext<'_>, predicate: Predicate) -> bool {
    use crate::host::Sex;

    match predicate {
        Predicate::Male => ctx.base.sex == Sex::Male,
        Predicate::Female => ctx.base.sex == Sex::Female,
        Predicate::Player => ctx.is_player,
        Predicate::Npc => !ctx.is_player,
        // Holds while the actor is out of combat
        Predicate::Combat => !ctx.in_combat,
    }
}

fn resolve_arg(ctx: &QueryContext<'_>, arg: Arg<'_>) -> Result<f32, ResolveError> {
    match arg {
        Arg::Literal(value) => Ok(value),
        Arg::Global(name) => ctx
            .forms
            .global_value(name)
            .ok_or_else(|| ResolveError::MissingGlobal(name.to_string())),
    }
}

fn level_matches(ctx: &QueryContext<'_>, arg: Arg<'_>) -> Result<bool, ResolveError> {
    // Levels are whole numbers, a fractional global is truncated
    let required = resolve_arg(ctx, arg)?.trunc();
    Ok(f32::from(ctx.base.level) >= required)
}

fn resolve_subject(ctx: &QueryContext<'_>, name: &str) -> Result<Subject, ResolveError> {
    if crate::keyword::is_only_digits(name) {
        return name
            .parse()
            .map(|index| Subject::Value(ActorValue(index)))
            .map_err(|_| ResolveError::ActorValueIndex(name.to_string()));
    }
    if let Some(form) = ctx.forms.lookup(name)
        && form.kind == FormKind::Faction
    {
        return Ok(Subject::FactionRank(form.id));
    }
    ActorValue::from_name(name)
        .map(Subject::Value)
        .ok_or_else(|| ResolveError::UnknownThreshold(name.to_string()))
}

fn threshold_matches(ctx: &QueryContext<'_>, name: &str, arg: Arg<'_>) -> Result<bool, ResolveError> {
    let subject = resolve_subject(ctx, name)?;
    let required = resolve_arg(ctx, arg)?;

    Ok(match subject {
        // Non-members never pass a rank check
        Subject::FactionRank(faction) => ctx
            .actor
            .faction_rank(faction)
            .is_some_and(|rank| rank as f32 >= required),
        Subject::Value(value) => ctx.actor.actor_value(value) >= required,
    })
}

fn identifier_matches(ctx: &QueryContext<'_>, name: &str) -> bool {
    match Resolved::classify(ctx.forms.lookup(name)) {
        Resolved::Faction(faction) => ctx.actor.faction_rank(faction).is_some(),
        Resolved::Perk(perk) => ctx.actor.has_perk(perk),
        Resolved::Race(race) => ctx.actor.race() == Some(race),
        Resolved::Spell(spell) => ctx.actor.has_spell(spell),
        Resolved::MagicEffect(effect) => ctx.actor.has_magic_effect(effect),
        Resolved::Keyword => keyword_matches(ctx, name),
    }
}

/// Keyword possession on the actor, or on what the actor is using.
///
/// For ammo only the hand holding a bow/crossbow counts, and without any
/// launcher equipped the check passes. Everything else looks at worn
/// inventory.
fn keyword_matches(ctx: &QueryContext<'_>, keyword: &str) -> bool {
    if ctx.actor.has_keyword(keyword) {
        return true;
    }

    if ctx.object.is_ammo() {
        return match (ctx.left_launcher, ctx.right_launcher) {
            (None, None) => true,
            (left, right) => {
                right.is_some_and(|weapon| weapon.has_keyword(keyword))
                    || left.is_some_and(|weapon| weapon.has_keyword(keyword))
            }
        };
    }

    ctx.inventory()
        .iter()
        .any(|entry| entry.worn && entry.count > 0 && entry.object.has_keyword(keyword))
}
