//! Restriction decisions over every policy keyword on an object.

use restrictor_types::{RestrictOn, RestrictParams, RestrictType};
use serde::Serialize;

use crate::eval::{QueryContext, any_branch_matches};
use crate::host::{Actor, DebuffRef, Forms, ObjectDef};
use crate::keyword::PolicyKeyword;

/// Outcome of a restriction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Decision {
    /// The action is restricted (block it, or penalize it in debuff mode)
    pub skip: bool,
    /// Debuff named by the rule that restricted, if it has one
    pub debuff: Option<DebuffRef>,
}

impl Decision {
    pub fn allow() -> Self {
        Self::default()
    }
}

/// Decide whether `actor` is restricted from using `object`.
///
/// Keywords are scanned in record order and the first restricting rule
/// wins. Actors without a resolvable base are never restricted.
pub fn should_skip(
    actor: &dyn Actor,
    forms: &dyn Forms,
    object: &ObjectDef,
    params: &mut RestrictParams,
) -> Decision {
    let Some(ctx) = QueryContext::new(actor, forms, object) else {
        tracing::debug!(actor = %actor.id(), "Actor base unresolved, not restricting");
        return Decision::allow();
    };

    for raw in &object.keywords {
        let Some(keyword) = PolicyKeyword::parse(raw) else {
            continue;
        };
        if keyword.on != params.on {
            continue;
        }
        if let Some(decision) = evaluate_keyword(&ctx, &keyword, params) {
            tracing::debug!(
                actor = %actor.id(),
                object = %object.editor_id,
                keyword = keyword.as_str(),
                reason = ?params.reason,
                "Restricted"
            );
            return decision;
        }
    }

    Decision::allow()
}

/// `Some` when this keyword restricts the actor.
fn evaluate_keyword(
    ctx: &QueryContext<'_>,
    keyword: &PolicyKeyword<'_>,
    params: &mut RestrictParams,
) -> Option<Decision> {
    // Debuff rules only apply after an equip completes, never as a hard block for the player
    if params.on == RestrictOn::Equip
        && params.kind == RestrictType::Restrict
        && keyword.has_debuff_segment()
        && ctx.is_player()
    {
        return None;
    }

    let branches = keyword.branches();
    if any_branch_matches(ctx, &branches, params) {
        return None;
    }

    let debuff = keyword
        .debuff()
        .and_then(|name| resolve_debuff(ctx.forms, keyword.as_str(), name));

    Some(Decision { skip: true, debuff })
}

fn resolve_debuff(forms: &dyn Forms, keyword: &str, name: &str) -> Option<DebuffRef> {
    let Some(form) = forms.lookup(name) else {
        tracing::warn!(keyword, debuff = name, "Debuff form not found");
        return None;
    };
    let debuff = DebuffRef::from_form(form);
    if debuff.is_none() {
        tracing::warn!(keyword, debuff = name, kind = ?form.kind, "Debuff form is not a perk or spell");
    }
    debuff
}
