//! Policy keyword grammar
//!
//! A policy keyword is a keyword editor ID of the form
//!
//! ```text
//! RestrictEquip:<filters>[:<debuff>]
//! RestrictCast:<filters>
//!
//! filters := branch (',' branch)*      any branch may match (OR)
//! branch  := term ('+' term)*          every term must match (AND)
//! term    := ['!'] body
//! body    := Male | Female | Player | NPC | Combat
//!          | Level '(' arg ')'
//!          | name '(' arg ')'          actor value, or faction rank
//!          | identifier               faction/perk/race/spell/effect/keyword
//! ```
//!
//! Keywords are re-parsed on every evaluation; nothing is cached.

mod lint;
mod term;

pub use lint::{KeywordIssue, Severity, lint_tag};
pub use term::{Arg, Predicate, Term, TermBody};
pub(crate) use term::is_only_digits;

use restrictor_types::RestrictOn;

const SEGMENT_SEPARATOR: char = ':';
const BRANCH_SEPARATOR: char = ',';
const TERM_SEPARATOR: char = '+';

/// A keyword classified as a restriction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyKeyword<'a> {
    pub on: RestrictOn,
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> PolicyKeyword<'a> {
    /// Classify a keyword editor ID. Returns `None` for keywords that are
    /// not restriction rules.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let on = [RestrictOn::Equip, RestrictOn::Cast]
            .into_iter()
            .find(|on| raw.starts_with(on.prefix()))?;

        Some(Self {
            on,
            raw,
            segments: raw.split(SEGMENT_SEPARATOR).collect(),
        })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Raw filter segment (may be empty).
    pub fn filters(&self) -> &'a str {
        self.segments.get(1).copied().unwrap_or_default()
    }

    /// True when a third segment is present, even if it is empty.
    pub fn has_debuff_segment(&self) -> bool {
        self.segments.len() > 2
    }

    /// Debuff editor ID from the third segment.
    pub fn debuff(&self) -> Option<&'a str> {
        self.segments.get(2).copied().filter(|s| !s.is_empty())
    }

    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// OR-branches of AND-terms, in source order.
    ///
    /// An empty filter segment yields no branches at all, which means no
    /// branch can ever match and the rule restricts everyone.
    pub fn branches(&self) -> Vec<Vec<&'a str>> {
        let filters = self.filters();
        if filters.is_empty() {
            return Vec::new();
        }
        filters
            .split(BRANCH_SEPARATOR)
            .map(|branch| branch.split(TERM_SEPARATOR).collect())
            .collect()
    }
}
