//! Authoring-time checks for policy keywords.
//!
//! Linting never changes how a keyword evaluates. It only reports the
//! sharp edges that make a rule behave differently from how it reads.

use thiserror::Error;

use super::PolicyKeyword;
use super::term::{Term, TermBody, scan_call};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordIssue {
    #[error("restriction prefix without ':' separator, keyword is ignored")]
    MissingSeparator,

    #[error("empty filter segment, rule restricts every actor")]
    EmptyFilters,

    #[error("branch {branch} term {term} is empty")]
    EmptyTerm { branch: usize, term: usize },

    #[error("`{term}`: only the first '!' inverts, the rest is read as an identifier")]
    DoubleNegation { term: String },

    #[error("`{term}`: unclosed or empty argument, term never matches")]
    MalformedArgument { term: String },

    #[error("`{term}`: text after ')' is ignored: `{rest}`")]
    TrailingText { term: String, rest: String },

    #[error("`{term}`: threshold has no name")]
    EmptyName { term: String },

    #[error("{count} ':' segments, only the first three are read")]
    ExtraSegments { count: usize },

    #[error("empty debuff segment")]
    EmptyDebuff,

    #[error("debuff segment on a cast rule is never applied")]
    DebuffOnCast,
}

impl KeywordIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingSeparator
            | Self::EmptyFilters
            | Self::EmptyTerm { .. }
            | Self::MalformedArgument { .. }
            | Self::EmptyName { .. } => Severity::Error,
            Self::DoubleNegation { .. }
            | Self::TrailingText { .. }
            | Self::ExtraSegments { .. }
            | Self::EmptyDebuff
            | Self::DebuffOnCast => Severity::Warning,
        }
    }
}

/// Lint any keyword editor ID. Keywords unrelated to restrictions produce
/// no issues.
pub fn lint_tag(raw: &str) -> Vec<KeywordIssue> {
    match PolicyKeyword::parse(raw) {
        Some(keyword) => keyword.lint(),
        None if raw.starts_with("RestrictEquip") || raw.starts_with("RestrictCast") => {
            vec![KeywordIssue::MissingSeparator]
        }
        None => Vec::new(),
    }
}

impl PolicyKeyword<'_> {
    pub fn lint(&self) -> Vec<KeywordIssue> {
        let mut issues = Vec::new();

        let segments = self.segment_count();
        if segments > 3 {
            issues.push(KeywordIssue::ExtraSegments { count: segments });
        }
        if self.has_debuff_segment() {
            if self.debuff().is_none() {
                issues.push(KeywordIssue::EmptyDebuff);
            } else if self.on == restrictor_types::RestrictOn::Cast {
                issues.push(KeywordIssue::DebuffOnCast);
            }
        }

        let branches = self.branches();
        if branches.is_empty() {
            issues.push(KeywordIssue::EmptyFilters);
        }

        for (b, branch) in branches.iter().enumerate() {
            for (t, raw) in branch.iter().enumerate() {
                if raw.is_empty() {
                    issues.push(KeywordIssue::EmptyTerm { branch: b, term: t });
                    continue;
                }
                lint_term(raw, &mut issues);
            }
        }

        issues
    }
}

fn lint_term(raw: &str, issues: &mut Vec<KeywordIssue>) {
    let term = Term::parse(raw);
    if term.text.starts_with('!') {
        issues.push(KeywordIssue::DoubleNegation {
            term: raw.to_string(),
        });
    }

    match term.body {
        TermBody::Malformed => issues.push(KeywordIssue::MalformedArgument {
            term: raw.to_string(),
        }),
        TermBody::Level(_) | TermBody::Threshold { .. } => {
            if let Some(call) = scan_call(term.text) {
                if call.name.is_empty() {
                    issues.push(KeywordIssue::EmptyName {
                        term: raw.to_string(),
                    });
                }
                if !call.rest.is_empty() {
                    issues.push(KeywordIssue::TrailingText {
                        term: raw.to_string(),
                        rest: call.rest.to_string(),
                    });
                }
            }
        }
        TermBody::Predicate(_) | TermBody::Identifier(_) => {}
    }
}
