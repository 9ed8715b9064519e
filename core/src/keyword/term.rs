//! Single filter term scanner.

/// Fixed predicates compared against precomputed actor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Male,
    Female,
    Player,
    Npc,
    Combat,
}

impl Predicate {
    /// Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Player" => Some(Self::Player),
            "NPC" => Some(Self::Npc),
            "Combat" => Some(Self::Combat),
            _ => None,
        }
    }
}

/// Threshold argument: a digit-only literal, or the name of a global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Literal(f32),
    Global(&'a str),
}

impl<'a> Arg<'a> {
    pub fn parse(text: &'a str) -> Self {
        if is_only_digits(text) {
            Self::Literal(text.parse().unwrap_or(f32::INFINITY))
        } else {
            Self::Global(text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermBody<'a> {
    Predicate(Predicate),
    /// `Level(arg)`
    Level(Arg<'a>),
    /// `name(arg)`; `name` is an actor value (index or name) or a faction
    Threshold { name: &'a str, arg: Arg<'a> },
    /// Parenthesized form whose argument could not be scanned
    Malformed,
    /// Bare identifier resolved against named definitions
    Identifier(&'a str),
}

/// One AND-term of a filter branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term<'a> {
    pub invert: bool,
    /// Term text with the inversion marker removed
    pub text: &'a str,
    pub body: TermBody<'a>,
}

impl<'a> Term<'a> {
    /// Only a single leading `!` is an inversion. `!!Male` is the inverted
    /// identifier `!Male`, not `Male`.
    pub fn parse(raw: &'a str) -> Self {
        let (invert, text) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let body = if let Some(predicate) = Predicate::from_name(text) {
            TermBody::Predicate(predicate)
        } else if text.starts_with("Level(") {
            match scan_call(text) {
                Some(call) => TermBody::Level(Arg::parse(call.arg)),
                None => TermBody::Malformed,
            }
        } else if text.contains('(') {
            match scan_call(text) {
                Some(call) => TermBody::Threshold {
                    name: call.name,
                    arg: Arg::parse(call.arg),
                },
                None => TermBody::Malformed,
            }
        } else {
            TermBody::Identifier(text)
        };

        Self { invert, text, body }
    }
}

/// `name(arg)rest`, split at the first `(` and the next `)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Call<'a> {
    pub name: &'a str,
    pub arg: &'a str,
    pub rest: &'a str,
}

pub(crate) fn scan_call(text: &str) -> Option<Call<'_>> {
    let open = text.find('(')?;
    let after = &text[open + 1..];
    let close = after.find(')')?;
    let arg = &after[..close];
    if arg.is_empty() {
        return None;
    }
    Some(Call {
        name: &text[..open],
        arg,
        rest: &after[close + 1..],
    })
}

pub(crate) fn is_only_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
