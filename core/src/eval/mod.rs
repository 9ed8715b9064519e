//! Filter evaluation
//!
//! - **Context**: actor state read once per decision
//! - **Expression**: one term against the context
//! - **Filter set**: OR over branches, AND within a branch, short-circuiting
//!
//! A term that cannot be resolved (missing global, unknown actor value)
//! evaluates to "does not match" and is logged. Nothing here returns an
//! error to the caller.

mod context;
mod expression;
mod filter_set;


pub use context::QueryContext;
pub use expression::{ResolveError, evaluate_term};
pub use filter_set::any_branch_matches;
