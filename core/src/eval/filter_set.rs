use restrictor_types::RestrictParams;

use super::{QueryContext, evaluate_term};

/// True when at least one branch has all of its terms matching.
///
/// Stops at the first false term of a branch and at the first matching
/// branch, so later terms never get to overwrite `params.reason`.
pub fn any_branch_matches(
    ctx: &QueryContext<'_>,
    branches: &[Vec<&str>],
    params: &mut RestrictParams,
) -> bool {
    branches
        .iter()
        .any(|branch| branch.iter().all(|term| evaluate_term(ctx, term, params)))
}
