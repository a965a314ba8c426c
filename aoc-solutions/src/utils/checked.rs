//! Overflow-checked answer totals

use aoc_solver::SolveError;

/// Sum of `values`, or [`SolveError::Overflow`] naming `what` once it no
/// longer fits in a `u64`.
pub fn checked_total(
    values: impl IntoIterator<Item = u64>,
    what: &str,
) -> Result<u64, SolveError> {
    values
        .into_iter()
        .try_fold(0u64, u64::checked_add)
        .ok_or_else(|| SolveError::Overflow(what.to_string()))
}
