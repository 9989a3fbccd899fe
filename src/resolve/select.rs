//! Exactly-one candidate selection.

use itertools::Itertools;

/// Outcome of picking a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    One(T),
    Empty,
    /// More than one candidate; holds how many.
    Ambiguous(usize),
}

/// Pick the only candidate. Order is preserved but never used to break ties.
pub fn select_one<I>(candidates: I) -> Selection<I::Item>
where
    I: IntoIterator,
{
    match candidates.into_iter().exactly_one() {
        Ok(candidate) => Selection::One(candidate),
        Err(rest) => match rest.count() {
            0 => Selection::Empty,
            n => Selection::Ambiguous(n),
        },
    }
}
