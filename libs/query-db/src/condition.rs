//! Conjunction helpers for dynamic search forms.
//!
//! A search form produces a handful of optional constraints. The present ones
//! are AND-ed together starting from the neutral `Condition::all()`, so an
//! absent constraint can never leak into the WHERE clause as a NULL comparison.

use sea_orm::{sea_query::SimpleExpr, Condition};

/// AND together every term. No terms yields an empty (match-all) condition.
pub fn conjunction<I>(terms: I) -> Condition
where
    I: IntoIterator<Item = SimpleExpr>,
{
    terms
        .into_iter()
        .fold(Condition::all(), |cond, term| cond.add(term))
}

/// True when the string holds at least one non-whitespace character.
///
/// Whitespace is Unicode `White_Space`, so a no-break space (`U+00A0`) counts as blank too.
pub fn has_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

/// Treat empty and whitespace-only strings as absent.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| has_text(v))
}
