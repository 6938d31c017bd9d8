//! Search predicate built from a [`MemberSearchCondition`].
//!
//! Each populated field of the condition contributes one term; absent and
//! blank fields contribute nothing. The terms are AND-ed together, and a
//! filter without terms matches every member.

use query_db::non_blank;

use crate::contract::model::{MemberSearchCondition, MemberTeamDto};

/// A single constraint on the member+team row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTerm {
    UsernameEq(String),
    TeamNameEq(String),
    /// `age >= n`
    AgeGoe(i32),
    /// `age <= n`
    AgeLoe(i32),
}

impl FilterTerm {
    fn username_eq(username: Option<&str>) -> Option<Self> {
        non_blank(username).map(|v| Self::UsernameEq(v.to_owned()))
    }

    fn team_name_eq(team_name: Option<&str>) -> Option<Self> {
        non_blank(team_name).map(|v| Self::TeamNameEq(v.to_owned()))
    }

    fn age_goe(age: Option<i32>) -> Option<Self> {
        age.map(Self::AgeGoe)
    }

    fn age_loe(age: Option<i32>) -> Option<Self> {
        age.map(Self::AgeLoe)
    }

    /// Whether the term constrains the joined team.
    pub fn references_team(&self) -> bool {
        matches!(self, Self::TeamNameEq(_))
    }

    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        match self {
            Self::UsernameEq(name) => row.username == *name,
            Self::TeamNameEq(name) => row.team_name.as_deref() == Some(name.as_str()),
            Self::AgeGoe(n) => row.age >= *n,
            Self::AgeLoe(n) => row.age <= *n,
        }
    }
}

/// Conjunction of [`FilterTerm`]s. The default value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    terms: Vec<FilterTerm>,
}

impl MemberFilter {
    /// The neutral filter.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Build the filter for a search condition.
    pub fn compose(condition: &MemberSearchCondition) -> Self {
        [
            FilterTerm::username_eq(condition.username.as_deref()),
            FilterTerm::team_name_eq(condition.team_name.as_deref()),
            FilterTerm::age_goe(condition.age_goe),
            FilterTerm::age_loe(condition.age_loe),
        ]
        .into_iter()
        .flatten()
        .fold(Self::match_all(), Self::and)
    }

    pub fn and(mut self, term: FilterTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[FilterTerm] {
        &self.terms
    }

    pub fn references_team(&self) -> bool {
        self.terms.iter().any(FilterTerm::references_team)
    }

    /// Evaluate the filter against an already-joined row.
    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        self.terms.iter().all(|t| t.matches(row))
    }
}
