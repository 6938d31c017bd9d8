use async_trait::async_trait;
use paging_core::PageRequest;

use crate::contract::model::{Member, MemberDto, MemberTeamDto, NewMember, Team};
use crate::domain::error::DomainError;
use crate::domain::filter::MemberFilter;

/// Which join a count query carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountJoin {
    /// Same `members LEFT JOIN teams` as the content query.
    Always,
    /// Join `teams` only when the filter constrains it.
    WhenFiltered,
}

impl CountJoin {
    pub fn needs_join(self, filter: &MemberFilter) -> bool {
        match self {
            Self::Always => true,
            Self::WhenFiltered => filter.references_team(),
        }
    }
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait MembersRepository: Send + Sync {
    /// One page of member+team rows ordered by member id.
    async fn fetch_page(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Vec<MemberTeamDto>, DomainError>;
    /// Number of members matching `filter`.
    async fn count(&self, filter: &MemberFilter, join: CountJoin) -> Result<u64, DomainError>;
    /// Every matching row, ordered by member id.
    async fn search(&self, filter: &MemberFilter) -> Result<Vec<MemberTeamDto>, DomainError>;

    async fn insert_team(&self, name: String) -> Result<Team, DomainError>;
    async fn find_team(&self, id: i32) -> Result<Option<Team>, DomainError>;
    async fn insert_member(&self, new_member: NewMember) -> Result<Member, DomainError>;
    async fn find_member(&self, id: i32) -> Result<Option<Member>, DomainError>;
    async fn list_members(&self) -> Result<Vec<Member>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError>;
    async fn list_member_dtos(&self) -> Result<Vec<MemberDto>, DomainError>;
    /// Point the member at `team_id`. Returns `None` if the member does not exist.
    async fn set_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Option<Member>, DomainError>;
}
