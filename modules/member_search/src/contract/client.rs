use async_trait::async_trait;
use paging_core::{CountStrategy, Page, PageRequest};

use crate::contract::{
    error::MemberSearchError,
    model::{Member, MemberSearchCondition, MemberTeamDto, NewMember, Team},
};

/// Public API of the member search module for other modules (local or remote).
#[async_trait]
pub trait MemberSearchApi: Send + Sync {
    /// Page through members matching `condition`, resolving the total with the configured strategy.
    async fn search_page(
        &self,
        condition: MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, MemberSearchError>;

    /// Same as [`search_page`](Self::search_page) with an explicit count strategy.
    async fn search_page_with(
        &self,
        strategy: CountStrategy,
        condition: MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, MemberSearchError>;

    /// All members matching `condition`, unpaged.
    async fn search(
        &self,
        condition: MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>, MemberSearchError>;

    async fn create_team(&self, name: String) -> Result<Team, MemberSearchError>;

    async fn create_member(&self, new_member: NewMember) -> Result<Member, MemberSearchError>;

    async fn get_member(&self, id: i32) -> Result<Member, MemberSearchError>;

    async fn change_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Member, MemberSearchError>;
}
