use async_trait::async_trait;
use paging_core::{CountStrategy, Page, PageRequest};
use std::sync::Arc;

use crate::contract::{
    client::MemberSearchApi,
    error::MemberSearchError,
    model::{Member, MemberSearchCondition, MemberTeamDto, NewMember, Team},
};
use crate::domain::service::Service;

/// Local implementation of the MemberSearchApi trait that delegates to the domain service
pub struct MemberSearchLocalClient {
    service: Arc<Service>,
}

impl MemberSearchLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MemberSearchApi for MemberSearchLocalClient {
    async fn search_page(
        &self,
        condition: MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, MemberSearchError> {
        self.service
            .search_page(&condition, page)
            .await
            .map_err(Into::into)
    }

    async fn search_page_with(
        &self,
        strategy: CountStrategy,
        condition: MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, MemberSearchError> {
        self.service
            .search_page_with(strategy, &condition, page)
            .await
            .map_err(Into::into)
    }

    async fn search(
        &self,
        condition: MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>, MemberSearchError> {
        self.service.search(&condition).await.map_err(Into::into)
    }

    async fn create_team(&self, name: String) -> Result<Team, MemberSearchError> {
        self.service.create_team(name).await.map_err(Into::into)
    }

    async fn create_member(&self, new_member: NewMember) -> Result<Member, MemberSearchError> {
        self.service
            .create_member(new_member)
            .await
            .map_err(Into::into)
    }

    async fn get_member(&self, id: i32) -> Result<Member, MemberSearchError> {
        self.service.get_member(id).await.map_err(Into::into)
    }

    async fn change_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Member, MemberSearchError> {
        self.service
            .change_team(member_id, team_id)
            .await
            .map_err(Into::into)
    }
}
