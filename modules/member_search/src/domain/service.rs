use std::sync::Arc;

use paging_core::{resolve_total, CountStrategy, Page, PageRequest};
use query_db::has_text;
use tracing::{debug, info, instrument};

use crate::contract::model::{
    Member, MemberDto, MemberSearchCondition, MemberTeamDto, NewMember, Team,
};
use crate::domain::error::DomainError;
use crate::domain::filter::MemberFilter;
use crate::domain::repo::{CountJoin, MembersRepository};

/// Domain service for member search.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn MembersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Limit applied by [`Service::page_request`] when the caller gives none.
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub count_strategy: CountStrategy,
    pub max_username_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 1000,
            count_strategy: CountStrategy::Optimized,
            max_username_length: 255,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn MembersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validate a raw window, falling back to `default_page_size` when `limit` is absent.
    pub fn page_request(&self, offset: i64, limit: Option<i64>) -> Result<PageRequest, DomainError> {
        let limit = limit.unwrap_or_else(|| i64::from(self.config.default_page_size));
        Ok(PageRequest::new(offset, limit)?)
    }

    /// One page of matching members, total resolved with the configured strategy.
    pub async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        self.search_page_with(self.config.count_strategy, condition, page)
            .await
    }

    #[instrument(
        name = "member_search.service.search_page",
        skip(self, condition),
        fields(offset = page.offset(), limit = page.limit())
    )]
    pub async fn search_page_with(
        &self,
        strategy: CountStrategy,
        condition: &MemberSearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        let page = page.clamp_limit(u64::from(self.config.max_page_size));
        let filter = MemberFilter::compose(condition);
        debug!(terms = filter.terms().len(), "searching members");

        let content = self.repo.fetch_page(&filter, page).await?;

        let join = match strategy {
            CountStrategy::Simple => CountJoin::Always,
            CountStrategy::Optimized => CountJoin::WhenFiltered,
        };
        let total = resolve_total(strategy, page, content.len(), || {
            self.repo.count(&filter, join)
        })
        .await?;

        let page = Page::assemble(content, total, page)?;
        debug!(
            total = page.total,
            returned = page.number_of_elements(),
            "member page assembled"
        );
        Ok(page)
    }

    #[instrument(name = "member_search.service.search", skip(self, condition))]
    pub async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        let filter = MemberFilter::compose(condition);
        let rows = self.repo.search(&filter).await?;
        debug!("search returned {} rows", rows.len());
        Ok(rows)
    }

    #[instrument(name = "member_search.service.create_team", skip(self))]
    pub async fn create_team(&self, name: String) -> Result<Team, DomainError> {
        if !has_text(&name) {
            return Err(DomainError::invalid_argument("name", "team name is blank"));
        }
        let team = self.repo.insert_team(name).await?;
        info!("Created team with id={}", team.id);
        Ok(team)
    }

    #[instrument(
        name = "member_search.service.create_member",
        skip(self),
        fields(username = %new_member.username)
    )]
    pub async fn create_member(&self, new_member: NewMember) -> Result<Member, DomainError> {
        self.validate_new_member(&new_member)?;
        if let Some(team_id) = new_member.team_id {
            self.require_team(team_id).await?;
        }
        let member = self.repo.insert_member(new_member).await?;
        info!("Created member with id={}", member.id);
        Ok(member)
    }

    #[instrument(name = "member_search.service.get_member", skip(self), fields(member_id = %id))]
    pub async fn get_member(&self, id: i32) -> Result<Member, DomainError> {
        self.repo
            .find_member(id)
            .await?
            .ok_or_else(|| DomainError::member_not_found(id))
    }

    pub async fn list_members(&self) -> Result<Vec<Member>, DomainError> {
        self.repo.list_members().await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        self.repo.find_by_username(username).await
    }

    pub async fn list_member_dtos(&self) -> Result<Vec<MemberDto>, DomainError> {
        self.repo.list_member_dtos().await
    }

    /// Move a member to another team, or out of any team with `None`.
    #[instrument(name = "member_search.service.change_team", skip(self))]
    pub async fn change_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Member, DomainError> {
        if let Some(team_id) = team_id {
            self.require_team(team_id).await?;
        }
        let member = self
            .repo
            .set_team(member_id, team_id)
            .await?
            .ok_or_else(|| DomainError::member_not_found(member_id))?;
        info!(?team_id, "member team changed");
        Ok(member)
    }

    async fn require_team(&self, team_id: i32) -> Result<Team, DomainError> {
        self.repo
            .find_team(team_id)
            .await?
            .ok_or_else(|| DomainError::team_not_found(team_id))
    }

    fn validate_new_member(&self, new_member: &NewMember) -> Result<(), DomainError> {
        if !has_text(&new_member.username) {
            return Err(DomainError::invalid_argument("username", "username is blank"));
        }
        if new_member.username.chars().count() > self.config.max_username_length {
            return Err(DomainError::invalid_argument(
                "username",
                format!(
                    "username longer than {} characters",
                    self.config.max_username_length
                ),
            ));
        }
        if new_member.age < 0 {
            return Err(DomainError::invalid_argument("age", "age is negative"));
        }
        Ok(())
    }
}
