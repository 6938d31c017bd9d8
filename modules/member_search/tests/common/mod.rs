#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use paging_core::PageRequest;
use query_db::{ConnectOpts, DbHandle};

use member_search::contract::model::{Member, MemberDto, MemberTeamDto, NewMember, Team};
use member_search::domain::error::DomainError;
use member_search::domain::filter::MemberFilter;
use member_search::domain::repo::{CountJoin, MembersRepository};
use member_search::domain::service::{Service, ServiceConfig};
use member_search::infra::storage::SeaOrmMembersRepository;
use member_search::MemberSearchModule;

/// Fresh in-memory SQLite with the member schema applied.
pub async fn sqlite_db() -> Result<DbHandle> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    MemberSearchModule::migrate(&db).await?;
    Ok(db)
}

pub fn sqlite_repo(db: &DbHandle) -> Arc<CountingRepository> {
    Arc::new(CountingRepository::new(Arc::new(SeaOrmMembersRepository::new(
        db.sea(),
    ))))
}

pub fn service(repo: Arc<dyn MembersRepository>) -> Service {
    Service::new(repo, ServiceConfig::default())
}

/// teamA{member1 15, member2 21}, teamB{member3 52, member4 62}.
pub async fn seed_two_teams(service: &Service) -> Result<(Team, Team)> {
    let team_a = service.create_team("teamA".into()).await?;
    let team_b = service.create_team("teamB".into()).await?;
    for (name, age, team) in [
        ("member1", 15, &team_a),
        ("member2", 21, &team_a),
        ("member3", 52, &team_b),
        ("member4", 62, &team_b),
    ] {
        service
            .create_member(NewMember::new(name, age).in_team(team.id))
            .await?;
    }
    Ok((team_a, team_b))
}

/// Wraps a repository and records every count query it receives.
pub struct CountingRepository {
    inner: Arc<dyn MembersRepository>,
    counts: AtomicUsize,
    joins: Mutex<Vec<CountJoin>>,
}

impl CountingRepository {
    pub fn new(inner: Arc<dyn MembersRepository>) -> Self {
        Self {
            inner,
            counts: AtomicUsize::new(0),
            joins: Mutex::new(Vec::new()),
        }
    }

    pub fn count_calls(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn joins(&self) -> Vec<CountJoin> {
        self.joins.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.counts.store(0, Ordering::SeqCst);
        self.joins.lock().unwrap().clear();
    }
}

#[async_trait]
impl MembersRepository for CountingRepository {
    async fn fetch_page(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        self.inner.fetch_page(filter, page).await
    }

    async fn count(&self, filter: &MemberFilter, join: CountJoin) -> Result<u64, DomainError> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.joins.lock().unwrap().push(join);
        self.inner.count(filter, join).await
    }

    async fn search(&self, filter: &MemberFilter) -> Result<Vec<MemberTeamDto>, DomainError> {
        self.inner.search(filter).await
    }

    async fn insert_team(&self, name: String) -> Result<Team, DomainError> {
        self.inner.insert_team(name).await
    }

    async fn find_team(&self, id: i32) -> Result<Option<Team>, DomainError> {
        self.inner.find_team(id).await
    }

    async fn insert_member(&self, new_member: NewMember) -> Result<Member, DomainError> {
        self.inner.insert_member(new_member).await
    }

    async fn find_member(&self, id: i32) -> Result<Option<Member>, DomainError> {
        self.inner.find_member(id).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, DomainError> {
        self.inner.list_members().await
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        self.inner.find_by_username(username).await
    }

    async fn list_member_dtos(&self) -> Result<Vec<MemberDto>, DomainError> {
        self.inner.list_member_dtos().await
    }

    async fn set_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Option<Member>, DomainError> {
        self.inner.set_team(member_id, team_id).await
    }
}

/// Repository over plain vectors, evaluating filters with `MemberFilter::matches`.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    teams: Vec<Team>,
    members: Vec<Member>,
}

impl State {
    fn joined(&self) -> Vec<MemberTeamDto> {
        let mut rows: Vec<MemberTeamDto> = self
            .members
            .iter()
            .map(|m| {
                let team = m
                    .team_id
                    .and_then(|id| self.teams.iter().find(|t| t.id == id));
                MemberTeamDto {
                    member_id: m.id,
                    username: m.username.clone(),
                    age: m.age,
                    team_id: team.map(|t| t.id),
                    team_name: team.map(|t| t.name.clone()),
                }
            })
            .collect();
        rows.sort_by_key(|r| r.member_id);
        rows
    }
}

impl InMemoryRepository {
    pub fn with_rows(teams: Vec<Team>, members: Vec<Member>) -> Self {
        Self {
            state: Mutex::new(State { teams, members }),
        }
    }

    pub fn rows(&self) -> Vec<MemberTeamDto> {
        self.state.lock().unwrap().joined()
    }
}

#[async_trait]
impl MembersRepository for InMemoryRepository {
    async fn fetch_page(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        Ok(self
            .rows()
            .into_iter()
            .filter(|r| filter.matches(r))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &MemberFilter, _join: CountJoin) -> Result<u64, DomainError> {
        Ok(self.rows().iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn search(&self, filter: &MemberFilter) -> Result<Vec<MemberTeamDto>, DomainError> {
        Ok(self
            .rows()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    async fn insert_team(&self, name: String) -> Result<Team, DomainError> {
        let mut state = self.state.lock().unwrap();
        let team = Team {
            id: state.teams.len() as i32 + 1,
            name,
        };
        state.teams.push(team.clone());
        Ok(team)
    }

    async fn find_team(&self, id: i32) -> Result<Option<Team>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_member(&self, new_member: NewMember) -> Result<Member, DomainError> {
        let mut state = self.state.lock().unwrap();
        let member = Member {
            id: state.members.len() as i32 + 1,
            username: new_member.username,
            age: new_member.age,
            team_id: new_member.team_id,
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn find_member(&self, id: i32) -> Result<Option<Member>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.members.iter().find(|m| m.id == id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>, DomainError> {
        Ok(self.state.lock().unwrap().members.clone())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|m| m.username == username)
            .cloned()
            .collect())
    }

    async fn list_member_dtos(&self) -> Result<Vec<MemberDto>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .map(|m| MemberDto {
                username: m.username.clone(),
                age: m.age,
            })
            .collect())
    }

    async fn set_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Option<Member>, DomainError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .map(|m| {
                m.team_id = team_id;
                m.clone()
            }))
    }
}
