//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can run on a `DatabaseConnection`
//! or inside a `DatabaseTransaction`.

use paging_core::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use tracing::trace;

use crate::contract::model::{Member, MemberDto, MemberTeamDto, NewMember, Team};
use crate::domain::error::DomainError;
use crate::domain::filter::MemberFilter;
use crate::domain::repo::{CountJoin, MembersRepository};
use crate::infra::storage::entity::{member, team};
use crate::infra::storage::mapper::{db_err, to_condition, MemberDtoRow, MemberTeamRow};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmMembersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmMembersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn with_team(select: Select<member::Entity>) -> Select<member::Entity> {
    select.join(JoinType::LeftJoin, member::Relation::Team.def())
}

fn filtered(select: Select<member::Entity>, filter: &MemberFilter) -> Select<member::Entity> {
    if filter.is_match_all() {
        select
    } else {
        select.filter(to_condition(filter))
    }
}

/// `members LEFT JOIN teams` with the flat member+team projection, in member id order.
fn member_team_select(filter: &MemberFilter) -> Select<member::Entity> {
    let select = with_team(member::Entity::find())
        .select_only()
        .column_as(member::Column::Id, "member_id")
        .column_as(member::Column::Username, "username")
        .column_as(member::Column::Age, "age")
        .column_as(team::Column::Id, "team_id")
        .column_as(team::Column::Name, "team_name");
    filtered(select, filter).order_by_asc(member::Column::Id)
}

#[async_trait::async_trait]
impl<C> MembersRepository for SeaOrmMembersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn fetch_page(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        let rows = member_team_select(filter)
            .offset(page.offset())
            .limit(page.limit())
            .into_model::<MemberTeamRow>()
            .all(&self.conn)
            .await
            .map_err(db_err("member_team_page"))?;
        trace!(rows = rows.len(), "fetched member page");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &MemberFilter, join: CountJoin) -> Result<u64, DomainError> {
        let select = if join.needs_join(filter) {
            with_team(member::Entity::find())
        } else {
            member::Entity::find()
        };
        filtered(select, filter)
            .count(&self.conn)
            .await
            .map_err(db_err("member_count"))
    }

    async fn search(&self, filter: &MemberFilter) -> Result<Vec<MemberTeamDto>, DomainError> {
        let rows = member_team_select(filter)
            .into_model::<MemberTeamRow>()
            .all(&self.conn)
            .await
            .map_err(db_err("member_team_search"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_team(&self, name: String) -> Result<Team, DomainError> {
        let m = team::ActiveModel {
            name: Set(name),
            ..Default::default()
        };
        let saved = m.insert(&self.conn).await.map_err(db_err("team_insert"))?;
        Ok(saved.into())
    }

    async fn find_team(&self, id: i32) -> Result<Option<Team>, DomainError> {
        let found = team::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("team_by_id"))?;
        Ok(found.map(Into::into))
    }

    async fn insert_member(&self, new_member: NewMember) -> Result<Member, DomainError> {
        let m = member::ActiveModel {
            username: Set(new_member.username),
            age: Set(new_member.age),
            team_id: Set(new_member.team_id),
            ..Default::default()
        };
        let saved = m.insert(&self.conn).await.map_err(db_err("member_insert"))?;
        Ok(saved.into())
    }

    async fn find_member(&self, id: i32) -> Result<Option<Member>, DomainError> {
        let found = member::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("member_by_id"))?;
        Ok(found.map(Into::into))
    }

    async fn list_members(&self) -> Result<Vec<Member>, DomainError> {
        let rows = member::Entity::find()
            .order_by_asc(member::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err("member_list"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        let rows = member::Entity::find()
            .filter(member::Column::Username.eq(username))
            .order_by_asc(member::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err("member_by_username"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_member_dtos(&self) -> Result<Vec<MemberDto>, DomainError> {
        let rows = member::Entity::find()
            .select_only()
            .column(member::Column::Username)
            .column(member::Column::Age)
            .order_by_asc(member::Column::Id)
            .into_model::<MemberDtoRow>()
            .all(&self.conn)
            .await
            .map_err(db_err("member_dto_list"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<Option<Member>, DomainError> {
        let Some(found) = member::Entity::find_by_id(member_id)
            .one(&self.conn)
            .await
            .map_err(db_err("member_by_id"))?
        else {
            return Ok(None);
        };
        let mut m: member::ActiveModel = found.into();
        m.team_id = Set(team_id);
        let saved = m.update(&self.conn).await.map_err(db_err("member_update"))?;
        Ok(Some(saved.into()))
    }
}
