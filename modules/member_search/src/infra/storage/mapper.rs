use query_db::conjunction;
use sea_orm::{
    sea_query::SimpleExpr, sqlx, ColumnTrait, Condition, DbErr, FromQueryResult, RuntimeErr,
};

use crate::contract::model::{Member, MemberDto, MemberTeamDto, Team};
use crate::domain::error::DomainError;
use crate::domain::filter::{FilterTerm, MemberFilter};
use crate::infra::storage::entity::{member, team};

/// Row shape of the `members LEFT JOIN teams` projection.
#[derive(Debug, FromQueryResult)]
pub struct MemberTeamRow {
    pub member_id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Debug, FromQueryResult)]
pub struct MemberDtoRow {
    pub username: String,
    pub age: i32,
}

impl From<MemberTeamRow> for MemberTeamDto {
    fn from(r: MemberTeamRow) -> Self {
        Self {
            member_id: r.member_id,
            username: r.username,
            age: r.age,
            team_id: r.team_id,
            team_name: r.team_name,
        }
    }
}

impl From<MemberDtoRow> for MemberDto {
    fn from(r: MemberDtoRow) -> Self {
        Self {
            username: r.username,
            age: r.age,
        }
    }
}

impl From<member::Model> for Member {
    fn from(m: member::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            age: m.age,
            team_id: m.team_id,
        }
    }
}

impl From<team::Model> for Team {
    fn from(m: team::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

fn term_to_expr(term: &FilterTerm) -> SimpleExpr {
    match term {
        FilterTerm::UsernameEq(v) => member::Column::Username.eq(v.as_str()),
        FilterTerm::TeamNameEq(v) => team::Column::Name.eq(v.as_str()),
        FilterTerm::AgeGoe(n) => member::Column::Age.gte(*n),
        FilterTerm::AgeLoe(n) => member::Column::Age.lte(*n),
    }
}

/// WHERE condition for a filter. Team terms assume `teams` is joined.
pub fn to_condition(filter: &MemberFilter) -> Condition {
    conjunction(filter.terms().iter().map(term_to_expr))
}

/// Connection failures, including ones raised in the middle of a statement.
fn is_unavailable(e: &DbErr) -> bool {
    match e {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Query(RuntimeErr::SqlxError(inner)) | DbErr::Exec(RuntimeErr::SqlxError(inner)) => {
            matches!(
                inner,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        }
        _ => false,
    }
}

/// Map a SeaORM error to the domain taxonomy, tagged with the failing query.
pub fn db_err(context: &'static str) -> impl Fn(DbErr) -> DomainError {
    move |e| {
        if is_unavailable(&e) {
            DomainError::backend_unavailable(context, e.to_string())
        } else {
            DomainError::backend_query(context, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql(filter: &MemberFilter) -> String {
        member::Entity::find()
            .filter(to_condition(filter))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn team_term_targets_teams_table() {
        let filter = MemberFilter::match_all().and(FilterTerm::TeamNameEq("teamB".into()));
        let s = sql(&filter);
        assert!(s.contains(r#""teams"."name" = 'teamB'"#), "{s}");
    }

    #[test]
    fn age_bounds_render_inclusive() {
        let filter = MemberFilter::match_all()
            .and(FilterTerm::AgeGoe(50))
            .and(FilterTerm::AgeLoe(55));
        let s = sql(&filter);
        assert!(s.contains(r#""members"."age" >= 50"#), "{s}");
        assert!(s.contains(r#""members"."age" <= 55"#), "{s}");
        assert!(s.contains(" AND "), "{s}");
    }

    #[test]
    fn match_all_has_no_terms() {
        assert!(to_condition(&MemberFilter::match_all()).is_empty());
    }

    #[test]
    fn connection_errors_are_unavailable() {
        let map = db_err("member_count");
        let err = map(DbErr::Conn(sea_orm::RuntimeErr::Internal("refused".into())));
        assert!(matches!(err, DomainError::BackendUnavailable { ref context, .. } if context == "member_count"));

        let err = map(DbErr::Custom("no such column".into()));
        assert!(matches!(err, DomainError::BackendQuery { ref context, .. } if context == "member_count"));
    }

    #[test]
    fn connection_lost_mid_statement_is_unavailable() {
        let map = db_err("member_team_page");
        let reset = || sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionReset));

        for err in [
            DbErr::Query(RuntimeErr::SqlxError(reset())),
            DbErr::Exec(RuntimeErr::SqlxError(reset())),
            DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::PoolTimedOut)),
            DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::PoolClosed)),
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::WorkerCrashed)),
        ] {
            let mapped = map(err);
            assert!(
                matches!(mapped, DomainError::BackendUnavailable { ref context, .. } if context == "member_team_page"),
                "{mapped:?}"
            );
        }

        let err = map(DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::RowNotFound)));
        assert!(matches!(err, DomainError::BackendQuery { .. }), "{err:?}");
    }
}
