pub mod client;
pub mod error;
pub mod model;

pub use client::MemberSearchApi;
pub use error::MemberSearchError;
pub use model::{Member, MemberDto, MemberSearchCondition, MemberTeamDto, NewMember, Team};
