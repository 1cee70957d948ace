// src/models/member.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sócio do ginásio. Telefone e tipo de plano são opcionais:
/// sem `membership_type` o sócio não tem plano ativo.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub membership_type: Option<String>,
    pub is_active: bool,
    pub joined_on: String, // YYYY-MM-DD
}

/// Filtro por plano usado no diretório de sócios.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MembershipFilter {
    #[default]
    Any,
    NoPlan,
    Plan(String),
}

impl MembershipFilter {
    /// "" -> todos, "none" -> sem plano, outro valor -> esse plano.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => MembershipFilter::Any,
            Some(v) if v.eq_ignore_ascii_case("none") => MembershipFilter::NoPlan,
            Some(v) => MembershipFilter::Plan(v.to_string()),
        }
    }

    pub fn matches(&self, member: &Member) -> bool {
        match self {
            MembershipFilter::Any => true,
            MembershipFilter::NoPlan => member.membership_type.is_none(),
            MembershipFilter::Plan(plan) => member
                .membership_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(plan)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub membership_type: Option<String>,
}
