use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::error::RankingError;
use crate::models::StudentRecord;

/// Rating dimension a ranking can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Rapid,
    Blitz,
    Bullet,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Rapid, SortField::Blitz, SortField::Bullet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rapid => "rapid",
            Self::Blitz => "blitz",
            Self::Bullet => "bullet",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(SortField::as_str).collect()
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| RankingError::InvalidSortField(s.to_string()))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RankingQuery {
    /// One of `rapid`, `blitz`, `bullet`. Defaults to `rapid`.
    pub sort_by: Option<String>,
}

impl RankingQuery {
    /// Resolves the requested dimension. An absent parameter means `rapid`;
    /// anything else, the empty string included, must name a dimension.
    pub fn sort_field(&self) -> Result<SortField, RankingError> {
        match self.sort_by.as_deref() {
            None => Ok(SortField::default()),
            Some(raw) => raw.parse(),
        }
    }
}

/// A stored record, as found in the store, with its 1-based position in a
/// ranking.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankedStudent {
    pub rank: usize,
    #[serde(flatten)]
    pub record: StudentRecord,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub success: bool,
    pub message: String,
    pub sort_by: SortField,
    pub count: usize,
    pub rankings: Vec<RankedStudent>,
}

impl RankingsResponse {
    pub fn new(sort_by: SortField, rankings: Vec<RankedStudent>) -> Self {
        Self {
            success: true,
            message: format!("Rankings sorted by {}", sort_by),
            sort_by,
            count: rankings.len(),
            rankings,
        }
    }
}
