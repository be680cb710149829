use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Interest is fixed to the opposite gender; per-user orientation
    /// preferences are not modelled.
    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// A dating profile as the account service stores it. This crate only reads
/// profiles; the demographic fields beyond gender, birthday and coordinates
/// play no role in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
    /// `"lon,lat"`, NULL until the user first shares a location.
    pub coordinates: Option<String>,
    pub height: Option<i64>,
    pub horoscope: Option<String>,
    pub hobby: Option<String>,
    pub language: Option<String>,
    pub education: Option<String>,
    pub home_town: Option<String>,
}

impl Profile {
    /// Parsed location, `None` when the user has not shared one yet.
    pub fn location(&self) -> Result<Option<Coordinates>> {
        match self.coordinates.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}
