use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;

/// One side's recorded action on a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Verdict {
    Smash,
    Pass,
}

/// Pair state derived from the two verdicts; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Matched,
    Passed,
}

/// Orders two user ids into the canonical (first, second) pair key.
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One row per user pair, smaller id first. Created on the pair's first smash
/// or pass, updated in place afterwards, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MatchRecord {
    pub first_user_id: String,
    pub second_user_id: String,
    pub first_verdict: Option<Verdict>,
    pub second_verdict: Option<Verdict>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn status(&self) -> MatchStatus {
        match (self.first_verdict, self.second_verdict) {
            (Some(Verdict::Pass), _) | (_, Some(Verdict::Pass)) => MatchStatus::Passed,
            (Some(Verdict::Smash), Some(Verdict::Smash)) => MatchStatus::Matched,
            // A row only exists once someone acted, so what remains is a
            // one-sided smash.
            _ => MatchStatus::Pending,
        }
    }

    /// The recorded verdict of `user_id`, if that side has acted.
    pub fn verdict_of(&self, user_id: &str) -> Option<Verdict> {
        if self.first_user_id == user_id {
            self.first_verdict
        } else if self.second_user_id == user_id {
            self.second_verdict
        } else {
            None
        }
    }
}

/// What a smash produced, shaped for the API layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SmashOutcome {
    /// Recorded; the other side has not smashed back (or has quietly passed).
    Wait,
    /// Mutual interest.
    Finish { profile: Profile },
}
