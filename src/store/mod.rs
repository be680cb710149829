//! Collaborator stores behind trait seams, so the API layer can run the
//! engine over SQLite or the in-memory implementation.

use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{Answer, Gender, MatchRecord, Profile, Question, Verdict};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, MIGRATOR};

/// Store-side candidate constraints. The distance bounds and origin stay with
/// the engine, which refines the batch against true haversine distance.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pub excluded_user_id: String,
    pub gender_of_interest: Gender,
    pub min_age: u32,
    pub max_age: u32,
    pub limit: usize,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, id: &str) -> Result<Option<Profile>>;

    /// Unranked candidate batch: gender of interest, birthday inside the age
    /// window (inclusive, relative to today), never the excluded user, never
    /// an id already shown to them, never a profile without coordinates.
    /// Ascending id order, capped at `filter.limit`.
    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>>;

    /// Every profile, unfiltered; serves requesters who have no coordinates
    /// yet. Ascending id order.
    async fn list_all_profiles(&self) -> Result<Vec<Profile>>;
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn find_answer(&self, user_id: &str, question_id: i64) -> Result<Option<Answer>>;

    /// Create-or-replace in a single statement; the (user, question) key
    /// stays unique under concurrent writers.
    async fn upsert_answer(&self, answer: &Answer) -> Result<()>;

    async fn delete_answer(&self, user_id: &str, question_id: i64) -> Result<()>;

    async fn list_answers_by_user(&self, user_id: &str) -> Result<Vec<Answer>>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// The canonical-pair row for two users, whichever order they come in.
    async fn find_match(&self, user_a: &str, user_b: &str) -> Result<Option<MatchRecord>>;

    /// Records `actor_id`'s verdict in one atomic upsert and returns the row
    /// as written. The counterpart's verdict is never touched; the actor's
    /// own earlier verdict is overwritten.
    async fn record_verdict(
        &self,
        actor_id: &str,
        target_id: &str,
        verdict: Verdict,
    ) -> Result<MatchRecord>;
}

#[async_trait]
pub trait RecommendationHistory: Send + Sync {
    async fn list_shown(&self, user_id: &str) -> Result<Vec<String>>;

    /// Append-only and idempotent per (user, candidate) pair.
    async fn record_shown(&self, user_id: &str, candidate_id: &str) -> Result<()>;
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn list_questions(&self) -> Result<Vec<Question>>;
}

/// The birthday range implied by an inclusive age window, relative to today.
/// Someone turning `max_age` today is still inside it.
pub(crate) fn birthday_window(min_age: u32, max_age: u32) -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let floor = today
        .checked_sub_months(Months::new(max_age.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN);
    let ceil = today
        .checked_sub_months(Months::new(min_age.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN);
    (floor, ceil)
}
