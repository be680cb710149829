//! SQLite implementation of the collaborator stores.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{canonical_pair, Answer, MatchRecord, Profile, Question, Verdict};
use crate::store::{
    birthday_window, AnswerStore, CandidateFilter, MatchStore, ProfileStore, QuestionStore,
    RecommendationHistory,
};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// All five collaborator stores over one connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Applies the embedded migrations; call once at startup.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}

const SQL_FIND_PROFILE: &str = r#"
SELECT id, name, gender, birthday, coordinates, height, horoscope, hobby, language, education, home_town
FROM profiles
WHERE id = ?1
"#;

// Bin exclusion and the self-exclusion share ?4. Profiles without
// coordinates can never satisfy a distance bound, so the query skips them.
const SQL_LIST_CANDIDATES: &str = r#"
SELECT id, name, gender, birthday, coordinates, height, horoscope, hobby, language, education, home_town
FROM profiles
WHERE gender = ?1
  AND birthday >= ?2
  AND birthday <= ?3
  AND id <> ?4
  AND id NOT IN (SELECT recommended_user_id FROM recommendation_bins WHERE user_id = ?4)
  AND coordinates IS NOT NULL
  AND coordinates <> ''
ORDER BY id
LIMIT ?5
"#;

const SQL_LIST_ALL_PROFILES: &str = r#"
SELECT id, name, gender, birthday, coordinates, height, horoscope, hobby, language, education, home_town
FROM profiles
ORDER BY id
"#;

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn find_profile(&self, id: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(SQL_FIND_PROFILE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>> {
        let (floor, ceil) = birthday_window(filter.min_age, filter.max_age);
        let rows = sqlx::query_as::<_, Profile>(SQL_LIST_CANDIDATES)
            .bind(filter.gender_of_interest)
            .bind(floor)
            .bind(ceil)
            .bind(&filter.excluded_user_id)
            .bind(filter.limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all_profiles(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, Profile>(SQL_LIST_ALL_PROFILES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

const SQL_FIND_ANSWER: &str = r#"
SELECT user_id, question_id, user_answer, prefer_answer, importance
FROM answers
WHERE user_id = ?1 AND question_id = ?2
"#;

const SQL_UPSERT_ANSWER: &str = r#"
INSERT INTO answers (user_id, question_id, user_answer, prefer_answer, importance)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (user_id, question_id) DO UPDATE SET
    user_answer = excluded.user_answer,
    prefer_answer = excluded.prefer_answer,
    importance = excluded.importance
"#;

const SQL_DELETE_ANSWER: &str = "DELETE FROM answers WHERE user_id = ?1 AND question_id = ?2";

const SQL_LIST_ANSWERS: &str = r#"
SELECT user_id, question_id, user_answer, prefer_answer, importance
FROM answers
WHERE user_id = ?1
ORDER BY question_id
"#;

#[async_trait]
impl AnswerStore for SqliteStore {
    async fn find_answer(&self, user_id: &str, question_id: i64) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(SQL_FIND_ANSWER)
            .bind(user_id)
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(answer)
    }

    async fn upsert_answer(&self, answer: &Answer) -> Result<()> {
        sqlx::query(SQL_UPSERT_ANSWER)
            .bind(&answer.user_id)
            .bind(answer.question_id)
            .bind(answer.user_answer)
            .bind(answer.prefer_answer)
            .bind(answer.importance)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_answer(&self, user_id: &str, question_id: i64) -> Result<()> {
        sqlx::query(SQL_DELETE_ANSWER)
            .bind(user_id)
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_answers_by_user(&self, user_id: &str) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, Answer>(SQL_LIST_ANSWERS)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

const SQL_FIND_MATCH: &str = r#"
SELECT first_user_id, second_user_id, first_verdict, second_verdict, created_at, updated_at
FROM matches
WHERE first_user_id = ?1 AND second_user_id = ?2
"#;

// One statement, so two concurrent verdicts on the same pair cannot interleave
// between a probe and a write. COALESCE keeps the side the actor did not set.
const SQL_RECORD_VERDICT: &str = r#"
INSERT INTO matches (first_user_id, second_user_id, first_verdict, second_verdict, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?5)
ON CONFLICT (first_user_id, second_user_id) DO UPDATE SET
    first_verdict = COALESCE(excluded.first_verdict, matches.first_verdict),
    second_verdict = COALESCE(excluded.second_verdict, matches.second_verdict),
    updated_at = excluded.updated_at
RETURNING first_user_id, second_user_id, first_verdict, second_verdict, created_at, updated_at
"#;

#[async_trait]
impl MatchStore for SqliteStore {
    async fn find_match(&self, user_a: &str, user_b: &str) -> Result<Option<MatchRecord>> {
        let (first, second) = canonical_pair(user_a, user_b);
        let record = sqlx::query_as::<_, MatchRecord>(SQL_FIND_MATCH)
            .bind(first)
            .bind(second)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn record_verdict(
        &self,
        actor_id: &str,
        target_id: &str,
        verdict: Verdict,
    ) -> Result<MatchRecord> {
        let (first, second) = canonical_pair(actor_id, target_id);
        let (first_verdict, second_verdict) = if actor_id == first {
            (Some(verdict), None)
        } else {
            (None, Some(verdict))
        };
        let record = sqlx::query_as::<_, MatchRecord>(SQL_RECORD_VERDICT)
            .bind(first)
            .bind(second)
            .bind(first_verdict)
            .bind(second_verdict)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }
}

const SQL_LIST_SHOWN: &str = r#"
SELECT recommended_user_id
FROM recommendation_bins
WHERE user_id = ?1
ORDER BY recommended_user_id
"#;

const SQL_RECORD_SHOWN: &str = r#"
INSERT INTO recommendation_bins (user_id, recommended_user_id, created_at)
VALUES (?1, ?2, ?3)
ON CONFLICT (user_id, recommended_user_id) DO NOTHING
"#;

#[async_trait]
impl RecommendationHistory for SqliteStore {
    async fn list_shown(&self, user_id: &str) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(SQL_LIST_SHOWN)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn record_shown(&self, user_id: &str, candidate_id: &str) -> Result<()> {
        sqlx::query(SQL_RECORD_SHOWN)
            .bind(user_id)
            .bind(candidate_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

const SQL_LIST_QUESTIONS: &str =
    "SELECT question_id, content, answers FROM questions ORDER BY question_id";

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: i64,
    content: String,
    answers: String,
}

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(SQL_LIST_QUESTIONS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| Question::from_delimited(row.question_id, row.content, &row.answers))
            .collect())
    }
}
