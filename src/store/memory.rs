//! In-memory implementation of the collaborator stores, for tests and for
//! embedding without a database file. Mirrors the SQLite contracts, including
//! ascending id order, and can inject dependency failures per user.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::{canonical_pair, Answer, MatchRecord, Profile, Question, Verdict};
use crate::store::{
    birthday_window, AnswerStore, CandidateFilter, MatchStore, ProfileStore, QuestionStore,
    RecommendationHistory,
};

#[derive(Default)]
struct Inner {
    profiles: BTreeMap<String, Profile>,
    answers: BTreeMap<(String, i64), Answer>,
    matches: HashMap<(String, String), MatchRecord>,
    bins: HashMap<String, BTreeSet<String>>,
    questions: BTreeMap<i64, Question>,
    failing_answer_users: HashSet<String>,
    fail_history_writes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

fn dependency_error() -> Error {
    Error::Store(sqlx::Error::PoolClosed)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.id.clone(), profile);
    }

    pub async fn insert_question(&self, question: Question) {
        self.inner
            .write()
            .await
            .questions
            .insert(question.question_id, question);
    }

    /// Makes `list_answers_by_user` fail for `user_id` with a dependency
    /// error.
    pub async fn fail_answers_for(&self, user_id: &str) {
        self.inner
            .write()
            .await
            .failing_answer_users
            .insert(user_id.to_string());
    }

    /// Makes every `record_shown` call fail with a dependency error.
    pub async fn fail_history_writes(&self) {
        self.inner.write().await.fail_history_writes = true;
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: &str) -> Result<Option<Profile>> {
        Ok(self.inner.read().await.profiles.get(id).cloned())
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>> {
        let (floor, ceil) = birthday_window(filter.min_age, filter.max_age);
        let inner = self.inner.read().await;
        let shown = inner.bins.get(&filter.excluded_user_id);
        let candidates = inner
            .profiles
            .values()
            .filter(|p| {
                p.gender == filter.gender_of_interest
                    && p.birthday >= floor
                    && p.birthday <= ceil
                    && p.id != filter.excluded_user_id
                    && shown.map_or(true, |set| !set.contains(&p.id))
                    && p.coordinates.as_deref().is_some_and(|c| !c.is_empty())
            })
            .take(filter.limit)
            .cloned()
            .collect();
        Ok(candidates)
    }

    async fn list_all_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.inner.read().await.profiles.values().cloned().collect())
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    async fn find_answer(&self, user_id: &str, question_id: i64) -> Result<Option<Answer>> {
        let key = (user_id.to_string(), question_id);
        Ok(self.inner.read().await.answers.get(&key).cloned())
    }

    async fn upsert_answer(&self, answer: &Answer) -> Result<()> {
        let key = (answer.user_id.clone(), answer.question_id);
        self.inner.write().await.answers.insert(key, answer.clone());
        Ok(())
    }

    async fn delete_answer(&self, user_id: &str, question_id: i64) -> Result<()> {
        let key = (user_id.to_string(), question_id);
        self.inner.write().await.answers.remove(&key);
        Ok(())
    }

    async fn list_answers_by_user(&self, user_id: &str) -> Result<Vec<Answer>> {
        let inner = self.inner.read().await;
        if inner.failing_answer_users.contains(user_id) {
            return Err(dependency_error());
        }
        let from = (user_id.to_string(), i64::MIN);
        let to = (user_id.to_string(), i64::MAX);
        Ok(inner.answers.range(from..=to).map(|(_, a)| a.clone()).collect())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn find_match(&self, user_a: &str, user_b: &str) -> Result<Option<MatchRecord>> {
        let (first, second) = canonical_pair(user_a, user_b);
        let key = (first.to_string(), second.to_string());
        Ok(self.inner.read().await.matches.get(&key).cloned())
    }

    async fn record_verdict(
        &self,
        actor_id: &str,
        target_id: &str,
        verdict: Verdict,
    ) -> Result<MatchRecord> {
        let (first, second) = canonical_pair(actor_id, target_id);
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let record = inner
            .matches
            .entry((first.to_string(), second.to_string()))
            .or_insert_with(|| MatchRecord {
                first_user_id: first.to_string(),
                second_user_id: second.to_string(),
                first_verdict: None,
                second_verdict: None,
                created_at: now,
                updated_at: now,
            });
        if actor_id == first {
            record.first_verdict = Some(verdict);
        } else {
            record.second_verdict = Some(verdict);
        }
        record.updated_at = now;
        Ok(record.clone())
    }
}

#[async_trait]
impl RecommendationHistory for MemoryStore {
    async fn list_shown(&self, user_id: &str) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bins
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn record_shown(&self, user_id: &str, candidate_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.fail_history_writes {
            return Err(dependency_error());
        }
        inner
            .bins
            .entry(user_id.to_string())
            .or_default()
            .insert(candidate_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        Ok(self.inner.read().await.questions.values().cloned().collect())
    }
}
