//! Questionnaire operations and the recommendation pipeline.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geo;
use crate::models::{
    Answer, AnswerSubmission, Profile, Question, RankedProfile, RecommendationQuery,
};
use crate::scoring::{self, ScoringWeights};
use crate::store::{
    AnswerStore, CandidateFilter, ProfileStore, QuestionStore, RecommendationHistory,
};

/// Tuning knobs for one engine instance.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Cap on the store's candidate batch.
    pub candidate_limit: usize,
    /// How many candidates are scored at the same time.
    pub scoring_concurrency: usize,
    pub weights: ScoringWeights,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        RecommendConfig {
            candidate_limit: 20,
            scoring_concurrency: 8,
            weights: ScoringWeights::default(),
        }
    }
}

pub struct RecommendService {
    profiles: Arc<dyn ProfileStore>,
    answers: Arc<dyn AnswerStore>,
    questions: Arc<dyn QuestionStore>,
    history: Arc<dyn RecommendationHistory>,
    config: RecommendConfig,
}

impl RecommendService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        answers: Arc<dyn AnswerStore>,
        questions: Arc<dyn QuestionStore>,
        history: Arc<dyn RecommendationHistory>,
    ) -> Self {
        Self::with_config(
            profiles,
            answers,
            questions,
            history,
            RecommendConfig::default(),
        )
    }

    pub fn with_config(
        profiles: Arc<dyn ProfileStore>,
        answers: Arc<dyn AnswerStore>,
        questions: Arc<dyn QuestionStore>,
        history: Arc<dyn RecommendationHistory>,
        config: RecommendConfig,
    ) -> Self {
        RecommendService {
            profiles,
            answers,
            questions,
            history,
            config,
        }
    }

    /// Validates every submission, then stores each as an atomic
    /// create-or-replace. Nothing is written when any item is invalid.
    pub async fn submit_answers(
        &self,
        user_id: &str,
        submissions: Vec<AnswerSubmission>,
    ) -> Result<()> {
        for submission in &submissions {
            submission.validate()?;
        }
        let count = submissions.len();
        for submission in submissions {
            self.answers
                .upsert_answer(&submission.into_answer(user_id))
                .await?;
        }
        debug!(user_id, count, "questionnaire answers stored");
        Ok(())
    }

    /// A user's stored answers. A user who never submitted any gets the
    /// typed not-found error, so the API layer never matches on messages.
    pub async fn answers_for_user(&self, user_id: &str) -> Result<Vec<Answer>> {
        let answers = self.answers.list_answers_by_user(user_id).await?;
        if answers.is_empty() {
            return Err(Error::AnswersNotFound(user_id.to_string()));
        }
        Ok(answers)
    }

    pub async fn list_questions(&self) -> Result<Vec<Question>> {
        self.questions.list_questions().await
    }

    /// Ranked recommendations for `user_id`: filter, score concurrently,
    /// sort, then record every returned candidate in the history. A history
    /// write failure fails the whole request; dropping it silently would let
    /// the same candidates come back later.
    pub async fn recommendations(
        &self,
        user_id: &str,
        query: &RecommendationQuery,
    ) -> Result<Vec<RankedProfile>> {
        query.validate()?;
        let requester = self
            .profiles
            .find_profile(user_id)
            .await?
            .ok_or_else(|| Error::ProfileNotFound(user_id.to_string()))?;

        let candidates = self.eligible_candidates(&requester, query).await?;
        let mut ranked = self.score_candidates(user_id, candidates).await?;

        // Stable sort: equal percentages keep the store's ascending id order.
        ranked.sort_by(|a, b| {
            b.match_percentage
                .partial_cmp(&a.match_percentage)
                .unwrap_or(Ordering::Equal)
        });

        for item in &ranked {
            self.history.record_shown(user_id, &item.profile.id).await?;
        }

        info!(user_id, returned = ranked.len(), "recommendation batch ready");
        Ok(ranked)
    }

    /// The eligible batch, each candidate paired with its distance from the
    /// requester. Distance bounds are inclusive at both ends.
    async fn eligible_candidates(
        &self,
        requester: &Profile,
        query: &RecommendationQuery,
    ) -> Result<Vec<(Profile, Option<f64>)>> {
        let Some(origin) = requester.location()? else {
            // First-run profiles without a location degrade to the unfiltered
            // listing: no gender/age/history narrowing, no cap, no distances.
            warn!(
                user_id = %requester.id,
                "profile has no coordinates, serving the unfiltered listing"
            );
            let everyone = self.profiles.list_all_profiles().await?;
            return Ok(everyone.into_iter().map(|p| (p, None)).collect());
        };

        let filter = CandidateFilter {
            excluded_user_id: requester.id.clone(),
            gender_of_interest: requester.gender.opposite(),
            min_age: query.min_age,
            max_age: query.max_age,
            limit: self.config.candidate_limit,
        };
        let batch = self.profiles.list_candidates(&filter).await?;
        debug!(user_id = %requester.id, batch = batch.len(), "candidate batch loaded");

        let mut kept = Vec::with_capacity(batch.len());
        for candidate in batch {
            let Some(point) = candidate.location()? else {
                continue;
            };
            let distance = geo::distance_km(origin, point);
            if distance < query.min_distance_km || distance > query.max_distance_km {
                continue;
            }
            kept.push((candidate, Some(distance)));
        }
        Ok(kept)
    }

    /// Scores the batch with a bounded parallel map over the answer store,
    /// joining in input order. One failing lookup aborts the whole batch
    /// rather than silently shrinking the result.
    async fn score_candidates(
        &self,
        user_id: &str,
        candidates: Vec<(Profile, Option<f64>)>,
    ) -> Result<Vec<RankedProfile>> {
        let requester_answers = Arc::new(scoring::index_by_question(
            self.answers.list_answers_by_user(user_id).await?,
        ));
        let weights = Arc::new(self.config.weights.clone());

        let scoring_tasks = candidates.into_iter().map(|(profile, distance_km)| {
            let answers = Arc::clone(&self.answers);
            let requester_answers = Arc::clone(&requester_answers);
            let weights = Arc::clone(&weights);
            async move {
                let candidate_answers = scoring::index_by_question(
                    answers.list_answers_by_user(&profile.id).await?,
                );
                let match_percentage =
                    scoring::match_percentage(&requester_answers, &candidate_answers, &weights);
                Ok::<_, Error>(RankedProfile {
                    profile,
                    distance_km,
                    match_percentage,
                })
            }
        });

        stream::iter(scoring_tasks)
            .buffered(self.config.scoring_concurrency.max(1))
            .try_collect()
            .await
    }
}
