//! The smash/pass protocol between two users.

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{MatchRecord, MatchStatus, SmashOutcome, Verdict};
use crate::store::{MatchStore, ProfileStore};

pub struct MatchService {
    matches: Arc<dyn MatchStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl MatchService {
    pub fn new(matches: Arc<dyn MatchStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        MatchService { matches, profiles }
    }

    /// Records a like. Mutual interest finishes the match and returns the
    /// target's profile; otherwise the actor waits. A target who already
    /// passed still reads as waiting, so rejections stay private.
    pub async fn smash(&self, actor_id: &str, target_id: &str) -> Result<SmashOutcome> {
        if actor_id == target_id {
            return Err(Error::SelfAction);
        }
        let record = self
            .matches
            .record_verdict(actor_id, target_id, Verdict::Smash)
            .await?;
        if record.status() == MatchStatus::Matched {
            let profile = self
                .profiles
                .find_profile(target_id)
                .await?
                .ok_or_else(|| Error::ProfileNotFound(target_id.to_string()))?;
            info!(actor_id, target_id, "mutual match");
            return Ok(SmashOutcome::Finish { profile });
        }
        Ok(SmashOutcome::Wait)
    }

    /// Records a rejection. Repeating it leaves the pair's single row as is.
    pub async fn pass(&self, actor_id: &str, target_id: &str) -> Result<()> {
        if actor_id == target_id {
            return Err(Error::SelfAction);
        }
        self.matches
            .record_verdict(actor_id, target_id, Verdict::Pass)
            .await?;
        Ok(())
    }

    /// Current state of a pair, if the two ever interacted.
    pub async fn match_between(&self, user_a: &str, user_b: &str) -> Result<Option<MatchRecord>> {
        self.matches.find_match(user_a, user_b).await
    }
}
