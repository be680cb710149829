use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One user's stored response to one questionnaire item. At most one row per
/// (user, question).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Answer {
    pub user_id: String,
    pub question_id: i64,
    /// The answer the user gave for themselves.
    pub user_answer: i64,
    /// The answer the user wants from a partner.
    pub prefer_answer: i64,
    /// How much this question matters to the user, 1..=5.
    pub importance: i64,
}

/// One item of a questionnaire submission, before it is bound to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: i64,
    pub user_answer: i64,
    pub prefer_answer: i64,
    pub importance: i64,
}

impl AnswerSubmission {
    pub fn validate(&self) -> Result<()> {
        if self.question_id < 1 {
            return Err(Error::InvalidQuestionId(self.question_id));
        }
        if !(1..=5).contains(&self.importance) {
            return Err(Error::InvalidImportance {
                question_id: self.question_id,
                value: self.importance,
            });
        }
        Ok(())
    }

    pub fn into_answer(self, user_id: &str) -> Answer {
        Answer {
            user_id: user_id.to_string(),
            question_id: self.question_id,
            user_answer: self.user_answer,
            prefer_answer: self.prefer_answer,
            importance: self.importance,
        }
    }
}
