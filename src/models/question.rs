use serde::{Deserialize, Serialize};

/// Shared questionnaire catalogue entry, read-only from this crate's
/// perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub content: String,
    pub answers: Vec<String>,
}

impl Question {
    /// Builds a catalogue entry from the stored row, splitting the
    /// comma-delimited answers column.
    pub fn from_delimited(question_id: i64, content: String, answers: &str) -> Question {
        let answers = if answers.is_empty() {
            Vec::new()
        } else {
            answers.split(',').map(str::to_string).collect()
        };
        Question {
            question_id,
            content,
            answers,
        }
    }
}
