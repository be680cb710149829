pub mod answer;
pub mod matches;
pub mod profile;
pub mod question;
pub mod recommendation;

pub use answer::{Answer, AnswerSubmission};
pub use matches::{canonical_pair, MatchRecord, MatchStatus, SmashOutcome, Verdict};
pub use profile::{Gender, Profile};
pub use question::Question;
pub use recommendation::{RankedProfile, RecommendationQuery};
