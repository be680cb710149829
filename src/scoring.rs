//! Pairwise compatibility scoring over questionnaire answers.

use std::collections::HashMap;

use crate::models::Answer;

/// Importance level (1..=5) to point value. The curve is deliberately
/// non-linear: a level-5 question outweighs everything below it combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringWeights {
    pub points: [u64; 5],
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            points: [0, 1, 10, 50, 250],
        }
    }
}

impl ScoringWeights {
    /// Point value of an importance level; anything outside 1..=5 counts 0.
    pub fn points_for(&self, importance: i64) -> u64 {
        if (1..=5).contains(&importance) {
            self.points[(importance - 1) as usize]
        } else {
            0
        }
    }
}

/// Indexes a user's answers by question id.
pub fn index_by_question(answers: Vec<Answer>) -> HashMap<i64, Answer> {
    answers
        .into_iter()
        .map(|answer| (answer.question_id, answer))
        .collect()
}

/// Match percentage in [0, 1] for one (requester, candidate) pair.
///
/// Over the questions both sides answered, each side earns the other's
/// importance weight whenever its stored answer equals the other's preferred
/// answer. A side's satisfaction is earned over maximum, 0 when nothing
/// overlaps. The result is the damped geometric mean
/// `(requester_sat * candidate_sat) ^ (1 / n)` where n is the number of
/// questions the requester answered in total, not the overlap count.
pub fn match_percentage(
    requester: &HashMap<i64, Answer>,
    candidate: &HashMap<i64, Answer>,
    weights: &ScoringWeights,
) -> f64 {
    if requester.is_empty() {
        return 0.0;
    }

    let mut requester_earned = 0u64;
    let mut requester_max = 0u64;
    let mut candidate_earned = 0u64;
    let mut candidate_max = 0u64;

    for (question_id, ours) in requester {
        let Some(theirs) = candidate.get(question_id) else {
            continue;
        };
        requester_max += weights.points_for(theirs.importance);
        candidate_max += weights.points_for(ours.importance);
        if theirs.user_answer == ours.prefer_answer {
            requester_earned += weights.points_for(theirs.importance);
        }
        if ours.user_answer == theirs.prefer_answer {
            candidate_earned += weights.points_for(ours.importance);
        }
    }

    let satisfaction = |earned: u64, max: u64| {
        if max == 0 {
            0.0
        } else {
            earned as f64 / max as f64
        }
    };
    let requester_sat = satisfaction(requester_earned, requester_max);
    let candidate_sat = satisfaction(candidate_earned, candidate_max);

    (requester_sat * candidate_sat).powf(1.0 / requester.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(user_id: &str, question_id: i64, user: i64, prefer: i64, importance: i64) -> Answer {
        Answer {
            user_id: user_id.into(),
            question_id,
            user_answer: user,
            prefer_answer: prefer,
            importance,
        }
    }

    fn map_of(answers: Vec<Answer>) -> HashMap<i64, Answer> {
        index_by_question(answers)
    }

    #[test]
    fn default_weight_curve() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.points_for(1), 0);
        assert_eq!(weights.points_for(2), 1);
        assert_eq!(weights.points_for(3), 10);
        assert_eq!(weights.points_for(4), 50);
        assert_eq!(weights.points_for(5), 250);
        // Out-of-range importances carry no weight.
        assert_eq!(weights.points_for(0), 0);
        assert_eq!(weights.points_for(6), 0);
        assert_eq!(weights.points_for(-3), 0);
    }

    #[test]
    fn mutual_satisfaction_scores_full() {
        // Both overlapping questions mutually satisfied; the requester's
        // extra question only shows up in the exponent and 1^x stays 1.
        let requester = map_of(vec![
            answer("a", 1, 1, 2, 3),
            answer("a", 2, 2, 1, 4),
            answer("a", 3, 1, 1, 5),
        ]);
        let candidate = map_of(vec![
            answer("b", 1, 2, 1, 5),
            answer("b", 2, 1, 2, 2),
        ]);
        let pct = match_percentage(&requester, &candidate, &ScoringWeights::default());
        assert_eq!(pct, 1.0);
    }

    #[test]
    fn zero_overlap_scores_zero() {
        let requester = map_of(vec![answer("a", 1, 1, 1, 5), answer("a", 2, 1, 1, 5)]);
        let candidate = map_of(vec![answer("b", 3, 1, 1, 5), answer("b", 4, 1, 1, 5)]);
        let pct = match_percentage(&requester, &candidate, &ScoringWeights::default());
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn requester_without_answers_scores_zero() {
        let requester = HashMap::new();
        let candidate = map_of(vec![answer("b", 1, 1, 1, 5)]);
        let pct = match_percentage(&requester, &candidate, &ScoringWeights::default());
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn pins_the_damped_geometric_mean() {
        // q1 satisfies both sides, q2 only the candidate, q3 never overlaps.
        // Requester: 10/20. Candidate: 20/20. All importances 3.
        let requester = map_of(vec![
            answer("a", 1, 1, 2, 3),
            answer("a", 2, 1, 2, 3),
            answer("a", 3, 1, 1, 5),
        ]);
        let candidate = map_of(vec![
            answer("b", 1, 2, 1, 3),
            answer("b", 2, 1, 1, 3),
        ]);
        let pct = match_percentage(&requester, &candidate, &ScoringWeights::default());
        // (0.5 * 1.0) ^ (1/3): the exponent uses the requester's three
        // answers, not the two-question overlap.
        assert!((pct - 0.793_700_525_984_099_8).abs() < 1e-12, "got {pct}");
        let overlap_exponent = 0.5_f64.powf(1.0 / 2.0);
        assert!((pct - overlap_exponent).abs() > 0.05);
    }

    #[test]
    fn exponent_follows_the_asking_side() {
        let a = map_of(vec![
            answer("a", 1, 1, 2, 3),
            answer("a", 2, 1, 2, 3),
            answer("a", 3, 1, 1, 5),
        ]);
        let b = map_of(vec![
            answer("b", 1, 2, 1, 3),
            answer("b", 2, 1, 1, 3),
        ]);
        let weights = ScoringWeights::default();
        let from_a = match_percentage(&a, &b, &weights);
        let from_b = match_percentage(&b, &a, &weights);
        // Same satisfactions, different divisor: 1/3 versus 1/2.
        assert!((from_b - 0.5_f64.powf(1.0 / 2.0)).abs() < 1e-12, "got {from_b}");
        assert!(from_a > from_b);
    }

    #[test]
    fn weight_curve_is_injectable() {
        // q1 (importance 5) mutually satisfied, q2 (importance 2) mutually
        // missed, identical on both sides.
        let requester = map_of(vec![
            answer("a", 1, 1, 1, 5),
            answer("a", 2, 1, 2, 2),
        ]);
        let candidate = map_of(vec![
            answer("b", 1, 1, 1, 5),
            answer("b", 2, 1, 2, 2),
        ]);
        let default_pct =
            match_percentage(&requester, &candidate, &ScoringWeights::default());
        let flat = ScoringWeights {
            points: [1, 1, 1, 1, 1],
        };
        let flat_pct = match_percentage(&requester, &candidate, &flat);
        // 250/251 per side under the default curve, 1/2 per side flat.
        assert!((flat_pct - 0.5).abs() < 1e-12, "got {flat_pct}");
        assert!(default_pct > flat_pct);
    }
}
