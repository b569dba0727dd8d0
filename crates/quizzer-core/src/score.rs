use crate::models::{Question, QuizResults};

/// Score a submitted quiz: one point per answer matching the question's
/// correct answer, position by position.
pub fn compute_score(questions: &[Question], answers: &[String]) -> QuizResults {
    let score = questions
        .iter()
        .zip(answers.iter())
        .filter(|(q, a)| q.correct_answer == **a)
        .count();

    QuizResults {
        questions: questions.to_vec(),
        answers: answers.to_vec(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str) -> Question {
        Question {
            question: text.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: vec!["x".to_string(), "y".to_string(), "z".to_string()],
            all_answers: vec![
                "x".to_string(),
                correct.to_string(),
                "y".to_string(),
                "z".to_string(),
            ],
        }
    }

    #[test]
    fn test_all_correct() {
        let questions = vec![question("q1", "a"), question("q2", "b")];
        let answers = vec!["a".to_string(), "b".to_string()];
        let results = compute_score(&questions, &answers);
        assert_eq!(results.score, 2);
        assert_eq!(results.questions.len(), 2);
    }

    #[test]
    fn test_partial_score() {
        let questions = vec![question("q1", "a"), question("q2", "b"), question("q3", "c")];
        let answers = vec!["a".to_string(), "wrong".to_string(), "c".to_string()];
        assert_eq!(compute_score(&questions, &answers).score, 2);
    }

    #[test]
    fn test_no_answers() {
        let questions = vec![question("q1", "a")];
        let results = compute_score(&questions, &[]);
        assert_eq!(results.score, 0);
        assert!(results.answers.is_empty());
    }

    #[test]
    fn test_answer_order_matters() {
        // A correct answer given for the wrong question scores nothing.
        let questions = vec![question("q1", "a"), question("q2", "b")];
        let answers = vec!["b".to_string(), "a".to_string()];
        assert_eq!(compute_score(&questions, &answers).score, 0);
    }
}
