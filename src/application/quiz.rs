//! Step sequencing for the skin-type quiz.
//!
//! The quiz moves through `Initial → SelectType | InProgress → Finished`.
//! Each step variant carries only the data valid in it, so a result can
//! only be read once the quiz is finished.

use crate::domain::{derive_result, question_bank, AnswerSet, Category, DomainError, DomainResult, Question};
use tracing::debug;

/// Where the visitor is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// Asking whether the visitor already knows their skin type.
    Initial,
    /// Picking a known skin type directly.
    SelectType,
    /// Answering questions; `index` is zero-based.
    InProgress { index: usize },
    /// Quiz done, either by tally or by declaration.
    Finished { result: Category },
}

/// Outcome of a step operation.
///
/// Operations called outside their valid step are ignored rather than
/// rejected, mirroring disabled buttons in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The step or question index changed.
    Moved,
    /// The quiz reached its result.
    Finished(Category),
    /// Advancing was refused because the current question is unanswered.
    Blocked,
    /// The operation does not apply to the current step.
    Ignored,
}

/// Owns the quiz step, the recorded answers and the question list.
///
/// # Examples
///
/// ```
/// use skinshop::application::{QuizEngine, QuizStep, Transition};
/// use skinshop::domain::Category;
///
/// let mut quiz = QuizEngine::default();
/// quiz.choose_knows_own_type(true);
/// assert_eq!(quiz.select_declared_type(Category::B), Transition::Finished(Category::B));
/// assert_eq!(quiz.step(), QuizStep::Finished { result: Category::B });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuizEngine {
    questions: Vec<Question>,
    step: QuizStep,
    answers: AnswerSet,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new(question_bank())
    }
}

impl QuizEngine {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            step: QuizStep::Initial,
            answers: AnswerSet::new(),
        }
    }

    pub fn step(&self) -> QuizStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question being answered, if the quiz is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            QuizStep::InProgress { index } => self.questions.get(index),
            _ => None,
        }
    }

    pub fn current_answer(&self) -> Option<Category> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id))
    }

    pub fn result(&self) -> Option<Category> {
        match self.step {
            QuizStep::Finished { result } => Some(result),
            _ => None,
        }
    }

    /// One-based question number and total, while in progress.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.step {
            QuizStep::InProgress { index } => Some((index + 1, self.questions.len())),
            _ => None,
        }
    }

    /// Progress as a whole percentage, rounded to nearest.
    pub fn progress_percent(&self) -> Option<u16> {
        self.progress()
            .filter(|(_, total)| *total > 0)
            .map(|(number, total)| ((number * 100 + total / 2) / total) as u16)
    }

    pub fn is_last_question(&self) -> bool {
        matches!(self.step, QuizStep::InProgress { index } if index + 1 >= self.questions.len())
    }

    /// Records the answer for a question, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidInput`] when no loaded question has
    /// `question_id`.
    pub fn select_answer(&mut self, question_id: u32, category: Category) -> DomainResult<()> {
        if !self.questions.iter().any(|question| question.id == question_id) {
            return Err(DomainError::InvalidInput(format!(
                "unknown question id {}",
                question_id
            )));
        }
        self.answers.record(question_id, category);
        debug!(question_id, %category, "answer recorded");
        Ok(())
    }

    /// Answers whichever question is currently shown.
    pub fn answer_current(&mut self, category: Category) -> Transition {
        let Some(question_id) = self.current_question().map(|question| question.id) else {
            return Transition::Ignored;
        };
        match self.select_answer(question_id, category) {
            Ok(()) => Transition::Moved,
            Err(_) => Transition::Ignored,
        }
    }

    /// Moves to the next question, or to the result after the last one.
    pub fn advance(&mut self) -> Transition {
        let QuizStep::InProgress { index } = self.step else {
            return Transition::Ignored;
        };

        if let Some(question) = self.questions.get(index) {
            if !self.answers.contains(question.id) {
                debug!(question_id = question.id, "advance blocked on unanswered question");
                return Transition::Blocked;
            }
        }

        if index + 1 < self.questions.len() {
            self.step = QuizStep::InProgress { index: index + 1 };
            Transition::Moved
        } else {
            let result = derive_result(&self.answers);
            debug!(%result, answered = self.answers.len(), "quiz finished by tally");
            self.step = QuizStep::Finished { result };
            Transition::Finished(result)
        }
    }

    /// Moves to the previous question, or leaves the quiz from the first one.
    pub fn retreat(&mut self) -> Transition {
        let QuizStep::InProgress { index } = self.step else {
            return Transition::Ignored;
        };
        self.step = if index > 0 {
            QuizStep::InProgress { index: index - 1 }
        } else {
            QuizStep::Initial
        };
        Transition::Moved
    }

    pub fn choose_knows_own_type(&mut self, knows: bool) -> Transition {
        if self.step != QuizStep::Initial {
            return Transition::Ignored;
        }
        self.step = if knows {
            QuizStep::SelectType
        } else {
            QuizStep::InProgress { index: 0 }
        };
        Transition::Moved
    }

    /// Finishes the quiz with a skin type the visitor already knows.
    pub fn select_declared_type(&mut self, category: Category) -> Transition {
        if self.step != QuizStep::SelectType {
            return Transition::Ignored;
        }
        debug!(%category, "quiz finished by declaration");
        self.step = QuizStep::Finished { result: category };
        Transition::Finished(category)
    }

    pub fn restart(&mut self) {
        self.step = QuizStep::Initial;
        self.answers = AnswerSet::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnswerOption;

    fn short_quiz() -> QuizEngine {
        let questions = (1..=3)
            .map(|id| Question {
                id,
                prompt: format!("Question {}", id),
                options: Category::ALL
                    .iter()
                    .map(|category| AnswerOption {
                        category: *category,
                        text: format!("Option {}", category),
                    })
                    .collect(),
            })
            .collect();
        QuizEngine::new(questions)
    }

    fn answer_all(quiz: &mut QuizEngine, choices: &[Category]) -> Transition {
        let mut last = Transition::Ignored;
        for choice in choices {
            quiz.answer_current(*choice);
            last = quiz.advance();
        }
        last
    }

    #[test]
    fn test_fresh_engine_state() {
        let quiz = QuizEngine::default();
        assert_eq!(quiz.step(), QuizStep::Initial);
        assert!(quiz.answers().is_empty());
        assert_eq!(quiz.result(), None);
        assert_eq!(quiz.question_count(), 10);
    }

    #[test]
    fn test_choose_not_knowing_starts_quiz() {
        let mut quiz = short_quiz();
        assert_eq!(quiz.choose_knows_own_type(false), Transition::Moved);
        assert_eq!(quiz.step(), QuizStep::InProgress { index: 0 });
        assert_eq!(quiz.progress(), Some((1, 3)));
        assert_eq!(quiz.progress_percent(), Some(33));
    }

    #[test]
    fn test_progress_percent_rounds_to_nearest() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        quiz.answer_current(Category::B);
        quiz.advance();
        assert_eq!(quiz.progress(), Some((2, 3)));
        assert_eq!(quiz.progress_percent(), Some(67));
        quiz.answer_current(Category::B);
        quiz.advance();
        assert_eq!(quiz.progress_percent(), Some(100));
    }

    #[test]
    fn test_choose_outside_initial_is_ignored() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(true);
        assert_eq!(quiz.choose_knows_own_type(false), Transition::Ignored);
        assert_eq!(quiz.step(), QuizStep::SelectType);
    }

    #[test]
    fn test_select_answer_unknown_question() {
        let mut quiz = short_quiz();
        let result = quiz.select_answer(99, Category::A);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(quiz.answers().is_empty());
    }

    #[test]
    fn test_select_answer_overwrites_without_step_change() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        quiz.select_answer(1, Category::A).unwrap();
        quiz.select_answer(1, Category::A).unwrap();
        quiz.select_answer(1, Category::C).unwrap();
        assert_eq!(quiz.answers().len(), 1);
        assert_eq!(quiz.current_answer(), Some(Category::C));
        assert_eq!(quiz.step(), QuizStep::InProgress { index: 0 });
    }

    #[test]
    fn test_advance_blocked_on_unanswered_question() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        assert_eq!(quiz.advance(), Transition::Blocked);
        assert_eq!(quiz.step(), QuizStep::InProgress { index: 0 });
    }

    #[test]
    fn test_advance_at_last_question_finishes() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        let last = answer_all(&mut quiz, &[Category::B, Category::E, Category::B]);

        assert_eq!(last, Transition::Finished(Category::B));
        assert_eq!(quiz.step(), QuizStep::Finished { result: Category::B });
        assert_eq!(quiz.current_question(), None);
        assert_eq!(quiz.advance(), Transition::Ignored);
    }

    #[test]
    fn test_advance_never_passes_last_index() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        quiz.answer_current(Category::A);
        quiz.advance();
        quiz.answer_current(Category::A);
        quiz.advance();
        assert_eq!(quiz.step(), QuizStep::InProgress { index: 2 });
        assert!(quiz.is_last_question());
        quiz.answer_current(Category::D);
        quiz.advance();
        assert!(matches!(quiz.step(), QuizStep::Finished { .. }));
    }

    #[test]
    fn test_tied_quiz_uses_canonical_order() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        let last = answer_all(&mut quiz, &[Category::E, Category::C, Category::D]);
        assert_eq!(last, Transition::Finished(Category::C));
    }

    #[test]
    fn test_retreat_decrements_then_exits() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        quiz.answer_current(Category::A);
        quiz.advance();
        assert_eq!(quiz.retreat(), Transition::Moved);
        assert_eq!(quiz.step(), QuizStep::InProgress { index: 0 });
        assert_eq!(quiz.retreat(), Transition::Moved);
        assert_eq!(quiz.step(), QuizStep::Initial);
        assert_eq!(quiz.retreat(), Transition::Ignored);
    }

    #[test]
    fn test_revisited_answer_is_kept() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(false);
        quiz.answer_current(Category::D);
        quiz.advance();
        quiz.retreat();
        assert_eq!(quiz.current_answer(), Some(Category::D));
    }

    #[test]
    fn test_declared_type_bypasses_tally() {
        let mut quiz = short_quiz();
        quiz.choose_knows_own_type(true);
        let oily: Category = "oily".parse().unwrap();
        assert_eq!(quiz.select_declared_type(oily), Transition::Finished(Category::B));
        assert_eq!(quiz.result(), Some(Category::B));
        assert!(quiz.answers().is_empty());
    }

    #[test]
    fn test_declared_type_outside_select_step_is_ignored() {
        let mut quiz = short_quiz();
        assert_eq!(quiz.select_declared_type(Category::A), Transition::Ignored);
        quiz.choose_knows_own_type(false);
        assert_eq!(quiz.select_declared_type(Category::A), Transition::Ignored);
        assert_eq!(quiz.result(), None);
    }

    #[test]
    fn test_tally_and_declared_paths_both_reach_result() {
        let mut tallied = short_quiz();
        tallied.choose_knows_own_type(false);
        answer_all(&mut tallied, &[Category::E, Category::E, Category::A]);

        let mut declared = short_quiz();
        declared.choose_knows_own_type(true);
        declared.select_declared_type(Category::A);

        assert_eq!(tallied.result(), Some(Category::E));
        assert_eq!(declared.result(), Some(Category::A));
    }

    #[test]
    fn test_restart_from_every_step_matches_fresh() {
        let fresh = short_quiz();

        let mut initial = short_quiz();
        initial.restart();
        assert_eq!(initial, fresh);

        let mut selecting = short_quiz();
        selecting.choose_knows_own_type(true);
        selecting.restart();
        assert_eq!(selecting, fresh);

        let mut in_progress = short_quiz();
        in_progress.choose_knows_own_type(false);
        in_progress.answer_current(Category::C);
        in_progress.advance();
        in_progress.restart();
        assert_eq!(in_progress, fresh);

        let mut finished = short_quiz();
        finished.choose_knows_own_type(false);
        answer_all(&mut finished, &[Category::A, Category::B, Category::C]);
        finished.restart();
        assert_eq!(finished, fresh);
    }

    #[test]
    fn test_answer_current_outside_quiz_is_ignored() {
        let mut quiz = short_quiz();
        assert_eq!(quiz.answer_current(Category::A), Transition::Ignored);
        assert!(quiz.answers().is_empty());
    }
}
