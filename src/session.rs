//! Questionnaire session
//!
//! Tracks the current question, collected answers and display locale for an
//! interactive front end. Answers are stored as canonical keys, so toggling
//! the locale mid-way keeps everything already answered.

use tracing::debug;

use crate::answers::AnswerSet;
use crate::error::SelectionResult;
use crate::questions::Question;
use crate::selector::{Recommendation, StrategySelector};
use crate::types::Locale;

/// Result of answering the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved on to the next question
    Next,
    /// The last question was answered; the session can finish
    Complete,
}

pub struct QuestionnaireSession<'a> {
    selector: &'a StrategySelector,
    locale: Locale,
    index: usize,
    answers: AnswerSet,
}

impl<'a> QuestionnaireSession<'a> {
    pub fn new(selector: &'a StrategySelector, locale: Locale) -> Self {
        Self {
            selector,
            locale,
            index: 0,
            answers: AnswerSet::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Zero-based position of the current question
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions().len()
    }

    pub fn questions(&self) -> &'a [Question] {
        self.selector.get_questions(self.locale)
    }

    pub fn current(&self) -> Option<&'a Question> {
        self.questions().get(self.index)
    }

    /// Option value previously chosen for the current question
    pub fn current_answer(&self) -> Option<&str> {
        self.current().and_then(|q| self.answers.raw(q.id))
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total()
    }

    /// Record the option at 1-based `position` for the current question.
    /// Returns `None` when no such option exists, so the caller re-prompts.
    pub fn choose(&mut self, position: usize) -> Option<Step> {
        let question = self.current()?;
        let option = question.option_at(position)?;
        self.answers.insert_raw(question.id, option.value.clone());
        debug!(question = %question.id, value = %option.value, "Answer recorded");

        if self.is_last() {
            Some(Step::Complete)
        } else {
            self.index += 1;
            Some(Step::Next)
        }
    }

    /// Go back one question. Returns false on the first question.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn toggle_locale(&mut self) -> Locale {
        self.locale = self.locale.toggle();
        self.locale
    }

    /// Clear all answers and return to the first question
    pub fn restart(&mut self) {
        self.answers = AnswerSet::new();
        self.index = 0;
    }

    /// Run the selector over the collected answers
    pub fn finish(&self) -> SelectionResult<Recommendation> {
        self.selector.select_strategies(&self.answers, self.locale)
    }
}
