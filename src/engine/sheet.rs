// src/engine/sheet.rs

use crate::bank::{CATEGORIES, QUESTIONS_PER_CATEGORY, TOTAL_QUESTIONS};

/// The answer recorded for one bank question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnswer {
    /// Presentation label, `A`..`D`.
    pub letter: char,
    /// Position of the chosen option in the shuffled order the user saw.
    pub position: usize,
    pub points: u8,
    pub option_text: &'static str,
}

impl RecordedAnswer {
    pub fn letter_for(position: usize) -> char {
        char::from(b'A' + position as u8)
    }
}

/// Recorded answers keyed by bank identity (category, question), independent
/// of presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    slots: Vec<Option<RecordedAnswer>>,
}

fn slot(category: usize, question: usize) -> usize {
    category * QUESTIONS_PER_CATEGORY + question
}

impl AnswerSheet {
    pub fn new() -> Self {
        AnswerSheet {
            slots: vec![None; TOTAL_QUESTIONS],
        }
    }

    pub fn get(&self, category: usize, question: usize) -> Option<&RecordedAnswer> {
        self.slots.get(slot(category, question)).and_then(Option::as_ref)
    }

    pub fn record(&mut self, category: usize, question: usize, answer: RecordedAnswer) {
        if let Some(entry) = self.slots.get_mut(slot(category, question)) {
            *entry = Some(answer);
        }
    }

    pub fn answered(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Answers of one category in bank order.
    pub fn category(&self, category: usize) -> impl Iterator<Item = Option<&RecordedAnswer>> {
        (0..QUESTIONS_PER_CATEGORY).map(move |q| self.get(category, q))
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}

/// Every bank question as `(category index, question index)`, in bank order.
pub fn bank_order() -> impl Iterator<Item = (usize, usize)> {
    CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(c, cat)| (0..cat.questions.len()).map(move |q| (c, q)))
}
