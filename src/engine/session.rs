// src/engine/session.rs

//! One interactive attempt.
//!
//! The session owns the randomized presentation (question order and the
//! option order of every question), the current-question pointer and the
//! recorded answers. It never blocks and performs no I/O.

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::bank::{
    CATEGORIES, Category, OPTIONS_PER_QUESTION, QUESTIONS_PER_CATEGORY, Question, TOTAL_QUESTIONS,
};
use crate::engine::EngineError;
use crate::engine::scoring::{ScoreCard, score};
use crate::engine::sheet::{AnswerSheet, RecordedAnswer, bank_order};
use crate::models::payload::{AnswerEntry, AttemptPayload};

/// Bank identity of one presented item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub category: usize,
    pub question: usize,
}

impl ItemRef {
    pub fn category(&self) -> &'static Category {
        &CATEGORIES[self.category]
    }

    pub fn question(&self) -> &'static Question {
        &self.category().questions[self.question]
    }
}

/// What a renderer needs to show the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    /// 1-based position in the presentation order.
    pub number: usize,
    pub total: usize,
    pub text: &'static str,
    pub options: Vec<PresentedOption>,
    /// Presentation position of the active selection.
    pub selected: Option<usize>,
    pub can_go_back: bool,
    /// The next action scores the attempt.
    pub is_last: bool,
}

impl PresentedQuestion {
    pub fn heading(&self) -> String {
        format!("Q{}. {}", self.number, self.text)
    }

    pub fn step_text(&self) -> String {
        format!("Question {} of {}", self.number, self.total)
    }

    pub fn advance_label(&self) -> &'static str {
        if self.is_last { "Review & Score ▶" } else { "Next ▶" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedOption {
    pub letter: char,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// `round(100 * answered / total)`.
    pub percent: u8,
}

/// Result of a successful forward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the item with this 1-based number.
    Advanced(usize),
    /// The last item was answered; the session is now locked.
    Completed,
}

/// Frozen outcome of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub elapsed: Duration,
    pub scores: ScoreCard,
}

#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<ItemRef>,
    /// Option order per bank question, indexed like the bank order.
    option_orders: Vec<[usize; OPTIONS_PER_QUESTION]>,
    sheet: AnswerSheet,
    cursor: usize,
    selection: Option<usize>,
    started_at: Instant,
    completion: Option<Completion>,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut session = Session {
            items: Vec::with_capacity(TOTAL_QUESTIONS),
            option_orders: Vec::with_capacity(TOTAL_QUESTIONS),
            sheet: AnswerSheet::new(),
            cursor: 0,
            selection: None,
            started_at: Instant::now(),
            completion: None,
        };
        session.reset(rng);
        session
    }

    /// Clears every answer, unlocks, and reshuffles both the question order and
    /// every question's option order.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items.clear();
        self.items
            .extend(bank_order().map(|(category, question)| ItemRef { category, question }));
        self.items.shuffle(rng);

        self.option_orders.clear();
        for _ in 0..TOTAL_QUESTIONS {
            let mut order = [0, 1, 2, 3];
            order.shuffle(rng);
            self.option_orders.push(order);
        }

        self.sheet.clear();
        self.cursor = 0;
        self.selection = None;
        self.started_at = Instant::now();
        self.completion = None;
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    /// The current question, or `None` once the session is complete.
    pub fn current(&self) -> Option<PresentedQuestion> {
        if self.is_complete() {
            return None;
        }
        let item = self.items[self.cursor];
        let question = item.question();
        let options = self
            .option_order(item)
            .iter()
            .enumerate()
            .map(|(pos, &opt)| PresentedOption {
                letter: RecordedAnswer::letter_for(pos),
                text: question.options[opt].text,
            })
            .collect();

        Some(PresentedQuestion {
            number: self.cursor + 1,
            total: self.items.len(),
            text: question.text,
            options,
            selected: self.selection,
            can_go_back: self.cursor > 0,
            is_last: self.cursor + 1 == self.items.len(),
        })
    }

    /// Makes the option at `position` (in presentation order) the active selection.
    pub fn select(&mut self, position: usize) -> Result<(), EngineError> {
        if self.is_complete() {
            return Err(EngineError::Locked);
        }
        if position >= OPTIONS_PER_QUESTION {
            return Err(EngineError::InvalidOption(position));
        }
        self.selection = Some(position);
        Ok(())
    }

    /// Commits the active selection and moves forward. Answering the last item
    /// completes and locks the session.
    pub fn next(&mut self) -> Result<Step, EngineError> {
        if self.is_complete() {
            return Err(EngineError::Locked);
        }
        if self.selection.is_none() {
            return Err(EngineError::SelectionRequired);
        }
        self.commit();

        if self.cursor + 1 == self.items.len() {
            self.completion = Some(Completion {
                elapsed: self.started_at.elapsed(),
                scores: score(&self.sheet),
            });
            return Ok(Step::Completed);
        }

        self.move_to(self.cursor + 1);
        Ok(Step::Advanced(self.cursor + 1))
    }

    /// Moves back one item, committing any active selection first. On the
    /// first item this only commits.
    pub fn prev(&mut self) -> Result<(), EngineError> {
        if self.is_complete() {
            return Err(EngineError::Locked);
        }
        self.commit();
        if self.cursor > 0 {
            self.move_to(self.cursor - 1);
        }
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        let answered = self.sheet.answered();
        let total = self.items.len();
        let percent = if self.is_complete() {
            100
        } else {
            (100.0 * answered as f64 / total as f64).round() as u8
        };
        Progress {
            answered,
            total,
            percent,
        }
    }

    /// Scores whatever has been recorded so far.
    pub fn scores(&self) -> ScoreCard {
        match &self.completion {
            Some(done) => done.scores.clone(),
            None => score(&self.sheet),
        }
    }

    /// Builds the submission for a completed session: scores, breakdown and all
    /// answers ordered by presentation, each carrying its bank identity.
    pub fn payload(&self, version: &str) -> Result<AttemptPayload, EngineError> {
        let done = self.completion.as_ref().ok_or(EngineError::NotComplete)?;

        let answers = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let recorded = self.sheet.get(item.category, item.question);
                AnswerEntry {
                    item_index: idx as i64 + 1,
                    category_key: item.category().key.to_string(),
                    question_index: item.question as i64 + 1,
                    letter: recorded.map(|a| a.letter.to_string()).unwrap_or_default(),
                    points: recorded.map_or(0, |a| i64::from(a.points)),
                    option_text: recorded.map(|a| a.option_text.to_string()).unwrap_or_default(),
                }
            })
            .collect();

        Ok(AttemptPayload {
            overall: done.scores.overall,
            band: done.scores.band.label().to_string(),
            version: Some(version.to_string()),
            duration_ms: Some(i64::try_from(done.elapsed.as_millis()).unwrap_or(i64::MAX)),
            breakdown: done.scores.breakdown.iter().map(|c| c.to_entry()).collect(),
            answers,
        })
    }

    fn option_order(&self, item: ItemRef) -> &[usize; OPTIONS_PER_QUESTION] {
        &self.option_orders[item.category * QUESTIONS_PER_CATEGORY + item.question]
    }

    fn commit(&mut self) {
        let Some(position) = self.selection else {
            return;
        };
        let item = self.items[self.cursor];
        let option = &item.question().options[self.option_order(item)[position]];
        self.sheet.record(
            item.category,
            item.question,
            RecordedAnswer {
                letter: RecordedAnswer::letter_for(position),
                position,
                points: option.points,
                option_text: option.text,
            },
        );
    }

    fn move_to(&mut self, cursor: usize) {
        self.cursor = cursor;
        let item = self.items[cursor];
        self.selection = self.sheet.get(item.category, item.question).map(|a| a.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> Session {
        Session::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Position of the highest-scoring option for the current item.
    fn best_position(s: &Session) -> usize {
        let item = s.items[s.cursor];
        let order = s.option_order(item);
        (0..OPTIONS_PER_QUESTION)
            .max_by_key(|&pos| item.question().options[order[pos]].points)
            .unwrap()
    }

    fn complete_with(s: &mut Session, pick: impl Fn(&Session) -> usize) {
        loop {
            let pos = pick(&*s);
            s.select(pos).unwrap();
            if s.next().unwrap() == Step::Completed {
                break;
            }
        }
    }

    #[test]
    fn presentation_is_a_bijection_over_the_bank() {
        for seed in 0..20 {
            let s = seeded(seed);
            let seen: HashSet<ItemRef> = s.items.iter().copied().collect();
            assert_eq!(s.items.len(), TOTAL_QUESTIONS);
            assert_eq!(seen.len(), TOTAL_QUESTIONS);
            for order in &s.option_orders {
                let mut sorted = *order;
                sorted.sort();
                assert_eq!(sorted, [0, 1, 2, 3]);
            }
        }
    }

    #[test]
    fn advancing_without_selection_is_rejected() {
        let mut s = seeded(1);
        assert_eq!(s.next(), Err(EngineError::SelectionRequired));
        assert_eq!(s.current().unwrap().number, 1);
        assert_eq!(
            EngineError::SelectionRequired.to_string(),
            "choose an option to continue"
        );
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut s = seeded(1);
        assert_eq!(s.select(4), Err(EngineError::InvalidOption(4)));
    }

    #[test]
    fn retreat_commits_and_revisit_restores_selection() {
        let mut s = seeded(2);
        s.select(1).unwrap();
        s.next().unwrap();

        // choose on item 2, then go back without advancing
        s.select(3).unwrap();
        s.prev().unwrap();
        assert_eq!(s.current().unwrap().number, 1);
        assert_eq!(s.current().unwrap().selected, Some(1));
        assert_eq!(s.progress().answered, 2);

        s.next().unwrap();
        assert_eq!(s.current().unwrap().selected, Some(3));
    }

    #[test]
    fn prev_on_first_item_stays_put() {
        let mut s = seeded(3);
        s.prev().unwrap();
        let q = s.current().unwrap();
        assert_eq!(q.number, 1);
        assert!(!q.can_go_back);
        assert_eq!(s.progress().answered, 0);
    }

    #[test]
    fn navigation_is_idempotent_for_unchanged_selection() {
        let mut s = seeded(4);
        s.select(0).unwrap();
        s.next().unwrap();
        s.select(2).unwrap();
        s.next().unwrap();

        let item = s.items[1];
        let before = s.sheet.get(item.category, item.question).cloned();

        s.prev().unwrap();
        s.prev().unwrap();
        s.next().unwrap();
        s.next().unwrap();

        assert_eq!(s.sheet.get(item.category, item.question).cloned(), before);
        assert_eq!(before.map(|a| a.letter), Some('C'));
    }

    #[test]
    fn recorded_answer_matches_presented_option() {
        let mut s = seeded(5);
        let shown = s.current().unwrap();
        s.select(2).unwrap();
        s.next().unwrap();

        let item = s.items[0];
        let recorded = s.sheet.get(item.category, item.question).unwrap();
        assert_eq!(recorded.letter, 'C');
        assert_eq!(recorded.position, 2);
        assert_eq!(recorded.option_text, shown.options[2].text);
        let points = item
            .question()
            .options
            .iter()
            .find(|o| o.text == recorded.option_text)
            .map(|o| o.points);
        assert_eq!(points, Some(recorded.points));
    }

    #[test]
    fn completion_locks_and_reaches_full_progress() {
        let mut s = seeded(6);
        complete_with(&mut s, best_position);

        assert!(s.is_complete());
        assert!(s.current().is_none());
        assert_eq!(s.progress().percent, 100);
        assert_eq!(s.select(0), Err(EngineError::Locked));
        assert_eq!(s.next(), Err(EngineError::Locked));
        assert_eq!(s.prev(), Err(EngineError::Locked));
        assert_eq!(s.scores().overall, 100.0);
    }

    #[test]
    fn progress_counts_answered_items() {
        let mut s = seeded(7);
        assert_eq!(s.progress().percent, 0);
        for _ in 0..7 {
            s.select(0).unwrap();
            s.next().unwrap();
        }
        // 7 of 35 -> 20%
        assert_eq!(s.progress().percent, 20);
        s.select(0).unwrap();
        s.next().unwrap();
        // 8 of 35 -> 22.86 -> 23%
        assert_eq!(s.progress().percent, 23);
    }

    #[test]
    fn reset_reshuffles_and_clears() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut s = Session::new(&mut rng);
        let first_items = s.items.clone();
        let first_orders = s.option_orders.clone();
        complete_with(&mut s, |_| 0);

        s.reset(&mut rng);
        assert!(!s.is_complete());
        assert_eq!(s.progress().answered, 0);
        assert_eq!(s.current().unwrap().number, 1);
        assert_eq!(s.current().unwrap().selected, None);
        assert!(s.items != first_items || s.option_orders != first_orders);
    }

    #[test]
    fn payload_lists_answers_in_presentation_order() {
        let mut s = seeded(9);
        assert_eq!(s.payload("v1"), Err(EngineError::NotComplete));
        complete_with(&mut s, |s| s.cursor % 4);

        let payload = s.payload("v1").unwrap();
        assert_eq!(payload.version.as_deref(), Some("v1"));
        assert_eq!(payload.breakdown.len(), CATEGORIES.len());
        assert_eq!(payload.answers.len(), TOTAL_QUESTIONS);
        assert_eq!(payload.band, s.scores().band.label());

        let mut identities = HashSet::new();
        for (idx, (entry, item)) in payload.answers.iter().zip(&s.items).enumerate() {
            assert_eq!(entry.item_index, idx as i64 + 1);
            assert_eq!(entry.category_key, item.category().key);
            assert_eq!(entry.question_index, item.question as i64 + 1);
            assert_eq!(entry.letter, RecordedAnswer::letter_for(idx % 4).to_string());
            assert!((1..=5).contains(&entry.points));
            identities.insert((entry.category_key.clone(), entry.question_index));
        }
        assert_eq!(identities.len(), TOTAL_QUESTIONS);

        let resum: f64 = payload.breakdown.iter().map(|b| b.weighted).sum();
        assert_eq!(crate::engine::scoring::round_to(resum, 2), payload.overall);
    }

    #[test]
    fn presented_labels() {
        let s = seeded(10);
        let q = s.current().unwrap();
        assert_eq!(q.step_text(), "Question 1 of 35");
        assert!(q.heading().starts_with("Q1. "));
        assert_eq!(q.advance_label(), "Next ▶");
        let letters: String = q.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, "ABCD");
    }
}
