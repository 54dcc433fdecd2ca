// src/engine/scoring.rs

//! Weighted scoring.
//!
//! A pure function of the recorded answers and the bank: presentation order
//! never influences the result.

use std::fmt;

use serde::Serialize;

use crate::bank::{CATEGORIES, MAX_RAW};
use crate::engine::sheet::AnswerSheet;
use crate::models::payload::BreakdownEntry;

/// Readiness label derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    High,
    Solid,
    Moderate,
    Low,
}

impl Band {
    /// Lower bounds are inclusive; evaluated from the top tier down.
    pub fn for_score(overall: f64) -> Self {
        if overall >= 85.0 {
            Band::High
        } else if overall >= 70.0 {
            Band::Solid
        } else if overall >= 55.0 {
            Band::Moderate
        } else {
            Band::Low
        }
    }

    /// Short label, submitted and persisted with the attempt.
    pub fn label(self) -> &'static str {
        match self {
            Band::High => "High AI Readiness",
            Band::Solid => "Solid AI Potential",
            Band::Moderate => "Moderate Readiness",
            Band::Low => "Low Readiness",
        }
    }

    /// Long form shown on the results view.
    pub fn description(self) -> &'static str {
        match self {
            Band::High => "High AI Readiness – AI-Amplified Talent ready",
            Band::Solid => "Solid AI Potential – trainable with development",
            Band::Moderate => "Moderate Readiness – needs structured upskilling",
            Band::Low => "Low Readiness – significant training required",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub key: &'static str,
    pub name: &'static str,
    /// Sum of points earned, 0..=25.
    pub raw: u32,
    /// Share of the category maximum as a percentage, one decimal place.
    pub pct: f64,
    /// `raw / 25 * weight`, two decimal places.
    pub weighted: f64,
    pub weight: u8,
}

impl CategoryScore {
    pub fn to_entry(&self) -> BreakdownEntry {
        BreakdownEntry {
            key: self.key.to_string(),
            name: self.name.to_string(),
            raw: i64::from(self.raw),
            pct: self.pct,
            weighted: self.weighted,
            weight: i64::from(self.weight),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    /// 0..=100, two decimal places.
    pub overall: f64,
    pub band: Band,
    /// One entry per category, in bank order.
    pub breakdown: Vec<CategoryScore>,
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Scores a sheet. Unanswered questions contribute 0 points.
pub fn score(sheet: &AnswerSheet) -> ScoreCard {
    let breakdown: Vec<CategoryScore> = CATEGORIES
        .iter()
        .enumerate()
        .map(|(idx, cat)| {
            let raw: u32 = sheet
                .category(idx)
                .map(|a| a.map_or(0, |a| u32::from(a.points)))
                .sum();
            let fraction = f64::from(raw) / f64::from(MAX_RAW);
            CategoryScore {
                key: cat.key,
                name: cat.name,
                raw,
                pct: round_to(fraction * 100.0, 1),
                weighted: round_to(fraction * f64::from(cat.weight), 2),
                weight: cat.weight,
            }
        })
        .collect();

    let overall = round_to(breakdown.iter().map(|c| c.weighted).sum(), 2).clamp(0.0, 100.0);

    ScoreCard {
        overall,
        band: Band::for_score(overall),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::MAX_POINTS;
    use crate::engine::sheet::{RecordedAnswer, bank_order};

    fn answer(points: u8) -> RecordedAnswer {
        RecordedAnswer {
            letter: 'A',
            position: 0,
            points,
            option_text: "",
        }
    }

    fn sheet_with(points: impl Fn(usize, usize) -> Option<u8>) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (c, q) in bank_order() {
            if let Some(p) = points(c, q) {
                sheet.record(c, q, answer(p));
            }
        }
        sheet
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(Band::for_score(72.5).label(), "Solid AI Potential");
        assert_eq!(Band::for_score(85.0).label(), "High AI Readiness");
        assert_eq!(Band::for_score(54.99).label(), "Low Readiness");
        assert_eq!(Band::for_score(55.0).label(), "Moderate Readiness");
        assert_eq!(Band::for_score(69.99), Band::Moderate);
        assert_eq!(Band::for_score(70.0), Band::Solid);
        assert_eq!(Band::for_score(0.0), Band::Low);
        assert_eq!(Band::for_score(100.0), Band::High);
    }

    #[test]
    fn perfect_sheet_scores_exactly_one_hundred() {
        let card = score(&sheet_with(|_, _| Some(MAX_POINTS)));
        assert_eq!(card.overall, 100.0);
        assert_eq!(card.band, Band::High);
        for (cat, line) in CATEGORIES.iter().zip(&card.breakdown) {
            assert_eq!(line.raw, 25);
            assert_eq!(line.pct, 100.0);
            assert_eq!(line.weighted, f64::from(cat.weight));
        }
    }

    #[test]
    fn empty_sheet_scores_zero() {
        let card = score(&AnswerSheet::new());
        assert_eq!(card.overall, 0.0);
        assert_eq!(card.band, Band::Low);
        assert!(card.breakdown.iter().all(|c| c.raw == 0 && c.pct == 0.0 && c.weighted == 0.0));
    }

    #[test]
    fn single_full_category_contributes_its_weight() {
        // only "process" (weight 20) answered, all at 5 points
        let card = score(&sheet_with(|c, _| (c == 2).then_some(5)));
        assert_eq!(card.breakdown[2].weighted, 20.0);
        assert_eq!(card.overall, 20.0);
        assert!(card.breakdown.iter().enumerate().all(|(i, c)| i == 2 || c.weighted == 0.0));
    }

    #[test]
    fn uniform_threes_score_sixty() {
        let card = score(&sheet_with(|_, _| Some(3)));
        assert_eq!(card.overall, 60.0);
        assert_eq!(card.band, Band::Moderate);
        assert_eq!(card.breakdown[0].raw, 15);
        assert_eq!(card.breakdown[0].pct, 60.0);
        assert_eq!(card.breakdown[0].weighted, 9.0);
    }

    #[test]
    fn weighted_rounds_to_two_places() {
        // growth (weight 10): raw 7 -> 7/25*10 = 2.8; literacy (weight 10): raw 1 -> 0.4
        // willingness (weight 15): raw 1 -> 0.6
        let card = score(&sheet_with(|c, q| match (c, q) {
            (6, 0) => Some(5),
            (6, 1) => Some(2),
            (3, 0) => Some(1),
            (0, 0) => Some(1),
            _ => None,
        }));
        assert_eq!(card.breakdown[6].weighted, 2.8);
        assert_eq!(card.breakdown[3].weighted, 0.4);
        assert_eq!(card.breakdown[0].weighted, 0.6);
        assert_eq!(card.breakdown[0].pct, 4.0);
        assert_eq!(card.overall, 3.8);
    }

    #[test]
    fn recording_order_does_not_change_the_score() {
        let points = |c: usize, q: usize| Some(((c * 3 + q) % 5 + 1) as u8);
        let forward = score(&sheet_with(points));

        let mut reversed = AnswerSheet::new();
        let order: Vec<_> = bank_order().collect();
        for &(c, q) in order.iter().rev() {
            reversed.record(c, q, answer(points(c, q).unwrap()));
        }
        assert_eq!(score(&reversed), forward);
    }

    #[test]
    fn overall_matches_sum_of_weighted() {
        let card = score(&sheet_with(|c, q| Some(((c + q) % 5 + 1) as u8)));
        let resum = round_to(card.breakdown.iter().map(|c| c.weighted).sum(), 2);
        assert_eq!(card.overall, resum);
        assert_eq!(card.band, Band::for_score(card.overall));
    }
}
