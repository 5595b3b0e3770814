use crate::model::{Answers, Catalog};

/// Outcome for a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemVerdict {
    pub name: String,
    pub chosen: String,
    pub correct: String,
    pub is_correct: bool,
}

/// Coarse classification of a result, used for the closing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// Every item matched.
    Perfect,
    /// At least [`GOOD_SCORE_THRESHOLD`] items matched.
    Good,
    NeedsPractice,
}

pub const GOOD_SCORE_THRESHOLD: u32 = 3;

/// Per-item verdicts plus the aggregate count.
///
/// Verdicts follow catalog declaration order, not the shuffled presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    per_item: Vec<ItemVerdict>,
    correct_count: u32,
    total: u32,
}

impl ScoreResult {
    #[must_use]
    pub fn per_item(&self) -> &[ItemVerdict] {
        &self.per_item
    }

    #[must_use]
    pub fn verdict(&self, name: &str) -> Option<&ItemVerdict> {
        self.per_item.iter().find(|v| v.name == name)
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.correct_count == self.total
    }

    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        if self.is_perfect() {
            ScoreTier::Perfect
        } else if self.correct_count >= GOOD_SCORE_THRESHOLD {
            ScoreTier::Good
        } else {
            ScoreTier::NeedsPractice
        }
    }
}

/// Compare `answers` against every catalog entry.
///
/// Pure and total: items without an answer count as incorrect.
#[must_use]
pub fn score(catalog: &Catalog, answers: &Answers) -> ScoreResult {
    let per_item: Vec<ItemVerdict> = catalog
        .entries()
        .iter()
        .map(|entry| {
            let chosen = answers.get(entry.name());
            ItemVerdict {
                name: entry.name().to_owned(),
                chosen: chosen.to_owned(),
                correct: entry.description().to_owned(),
                is_correct: chosen == entry.description(),
            }
        })
        .collect();

    let correct = per_item.iter().filter(|v| v.is_correct).count();

    ScoreResult {
        correct_count: u32::try_from(correct).unwrap_or(u32::MAX),
        total: u32::try_from(per_item.len()).unwrap_or(u32::MAX),
        per_item,
    }
}
