//! Hit statistics and judgement types.
//!
//! This module defines the judgement system used for scoring,
//! including accuracy calculation and hit statistics tracking.

use serde::{Deserialize, Serialize};

/// Quality of a successful hit, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTier {
    /// Inside the perfect window.
    Perfect,
    /// Inside the good window.
    Good,
    /// Hold released after its tail passed; accepted leniently.
    Late,
}

/// Hit judgement types from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgement {
    Perfect,
    Good,
    Late,
    /// Missed note (expired or failed hold).
    Miss,
    /// Input without a matching note (not counted as miss).
    GhostTap,
}

impl From<HitTier> for Judgement {
    fn from(tier: HitTier) -> Self {
        match tier {
            HitTier::Perfect => Judgement::Perfect,
            HitTier::Good => Judgement::Good,
            HitTier::Late => Judgement::Late,
        }
    }
}

impl Judgement {
    /// Points awarded for this judgement.
    pub fn score(&self) -> u32 {
        match self {
            Judgement::Perfect => 300,
            Judgement::Good => 150,
            Judgement::Late => 50,
            Judgement::Miss | Judgement::GhostTap => 0,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            Judgement::Perfect | Judgement::Good | Judgement::Late
        )
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HitStats {
    pub perfect: u32,
    pub good: u32,
    pub late: u32,
    pub miss: u32,
    pub ghost_tap: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Good => self.good += 1,
            Judgement::Late => self.late += 1,
            Judgement::Miss => self.miss += 1,
            Judgement::GhostTap => self.ghost_tap += 1,
        }
    }

    /// Number of judged notes (ghost taps excluded).
    pub fn judged(&self) -> u32 {
        self.perfect + self.good + self.late + self.miss
    }

    /// Calculates accuracy percentage (0-100).
    ///
    /// Weights: Perfect 3, Good 2, Late 1, Miss 0.
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.judged() as f64;
        if total == 0.0 {
            return 0.0;
        }

        let score =
            self.perfect as f64 * 3.0 + self.good as f64 * 2.0 + self.late as f64;

        (score / (total * 3.0)) * 100.0
    }
}
