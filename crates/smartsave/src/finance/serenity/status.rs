use serde::{Deserialize, Serialize};

/// Coarse rendering of a Serenity Score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerenityStatus {
    /// No spending recorded for the period.
    Stable,
    Excellent,
    Good,
    Critical,
}

impl SerenityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Critical => "Critical",
        }
    }
}

/// Lower bound (inclusive) of a score band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBand {
    pub min_score: f64,
    pub status: SerenityStatus,
}

/// Threshold table mapping a score to its status. Bands are kept sorted from the
/// highest lower bound down; a score below every band gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UnsortedTable")]
pub struct StatusTable {
    bands: Vec<StatusBand>,
    fallback: SerenityStatus,
}

#[derive(Deserialize)]
struct UnsortedTable {
    bands: Vec<StatusBand>,
    fallback: SerenityStatus,
}

impl From<UnsortedTable> for StatusTable {
    fn from(table: UnsortedTable) -> Self {
        Self::new(table.bands, table.fallback)
    }
}

impl StatusTable {
    pub fn new(mut bands: Vec<StatusBand>, fallback: SerenityStatus) -> Self {
        bands.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));
        Self { bands, fallback }
    }

    /// The standard table: 80 and up Excellent, 50 and up Good, otherwise Critical.
    pub fn with_bounds(excellent_min: f64, good_min: f64) -> Self {
        Self::new(
            vec![
                StatusBand {
                    min_score: excellent_min,
                    status: SerenityStatus::Excellent,
                },
                StatusBand {
                    min_score: good_min,
                    status: SerenityStatus::Good,
                },
            ],
            SerenityStatus::Critical,
        )
    }

    pub fn classify(&self, score: f64) -> SerenityStatus {
        self.bands
            .iter()
            .find(|band| score >= band.min_score)
            .map(|band| band.status)
            .unwrap_or(self.fallback)
    }

    pub fn bands(&self) -> &[StatusBand] {
        &self.bands
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::with_bounds(80.0, 50.0)
    }
}
