use super::domain::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL_COLOR: &str = "#6366F1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub u64);

/// Savings target tracked alongside spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub color: String,
}

impl Goal {
    pub fn from_draft(id: GoalId, draft: GoalDraft) -> Result<Self, ValidationError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyGoalName);
        }
        if !(draft.target.is_finite() && draft.target > 0.0) {
            return Err(ValidationError::InvalidGoalTarget(draft.target));
        }
        let current = draft.current.unwrap_or(0.0);
        if !(current.is_finite() && current >= 0.0) {
            return Err(ValidationError::InvalidContribution(current));
        }

        Ok(Self {
            id,
            name,
            target: draft.target,
            current,
            color: draft
                .color
                .filter(|color| !color.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GOAL_COLOR.to_string()),
        })
    }

    pub fn contribute(&mut self, amount: f64) -> Result<(), ValidationError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ValidationError::InvalidContribution(amount));
        }
        self.current += amount;
        Ok(())
    }

    pub fn progress(&self) -> GoalProgress {
        let percentage = (self.current / self.target * 100.0).clamp(0.0, 100.0);
        GoalProgress {
            percentage: (percentage * 10.0).round() / 10.0,
            remaining: (self.target - self.current).max(0.0),
            reached: self.current >= self.target,
        }
    }

    pub fn view(&self) -> GoalView {
        GoalView {
            goal: self.clone(),
            progress: self.progress(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub percentage: f64,
    pub remaining: f64,
    pub reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, target: f64, current: Option<f64>) -> GoalDraft {
        GoalDraft {
            name: name.to_string(),
            target,
            current,
            color: None,
        }
    }

    #[test]
    fn progress_tracks_partial_and_complete_goals() {
        let japan = Goal::from_draft(GoalId(1), draft("Japan Trip", 2000.0, Some(1300.0)))
            .expect("valid goal");
        let progress = japan.progress();
        assert_eq!(progress.percentage, 65.0);
        assert_eq!(progress.remaining, 700.0);
        assert!(!progress.reached);
        assert_eq!(japan.color, DEFAULT_GOAL_COLOR);

        let mut fund = Goal::from_draft(GoalId(2), draft("Emergency Fund", 5000.0, Some(4500.0)))
            .expect("valid goal");
        fund.contribute(800.0).expect("positive contribution");
        let progress = fund.progress();
        assert_eq!(progress.percentage, 100.0);
        assert_eq!(progress.remaining, 0.0);
        assert!(progress.reached);
    }

    #[test]
    fn rejects_invalid_goals_and_contributions() {
        assert_eq!(
            Goal::from_draft(GoalId(1), draft("  ", 100.0, None)),
            Err(ValidationError::EmptyGoalName)
        );
        assert_eq!(
            Goal::from_draft(GoalId(1), draft("Car", 0.0, None)),
            Err(ValidationError::InvalidGoalTarget(0.0))
        );

        let mut goal = Goal::from_draft(GoalId(1), draft("Car", 100.0, None)).expect("valid");
        assert_eq!(
            goal.contribute(-5.0),
            Err(ValidationError::InvalidContribution(-5.0))
        );
        assert_eq!(goal.current, 0.0);
    }
}
