use super::{AdviceError, AdviceProvider, ChatMessage, CoachContext};
use crate::finance::SerenityStatus;

/// Deterministic coach used when no chat backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCoach;

impl OfflineCoach {
    pub fn advise(context: &CoachContext) -> String {
        let mut advice = format!(
            "Your score is {:.2} ({}).",
            context.score, context.status_label
        );

        match context.status {
            SerenityStatus::Stable => {
                advice.push_str(" Record a few transactions so I can look at your spending.");
                return advice;
            }
            SerenityStatus::Excellent => {
                advice.push_str(" Keep going, your non-essential spending is under control.")
            }
            SerenityStatus::Good | SerenityStatus::Critical => advice.push_str(
                " As your coach, I recommend reducing your non-essential spending.",
            ),
        }

        if let Some(category) = context.top_categories.first() {
            advice.push_str(&format!(" Your largest category is {category} of spending."));
        }
        advice
    }
}

impl AdviceProvider for OfflineCoach {
    async fn get_advice(
        &self,
        _messages: &[ChatMessage],
        context: &CoachContext,
    ) -> Result<String, AdviceError> {
        Ok(Self::advise(context))
    }
}
