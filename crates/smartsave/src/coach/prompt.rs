use super::{ChatMessage, CoachContext};

/// Builds the system message grounding the coach in the user's numbers.
pub fn system_prompt(context: &CoachContext) -> String {
    format!(
        "You are SmartSave, a calm and practical personal finance coach. \
         The user's Serenity Score is {score:.2}/100 ({status}). \
         They spent {total:.2} in total: {essential:.2} on needs and {discretionary:.2} on wants. \
         {summary} \
         Answer in at most three short paragraphs, refer to their actual categories, \
         and suggest concrete ways to reduce non-essential spending when the score is below Excellent.",
        score = context.score,
        status = context.status_label,
        total = context.total_spent,
        essential = context.essential_spent,
        discretionary = context.discretionary_spent,
        summary = context.summary,
    )
}

/// Assembles the outgoing conversation: system prompt, the most recent
/// `history_limit` stored messages, then the new user message.
pub fn build_messages(
    context: &CoachContext,
    history: &[ChatMessage],
    message: &str,
    history_limit: usize,
) -> Vec<ChatMessage> {
    let skip = history.len().saturating_sub(history_limit);
    let mut messages = Vec::with_capacity(history.len() - skip + 2);
    messages.push(ChatMessage::system(system_prompt(context)));
    messages.extend(history.iter().skip(skip).cloned());
    messages.push(ChatMessage::user(message));
    messages
}
