use super::ScoringConfig;

pub(crate) struct SpendSignals {
    pub total_spent: f64,
    pub discretionary_spent: f64,
    pub discretionary_ratio: f64,
}

pub(crate) fn spend_signals<I>(amounts: I) -> SpendSignals
where
    I: IntoIterator<Item = (f64, bool)>,
{
    let amounts: Vec<(f64, bool)> = amounts.into_iter().collect();
    let (total_spent, discretionary_spent) = sums(&amounts, 1.0);

    let discretionary_ratio = if !total_spent.is_finite() {
        // The sums overflowed; the share is still defined once rescaled.
        let scale = amounts.iter().map(|(amount, _)| *amount).fold(0.0, f64::max);
        let (total, discretionary) = sums(&amounts, scale);
        discretionary / total
    } else if total_spent > 0.0 {
        discretionary_spent / total_spent
    } else {
        0.0
    };

    SpendSignals {
        total_spent,
        discretionary_spent,
        discretionary_ratio,
    }
}

fn sums(amounts: &[(f64, bool)], scale: f64) -> (f64, f64) {
    amounts.iter().fold(
        (0.0_f64, 0.0_f64),
        |(total, discretionary), &(amount, is_essential)| {
            let amount = amount / scale;
            let discretionary = if is_essential {
                discretionary
            } else {
                discretionary + amount
            };
            (total + amount, discretionary)
        },
    )
}

/// Every percentage point of discretionary share above the threshold costs
/// `penalty_per_point` score points.
pub(crate) fn discretionary_score(ratio: f64, config: &ScoringConfig) -> f64 {
    if ratio <= config.discretionary_threshold {
        100.0
    } else {
        100.0 - (ratio - config.discretionary_threshold) * 100.0 * config.penalty_per_point
    }
}

/// Three-segment decay over budget usage: gentle up to half the budget, steep
/// until the budget is spent, then a slow slide from 30.
pub(crate) fn budget_score(usage_ratio: f64) -> f64 {
    if usage_ratio <= 0.5 {
        100.0 - usage_ratio * 40.0
    } else if usage_ratio <= 1.0 {
        80.0 - (usage_ratio - 0.5) * 100.0
    } else {
        30.0 - (usage_ratio - 1.0) * 20.0
    }
}

pub(crate) fn finalize(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    let clamped = raw.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}
