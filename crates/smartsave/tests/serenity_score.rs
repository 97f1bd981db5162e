use smartsave::finance::{
    category_insights, score_finances, InsightStatus, MonthlyBudget, ScoringConfig, ScoringMode,
    SerenityEngine, SerenityStatus, SpendingRecord, StatusTable,
};

/// Line item from some other ledger, scored without conversion.
struct LedgerLine {
    cents: i64,
    bucket: &'static str,
    needed: bool,
}

impl SpendingRecord for LedgerLine {
    fn amount(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    fn category(&self) -> &str {
        self.bucket
    }

    fn is_essential(&self) -> bool {
        self.needed
    }
}

fn line(cents: i64, bucket: &'static str, needed: bool) -> LedgerLine {
    LedgerLine {
        cents,
        bucket,
        needed,
    }
}

#[test]
fn empty_ledger_is_stable_even_with_a_budget() {
    let lines: Vec<LedgerLine> = Vec::new();
    let budget = MonthlyBudget::new(1200.0).expect("budget");

    let report = score_finances(&lines, Some(budget));
    assert_eq!(report.score, 100.0);
    assert_eq!(report.status, SerenityStatus::Stable);
    assert_eq!(report.total_spent, 0.0);
    assert_eq!(report.mode, ScoringMode::NoData);
}

#[test]
fn foreign_records_score_like_transactions() {
    let lines = vec![line(10_000, "Housing", true), line(5_000, "Leisure", false)];

    let report = score_finances(&lines, None);
    assert_eq!(report.total_spent, 150.0);
    assert_eq!(report.score, 93.33);
    assert_eq!(report.status, SerenityStatus::Excellent);
    assert_eq!(report.status_label, "Excellent");
}

#[test]
fn score_stays_in_bounds_across_spending_mixes() {
    for essential in [0, 1, 50, 500, 5_000] {
        for discretionary in [0, 1, 99, 2_500, 100_000] {
            let lines = vec![
                line(essential * 100, "Bills", true),
                line(discretionary * 100, "Shopping", false),
            ];
            for budget in [None, Some(100.0), Some(10_000.0)] {
                let budget = budget.map(|value| MonthlyBudget::new(value).expect("budget"));
                let report = score_finances(&lines, budget);
                assert!(
                    (0.0..=100.0).contains(&report.score),
                    "score {} out of range for {essential}/{discretionary}",
                    report.score
                );
            }
        }
    }
}

#[test]
fn more_discretionary_spend_never_raises_the_score() {
    let mut previous = f64::MAX;
    for discretionary in (0..=2_000).step_by(50) {
        let lines = vec![
            line(100_000, "Housing", true),
            line(discretionary * 100, "Leisure", false),
        ];
        let score = score_finances(&lines, None).score;
        assert!(score <= previous);
        previous = score;
    }
}

#[test]
fn custom_thresholds_reclassify_scores() {
    let engine = SerenityEngine::new(ScoringConfig {
        statuses: StatusTable::with_bounds(95.0, 60.0),
        ..ScoringConfig::default()
    });
    let lines = vec![line(10_000, "Housing", true), line(5_000, "Leisure", false)];

    let report = engine.score(&lines, None);
    assert_eq!(report.score, 93.33);
    assert_eq!(report.status, SerenityStatus::Good);
}

#[test]
fn insights_rank_foreign_records_by_category() {
    let lines = vec![
        line(80_000, "Housing", true),
        line(8_250, "Food", true),
        line(650, "Food", false),
        line(2_500, "Transport", false),
    ];
    let report = score_finances(&lines, None);

    let insights = category_insights(&lines, report.total_spent);
    let names: Vec<&str> = insights.iter().map(|insight| insight.name.as_str()).collect();
    assert_eq!(names, vec!["Housing", "Food", "Transport"]);
    assert_eq!(insights[0].status, InsightStatus::HighSpending);
    assert_eq!(insights[1].amount, 89.0);
    assert_eq!(insights[2].icon, "fa-car");
}
