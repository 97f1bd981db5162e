use crate::infra::{parse_date, InMemoryGoalRepository, InMemoryTransactionRepository};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use smartsave::coach::{CoachContext, OfflineCoach};
use smartsave::error::AppError;
use smartsave::finance::{
    AnalyticsView, FinanceService, FinanceServiceError, GoalDraft, GoalRepository, GoalView,
    MonthlyBudget, ScoreReport, ScoringMode, SerenityEngine, SpendingPeriod, TransactionDraft,
    TransactionRepository,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Monthly budget used for the dashboard score.
    #[arg(long)]
    pub(crate) budget: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Bank statement CSV (Date, Merchant, Amount, Category, Essential).
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Monthly budget; switches scoring to budget usage.
    #[arg(long)]
    pub(crate) budget: Option<f64>,
    /// First day to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

type MemoryFinance = FinanceService<InMemoryTransactionRepository, InMemoryGoalRepository>;

fn memory_service(engine: SerenityEngine) -> MemoryFinance {
    FinanceService::new(
        Arc::new(InMemoryTransactionRepository::default()),
        Arc::new(InMemoryGoalRepository::default()),
        engine,
    )
}

/// Sample month: rent and groceries as needs, a streaming plan, a ride and a coffee as wants.
pub(crate) fn sample_transactions() -> Vec<TransactionDraft> {
    let today = Utc::now();
    let day = |offset: i64| today - Duration::days(offset);
    vec![
        TransactionDraft::new(15.99, "Subs", false)
            .with_merchant("Netflix")
            .on(day(4)),
        TransactionDraft::new(82.50, "Food", true)
            .with_merchant("Carrefour")
            .on(day(3)),
        TransactionDraft::new(25.00, "Transport", false)
            .with_merchant("Uber")
            .on(day(2)),
        TransactionDraft::new(800.00, "Housing", true)
            .with_merchant("Loyer")
            .on(day(1)),
        TransactionDraft::new(6.50, "Food", false)
            .with_merchant("Starbucks")
            .on(day(0)),
    ]
}

pub(crate) fn sample_goals() -> Vec<GoalDraft> {
    vec![
        GoalDraft {
            name: "Japan Trip".to_string(),
            target: 2000.0,
            current: Some(1300.0),
            color: Some("#6366F1".to_string()),
        },
        GoalDraft {
            name: "Emergency Fund".to_string(),
            target: 5000.0,
            current: Some(4500.0),
            color: Some("#10B981".to_string()),
        },
    ]
}

/// Load the sample transactions and goals into `service`.
pub(crate) fn seed<T, G>(service: &FinanceService<T, G>) -> Result<(), FinanceServiceError>
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    for draft in sample_transactions() {
        service.record_transaction(draft)?;
    }
    for goal in sample_goals() {
        service.create_goal(goal)?;
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs, engine: SerenityEngine) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        budget,
        from,
        to,
    } = args;
    let budget = budget.map(MonthlyBudget::new).transpose()?;

    let service = memory_service(engine);
    let reader = BufReader::new(File::open(&csv)?);
    let summary = service.import_statement(reader)?;
    println!(
        "Imported {} transactions ({:.2}) from {}",
        summary.imported,
        summary.total_amount,
        csv.display()
    );

    let period = SpendingPeriod { from, to };
    let report = service.score(period, budget)?;
    let analytics = service.analytics(period)?;
    render_report(&report, &analytics);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs, engine: SerenityEngine) -> Result<(), AppError> {
    let budget = args.budget.map(MonthlyBudget::new).transpose()?;
    let service = memory_service(engine);
    seed(&service)?;

    println!("SmartSave demo");
    let dashboard = service.dashboard(SpendingPeriod::all(), budget)?;
    let analytics = service.analytics(SpendingPeriod::all())?;
    render_report(&dashboard.report, &analytics);
    if let Some(remaining) = dashboard.remaining_budget {
        println!("Remaining budget: {remaining:.2}");
    }

    println!("\nRecent transactions");
    for transaction in &dashboard.recent_transactions {
        println!(
            "- {} {} {:.2} ({}, {})",
            transaction.booked_on(),
            transaction.merchant,
            transaction.amount,
            transaction.category,
            if transaction.is_essential { "need" } else { "want" }
        );
    }

    println!("\nSavings goals");
    for goal in service.goals()? {
        render_goal(&goal);
    }

    let transactions = service.transactions(SpendingPeriod::all())?;
    let context = CoachContext::new(&dashboard.report, &transactions);
    println!("\nCoach: {}", OfflineCoach::advise(&context));
    Ok(())
}

pub(crate) fn render_report(report: &ScoreReport, analytics: &AnalyticsView) {
    println!(
        "Serenity Score: {:.2} ({})",
        report.score, report.status_label
    );
    match report.mode {
        ScoringMode::NoData => println!("No transactions in range."),
        ScoringMode::DiscretionaryRatio => println!(
            "Discretionary share: {:.1}% of {:.2}",
            report.discretionary_ratio * 100.0,
            report.total_spent
        ),
        ScoringMode::Budget {
            budget,
            usage_ratio,
        } => println!(
            "Budget usage: {:.1}% of {:.2}",
            usage_ratio * 100.0,
            budget
        ),
    }
    println!(
        "Needs {:.2} | Wants {:.2} | {} transactions",
        report.essential_spent, report.discretionary_spent, report.transaction_count
    );

    if analytics.categories.is_empty() {
        return;
    }
    println!("Categories:");
    for category in &analytics.categories {
        println!(
            "  - {}: {:.2} ({}%) {}",
            category.name, category.amount, category.percentage, category.status_label
        );
    }
}

fn render_goal(view: &GoalView) {
    let marker = if view.progress.reached { " (reached)" } else { "" };
    println!(
        "- {}: {:.2}/{:.2} ({:.1}%){}",
        view.goal.name, view.goal.current, view.goal.target, view.progress.percentage, marker
    );
}
