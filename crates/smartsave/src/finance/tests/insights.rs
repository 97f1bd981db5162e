use super::common::*;
use crate::finance::insights::{category_icon, category_insights, InsightStatus};

#[test]
fn insights_rank_categories_and_flag_heavy_spend() {
    let transactions = vec![
        tx(800.0, "Housing", true),
        tx(82.5, "Food", true),
        tx(6.5, "Food", false),
        tx(25.0, "Transport", false),
        tx(15.99, "Subs", false),
    ];
    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    let insights = category_insights(&transactions, total);

    let names: Vec<&str> = insights.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Housing", "Food", "Transport", "Subs"]);

    let housing = &insights[0];
    assert_eq!(housing.percentage, 86);
    assert!(housing.is_high());
    assert_eq!(housing.color, "#EF4444");
    assert_eq!(housing.icon, "fa-house");
    assert_eq!(housing.status_label, "High Spending");

    let food = &insights[1];
    assert_eq!(food.amount, 89.0);
    assert_eq!(food.percentage, 9);
    assert_eq!(food.status, InsightStatus::OnTrack);
    assert_eq!(food.color, "#10B981");

    let subs = &insights[3];
    assert_eq!(subs.icon, "fa-tag");
}

#[test]
fn thirty_percent_exactly_is_on_track() {
    let transactions = vec![tx(30.0, "Food", false), tx(70.0, "Housing", true)];
    let insights = category_insights(&transactions, 100.0);
    let food = insights
        .iter()
        .find(|insight| insight.name == "Food")
        .expect("food insight");
    assert_eq!(food.percentage, 30);
    assert_eq!(food.status, InsightStatus::OnTrack);
}

#[test]
fn zero_total_yields_zero_percentages() {
    let transactions = vec![tx(0.0, "Gifts", false)];
    let insights = category_insights(&transactions, 0.0);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].percentage, 0);
    assert!(!insights[0].is_high());
}

#[test]
fn ties_are_ordered_by_name() {
    let transactions = vec![tx(10.0, "Transport", false), tx(10.0, "Bills", true)];
    let insights = category_insights(&transactions, 20.0);
    assert_eq!(insights[0].name, "Bills");
    assert_eq!(insights[0].icon, category_icon("Bills"));
}
