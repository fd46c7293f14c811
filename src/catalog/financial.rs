//! Box-office enrichment for movie nodes.
//!
//! Gross figures are keyed by area code and budgets by item type. When a
//! title carries several rows for the same area or for `production`, the
//! row that appears last in its feed wins. Titles where that happens are
//! counted and logged, never silently merged.

use super::{BudgetRecord, GrossRecord};
use crate::constants::{AREA_DOMESTIC, AREA_INTERNATIONAL, AREA_WORLDWIDE, BUDGET_PRODUCTION};
use crate::metrics::GraphMetrics;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Financial facts for one title; `None` means no usable feed row
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Financials {
    pub gross_worldwide: Option<i32>,
    pub gross_international: Option<i64>,
    pub gross_domestic: Option<i32>,
    pub budget_production: Option<i32>,
}

/// Per-title financial lookup built from the gross and budget feeds
#[derive(Debug, Default)]
pub struct FinancialIndex {
    by_title: HashMap<String, Financials>,
    conflicting_titles: usize,
}

fn to_int(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return None;
    }
    Some(truncated as i32)
}

fn to_long(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

impl FinancialIndex {
    pub fn build(grosses: &[GrossRecord], budgets: &[BudgetRecord]) -> Self {
        let mut by_title: HashMap<String, Financials> = HashMap::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut conflicts: HashSet<&str> = HashSet::new();

        for gross in grosses {
            let Some(area) = gross.area.as_deref() else { continue };
            if ![AREA_WORLDWIDE, AREA_DOMESTIC, AREA_INTERNATIONAL].contains(&area) {
                continue;
            }
            if !seen.insert((gross.title_id.as_str(), area)) {
                conflicts.insert(gross.title_id.as_str());
            }
            let entry = by_title.entry(gross.title_id.clone()).or_default();
            let amount = gross.gross_to_date;
            match area {
                AREA_WORLDWIDE => entry.gross_worldwide = amount.and_then(to_int),
                AREA_DOMESTIC => entry.gross_domestic = amount.and_then(to_int),
                _ => entry.gross_international = amount.and_then(to_long),
            }
        }

        for budget in budgets {
            if budget.budget_item_type.as_deref() != Some(BUDGET_PRODUCTION) {
                continue;
            }
            if !seen.insert((budget.title_id.as_str(), BUDGET_PRODUCTION)) {
                conflicts.insert(budget.title_id.as_str());
            }
            let entry = by_title.entry(budget.title_id.clone()).or_default();
            entry.budget_production = budget.amount.and_then(to_int);
        }

        if !conflicts.is_empty() {
            warn!(
                "{} titles have repeated gross or production budget rows; last row in feed order kept",
                conflicts.len()
            );
            GraphMetrics::record_financial_conflicts(conflicts.len());
        }
        debug!("Financial index covers {} titles", by_title.len());

        Self {
            conflicting_titles: conflicts.len(),
            by_title,
        }
    }

    /// Financials for a title; all `None` when no feed row matched
    pub fn get(&self, title_id: &str) -> Financials {
        self.by_title.get(title_id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    pub fn conflicting_titles(&self) -> usize {
        self.conflicting_titles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gross(title: &str, area: &str, amount: f64) -> GrossRecord {
        GrossRecord {
            title_id: title.to_string(),
            area: Some(area.to_string()),
            gross_to_date: Some(amount),
        }
    }

    fn budget(title: &str, kind: &str, amount: f64) -> BudgetRecord {
        BudgetRecord {
            title_id: title.to_string(),
            budget_item_type: Some(kind.to_string()),
            amount: Some(amount),
        }
    }

    #[test]
    fn test_grosses_split_by_area() {
        let grosses = vec![
            gross("tt1", "XWW", 1000.0),
            gross("tt1", "XDOM", 400.0),
            gross("tt1", "XNDOM", 600.0),
            gross("tt1", "XEU", 99.0),
        ];
        let index = FinancialIndex::build(&grosses, &[]);
        let f = index.get("tt1");
        assert_eq!(f.gross_worldwide, Some(1000));
        assert_eq!(f.gross_domestic, Some(400));
        assert_eq!(f.gross_international, Some(600));
        assert_eq!(f.budget_production, None);
    }

    #[test]
    fn test_only_production_budgets_count() {
        let budgets = vec![budget("tt1", "marketing", 5.0), budget("tt2", "production", 7.0)];
        let index = FinancialIndex::build(&[], &budgets);
        assert_eq!(index.get("tt1").budget_production, None);
        assert_eq!(index.get("tt2").budget_production, Some(7));
    }

    #[test]
    fn test_repeated_production_budget_last_row_wins() {
        let budgets = vec![
            budget("tt1", "production", 100.0),
            budget("tt1", "production", 250.0),
        ];
        let index = FinancialIndex::build(&[], &budgets);
        assert_eq!(index.get("tt1").budget_production, Some(250));
        assert_eq!(index.conflicting_titles(), 1);
    }

    #[test]
    fn test_international_gross_is_wide() {
        let grosses = vec![gross("tt1", "XNDOM", 5_000_000_000.0), gross("tt1", "XWW", 5_000_000_000.0)];
        let index = FinancialIndex::build(&grosses, &[]);
        let f = index.get("tt1");
        assert_eq!(f.gross_international, Some(5_000_000_000));
        // Does not fit the bounded integer column
        assert_eq!(f.gross_worldwide, None);
    }

    #[test]
    fn test_unknown_title_has_no_financials() {
        let index = FinancialIndex::build(&[], &[]);
        assert_eq!(index.get("tt404"), Financials::default());
        assert!(index.is_empty());
    }
}
