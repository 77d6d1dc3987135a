//! Expense aggregation.
//!
//! Summaries are computed from a full scan of a user's expenses every time;
//! nothing is maintained incrementally.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Expense, MoneyCents};

/// Group key used when an expense's category name cannot be resolved.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub total: MoneyCents,
    pub count: u64,
}

impl Bucket {
    fn push(&mut self, amount: MoneyCents) {
        self.total = MoneyCents::new(self.total.cents().saturating_add(amount.cents()));
        self.count += 1;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: MoneyCents,
    pub count: u64,
    /// `total / count`, truncated toward zero; 0 when there are no expenses.
    pub average: MoneyCents,
    pub by_category: BTreeMap<String, Bucket>,
    /// Keyed by `YYYY-MM` of the creation time, in UTC.
    pub by_month: BTreeMap<String, Bucket>,
}

/// Aggregates `expenses`, labelling categories through `category_names`
/// (category id -> display name).
pub fn summarize(expenses: &[Expense], category_names: &HashMap<String, String>) -> Summary {
    let mut overall = Bucket::default();
    let mut by_category: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut by_month: BTreeMap<String, Bucket> = BTreeMap::new();

    for expense in expenses {
        overall.push(expense.amount);

        let name = category_names
            .get(&expense.category_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
        by_category.entry(name).or_default().push(expense.amount);

        let month = expense.created_at.format("%Y-%m").to_string();
        by_month.entry(month).or_default().push(expense.amount);
    }

    let average = if overall.count > 0 {
        MoneyCents::new(overall.total.cents() / overall.count as i64)
    } else {
        MoneyCents::ZERO
    };

    Summary {
        total: overall.total,
        count: overall.count,
        average,
        by_category,
        by_month,
    }
}
