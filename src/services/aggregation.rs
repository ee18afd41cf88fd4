//! Aggregation engine
//!
//! Every figure shown in the overview and reports is derived here from the
//! ledger tables: monthly summaries, category breakdowns with prior-month
//! variance, the net worth trend, day-of-week spending, monthly trend series
//! and the month's quick stats.
//!
//! All sums are exact `Money` arithmetic. Ratios are computed once from the
//! final sums and never summed themselves.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{DateRange, Money, Month, Person, Transaction, TransactionKind, UNCATEGORIZED};
use crate::storage::{Storage, TransactionFilter};

/// Default number of top categories in a monthly summary
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// Income, spending and savings for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: Month,
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub net_savings: Money,
    /// `net_savings / total_income`, or 0 when there is no income
    pub savings_rate: f64,
    /// Expense totals per category, largest first, ties by name
    pub top_categories: Vec<(String, Money)>,
    /// Both people are always present
    pub income_by_person: BTreeMap<Person, Money>,
    pub expenses_by_person: BTreeMap<Person, Money>,
    pub transaction_count: usize,
}

impl MonthlySummary {
    fn empty(month: Month) -> Self {
        Self {
            month,
            total_income: Money::zero(),
            total_expenses: Money::zero(),
            net_savings: Money::zero(),
            savings_rate: 0.0,
            top_categories: Vec::new(),
            income_by_person: per_person_zero(),
            expenses_by_person: per_person_zero(),
            transaction_count: 0,
        }
    }
}

/// Grouping used by a category breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    Category,
    Subcategory,
    Person,
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "subcategory" | "sub" => Ok(Self::Subcategory),
            "person" => Ok(Self::Person),
            other => Err(format!("Unknown grouping: {}", other)),
        }
    }
}

/// Key of one breakdown row
///
/// Subcategories are keyed by their category too, so two categories that
/// share a subcategory name are never merged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BreakdownKey {
    Category(String),
    Subcategory { category: String, subcategory: String },
    Person(Person),
}

impl BreakdownKey {
    fn of(txn: &Transaction, group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Category => Self::Category(bucket(Some(&txn.category))),
            GroupBy::Subcategory => Self::Subcategory {
                category: bucket(Some(&txn.category)),
                subcategory: bucket(txn.subcategory.as_deref()),
            },
            GroupBy::Person => Self::Person(txn.person),
        }
    }
}

impl fmt::Display for BreakdownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(name) => write!(f, "{}", name),
            Self::Subcategory {
                category,
                subcategory,
            } => write!(f, "{} / {}", category, subcategory),
            Self::Person(person) => write!(f, "{}", person),
        }
    }
}

fn bucket(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub key: BreakdownKey,
    pub amount: Money,
    pub previous: Money,
    /// `amount - previous`
    pub variance: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub month: Month,
    pub group_by: GroupBy,
    /// Largest amount first, ties by key
    pub rows: Vec<BreakdownRow>,
    /// Sum of the rows' amounts
    pub total: Money,
    pub previous_total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpending {
    pub weekday: Weekday,
    pub amount: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub month: Month,
    pub income: Money,
    pub expenses: Money,
    pub net_savings: Money,
    pub savings_rate: f64,
}

/// Month-by-month series with its averages
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub first: Month,
    pub last: Month,
    pub rows: Vec<TrendRow>,
    pub average_income: Money,
    pub average_expenses: Money,
    pub average_net_savings: Money,
    /// Derived from the average net savings and income
    pub average_savings_rate: f64,
}

/// Pace of spending within a month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStats {
    pub month: Month,
    pub days_in_month: u32,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub total_expenses: Money,
    pub daily_average: Money,
    pub projected_spend: Money,
}

/// Read-only analytics over the ledger
pub struct AggregationService<'a> {
    storage: &'a Storage,
    top_limit: usize,
}

impl<'a> AggregationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            top_limit: DEFAULT_TOP_CATEGORIES,
        }
    }

    /// Limit how many categories `monthly_summary` returns
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }

    fn transactions_in(&self, range: &DateRange) -> BudgetResult<Vec<Transaction>> {
        self.storage
            .list_transactions(range, &TransactionFilter::default())
    }

    /// Income, expenses, savings and top categories for a month
    pub fn monthly_summary(&self, month: Month) -> BudgetResult<MonthlySummary> {
        let transactions = self.transactions_in(&month.date_range())?;
        let mut summary = MonthlySummary::empty(month);
        if transactions.is_empty() {
            return Ok(summary);
        }

        let mut by_category: HashMap<String, Money> = HashMap::new();
        for txn in &transactions {
            match txn.kind {
                TransactionKind::Income => {
                    summary.total_income += txn.amount;
                    *summary.income_by_person.entry(txn.person).or_default() += txn.amount;
                }
                TransactionKind::Expense => {
                    summary.total_expenses += txn.amount;
                    *summary.expenses_by_person.entry(txn.person).or_default() += txn.amount;
                    *by_category.entry(bucket(Some(&txn.category))).or_default() += txn.amount;
                }
            }
        }

        summary.net_savings = summary.total_income - summary.total_expenses;
        summary.savings_rate = summary.net_savings.ratio_of(summary.total_income);
        summary.transaction_count = transactions.len();

        let mut top: Vec<_> = by_category
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(self.top_limit);
        summary.top_categories = top;

        debug!(
            %month,
            income = %summary.total_income,
            expenses = %summary.total_expenses,
            "monthly summary"
        );
        Ok(summary)
    }

    /// Expenses for a month grouped by `group_by`, with the prior month beside them
    pub fn category_breakdown(
        &self,
        month: Month,
        group_by: GroupBy,
    ) -> BudgetResult<CategoryBreakdown> {
        let current = self.expense_totals(month, group_by)?;
        let previous = self.expense_totals(month.prev(), group_by)?;

        let keys: BTreeSet<&BreakdownKey> = current.keys().chain(previous.keys()).collect();
        let mut rows: Vec<BreakdownRow> = keys
            .into_iter()
            .map(|key| {
                let amount = current.get(key).copied().unwrap_or_default();
                let prior = previous.get(key).copied().unwrap_or_default();
                BreakdownRow {
                    key: key.clone(),
                    amount,
                    previous: prior,
                    variance: amount - prior,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.key.cmp(&b.key)));

        Ok(CategoryBreakdown {
            month,
            group_by,
            total: rows.iter().map(|r| r.amount).sum(),
            previous_total: rows.iter().map(|r| r.previous).sum(),
            rows,
        })
    }

    fn expense_totals(
        &self,
        month: Month,
        group_by: GroupBy,
    ) -> BudgetResult<HashMap<BreakdownKey, Money>> {
        let expenses = self
            .storage
            .list_transactions(&month.date_range(), &TransactionFilter::expenses())?;

        let mut totals: HashMap<BreakdownKey, Money> = HashMap::new();
        for txn in &expenses {
            *totals.entry(BreakdownKey::of(txn, group_by)).or_default() += txn.amount;
        }
        Ok(totals)
    }

    /// Total net worth at each snapshot date between `start` and `end`
    ///
    /// `start` itself is sampled when older snapshots carry into the range.
    pub fn net_worth_trend(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BudgetResult<Vec<NetWorthPoint>> {
        if start > end {
            return Err(BudgetError::Validation(format!(
                "Trend start {} is after end {}",
                start, end
            )));
        }

        let snapshot_dates = self.storage.net_worth.snapshot_dates()?;
        let mut sample_dates: BTreeSet<NaiveDate> = snapshot_dates
            .iter()
            .copied()
            .filter(|d| *d >= start && *d <= end)
            .collect();
        if snapshot_dates.iter().any(|d| *d < start) {
            sample_dates.insert(start);
        }

        sample_dates
            .into_iter()
            .map(|date| {
                let total = self
                    .storage
                    .list_net_worth_entries(date)?
                    .iter()
                    .map(|e| e.value)
                    .sum();
                Ok(NetWorthPoint { date, total })
            })
            .collect()
    }

    /// Expense totals by weekday, Monday first, all seven days present
    pub fn spending_by_day_of_week(&self, range: &DateRange) -> BudgetResult<Vec<DaySpending>> {
        let mut days: Vec<DaySpending> = (0..7)
            .map(|offset| DaySpending {
                weekday: weekday_from_monday(offset),
                amount: Money::zero(),
                count: 0,
            })
            .collect();

        for txn in self
            .storage
            .list_transactions(range, &TransactionFilter::expenses())?
        {
            let day = &mut days[txn.date.weekday().num_days_from_monday() as usize];
            day.amount += txn.amount;
            day.count += 1;
        }

        Ok(days)
    }

    /// Income, expenses and savings for every month from `first` to `last`
    pub fn monthly_trend(&self, first: Month, last: Month) -> BudgetResult<MonthlyTrend> {
        if first > last {
            return Err(BudgetError::Validation(format!(
                "Trend start {} is after end {}",
                first, last
            )));
        }

        let range = DateRange::new(first.start_date(), last.end_date())
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        let transactions = self.transactions_in(&range)?;

        let mut per_month: BTreeMap<Month, (Money, Money)> = Month::span(first, last)
            .into_iter()
            .map(|m| (m, (Money::zero(), Money::zero())))
            .collect();
        for txn in &transactions {
            let totals = per_month.entry(Month::from_date(txn.date)).or_default();
            match txn.kind {
                TransactionKind::Income => totals.0 += txn.amount,
                TransactionKind::Expense => totals.1 += txn.amount,
            }
        }

        let rows: Vec<TrendRow> = per_month
            .into_iter()
            .map(|(month, (income, expenses))| {
                let net_savings = income - expenses;
                TrendRow {
                    month,
                    income,
                    expenses,
                    net_savings,
                    savings_rate: net_savings.ratio_of(income),
                }
            })
            .collect();

        let count = rows.len() as i64;
        let average_income = rows.iter().map(|r| r.income).sum::<Money>().div_rounded(count);
        let average_expenses = rows.iter().map(|r| r.expenses).sum::<Money>().div_rounded(count);
        let average_net_savings = rows
            .iter()
            .map(|r| r.net_savings)
            .sum::<Money>()
            .div_rounded(count);

        Ok(MonthlyTrend {
            first,
            last,
            rows,
            average_income,
            average_expenses,
            average_net_savings,
            average_savings_rate: average_net_savings.ratio_of(average_income),
        })
    }

    /// How far into `month` today is and what spending is on pace for
    pub fn quick_stats(&self, month: Month, today: NaiveDate) -> BudgetResult<QuickStats> {
        let days_in_month = month.days_in_month();
        let days_elapsed = if today > month.end_date() {
            days_in_month
        } else if today < month.start_date() {
            0
        } else {
            today.day()
        };

        let total_expenses: Money = self
            .storage
            .list_transactions(&month.date_range(), &TransactionFilter::expenses())?
            .iter()
            .map(|t| t.amount)
            .sum();

        let daily_average = total_expenses.div_rounded(days_elapsed as i64);
        let projected_spend = if days_elapsed == 0 {
            Money::zero()
        } else {
            total_expenses
                .times(days_in_month as i64)
                .div_rounded(days_elapsed as i64)
        };

        Ok(QuickStats {
            month,
            days_in_month,
            days_elapsed,
            days_remaining: days_in_month - days_elapsed,
            total_expenses,
            daily_average,
            projected_spend,
        })
    }
}

fn per_person_zero() -> BTreeMap<Person, Money> {
    Person::ALL.iter().map(|p| (*p, Money::zero())).collect()
}

fn weekday_from_monday(offset: u32) -> Weekday {
    match offset {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
