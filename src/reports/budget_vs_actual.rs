//! Budget vs Actual Report
//!
//! Compares each subcategory's monthly target with what each person actually
//! spent. Variance is the estimate minus the actual, so a negative variance
//! is overspending.

use std::collections::HashMap;
use std::io::Write;

use crate::display::report::{double_separator, separator, truncate};
use crate::error::BudgetResult;
use crate::models::{Money, Month, Person, INCOME_CATEGORY, UNCATEGORIZED};
use crate::storage::{Storage, TransactionFilter};

use super::ReportHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryActuals {
    pub subcategory: String,
    pub estimate: Money,
    pub jeff: Money,
    pub vanessa: Money,
}

impl SubcategoryActuals {
    fn new(subcategory: impl Into<String>) -> Self {
        Self {
            subcategory: subcategory.into(),
            estimate: Money::zero(),
            jeff: Money::zero(),
            vanessa: Money::zero(),
        }
    }

    pub fn actual(&self) -> Money {
        self.jeff + self.vanessa
    }

    pub fn variance(&self) -> Money {
        self.estimate - self.actual()
    }

    fn add_spend(&mut self, person: Person, amount: Money) {
        match person {
            Person::Jeff => self.jeff += amount,
            Person::Vanessa => self.vanessa += amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryActuals {
    pub category: String,
    pub rows: Vec<SubcategoryActuals>,
    /// Target set for the category as a whole, on top of its subcategory targets
    pub category_estimate: Money,
}

impl CategoryActuals {
    pub fn estimate(&self) -> Money {
        self.category_estimate + self.rows.iter().map(|r| r.estimate).sum::<Money>()
    }

    pub fn jeff(&self) -> Money {
        self.rows.iter().map(|r| r.jeff).sum()
    }

    pub fn vanessa(&self) -> Money {
        self.rows.iter().map(|r| r.vanessa).sum()
    }

    pub fn actual(&self) -> Money {
        self.jeff() + self.vanessa()
    }

    pub fn variance(&self) -> Money {
        self.estimate() - self.actual()
    }

    fn row_mut(&mut self, subcategory: &str) -> &mut SubcategoryActuals {
        let idx = match self
            .rows
            .iter()
            .position(|r| r.subcategory.eq_ignore_ascii_case(subcategory))
        {
            Some(idx) => idx,
            None => {
                self.rows.push(SubcategoryActuals::new(subcategory));
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }
}

#[derive(Debug, Clone)]
pub struct BudgetVsActualReport {
    pub header: ReportHeader,
    pub month: Month,
    pub categories: Vec<CategoryActuals>,
}

impl BudgetVsActualReport {
    /// Generate the comparison for a month, in registry order
    pub fn generate(storage: &Storage, month: Month) -> BudgetResult<Self> {
        let mut categories: Vec<CategoryActuals> = storage
            .categories
            .all()?
            .into_iter()
            .filter(|c| !c.matches(INCOME_CATEGORY))
            .map(|c| CategoryActuals {
                rows: c.subcategories.iter().map(SubcategoryActuals::new).collect(),
                category: c.name,
                category_estimate: Money::zero(),
            })
            .collect();

        let mut index: HashMap<String, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.category.to_lowercase(), i))
            .collect();

        let mut slot = |categories: &mut Vec<CategoryActuals>, name: &str| -> usize {
            *index.entry(name.to_lowercase()).or_insert_with(|| {
                categories.push(CategoryActuals {
                    category: name.to_string(),
                    rows: Vec::new(),
                    category_estimate: Money::zero(),
                });
                categories.len() - 1
            })
        };

        for target in storage.targets.list_for_month(month)? {
            let i = slot(&mut categories, &target.category);
            match &target.subcategory {
                Some(sub) => categories[i].row_mut(sub).estimate += target.amount,
                None => categories[i].category_estimate += target.amount,
            }
        }

        let expenses =
            storage.list_transactions(&month.date_range(), &TransactionFilter::expenses())?;
        for txn in &expenses {
            let i = slot(&mut categories, &txn.category);
            let sub = txn.subcategory.as_deref().unwrap_or(UNCATEGORIZED);
            categories[i].row_mut(sub).add_spend(txn.person, txn.amount);
        }

        Ok(Self {
            header: ReportHeader::new("Budget vs Actual", month.long_name()),
            month,
            categories,
        })
    }

    pub fn total_estimate(&self) -> Money {
        self.categories.iter().map(|c| c.estimate()).sum()
    }

    pub fn total_actual(&self) -> Money {
        self.categories.iter().map(|c| c.actual()).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget vs Actual - {}\n", self.month.long_name()));
        output.push_str(&double_separator(88));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            "Subcategory", "Estimate", "Jeff", "Vanessa", "Actual", "Variance"
        ));
        output.push_str(&separator(88));
        output.push('\n');

        for category in &self.categories {
            output.push_str(&format!("\n{}\n", category.category.to_uppercase()));
            for row in &category.rows {
                let flag = if row.variance().is_negative() { " *" } else { "" };
                output.push_str(&format!(
                    "  {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}{}\n",
                    truncate(&row.subcategory, 24),
                    row.estimate.to_string(),
                    row.jeff.to_string(),
                    row.vanessa.to_string(),
                    row.actual().to_string(),
                    row.variance().to_string(),
                    flag
                ));
            }
            output.push_str(&format!(
                "  {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
                "Category Total:",
                category.estimate().to_string(),
                category.jeff().to_string(),
                category.vanessa().to_string(),
                category.actual().to_string(),
                category.variance().to_string()
            ));
        }

        output.push_str(&separator(88));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            "GRAND TOTAL",
            self.total_estimate().to_string(),
            "",
            "",
            self.total_actual().to_string(),
            (self.total_estimate() - self.total_actual()).to_string()
        ));
        output.push_str("\n* = Over estimate\n");

        output
    }

    /// Export subcategory and category total rows as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Month",
            "Category",
            "Subcategory",
            "Estimate",
            "Jeff",
            "Vanessa",
            "Actual",
            "Variance",
        ])?;

        let month = self.month.to_string();
        for category in &self.categories {
            for row in &category.rows {
                csv.write_record([
                    month.clone(),
                    category.category.clone(),
                    row.subcategory.clone(),
                    row.estimate.to_decimal_string(),
                    row.jeff.to_decimal_string(),
                    row.vanessa.to_decimal_string(),
                    row.actual().to_decimal_string(),
                    row.variance().to_decimal_string(),
                ])?;
            }
            csv.write_record([
                month.clone(),
                category.category.clone(),
                "TOTAL".to_string(),
                category.estimate().to_decimal_string(),
                category.jeff().to_decimal_string(),
                category.vanessa().to_decimal_string(),
                category.actual().to_decimal_string(),
                category.variance().to_decimal_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{BudgetTarget, Transaction};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn setup(storage: &Storage) -> Month {
        let march = Month::new(2025, 3).unwrap();
        let d = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        storage
            .targets
            .upsert(BudgetTarget::new(
                "Food",
                Some("Groceries".into()),
                march,
                Money::from_dollars(600),
            ))
            .unwrap();
        for (person, cents) in [(Person::Jeff, 40_000), (Person::Vanessa, 25_000)] {
            storage
                .transactions
                .insert(Transaction::expense(
                    person,
                    d,
                    Money::from_cents(cents),
                    "Food",
                    Some("Groceries".into()),
                ))
                .unwrap();
        }
        storage
            .transactions
            .insert(Transaction::expense(
                Person::Jeff,
                d,
                Money::from_dollars(30),
                "Food",
                None,
            ))
            .unwrap();
        march
    }

    #[test]
    fn test_generate() {
        let (_temp, storage) = create_test_storage();
        let month = setup(&storage);
        let report = BudgetVsActualReport::generate(&storage, month).unwrap();

        assert!(report.categories.iter().all(|c| c.category != INCOME_CATEGORY));
        let food = report.categories.iter().find(|c| c.category == "Food").unwrap();
        let groceries = &food.rows[0];
        assert_eq!(groceries.subcategory, "Groceries");
        assert_eq!(groceries.jeff, Money::from_dollars(400));
        assert_eq!(groceries.vanessa, Money::from_dollars(250));
        assert_eq!(groceries.variance(), Money::from_dollars(-50));

        let uncategorized = food.rows.iter().find(|r| r.subcategory == UNCATEGORIZED).unwrap();
        assert_eq!(uncategorized.actual(), Money::from_dollars(30));
        assert_eq!(food.actual(), Money::from_dollars(680));
        assert_eq!(food.variance(), Money::from_dollars(-80));
        assert_eq!(report.total_actual(), Money::from_dollars(680));
    }

    #[test]
    fn test_terminal_and_csv() {
        let (_temp, storage) = create_test_storage();
        let month = setup(&storage);
        let report = BudgetVsActualReport::generate(&storage, month).unwrap();

        let output = report.format_terminal();
        assert!(output.contains("Budget vs Actual - March 2025"));
        assert!(output.contains("FOOD"));
        assert!(output.contains("* = Over estimate"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("2025-03,Food,Groceries,600.00,400.00,250.00,650.00,-50.00\n"));
        assert!(csv.contains("2025-03,Food,TOTAL,600.00,430.00,250.00,680.00,-80.00\n"));
    }
}
