//! Aggregated test outcomes

use crate::runner::TestResult;
use std::time::Duration;

/// Percentage of passed tests, 0 when nothing ran
fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// Outcomes of all tests declared on one column
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    /// Column name
    pub column: String,

    /// Results in declaration order
    pub results: Vec<TestResult>,
}

impl ColumnSummary {
    /// Create a column summary
    pub fn new(column: impl Into<String>, results: Vec<TestResult>) -> Self {
        Self {
            column: column.into(),
            results,
        }
    }

    /// Tests run on this column
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Tests that passed
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Tests that failed
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Pass rate in percent
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.passed(), self.total())
    }
}

/// Outcomes for one table
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// `schema.table`
    pub table: String,

    /// Per-column outcomes in configuration order
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Create a table summary
    pub fn new(table: impl Into<String>, columns: Vec<ColumnSummary>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Every result for this table
    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.columns.iter().flat_map(|c| c.results.iter())
    }

    /// Tests run on this table
    pub fn total(&self) -> usize {
        self.columns.iter().map(ColumnSummary::total).sum()
    }

    /// Tests that passed
    pub fn passed(&self) -> usize {
        self.columns.iter().map(ColumnSummary::passed).sum()
    }

    /// Tests that failed
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Pass rate in percent
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.passed(), self.total())
    }
}

/// Outcome of a full data-quality run
#[derive(Debug, Clone)]
pub struct SuiteReport {
    /// Per-table outcomes in configuration order
    pub tables: Vec<TableSummary>,

    /// Total execution time
    pub duration: Duration,
}

impl SuiteReport {
    /// Create a report from table summaries
    pub fn new(tables: Vec<TableSummary>, duration: Duration) -> Self {
        Self { tables, duration }
    }

    /// Every result in the run
    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.tables.iter().flat_map(TableSummary::results)
    }

    /// Results that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results().filter(|r| !r.passed())
    }

    /// Tests run
    pub fn total(&self) -> usize {
        self.tables.iter().map(TableSummary::total).sum()
    }

    /// Tests that passed
    pub fn passed(&self) -> usize {
        self.tables.iter().map(TableSummary::passed).sum()
    }

    /// Tests that failed
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Pass rate in percent
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.passed(), self.total())
    }

    /// Check if all tests passed
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TestStatus;

    fn result(status: TestStatus) -> TestResult {
        TestResult {
            table: "main.t".to_string(),
            column: "c".to_string(),
            test: "unique".to_string(),
            status,
            failure_count: 0,
            error: None,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_counts_roll_up() {
        let report = SuiteReport::new(
            vec![
                TableSummary::new(
                    "main.a",
                    vec![
                        ColumnSummary::new(
                            "x",
                            vec![result(TestStatus::Passed), result(TestStatus::Failed)],
                        ),
                        ColumnSummary::new("y", vec![result(TestStatus::Passed)]),
                    ],
                ),
                TableSummary::new(
                    "main.b",
                    vec![ColumnSummary::new("z", vec![result(TestStatus::Passed)])],
                ),
            ],
            Duration::ZERO,
        );

        assert_eq!(report.total(), 4);
        assert_eq!(report.passed(), 3);
        assert_eq!(report.failed(), 1);
        assert!((report.pass_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(report.tables[0].failed(), 1);
        assert!((report.tables[0].columns[0].pass_rate() - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.failures().count(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_empty_report() {
        let report = SuiteReport::new(Vec::new(), Duration::ZERO);
        assert_eq!(report.total(), 0);
        assert_eq!(report.pass_rate(), 0.0);
        assert!(report.all_passed());
    }
}
