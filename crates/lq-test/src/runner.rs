//! Test execution

use crate::custom::CustomTestLibrary;
use crate::error::QualityResult;
use crate::generator::builtin_test_sql;
use crate::report::{ColumnSummary, SuiteReport, TableSummary};
use lq_core::{ColumnTest, TableEntry};
use lq_db::QueryExecutor;
use std::time::{Duration, Instant};

/// Lifecycle of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// Not started
    Pending,
    /// Query in flight
    Running,
    /// No violating rows
    Passed,
    /// Violations found, or the test could not be run
    Failed,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Running => "RUNNING",
            TestStatus::Passed => "PASS",
            TestStatus::Failed => "FAIL",
        };
        f.write_str(label)
    }
}

/// Result of a single test execution
#[derive(Debug, Clone)]
pub struct TestResult {
    /// `schema.table`
    pub table: String,

    /// Column tested
    pub column: String,

    /// Test as displayed, including parameters
    pub test: String,

    /// Current status
    pub status: TestStatus,

    /// Number of violating rows (0 if passed or not run)
    pub failure_count: u64,

    /// Why the test could not be run
    pub error: Option<String>,

    /// Execution time
    pub duration: Duration,
}

impl TestResult {
    /// Create a result for a test that has not started
    pub fn pending(table: impl Into<String>, column: impl Into<String>, test: &ColumnTest) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            test: test.to_string(),
            status: TestStatus::Pending,
            failure_count: 0,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Whether the test passed
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    fn start(&mut self) {
        debug_assert_eq!(self.status, TestStatus::Pending);
        self.status = TestStatus::Running;
    }

    fn pass(mut self, duration: Duration) -> Self {
        self.status = TestStatus::Passed;
        self.duration = duration;
        self
    }

    fn fail(mut self, failure_count: u64, duration: Duration) -> Self {
        self.status = TestStatus::Failed;
        self.failure_count = failure_count;
        self.duration = duration;
        self
    }

    fn error(mut self, error: String, duration: Duration) -> Self {
        self.status = TestStatus::Failed;
        self.error = Some(error);
        self.duration = duration;
        self
    }
}

/// What a test evaluated to before timing is attached
enum Outcome {
    Violations(u64),
    Rejected(String),
}

/// Runs column tests against a query executor
pub struct TestRunner<'a> {
    db: &'a dyn QueryExecutor,
    library: &'a CustomTestLibrary,
}

impl<'a> TestRunner<'a> {
    /// Create a new test runner
    pub fn new(db: &'a dyn QueryExecutor, library: &'a CustomTestLibrary) -> Self {
        Self { db, library }
    }

    /// Run one test on one column. Never fails: problems become a failed result.
    pub async fn run_test(
        &self,
        schema: &str,
        table: &str,
        column: &str,
        test: &ColumnTest,
    ) -> TestResult {
        let mut result = TestResult::pending(format!("{schema}.{table}"), column, test);
        result.start();
        let start = Instant::now();

        let result = match self.evaluate(schema, table, column, test).await {
            Ok(Outcome::Violations(0)) => result.pass(start.elapsed()),
            Ok(Outcome::Violations(count)) => result.fail(count, start.elapsed()),
            Ok(Outcome::Rejected(reason)) => {
                log::warn!("{reason}");
                result.error(reason, start.elapsed())
            }
            Err(e) => {
                log::error!(
                    "Error running test '{}' on {}.{}.{}: {}",
                    test,
                    schema,
                    table,
                    column,
                    e
                );
                result.error(e.to_string(), start.elapsed())
            }
        };

        log::info!("Test '{}': {}", result.test, result.status);
        result
    }

    async fn evaluate(
        &self,
        schema: &str,
        table: &str,
        column: &str,
        test: &ColumnTest,
    ) -> QualityResult<Outcome> {
        if let ColumnTest::Malformed { name, reason } = test {
            return Ok(Outcome::Rejected(format!(
                "Invalid parameters for test '{name}' on column '{column}': {reason}"
            )));
        }

        if let Some(sql) = builtin_test_sql(test, schema, table, column) {
            log::debug!("Running built-in test SQL: {sql}");
            let count = self.db.query_scalar_i64(&sql).await?;
            return Ok(Outcome::Violations(count.max(0) as u64));
        }

        match self.library.render(test.name(), schema, table, column)? {
            Some(sql) => {
                log::debug!("Running custom test SQL: {sql}");
                let rows = self.db.query(&sql).await?;
                Ok(Outcome::Violations(rows.row_count() as u64))
            }
            None => Ok(Outcome::Rejected(format!(
                "Unknown test '{}' on column '{column}'",
                test.name()
            ))),
        }
    }

    /// Run every test configured for one table
    pub async fn run_table(&self, entry: &TableEntry) -> TableSummary {
        let (schema, table) = entry.schema_and_table(self.db.default_schema());
        log::info!("Running tests for {schema}.{table}");

        let mut columns = Vec::with_capacity(entry.config.columns.len());
        for column in &entry.config.columns {
            log::info!("Column: {}", column.name);
            let mut results = Vec::new();
            for test in column.column_tests() {
                results.push(self.run_test(schema, table, &column.name, &test).await);
            }
            columns.push(ColumnSummary::new(column.name.clone(), results));
        }

        TableSummary::new(format!("{schema}.{table}"), columns)
    }

    /// Run all tables sequentially, then close the executor
    pub async fn run_suite(&self, tables: &[TableEntry]) -> SuiteReport {
        let start = Instant::now();

        let mut summaries = Vec::with_capacity(tables.len());
        for entry in tables {
            summaries.push(self.run_table(entry).await);
        }

        if let Err(e) = self.db.close().await {
            log::error!("Failed to close database connection: {e}");
        }

        SuiteReport::new(summaries, start.elapsed())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
