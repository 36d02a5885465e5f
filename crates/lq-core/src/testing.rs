//! Column test definitions for the data-quality runner

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of the tests implemented natively by the runner
pub const BUILTIN_TESTS: &[&str] = &["no_nulls", "unique", "accepted_values", "max_len"];

/// A test definition that can be either a simple string or a parameterized test
///
/// ```yaml
/// tests:
///   - unique
///   - max_len: 20
///   - accepted_values: [old, fresh]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestDefinition {
    /// Simple test with no parameters (e.g., "unique", "no_nulls")
    Simple(String),
    /// Parameterized test (single-key map of test name to its parameters)
    Parameterized(BTreeMap<String, serde_yaml::Value>),
}

/// A resolved column check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnTest {
    /// Column must not contain NULLs
    NoNulls,
    /// Column values must not repeat
    Unique,
    /// Non-null values must be in the list
    AcceptedValues {
        /// Allowed values, compared as string literals
        values: Vec<String>,
    },
    /// String-cast values must not be longer than `length`
    MaxLen {
        /// Maximum allowed length
        length: u64,
    },
    /// Named query template from the custom test library
    Custom {
        /// Template name (file stem)
        name: String,
    },
    /// A built-in test whose parameters could not be understood
    Malformed {
        /// Test name as written in the config
        name: String,
        /// Why the parameters were rejected
        reason: String,
    },
}

impl ColumnTest {
    /// The test's name as written in configuration
    pub fn name(&self) -> &str {
        match self {
            ColumnTest::NoNulls => "no_nulls",
            ColumnTest::Unique => "unique",
            ColumnTest::AcceptedValues { .. } => "accepted_values",
            ColumnTest::MaxLen { .. } => "max_len",
            ColumnTest::Custom { name } | ColumnTest::Malformed { name, .. } => name,
        }
    }

    /// Whether this test is one of the built-ins
    pub fn is_builtin(&self) -> bool {
        BUILTIN_TESTS.contains(&self.name())
    }
}

impl std::fmt::Display for ColumnTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnTest::AcceptedValues { values } => {
                write!(f, "accepted_values: [{}]", values.join(", "))
            }
            ColumnTest::MaxLen { length } => write!(f, "max_len: {length}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Parse a test definition into a column test.
///
/// Anything that is not a built-in name is treated as a custom test; whether
/// it exists is decided at run time against the loaded library.
pub fn parse_test_definition(test_def: &TestDefinition) -> ColumnTest {
    match test_def {
        TestDefinition::Simple(name) => parse_simple_test(name.trim()),
        TestDefinition::Parameterized(map) => match map.iter().next() {
            Some((name, params)) => parse_parameterized_test(name.trim(), params),
            None => ColumnTest::Malformed {
                name: String::new(),
                reason: "empty test definition".to_string(),
            },
        },
    }
}

fn parse_simple_test(name: &str) -> ColumnTest {
    match name {
        "no_nulls" => ColumnTest::NoNulls,
        "unique" => ColumnTest::Unique,
        "accepted_values" | "max_len" => ColumnTest::Malformed {
            name: name.to_string(),
            reason: "missing parameters".to_string(),
        },
        _ => ColumnTest::Custom {
            name: name.to_string(),
        },
    }
}

fn parse_parameterized_test(name: &str, params: &serde_yaml::Value) -> ColumnTest {
    match name {
        "no_nulls" => ColumnTest::NoNulls,
        "unique" => ColumnTest::Unique,
        "accepted_values" => parse_accepted_values(params),
        "max_len" => parse_max_len(params),
        _ => ColumnTest::Custom {
            name: name.to_string(),
        },
    }
}

fn parse_accepted_values(params: &serde_yaml::Value) -> ColumnTest {
    let malformed = |reason: &str| ColumnTest::Malformed {
        name: "accepted_values".to_string(),
        reason: reason.to_string(),
    };

    let Some(seq) = params.as_sequence() else {
        return malformed("expected a list of values");
    };

    let values: Vec<String> = seq.iter().filter_map(scalar_to_string).collect();
    if values.is_empty() {
        return malformed("no accepted values given");
    }
    ColumnTest::AcceptedValues { values }
}

fn parse_max_len(params: &serde_yaml::Value) -> ColumnTest {
    let length = match params {
        serde_yaml::Value::Number(n) => n.as_u64(),
        serde_yaml::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match length {
        Some(length) => ColumnTest::MaxLen { length },
        None => ColumnTest::Malformed {
            name: "max_len".to_string(),
            reason: "expected a non-negative integer length".to_string(),
        },
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "testing_test.rs"]
mod tests;
