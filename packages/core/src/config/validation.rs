//! Constants validation with actionable error messages
//!
//! Checks the naming-sensitive values against Google Cloud naming rules.
//! Every violated rule is reported, so the operator can fix all of them in one
//! pass.

use super::schema::{ConfigMap, KEY_BUCKET, KEY_DATASET_ID, KEY_PROJECT_ID, KEY_REPOSITORY};
use console::style;
use regex::Regex;
use std::sync::LazyLock;

/// A constants validation error with a hint on how to fix it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The constants key that has an error
    pub field: String,
    /// Description of what's wrong, including the offending value
    pub message: String,
    /// What a valid value looks like
    pub hint: String,
}

struct NamingRule {
    field: &'static str,
    pattern: &'static str,
    requirement: &'static str,
    hint: &'static str,
}

const NAMING_RULES: &[NamingRule] = &[
    NamingRule {
        field: KEY_PROJECT_ID,
        pattern: r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$",
        requirement: "Must be 6-30 chars, lowercase, numbers, or hyphens",
        hint: "Start with a letter and do not end with a hyphen, e.g. my-proj-1",
    },
    NamingRule {
        field: KEY_DATASET_ID,
        pattern: r"^[a-zA-Z0-9_]+$",
        requirement: "Hyphens not allowed, use underscores",
        hint: "Use letters, digits and underscores only, e.g. ds_main",
    },
    NamingRule {
        field: KEY_BUCKET,
        pattern: r"^[a-z0-9][a-z0-9._-]{1,61}[a-z0-9]$",
        requirement: "Must be 3-63 chars of lowercase letters, numbers, dots, hyphens or underscores",
        hint: "Start and end with a letter or digit, e.g. my-bucket-1",
    },
    NamingRule {
        field: KEY_REPOSITORY,
        pattern: r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$",
        requirement: "Must be 1-63 chars of lowercase letters, numbers or hyphens",
        hint: "Start and end with a letter or digit, e.g. my-repo",
    },
];

static RULE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NAMING_RULES
        .iter()
        .map(|rule| Regex::new(rule.pattern).expect("naming rule pattern compiles"))
        .collect()
});

/// Validate constants against Google Cloud naming conventions
///
/// Returns every violation, one entry per failing field. A missing key is
/// checked as an empty value and therefore fails its rule.
pub fn validate_constants(constants: &ConfigMap) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = NAMING_RULES
        .iter()
        .zip(RULE_PATTERNS.iter())
        .filter_map(|(rule, pattern)| {
            let value = constants.get_or_empty(rule.field);
            if pattern.is_match(value) {
                return None;
            }
            Some(ValidationError {
                field: rule.field.to_string(),
                message: format!("Invalid {}: '{value}' ({})", rule.field, rule.requirement),
                hint: rule.hint.to_string(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Display all validation errors with styled formatting
pub fn display_validation_errors(errors: &[ValidationError]) {
    eprintln!();
    eprintln!("{}", style("Error: Validation failed").red().bold());
    for error in errors {
        eprintln!();
        eprintln!("  {}  {}", style("Field:").dim(), error.field);
        eprintln!("  {}  {}", style("Problem:").dim(), error.message);
        eprintln!("  {}  {}", style("Fix:").dim(), style(&error.hint).cyan());
    }
    eprintln!();
    eprintln!(
        "{} Edit {} and run the generator again.",
        style("Tip:").cyan(),
        style("gcp/gcp_constants.txt").yellow()
    );
    eprintln!();
}
