//! Show command implementation
//!
//! Displays the deployment constants in table or JSON format.
//! Billing details are masked.

use super::generate::resolve_layout;
use anyhow::{Context, Result};
use clap::Args;
use cloudrun_kit_core::config::schema::SENSITIVE_KEYS;
use cloudrun_kit_core::{ConfigMap, load_constants, validate_constants};
use comfy_table::{Cell, Color, Table};
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Project root containing gcp/ (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_show(args: &ShowArgs, quiet: bool) -> Result<()> {
    let layout = resolve_layout(args.base_dir.as_deref())?;
    let path = layout.constants_path();
    let constants = load_constants(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if args.json {
        return show_json(&constants);
    }

    show_table(&constants);
    if !quiet {
        println!();
        println!("Constants file: {}", path.display());
    }
    Ok(())
}

fn show_json(constants: &ConfigMap) -> Result<()> {
    let mut value = serde_json::to_value(constants)?;
    mask_sensitive_fields(&mut value);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn show_table(constants: &ConfigMap) {
    let invalid: Vec<String> = validate_constants(constants)
        .err()
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.field)
        .collect();

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);

    for (key, value) in constants.iter() {
        let display_value = format_value(key, value);
        let cell = if invalid.iter().any(|f| f == key) {
            Cell::new(display_value).fg(Color::Yellow)
        } else {
            Cell::new(display_value)
        };
        table.add_row(vec![Cell::new(key), cell]);
    }

    println!("{table}");
}

fn format_value(key: &str, value: &str) -> String {
    if SENSITIVE_KEYS.contains(&key) {
        return format_sensitive(value);
    }
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value.to_string()
    }
}

/// Keep the last four characters so the operator can tell accounts apart
fn format_sensitive(value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    let tail: String = value
        .chars()
        .skip(value.chars().count().saturating_sub(4))
        .collect();
    format!("********{tail}")
}

/// Mask sensitive fields in a JSON object
fn mask_sensitive_fields(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    for key in SENSITIVE_KEYS {
        if let Some(Value::String(s)) = obj.get_mut(*key) {
            *s = format_sensitive(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudrun_kit_core::config::schema::{KEY_BILLING_ACCOUNT, KEY_REGION};

    #[test]
    fn sensitive_values_are_masked() {
        assert_eq!(
            format_value(KEY_BILLING_ACCOUNT, "0X0X0X-0X0X0X-0X1234"),
            "********1234"
        );
        assert_eq!(format_value(KEY_BILLING_ACCOUNT, ""), "(not set)");
        assert_eq!(format_value(KEY_REGION, "us-east4"), "us-east4");
    }

    #[test]
    fn json_masking_leaves_other_fields() {
        let constants: ConfigMap = [
            (KEY_BILLING_ACCOUNT, "0X0X0X-0X0X0X-0XABCD"),
            (KEY_REGION, "us-east4"),
        ]
        .into_iter()
        .collect();
        let mut value = serde_json::to_value(&constants).unwrap();
        mask_sensitive_fields(&mut value);
        assert_eq!(value[KEY_BILLING_ACCOUNT], "********ABCD");
        assert_eq!(value[KEY_REGION], "us-east4");
    }
}
