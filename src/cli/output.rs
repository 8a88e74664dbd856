//! Terminal presentation helpers for the lab.

use std::time::Duration;

use comfy_table::{presets, Cell, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::models::{ConflictDecision, FlowOutcome, Identity};

/// Render the current-identity panel.
pub fn format_identity_table(identity: Option<&Identity>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);

    match identity {
        Some(identity) => {
            let badge = if identity.is_transient {
                "ANONYMOUS"
            } else {
                "PERMANENT"
            };
            table.add_row(vec![Cell::new("Uid"), Cell::new(identity.id)]);
            table.add_row(vec![
                Cell::new("Email"),
                Cell::new(identity.email.as_deref().unwrap_or("(none, anonymous)")),
            ]);
            table.add_row(vec![Cell::new("Kind"), Cell::new(badge)]);
            table.add_row(vec![
                Cell::new("Created"),
                Cell::new(identity.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Uid"), Cell::new("(no session yet)")]);
        }
    }

    table
}

/// Print a classified outcome, styled by severity, with the
/// remediation pointer when one exists.
pub fn print_outcome(outcome: &FlowOutcome) {
    let message = outcome.user_message();
    if outcome.is_failure() {
        println!("{}", style(message).red());
    } else {
        println!("{}", style(message).green());
    }

    if let Some(remediation) = outcome.remediation() {
        println!("  {} {}", style("remediation:").bold().dim(), style(remediation).dim());
    }
    if outcome.is_retry_safe() {
        println!("  {}", style("This failure is safe to retry.").dim());
    }
}

/// Print the open conflict decision with the merge branch visibly
/// marked unsupported.
pub fn print_conflict_options(decision: &ConflictDecision) {
    println!(
        "{}",
        style(format!(
            "The email {} already belongs to another account.",
            decision.email
        ))
        .yellow()
        .bold()
    );
    for branch in decision.branches() {
        let tag = if branch.is_supported() {
            style("available").green()
        } else {
            style("NOT IMPLEMENTED").dim().bold()
        };
        println!("  [{}] {} ({})", branch.as_str(), branch.summary(), tag);
    }
}

/// Spinner shown while a provider call is in flight.
pub fn provider_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
