//! Interactive upgrade-flow laboratory.
//!
//! Drives the full link/resolve flow in one process against the
//! in-memory provider: seed accounts, start an anonymous session, then
//! link, resolve, reset, and cancel from a small command loop.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::adapters::provider::InMemoryProvider;
use crate::cli::output;
use crate::domain::models::{Config, FlowState};
use crate::services::LinkFlow;

/// Arguments for the lab command
#[derive(Args, Debug)]
pub struct LabArgs {
    /// Seed a pre-existing account, as EMAIL:PASSWORD (repeatable)
    #[arg(long, value_name = "EMAIL:PASSWORD")]
    pub seed: Vec<String>,
}

pub async fn execute(args: LabArgs, config: &Config, json: bool) -> Result<()> {
    let provider = Arc::new(InMemoryProvider::from_config(config.provider.clone()).await);

    for seed in &args.seed {
        let (email, password) = seed
            .split_once(':')
            .context("--seed must be EMAIL:PASSWORD")?;
        provider.seed_account(email, password).await;
    }

    provider.sign_in_anonymously().await;
    let mut flow = LinkFlow::activate(provider.clone()).await;

    println!(
        "{}",
        style("tether lab: anonymous session started. Type 'help' for commands.").bold()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"tether> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => {}
            ["help"] => print_help(),
            ["status"] => print_status(&flow, json)?,
            ["seed", email, password] => {
                provider.seed_account(email, password).await;
                println!("Seeded account {email}.");
            }
            ["link", email, password] => {
                flow.set_candidate(*email, *password);
                let spinner = output::provider_spinner("Linking credential...");
                let outcome = flow.attempt_link().await;
                spinner.finish_and_clear();

                output::print_outcome(&outcome);
                if let Some(decision) = flow.conflict() {
                    output::print_conflict_options(decision);
                    println!("Use 'signin' to take over the existing account, or 'cancel'.");
                }
            }
            ["signin"] => {
                if flow.conflict().is_none() {
                    println!("No conflict is open; nothing to sign in to.");
                    continue;
                }
                println!(
                    "{}",
                    style(
                        "Signing in to the existing account discards the anonymous \
                         session and its unsaved data."
                    )
                    .yellow()
                );
                let spinner = output::provider_spinner("Signing in...");
                let outcome = flow.resolve_override_sign_in().await;
                spinner.finish_and_clear();

                output::print_outcome(&outcome);
                if flow.state() == FlowState::ResetOffered {
                    println!("Forgot the password? Use 'reset' to request a reset email.");
                }
            }
            ["merge"] => {
                if let Err(err) = flow.resolve_merge() {
                    println!("{}", style(err).dim());
                }
            }
            ["reset"] => {
                let email = flow.candidate().email.clone();
                if email.is_empty() {
                    println!("No candidate email to reset; use 'reset EMAIL'.");
                    continue;
                }
                request_reset(&flow, &email).await;
            }
            ["reset", email] => request_reset(&flow, email).await,
            ["options"] => match flow.conflict() {
                Some(decision) => output::print_conflict_options(decision),
                None => println!("No conflict is open."),
            },
            ["cancel"] => {
                flow.cancel();
                println!("Flow re-armed; candidate password cleared.");
            }
            ["quit" | "exit"] => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}

async fn request_reset<P: crate::domain::ports::IdentityProvider>(flow: &LinkFlow<P>, email: &str) {
    match flow.request_reset(email).await {
        Ok(()) => println!("A recovery email has been dispatched to {email}."),
        Err(failure) => println!(
            "{}",
            style(format!("Reset dispatch failed: {}", failure.message)).red()
        ),
    }
}

fn print_status<P: crate::domain::ports::IdentityProvider>(
    flow: &LinkFlow<P>,
    json: bool,
) -> Result<()> {
    if json {
        let status = serde_json::json!({
            "identity": flow.current_identity(),
            "state": flow.state().as_str(),
            "outcome": flow.outcome(),
            "conflict": flow.conflict(),
            "candidate_email": flow.candidate().email,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", output::format_identity_table(flow.current_identity().as_ref()));
    println!(
        "Flow state: {}  Outcome: {}",
        style(flow.state().as_str()).bold(),
        flow.outcome().as_str()
    );
    if flow.conflict().is_some() {
        println!("A credential conflict is open; see 'options'.");
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  status                  Show the current identity and flow state");
    println!("  seed EMAIL PASSWORD     Create a pre-existing account on the provider");
    println!("  link EMAIL PASSWORD     Attempt to link credentials to the anonymous session");
    println!("  options                 Show the open conflict decision");
    println!("  signin                  Resolve the conflict by taking over the existing account");
    println!("  merge                   The permanently unavailable merge branch");
    println!("  reset [EMAIL]           Request a password-reset email");
    println!("  cancel                  Re-arm the flow back to idle");
    println!("  quit                    Leave the lab");
}
