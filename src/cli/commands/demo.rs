//! Canned walkthrough of the credential-conflict path.
//!
//! Seeds an existing account, starts an anonymous session, then runs
//! link -> conflict -> wrong-password override -> reset -> successful
//! override, printing each transition.

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::json;
use std::sync::Arc;

use crate::adapters::provider::InMemoryProvider;
use crate::cli::output;
use crate::domain::models::Config;
use crate::domain::ports::IdentityProvider;
use crate::services::LinkFlow;

const EXISTING_EMAIL: &str = "u@ex.com";
const EXISTING_PASSWORD: &str = "Existing9!";
const CANDIDATE_PASSWORD: &str = "Secret1!";

/// Arguments for the demo command
#[derive(Args, Debug)]
pub struct DemoArgs {}

pub async fn execute(_args: DemoArgs, config: &Config, json: bool) -> Result<()> {
    let provider = Arc::new(InMemoryProvider::from_config(config.provider.clone()).await);
    provider.seed_account(EXISTING_EMAIL, EXISTING_PASSWORD).await;
    provider.sign_in_anonymously().await;

    let mut flow = LinkFlow::activate(provider).await;
    let mut transcript = Vec::new();

    // 1. Link attempt against an email the provider already owns.
    flow.set_candidate(EXISTING_EMAIL, CANDIDATE_PASSWORD);
    let outcome = flow.attempt_link().await;
    record(&mut transcript, json, "attempt_link", &flow, &outcome);

    if !json {
        if let Some(decision) = flow.conflict() {
            output::print_conflict_options(decision);
        }
    }

    // 2. Override sign-in with the wrong password; unlocks reset.
    let outcome = flow.resolve_override_sign_in().await;
    record(&mut transcript, json, "override_wrong_password", &flow, &outcome);

    // 3. Reset dispatch, independent of the flow state.
    let reset = flow.request_reset(EXISTING_EMAIL).await;
    if json {
        transcript.push(json!({
            "action": "request_reset",
            "dispatched": reset.is_ok(),
            "state": flow.state().as_str(),
        }));
    } else {
        match reset {
            Ok(()) => println!("A recovery email has been dispatched to {EXISTING_EMAIL}."),
            Err(failure) => println!("Reset dispatch failed: {}", failure.message),
        }
    }

    // 4. Override again with the real password; the anonymous session
    //    is discarded and the observer reflects the existing account.
    flow.set_candidate(EXISTING_EMAIL, EXISTING_PASSWORD);
    let outcome = flow.resolve_override_sign_in().await;
    record(&mut transcript, json, "override_correct_password", &flow, &outcome);

    if json {
        transcript.push(json!({
            "action": "final_identity",
            "identity": flow.current_identity(),
        }));
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else {
        println!();
        println!("{}", style("Final session:").bold());
        println!("{}", output::format_identity_table(flow.current_identity().as_ref()));
    }

    Ok(())
}

fn record<P: IdentityProvider>(
    transcript: &mut Vec<serde_json::Value>,
    json: bool,
    action: &str,
    flow: &LinkFlow<P>,
    outcome: &crate::domain::models::FlowOutcome,
) {
    if json {
        transcript.push(json!({
            "action": action,
            "state": flow.state().as_str(),
            "outcome": outcome,
        }));
    } else {
        println!();
        println!(
            "{} {} (state: {})",
            style(">").cyan().bold(),
            style(action).bold(),
            flow.state().as_str()
        );
        output::print_outcome(outcome);
    }
}
