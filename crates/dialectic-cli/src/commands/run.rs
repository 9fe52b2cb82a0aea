//! Run command - Conduct a debate
//!
//! Usage:
//! ```bash
//! dialectic run "Remote work improves productivity" --rounds 2 --output debate.json
//! dialectic run "Tabs beat spaces" --mock --sequential
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use dialectic_debate::{DebateConfig, DebateError, DebateOrchestrator, ExecutionMode};
use dialectic_llm::{global_metrics, LlmConfig, MockProvider};

use super::show::print_record;
use crate::{print_error, print_info, print_success, print_warning};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Topic or proposition to debate
    topic: String,

    /// Number of rounds
    #[arg(long, short = 'r')]
    rounds: Option<u32>,

    /// Model used by all three agents
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long, short = 't')]
    temperature: Option<f32>,

    /// Token cap per agent response
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Let agent A finish before agent B starts
    #[arg(long)]
    sequential: bool,

    /// File containing custom judging criteria
    #[arg(long, value_name = "FILE")]
    criteria_file: Option<PathBuf>,

    /// Write the transcript to this file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use offline mock agents instead of a real provider
    #[arg(long)]
    mock: bool,

    /// Print call metrics after the debate
    #[arg(long)]
    metrics: bool,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let llm = LlmConfig::load().context("Failed to load provider configuration")?;
    let config = build_config(&args).await?;
    tracing::debug!(?config, mock = args.mock, "Resolved debate configuration");

    let mut orchestrator = if args.mock {
        DebateOrchestrator::new(
            config,
            Arc::new(MockProvider::smart()),
            Arc::new(MockProvider::smart()),
            Arc::new(MockProvider::smart()),
        )?
    } else {
        DebateOrchestrator::from_llm_config(config, &llm)
            .context("Failed to set up debate agents")?
    };

    let config = orchestrator.config();
    println!("{}", "⚖ Dialectic Debate".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!("  {} {}", "Topic:".dimmed(), args.topic.trim().bold());
    println!(
        "  {} {} rounds, {} ({}), temperature {}",
        "Setup:".dimmed(),
        config.num_rounds,
        config.model_name.green(),
        config.execution_mode,
        config.temperature
    );
    println!();

    let outcome = orchestrator.conduct_debate(&args.topic).await;

    let saved_to = match &args.output {
        Some(path) => match orchestrator.save_debate_record(path).await {
            Ok(()) => Some(path),
            Err(DebateError::NoDebate) => None,
            Err(e) => {
                print_warning(&format!("Could not save transcript: {}", e));
                None
            }
        },
        None => None,
    };

    if args.metrics {
        println!("{}", global_metrics().snapshot().to_prometheus());
    }

    match outcome {
        Ok(_) => {
            let record = orchestrator.debate_record()?;
            print_record(&record, false);
            if let Some(path) = saved_to {
                print_success(&format!("Transcript saved to {}", path.display()));
            }
            Ok(())
        }
        Err(e) => {
            print_error(&format!("Debate failed: {}", e));
            if let DebateError::AgentFailed { .. } = &e {
                print_info(&format!(
                    "{} complete round(s) were recorded before the failure",
                    e.completed_rounds()
                ));
                if let Some(path) = saved_to {
                    print_info(&format!("Partial transcript saved to {}", path.display()));
                }
            }
            Err(e.into())
        }
    }
}

/// Environment defaults overridden by command-line flags
async fn build_config(args: &RunArgs) -> Result<DebateConfig> {
    let mut config = DebateConfig::from_env();

    if let Some(rounds) = args.rounds {
        config = config.with_rounds(rounds);
    }
    if let Some(model) = &args.model {
        config = config.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    if args.sequential {
        config = config.with_execution_mode(ExecutionMode::Sequential);
    }
    if let Some(path) = &args.criteria_file {
        let criteria = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read criteria file: {}", path.display()))?;
        config = config.with_judge_criteria(&criteria);
    }

    Ok(config)
}
