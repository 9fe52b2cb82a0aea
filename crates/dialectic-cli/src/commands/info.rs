//! Info command - Show version and configuration
//!
//! Usage:
//! ```bash
//! dialectic info
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dialectic_debate::DebateConfig;
use dialectic_llm::{LlmConfig, ProviderKind};

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let llm = LlmConfig::load().context("Failed to load provider configuration")?;
    let debate = DebateConfig::from_env();

    println!("{}", "Dialectic - Multi-Agent LLM Debates".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Providers:".bold());
    for kind in [ProviderKind::Anthropic, ProviderKind::OpenAI, ProviderKind::Mock] {
        if llm.is_configured(kind.as_str()) {
            println!("  {} {}", "✓".green(), kind.as_str().green());
        } else {
            println!("  {} {} {}", "✗".red(), kind.as_str(), "(API key not set)".dimmed());
        }
    }
    println!(
        "  {} {}s",
        "Request timeout:".dimmed(),
        llm.request_timeout.as_secs()
    );
    println!();

    println!("{}", "Debate Defaults:".bold());
    println!("  {} {}", "Rounds:".dimmed(), debate.num_rounds);
    println!("  {} {}", "Model:".dimmed(), debate.model_name.green());
    println!("  {} {}", "Temperature:".dimmed(), debate.temperature);
    println!(
        "  {} {}",
        "Max tokens:".dimmed(),
        debate.max_tokens_per_response
    );
    println!("  {} {}", "Execution:".dimmed(), debate.execution_mode);
    match ProviderKind::from_model(&debate.model_name) {
        Some(kind) if llm.is_configured(kind.as_str()) => {}
        Some(kind) => crate::print_warning(&format!(
            "Default model needs the {} provider, which is not configured",
            kind
        )),
        None => crate::print_warning(&format!(
            "No provider serves model '{}'",
            debate.model_name
        )),
    }
    println!();

    println!("{}", "Configuration:".bold());
    for var in [
        "ANTHROPIC_API_KEY",
        "OPENAI_API_KEY",
        "OPENAI_API_ORG",
        "ANTHROPIC_BASE_URL",
        "OPENAI_BASE_URL",
        "DIALECTIC_REQUEST_TIMEOUT_SECS",
        "DIALECTIC_ROUNDS",
        "DIALECTIC_MODEL",
        "DIALECTIC_TEMPERATURE",
        "DIALECTIC_MAX_TOKENS",
        "DIALECTIC_EXECUTION_MODE",
    ] {
        println!("  {} {}", "•".cyan(), var);
    }
    println!("  {} Values may also be set in a .env file", "ℹ".blue());
    println!();

    Ok(())
}
